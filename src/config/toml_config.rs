use crate::utils::error::{HelperError, Result};
use crate::utils::validation::{validate_one_of, validate_positive_number, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIME_SLICE_MS: u64 = 400;
pub const DEFAULT_MAX_DEPTH: usize = 512;
pub const MAX_ALLOWED_DEPTH: usize = 4096;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelpersConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_time_slice_ms")]
    pub time_slice_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_time_slice_ms() -> u64 {
    DEFAULT_TIME_SLICE_MS
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            time_slice_ms: DEFAULT_TIME_SLICE_MS,
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl HelpersConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HelperError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，解析後立即驗證
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config: Self =
            toml::from_str(&processed_content).map_err(|e| HelperError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.validate_config()?;

        tracing::debug!(
            "Loaded helpers config: time_slice={}ms, max_depth={}",
            config.timing.time_slice_ms,
            config.merge.max_depth
        );
        Ok(config)
    }

    /// 替換環境變數 (例如 ${TIME_SLICE})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HelperError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("timing.time_slice_ms", self.timing.time_slice_ms, 1)?;
        validate_range("merge.max_depth", self.merge.max_depth, 1, MAX_ALLOWED_DEPTH)?;
        validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        Ok(())
    }

    pub fn time_slice(&self) -> Duration {
        Duration::from_millis(self.timing.time_slice_ms)
    }

    pub fn max_depth(&self) -> usize {
        self.merge.max_depth
    }
}

impl Validate for HelpersConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
