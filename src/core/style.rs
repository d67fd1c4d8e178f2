use crate::core::object::deep_clone;
use crate::core::classify::raw_type;
use crate::domain::model::{parse_number, Value};
use crate::utils::error::{HelperError, Result};

/// 會在數字與 `px` 字串之間轉換的樣式屬性
pub const PIXEL_KEYS: [&str; 16] = [
    "width",
    "height",
    "line-height",
    "font-size",
    "left",
    "right",
    "top",
    "bottom",
    "margin-left",
    "margin-right",
    "margin-top",
    "margin-bottom",
    "padding-left",
    "padding-right",
    "padding-top",
    "padding-bottom",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PxMode {
    /// 數字 -> "10px"
    Pad,
    /// "10px" -> 數字
    Remove,
}

pub fn is_pixel_key(key: &str) -> bool {
    PIXEL_KEYS.contains(&key)
}

pub fn pad_px(value: &Value) -> String {
    format!("{}px", value.to_display_string())
}

/// 移除所有的 "px" 後轉成數字；無法解析時是 NaN，不會報錯
pub fn px_to_num(value: &Value) -> f64 {
    parse_number(&value.to_display_string().replace("px", ""))
}

/// 回傳轉換後的新樣式物件，輸入不會被修改
pub fn style_toggle_px(style: &Value, mode: PxMode) -> Result<Value> {
    let Value::Object(source) = style else {
        return Err(HelperError::invalid_argument(format!(
            "style must be an object, got {}",
            raw_type(style)
        )));
    };

    let converted: Vec<(String, Value)> = source
        .entries()
        .into_iter()
        .filter(|(key, _)| is_pixel_key(key))
        .filter_map(|(key, value)| match mode {
            PxMode::Pad if value.to_number().is_nan() => None,
            PxMode::Pad => Some((key, Value::String(pad_px(&value)))),
            PxMode::Remove => Some((key, Value::Number(px_to_num(&value)))),
        })
        .collect();

    let result = deep_clone(style)?;
    if let Value::Object(out) = &result {
        for (key, value) in converted {
            out.insert(key, value);
        }
    }
    Ok(result)
}

pub fn style_pad_px(style: &Value) -> Result<Value> {
    style_toggle_px(style, PxMode::Pad)
}

pub fn style_remove_px(style: &Value) -> Result<Value> {
    style_toggle_px(style, PxMode::Remove)
}
