use crate::core::classify::raw_type;
use crate::domain::model::Value;
use crate::utils::error::{HelperError, Result};

/// 攤平一層：陣列參數展開，其他參數原樣加入
pub fn flatten_one_level(args: &[Value]) -> Vec<Value> {
    let mut flat = Vec::new();
    for arg in args {
        match arg {
            Value::Array(items) => flat.extend(items.to_vec()),
            other => flat.push(other.clone()),
        }
    }
    flat
}

fn contains_strict(haystack: &[Value], needle: &Value) -> bool {
    haystack.iter().any(|item| item.same_ref(needle))
}

/// 陣列合併並且去重，保留第一次出現的元素
pub fn assign_array(args: &[Value]) -> Value {
    let mut unique: Vec<Value> = Vec::new();
    for item in flatten_one_level(args) {
        if !contains_strict(&unique, &item) {
            unique.push(item);
        }
    }
    Value::from(unique)
}

/// 去掉 `base` 中出現在 `removals`（攤平一層後）裡的元素
pub fn splice_array(base: &Value, removals: &[Value]) -> Result<Value> {
    let Value::Array(items) = base else {
        return Err(HelperError::invalid_argument(format!(
            "splice_array expects an array, got {}",
            raw_type(base)
        )));
    };

    let removals = flatten_one_level(removals);
    let kept: Vec<Value> = items
        .to_vec()
        .into_iter()
        .filter(|item| !contains_strict(&removals, item))
        .collect();

    Ok(Value::from(kept))
}
