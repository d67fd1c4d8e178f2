use crate::domain::model::Value;

/// 容器分類。合併與複製只認這三種。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    PlainObject,
    Array,
    Other,
}

impl Kind {
    pub fn is_container(self) -> bool {
        self != Kind::Other
    }
}

pub fn classify(value: &Value) -> Kind {
    match value {
        Value::Object(_) => Kind::PlainObject,
        Value::Array(_) => Kind::Array,
        _ => Kind::Other,
    }
}

/// 值的原始型別名稱，例如 "Object"、"Array"、"Date"
pub fn raw_type(value: &Value) -> &str {
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Boolean",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
        Value::Function(_) => "Function",
        Value::Opaque(opaque) => opaque.tag(),
    }
}
