use crate::config::toml_config::DEFAULT_MAX_DEPTH;
use crate::utils::error::{HelperError, Result};
use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as SerError, Serialize, SerializeMap, SerializeSeq, Serializer};
use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

pub type Map = IndexMap<String, Value>;

/// `PartialEq` 與 `Debug` 最多往下走幾層
const MAX_NESTING: usize = DEFAULT_MAX_DEPTH;

/// 動態值。容器是共享的 handle：`Clone` 只複製參照，真正的複製要走 deep_clone。
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Object),
    Function(Callback),
    Opaque(Opaque),
}

/// 可變、可共享的序列。跳號寫入留下的洞（hole）不算自有索引。
#[derive(Clone, Default)]
pub struct Array(Rc<RefCell<Slots>>);

#[derive(Default)]
struct Slots {
    items: Vec<Value>,
    holes: BTreeSet<usize>,
}

/// 可變、可共享的字串鍵映射，保留插入順序
#[derive(Clone, Default)]
pub struct Object(Rc<RefCell<Map>>);

#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

/// 不透明的值（日期、正規表達式、類別實例…），永遠以參照共享
#[derive(Clone)]
pub struct Opaque {
    tag: String,
    inner: Rc<dyn Any>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Self::with_holes(items, BTreeSet::new())
    }

    pub(crate) fn with_holes(items: Vec<Value>, holes: BTreeSet<usize>) -> Self {
        Array(Rc::new(RefCell::new(Slots { items, holes })))
    }

    /// 洞在這裡看起來是 `Null`
    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        Ref::map(self.0.borrow(), |slots| &slots.items)
    }

    /// 直接改寫元素不會更新洞的紀錄，填洞請用 `set`
    pub fn borrow_mut(&self) -> RefMut<'_, Vec<Value>> {
        RefMut::map(self.0.borrow_mut(), |slots| &mut slots.items)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().items.is_empty()
    }

    /// 洞回傳 None
    pub fn get(&self, index: usize) -> Option<Value> {
        let slots = self.0.borrow();
        if slots.holes.contains(&index) {
            return None;
        }
        slots.items.get(index).cloned()
    }

    /// 索引在範圍內而且不是洞
    pub fn has_index(&self, index: usize) -> bool {
        let slots = self.0.borrow();
        index < slots.items.len() && !slots.holes.contains(&index)
    }

    pub fn push(&self, value: Value) {
        self.0.borrow_mut().items.push(value);
    }

    /// 寫入任意索引；超出長度時中間留洞
    pub fn set(&self, index: usize, value: Value) {
        let mut slots = self.0.borrow_mut();
        let len = slots.items.len();
        if index < len {
            slots.items[index] = value;
            slots.holes.remove(&index);
            return;
        }

        // 陣列被截短過的話，舊的洞已經不在範圍內
        slots.holes.retain(|&hole| hole < len);
        slots.holes.extend(len..index);
        slots.items.resize(index, Value::Null);
        slots.items.push(value);
    }

    pub fn holes(&self) -> BTreeSet<usize> {
        self.0.borrow().holes.clone()
    }

    /// 淺層快照：元素本身仍是共享的 handle
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().items.clone()
    }

    /// 自有的 (索引, 元素)，跳過洞
    pub fn entries(&self) -> Vec<(usize, Value)> {
        let slots = self.0.borrow();
        slots
            .items
            .iter()
            .enumerate()
            .filter(|(index, _)| !slots.holes.contains(index))
            .map(|(index, item)| (index, item.clone()))
            .collect()
    }

    pub fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map) -> Self {
        Object(Rc::new(RefCell::new(map)))
    }

    pub fn borrow(&self) -> Ref<'_, Map> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Map> {
        self.0.borrow_mut()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.borrow_mut().insert(key.into(), value)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// 淺層快照，依列舉順序
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Callback {
    pub fn new(func: impl Fn() + 'static) -> Self {
        Callback(Rc::new(func))
    }

    pub fn call(&self) {
        (self.0)()
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Opaque {
    pub fn new<T: Any>(tag: impl Into<String>, value: T) -> Self {
        Opaque {
            tag: tag.into(),
            inner: Rc::new(value),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Value {
    /// 新的空物件
    pub fn object() -> Self {
        Value::Object(Object::new())
    }

    /// 新的空陣列
    pub fn array() -> Self {
        Value::Array(Array::new())
    }

    pub fn function(func: impl Fn() + 'static) -> Self {
        Value::Function(Callback::new(func))
    }

    pub fn opaque<T: Any>(tag: impl Into<String>, value: T) -> Self {
        Value::Opaque(Opaque::new(tag, value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// 取物件的鍵或陣列的索引（字串形式）
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.get(key),
            Value::Array(arr) => array_index(key).and_then(|i| arr.get(i)),
            _ => None,
        }
    }

    /// 嚴格相等 (`===`)：純量比值，其餘比參照
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// 寬鬆的數值轉換，無法轉換時回傳 NaN
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            _ => f64::NAN,
        }
    }

    /// 字串轉換，等同把值塞進模板字串
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(arr) => arr
                .borrow()
                .iter()
                .map(|item| match item {
                    Value::Null => String::new(),
                    other => other.to_display_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(_) => "function".to_string(),
            Value::Opaque(opaque) => format!("[object {}]", opaque.tag()),
        }
    }
}

/// 只接受標準格式的索引（"0"、"12"，不接受 "01" 或 "+1"）
pub fn array_index(key: &str) -> Option<usize> {
    let index = key.parse::<usize>().ok()?;
    (index.to_string() == key).then_some(index)
}

/// 把字串轉成數字；空白字串為 0，不合法為 NaN
pub fn parse_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [
        ("0x", 16),
        ("0X", 16),
        ("0o", 8),
        ("0O", 8),
        ("0b", 2),
        ("0B", 2),
    ] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return f64::NAN;
            }
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }

    let looks_decimal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !looks_decimal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        // -0 也印成 0
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // 指數形式："1e+21"、"1.5e-7"
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        }
    } else {
        n.to_string()
    }
}

fn deep_eq(a: &Value, b: &Value, depth: usize) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            if depth >= MAX_NESTING {
                return false;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && x
                    .iter()
                    .zip(y.iter())
                    .all(|(l, r)| deep_eq(l, r, depth + 1))
        }
        (Value::Object(x), Value::Object(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            if depth >= MAX_NESTING {
                return false;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| deep_eq(l, r, depth + 1)))
        }
        _ => a.same_ref(b),
    }
}

/// 結構相等。超過巢狀上限的兩個不同容器視為不相等
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_eq(self, other, 0)
    }
}

struct Nested<'a> {
    value: &'a Value,
    depth: usize,
}

impl fmt::Debug for Nested<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt_nested(f, self.depth)
    }
}

impl Value {
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(_) if depth >= MAX_NESTING => f.write_str("[...]"),
            Value::Object(_) if depth >= MAX_NESTING => f.write_str("{...}"),
            Value::Array(arr) => match arr.0.try_borrow() {
                Ok(slots) => f
                    .debug_list()
                    .entries(slots.items.iter().map(|value| Nested {
                        value,
                        depth: depth + 1,
                    }))
                    .finish(),
                Err(_) => f.write_str("[<borrowed>]"),
            },
            Value::Object(obj) => match obj.0.try_borrow() {
                Ok(map) => f
                    .debug_map()
                    .entries(map.iter().map(|(key, value)| {
                        (
                            key,
                            Nested {
                                value,
                                depth: depth + 1,
                            },
                        )
                    }))
                    .finish(),
                Err(_) => f.write_str("{<borrowed>}"),
            },
            Value::Function(_) => f.write_str("<function>"),
            Value::Opaque(opaque) => write!(f, "<{}>", opaque.tag),
        }
    }

    /// 解析 JSON 字串
    pub fn from_json_str(input: &str) -> Result<Value> {
        Ok(serde_json::from_str(input)?)
    }

    /// 序列化成 JSON 字串；函式、不透明值與非有限數字會失敗
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, 0)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Array(self.clone()), f)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Object(self.clone()), f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Array::from_vec(items))
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(Object::from_map(map))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(Array::from_vec(items.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(obj) => Value::Object(Object::from_map(
                obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            )),
        }
    }
}

fn number_to_json(n: f64) -> Option<serde_json::Value> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Some(serde_json::Value::Number((n as i64).into()));
    }
    serde_json::Number::from_f64(n).map(serde_json::Value::Number)
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = HelperError;

    fn try_from(value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n).ok_or_else(|| {
                HelperError::invalid_argument(format!("{} has no JSON representation", n))
            })?,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(arr) => serde_json::Value::Array(
                arr.borrow()
                    .iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(obj) => {
                let mut out = serde_json::Map::new();
                for (key, item) in obj.borrow().iter() {
                    out.insert(key.clone(), serde_json::Value::try_from(item)?);
                }
                serde_json::Value::Object(out)
            }
            Value::Function(_) => {
                return Err(HelperError::invalid_argument(
                    "functions cannot be converted to JSON",
                ))
            }
            Value::Opaque(opaque) => {
                return Err(HelperError::invalid_argument(format!(
                    "{} values cannot be converted to JSON",
                    opaque.tag()
                )))
            }
        })
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match number_to_json(*n) {
                Some(json) => json.serialize(serializer),
                None => Err(S::Error::custom(format!("{} is not a finite number", n))),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let items = arr.borrow();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                let entries = obj.borrow();
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries.iter() {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
            Value::Function(_) => Err(S::Error::custom("functions cannot be serialized")),
            Value::Opaque(opaque) => Err(S::Error::custom(format!(
                "{} values cannot be serialized",
                opaque.tag()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handle_clone_aliases() {
        let original = Value::from(json!({"a": 1}));
        let alias = original.clone();

        alias.as_object().unwrap().insert("b", Value::from(2));

        assert!(original.same_ref(&alias));
        assert_eq!(original.get("b").unwrap().as_f64(), Some(2.0));
    }

    #[test]
    fn test_structural_equality() {
        let a = Value::from(json!({"a": [1, {"b": "x"}], "c": null}));
        let b = Value::from(json!({"c": null, "a": [1, {"b": "x"}]}));

        assert_eq!(a, b);
        assert!(!a.same_ref(&b));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_ne!(Value::from(json!([1, 2])), Value::from(json!([2, 1])));
    }

    #[test]
    fn test_functions_compare_by_reference() {
        let f = Value::function(|| {});
        let g = Value::function(|| {});

        assert_eq!(f, f.clone());
        assert_ne!(f, g);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("10"), 10.0);
        assert_eq!(parse_number("  1.5 "), 1.5);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("-3e2"), -300.0);
        assert_eq!(parse_number("0x1f"), 31.0);
        assert_eq!(parse_number("Infinity"), f64::INFINITY);
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("10px").is_nan());
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("0x").is_nan());
    }

    #[test]
    fn test_display_string() {
        assert_eq!(Value::from(10).to_display_string(), "10");
        assert_eq!(Value::from(1.5).to_display_string(), "1.5");
        assert_eq!(Value::Number(f64::NAN).to_display_string(), "NaN");
        assert_eq!(Value::Null.to_display_string(), "null");
        assert_eq!(Value::from(json!([1, null, "a"])).to_display_string(), "1,,a");
        assert_eq!(Value::object().to_display_string(), "[object Object]");
        assert_eq!(Value::opaque("Date", 0u64).to_display_string(), "[object Date]");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::Null.to_number(), 0.0);
        assert_eq!(Value::Bool(true).to_number(), 1.0);
        assert_eq!(Value::from("42").to_number(), 42.0);
        assert!(Value::object().to_number().is_nan());
    }

    #[test]
    fn test_array_index_is_canonical() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("12"), Some(12));
        assert_eq!(array_index("01"), None);
        assert_eq!(array_index("+1"), None);
        assert_eq!(array_index("width"), None);
    }

    #[test]
    fn test_json_conversion() {
        let json = json!({"id": 1, "ratio": 0.5, "tags": ["a", "b"], "meta": {"ok": true}});
        let value = Value::from(json.clone());

        assert_eq!(serde_json::Value::try_from(&value).unwrap(), json);
        assert_eq!(serde_json::to_value(&value).unwrap(), json);

        let parsed: Value = serde_json::from_str(r#"{"x": [1, 2]}"#).unwrap();
        assert_eq!(parsed, Value::from(json!({"x": [1, 2]})));
    }

    #[test]
    fn test_json_conversion_rejects_functions_and_nan() {
        let value = Value::from(json!({}));
        value.as_object().unwrap().insert("f", Value::function(|| {}));
        assert!(serde_json::Value::try_from(&value).is_err());
        assert!(serde_json::to_string(&value).is_err());

        assert!(serde_json::Value::try_from(&Value::Number(f64::NAN)).is_err());
    }

    #[test]
    fn test_exponent_formatting() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.2345e22), "1.2345e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-1.5e-7), "-1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_sparse_writes_leave_holes() {
        let arr = Array::new();
        arr.set(2, Value::from("c"));

        assert_eq!(arr.len(), 3);
        assert!(!arr.has_index(0));
        assert_eq!(arr.get(1), None);
        assert_eq!(arr.get(2), Some(Value::from("c")));
        assert_eq!(arr.entries(), vec![(2, Value::from("c"))]);

        arr.set(0, Value::from("a"));
        assert!(arr.has_index(0));
        assert_eq!(arr.holes(), BTreeSet::from([1]));
        // 洞在 JSON 裡是 null
        assert_eq!(
            Value::Array(arr).to_json_string().unwrap(),
            r#"["a",null,"c"]"#
        );
    }

    #[test]
    fn test_cyclic_values_can_be_printed_and_compared() {
        let left = Value::object();
        left.as_object().unwrap().insert("next", left.clone());
        let right = Value::object();
        right.as_object().unwrap().insert("next", right.clone());

        assert!(format!("{:?}", left).contains("{...}"));
        assert_eq!(left, left.clone());
        assert_ne!(left, right);
    }

    #[test]
    fn test_json_string_helpers() {
        let value = Value::from_json_str(r#"{"a": [1, 2]}"#).unwrap();
        assert_eq!(value, Value::from(json!({"a": [1, 2]})));
        assert_eq!(value.to_json_string().unwrap(), r#"{"a":[1,2]}"#);

        assert!(matches!(
            Value::from_json_str("{oops"),
            Err(HelperError::SerializationError(_))
        ));
        assert!(matches!(
            Value::function(|| {}).to_json_string(),
            Err(HelperError::SerializationError(_))
        ));
    }

    #[test]
    fn test_opaque_downcast() {
        let value = Value::opaque("Date", 1_700_000_000_000u64);
        match value {
            Value::Opaque(opaque) => {
                assert_eq!(opaque.tag(), "Date");
                assert_eq!(opaque.downcast_ref::<u64>(), Some(&1_700_000_000_000u64));
                assert!(opaque.downcast_ref::<String>().is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
