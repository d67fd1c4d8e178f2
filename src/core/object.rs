//! 深度複製與深度合併。
//!
//! 合併只會「補上缺少的鍵」或「往同型容器裡遞迴」，從不刪除、也不覆寫已存在的值。
//! 缺少的鍵直接放入來源值的 handle（共享參照），`multi_merge` 會先 deep clone
//! 來源，所以呼叫端傳入的來源不會被別名到目標裡。
//!
//! 兩者都用顯式的堆疊走訪，深度上限只受 `max_depth` 限制，不受執行緒堆疊大小影響。

use crate::config::toml_config::{HelpersConfig, DEFAULT_MAX_DEPTH};
use crate::core::classify::{classify, raw_type};
use crate::domain::model::{array_index, Array, Map, Object, Value};
use crate::utils::error::{HelperError, Result};
use crate::utils::validation::Validate;
use std::collections::BTreeSet;
use std::vec::IntoIter;

/// 帶深度上限的複製／合併操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectOps {
    max_depth: usize,
}

impl Default for ObjectOps {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// 複製中的容器：尚未走訪的子元素與已完成的部分
enum CloneFrame {
    Object {
        entries: IntoIter<(String, Value)>,
        pending_key: Option<String>,
        out: Map,
    },
    Array {
        items: IntoIter<Value>,
        holes: BTreeSet<usize>,
        out: Vec<Value>,
    },
}

impl CloneFrame {
    /// 非容器回傳 None
    fn open(value: &Value) -> Option<Self> {
        match value {
            Value::Object(obj) => Some(CloneFrame::Object {
                entries: obj.entries().into_iter(),
                pending_key: None,
                out: Map::with_capacity(obj.len()),
            }),
            Value::Array(arr) => Some(CloneFrame::Array {
                items: arr.to_vec().into_iter(),
                holes: arr.holes(),
                out: Vec::with_capacity(arr.len()),
            }),
            _ => None,
        }
    }

    fn next_child(&mut self) -> Option<Value> {
        match self {
            CloneFrame::Object {
                entries,
                pending_key,
                ..
            } => entries.next().map(|(key, value)| {
                *pending_key = Some(key);
                value
            }),
            CloneFrame::Array { items, .. } => items.next(),
        }
    }

    fn accept(&mut self, copy: Value) {
        match self {
            CloneFrame::Object {
                pending_key, out, ..
            } => {
                if let Some(key) = pending_key.take() {
                    out.insert(key, copy);
                }
            }
            CloneFrame::Array { out, .. } => out.push(copy),
        }
    }

    fn finish(self) -> Value {
        match self {
            CloneFrame::Object { out, .. } => Value::Object(Object::from_map(out)),
            CloneFrame::Array { out, holes, .. } => Value::Array(Array::with_holes(out, holes)),
        }
    }
}

/// 合併中的一層：目標容器與來源自有鍵的快照
struct MergeFrame {
    target: Value,
    entries: IntoIter<(String, Value)>,
}

impl MergeFrame {
    fn new(target: Value, source: &Value) -> Self {
        Self {
            target,
            entries: own_entries(source).into_iter(),
        }
    }
}

impl ObjectOps {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// 先驗證設定，`max_depth` 超出範圍時回傳 `InvalidConfigValueError`
    pub fn from_config(config: &HelpersConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.max_depth()))
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth >= self.max_depth {
            tracing::warn!(
                "Recursion depth limit {} reached, input is probably self-referential",
                self.max_depth
            );
            return Err(HelperError::CyclicStructure {
                depth: self.max_depth,
            });
        }
        Ok(())
    }

    /// 複製物件與陣列的每一層；其他值（含函式與不透明值）直接共享
    pub fn deep_clone(&self, value: &Value) -> Result<Value> {
        let Some(root) = CloneFrame::open(value) else {
            return Ok(value.clone());
        };
        self.enter(0)?;

        // 根節點最後一個完成
        let mut copy = Value::Null;
        let mut stack = vec![root];
        while let Some(frame) = stack.last_mut() {
            match frame.next_child() {
                Some(child) => match CloneFrame::open(&child) {
                    Some(nested) => {
                        self.enter(stack.len())?;
                        stack.push(nested);
                    }
                    None => frame.accept(child),
                },
                None => {
                    if let Some(done) = stack.pop().map(CloneFrame::finish) {
                        match stack.last_mut() {
                            Some(parent) => parent.accept(done),
                            None => copy = done,
                        }
                    }
                }
            }
        }
        Ok(copy)
    }

    /// 把 `source` 合併進 `target`（原地修改）
    pub fn deep_merge(&self, target: &Value, source: &Value) -> Result<()> {
        ensure_container("merge target", target)?;
        self.merge_into(target, source)
    }

    fn merge_into(&self, target: &Value, source: &Value) -> Result<()> {
        self.enter(0)?;
        if target.same_ref(source) {
            return Ok(());
        }

        // 每層都先取快照，走訪時不持有任何 borrow
        let mut stack = vec![MergeFrame::new(target.clone(), source)];
        while let Some(frame) = stack.last_mut() {
            let Some((key, incoming)) = frame.entries.next() else {
                stack.pop();
                continue;
            };
            let target = frame.target.clone();

            match target.get(&key) {
                None => assign(&target, key, incoming),
                Some(existing) => {
                    let kind = classify(&existing);
                    if kind.is_container() && kind == classify(&incoming) {
                        self.enter(stack.len())?;
                        if !existing.same_ref(&incoming) {
                            stack.push(MergeFrame::new(existing, &incoming));
                        }
                    } else {
                        tracing::trace!(
                            "Keeping existing '{}' ({} vs {})",
                            key,
                            raw_type(&existing),
                            raw_type(&incoming)
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// 依序把每個來源的深度複製合併進 `target`，回傳 `target` 的 handle
    pub fn multi_merge(&self, target: &Value, sources: &[Value]) -> Result<Value> {
        ensure_container("multi_merge target", target)?;
        for source in sources {
            let copy = self.deep_clone(source)?;
            self.merge_into(target, &copy)?;
        }
        Ok(target.clone())
    }
}

fn ensure_container(what: &str, value: &Value) -> Result<()> {
    if classify(value).is_container() {
        Ok(())
    } else {
        Err(HelperError::invalid_argument(format!(
            "{} must be an object or array, got {}",
            what,
            raw_type(value)
        )))
    }
}

fn own_entries(value: &Value) -> Vec<(String, Value)> {
    match value {
        Value::Object(obj) => obj.entries(),
        Value::Array(arr) => arr
            .entries()
            .into_iter()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        _ => Vec::new(),
    }
}

fn assign(target: &Value, key: String, value: Value) {
    match target {
        Value::Object(obj) => {
            obj.insert(key, value);
        }
        Value::Array(arr) => match array_index(&key) {
            Some(index) => arr.set(index, value),
            None => tracing::trace!("Skipping non-index key '{}' on array target", key),
        },
        _ => {}
    }
}

/// `key` 是否為容器本身擁有的鍵（物件鍵或陣列索引，洞不算）
pub fn has_own(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(obj) => obj.contains_key(key),
        Value::Array(arr) => array_index(key).is_some_and(|index| arr.has_index(index)),
        _ => false,
    }
}

pub fn deep_clone(value: &Value) -> Result<Value> {
    ObjectOps::default().deep_clone(value)
}

pub fn deep_merge(target: &Value, source: &Value) -> Result<()> {
    ObjectOps::default().deep_merge(target, source)
}

pub fn multi_merge(target: &Value, sources: &[Value]) -> Result<Value> {
    ObjectOps::default().multi_merge(target, sources)
}
