//! 内存对象堆
//!
//! 对象按分配顺序存放在一个 `Vec` 中，句柄即下标；下标 0 固定为 nil。
//! 不做垃圾回收，对象数量受 [`StoreConfig::max_objects`] 限制。

use std::collections::HashMap;

use frame_config::StoreConfig;
use tracing::{debug, trace, warn};

use super::error::{StoreError, StoreResult};
use super::object::Object;
use super::{Handle, ObjectStore, Slot};
use crate::util::fingerprint_str;

#[derive(Debug)]
pub struct Heap {
    objects: Vec<Object>,
    /// 符号表：名字指纹 -> 同指纹的符号句柄
    symbols: HashMap<u64, Vec<Handle>>,
    true_handle: Option<Handle>,
    false_handle: Option<Handle>,
    max_objects: usize,
}

impl Default for Heap {
    fn default() -> Self {
        Self::with_config(&StoreConfig::default())
    }
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 自定义上限的构造器
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            objects: vec![Object::Nil],
            symbols: HashMap::new(),
            true_handle: None,
            false_handle: None,
            max_objects: config.max_objects,
        }
    }

    /// 当前对象数量（包括 nil）
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// 除 nil 外没有任何对象
    pub fn is_empty(&self) -> bool {
        self.objects.len() <= 1
    }

    fn alloc(&mut self, object: Object) -> StoreResult<Handle> {
        let requested = self.objects.len() + 1;
        if requested > self.max_objects {
            warn!(target: "frame::store", limit = self.max_objects, "Object limit exceeded");
            return Err(StoreError::ObjectLimitExceeded {
                limit: self.max_objects,
                requested,
            });
        }
        let handle = Handle::from_index(self.objects.len()).ok_or(
            StoreError::ObjectLimitExceeded {
                limit: u32::MAX as usize,
                requested,
            },
        )?;
        trace!(target: "frame::store", %handle, kind = object.kind_name(), "Allocated object");
        self.objects.push(object);
        Ok(handle)
    }

    /// 通过句柄获取对象
    pub fn get(&self, handle: Handle) -> StoreResult<&Object> {
        self.objects
            .get(handle.index())
            .ok_or(StoreError::InvalidHandle(handle))
    }

    fn get_mut(&mut self, handle: Handle) -> StoreResult<&mut Object> {
        self.objects
            .get_mut(handle.index())
            .ok_or(StoreError::InvalidHandle(handle))
    }

    fn wrong_type(&self, handle: Handle, expected: &'static str) -> StoreError {
        match self.get(handle) {
            Ok(object) => StoreError::WrongObjectType {
                handle,
                expected,
                found: object.kind_name(),
            },
            Err(e) => e,
        }
    }

    /// 帧的槽位
    pub fn frame(&self, handle: Handle) -> StoreResult<&[Slot]> {
        match self.get(handle)? {
            Object::Frame(slots) => Ok(slots),
            _ => Err(self.wrong_type(handle, "frame")),
        }
    }

    /// 数组的元素
    pub fn array(&self, handle: Handle) -> StoreResult<&[Handle]> {
        match self.get(handle)? {
            Object::Array(elems) => Ok(elems),
            _ => Err(self.wrong_type(handle, "array")),
        }
    }

    /// 符号名；匿名符号返回 `None`
    pub fn symbol_name(&self, handle: Handle) -> StoreResult<Option<&str>> {
        match self.get(handle)? {
            Object::Symbol { name } => Ok(name.as_deref()),
            _ => Err(self.wrong_type(handle, "symbol")),
        }
    }

    /// 查找已驻留的符号，不创建
    pub fn lookup_symbol(&self, name: &str) -> Option<Handle> {
        let candidates = self.symbols.get(&fingerprint_str(name))?;
        candidates
            .iter()
            .copied()
            .find(|h| matches!(self.get(*h), Ok(Object::Symbol { name: Some(n) }) if n == name))
    }

    /// 帧中某角色对应的值（按插入顺序取第一个）
    pub fn slot_value(&self, frame: Handle, role: Handle) -> StoreResult<Option<Handle>> {
        Ok(self
            .frame(frame)?
            .iter()
            .find(|slot| slot.role == role)
            .map(|slot| slot.value))
    }

    fn pairs_to_slots(pairs: &[Handle]) -> Vec<Slot> {
        pairs
            .chunks_exact(2)
            .map(|pair| Slot::new(pair[0], pair[1]))
            .collect()
    }
}

impl ObjectStore for Heap {
    fn intern(&mut self, name: &str) -> StoreResult<Handle> {
        if let Some(handle) = self.lookup_symbol(name) {
            return Ok(handle);
        }
        let handle = self.alloc(Object::Symbol {
            name: Some(name.to_string()),
        })?;
        self.symbols
            .entry(fingerprint_str(name))
            .or_default()
            .push(handle);
        debug!(target: "frame::store", name, %handle, "Interned symbol");
        Ok(handle)
    }

    fn local_symbol(&mut self) -> StoreResult<Handle> {
        self.alloc(Object::Symbol { name: None })
    }

    fn string(&mut self, value: &str) -> StoreResult<Handle> {
        self.alloc(Object::String(value.to_string()))
    }

    fn integer(&mut self, value: i64) -> StoreResult<Handle> {
        self.alloc(Object::Int(value))
    }

    fn float(&mut self, value: f64) -> StoreResult<Handle> {
        self.alloc(Object::Float(value))
    }

    fn boolean(&mut self, value: bool) -> StoreResult<Handle> {
        let cached = if value {
            self.true_handle
        } else {
            self.false_handle
        };
        if let Some(handle) = cached {
            return Ok(handle);
        }
        let handle = self.alloc(Object::Bool(value))?;
        if value {
            self.true_handle = Some(handle);
        } else {
            self.false_handle = Some(handle);
        }
        Ok(handle)
    }

    fn allocate_frame(&mut self, pairs: &[Handle]) -> StoreResult<Handle> {
        self.alloc(Object::Frame(Self::pairs_to_slots(pairs)))
    }

    fn allocate_array(&mut self, elements: &[Handle]) -> StoreResult<Handle> {
        self.alloc(Object::Array(elements.to_vec()))
    }

    fn update_frame(&mut self, frame: Handle, pairs: &[Handle]) -> StoreResult<()> {
        let slots = Self::pairs_to_slots(pairs);
        match self.get_mut(frame)? {
            Object::Frame(existing) => {
                *existing = slots;
                trace!(target: "frame::store", %frame, "Patched frame placeholder");
                Ok(())
            }
            _ => Err(self.wrong_type(frame, "frame")),
        }
    }

    fn update_array(&mut self, array: Handle, elements: &[Handle]) -> StoreResult<()> {
        match self.get_mut(array)? {
            Object::Array(existing) => {
                existing.clear();
                existing.extend_from_slice(elements);
                trace!(target: "frame::store", %array, "Patched array placeholder");
                Ok(())
            }
            _ => Err(self.wrong_type(array, "array")),
        }
    }
}
