//! 测试辅助工具

#![allow(dead_code)]

use frame_core::{read_str, Handle, Heap, Object, ReadError, ReaderConfig};

/// 读取第一个顶层对象
pub fn read_first(heap: &mut Heap, source: &str) -> Result<Handle, ReadError> {
    read_with(heap, source, &ReaderConfig::default())
}

pub fn read_with(heap: &mut Heap, source: &str, config: &ReaderConfig) -> Result<Handle, ReadError> {
    let handles = read_str(heap, source, config)?;
    Ok(handles.first().copied().unwrap_or(Handle::NIL))
}

pub fn json_config() -> ReaderConfig {
    ReaderConfig {
        json: true,
        ..ReaderConfig::default()
    }
}

/// 整数对象的值
pub fn get_int(heap: &Heap, handle: Handle) -> Option<i64> {
    match heap.get(handle).ok()? {
        Object::Int(n) => Some(*n),
        _ => None,
    }
}

/// 具名符号的名字
pub fn get_name(heap: &Heap, handle: Handle) -> Option<String> {
    heap.symbol_name(handle).ok().flatten().map(str::to_string)
}

/// 帧的 (角色名, 值) 列表
pub fn frame_entries(heap: &Heap, frame: Handle) -> Vec<(String, Handle)> {
    heap.frame(frame)
        .expect("not a frame")
        .iter()
        .map(|slot| (get_name(heap, slot.role).unwrap_or_default(), slot.value))
        .collect()
}
