//! 引用表：数字标签 -> 句柄
//!
//! 稠密数组，首次访问超出范围的下标时用 nil 填充扩展。

use crate::store::Handle;

#[derive(Debug, Default)]
pub struct ReferenceTable {
    slots: Vec<Handle>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得下标处的可写槽位，必要时扩展
    pub fn get_or_create(&mut self, index: usize) -> &mut Handle {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, Handle::NIL);
        }
        &mut self.slots[index]
    }

    /// 已定义（非 nil）的槽位
    pub fn get(&self, index: usize) -> Option<Handle> {
        self.slots.get(index).copied().filter(|h| !h.is_nil())
    }

    /// 已寻址的槽位数量
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_extends_with_nil() {
        let mut table = ReferenceTable::new();
        let target = Handle::from_index(9).unwrap();
        *table.get_or_create(3) = target;

        assert_eq!(table.len(), 4);
        assert_eq!(table.get(3), Some(target));
        assert_eq!(table.get(1), None);
        assert_eq!(table.get(10), None);
        assert_eq!(*table.get_or_create(0), Handle::NIL);
    }

    #[test]
    fn test_existing_slot_not_overwritten() {
        let mut table = ReferenceTable::new();
        let target = Handle::from_index(5).unwrap();
        *table.get_or_create(0) = target;
        table.get_or_create(7);
        assert_eq!(table.get(0), Some(target));
    }

    #[test]
    fn test_clear() {
        let mut table = ReferenceTable::new();
        table.get_or_create(2);
        table.clear();
        assert!(table.is_empty());
    }
}
