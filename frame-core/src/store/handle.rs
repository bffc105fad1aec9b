//! 对象句柄

use std::fmt;

/// 堆对象的不透明句柄，按身份（下标）比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32);

impl Handle {
    /// 保留的 nil 句柄，表示"缺失/未设置"
    pub const NIL: Handle = Handle(0);

    pub(crate) fn from_index(index: usize) -> Option<Handle> {
        u32::try_from(index).ok().map(Handle)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_nil(self) -> bool {
        self == Handle::NIL
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NIL
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "nil")
        } else {
            write!(f, "@{}", self.0)
        }
    }
}

/// 帧中的一个槽位：(角色, 值)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub role: Handle,
    pub value: Handle,
}

impl Slot {
    pub fn new(role: Handle, value: Handle) -> Self {
        Self { role, value }
    }
}
