//! 临时句柄栈
//!
//! 整个解析过程共享一个栈：组装帧或数组时先把元素压栈，
//! 闭合后一次性拷贝进存储对象，再释放回进入时的标记。

use crate::store::Handle;

/// 栈位置快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

impl Mark {
    pub fn position(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct ScratchStack {
    items: Vec<Handle>,
}

impl ScratchStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, handle: Handle) {
        self.items.push(handle);
    }

    /// 弹出栈顶；空栈返回 `None`
    pub fn pop(&mut self) -> Option<Handle> {
        self.items.pop()
    }

    /// 记录当前栈高
    pub fn mark(&self) -> Mark {
        Mark(self.items.len())
    }

    /// 截断到标记处；标记必须不高于当前栈顶
    pub fn release(&mut self, mark: Mark) {
        debug_assert!(
            mark.0 <= self.items.len(),
            "release to mark {} above stack top {}",
            mark.0,
            self.items.len()
        );
        self.items.truncate(mark.0);
    }

    /// 标记之后压入的元素
    pub fn since(&self, mark: Mark) -> &[Handle] {
        self.items.get(mark.0..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
