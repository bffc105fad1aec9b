//! 对象存储
//!
//! Reader 只通过 [`ObjectStore`] trait 与存储交互，只传递 [`Handle`]，从不直接访问对象。

mod error;
mod handle;
mod heap;
mod object;

pub use error::{StoreError, StoreResult};
pub use handle::{Handle, Slot};
pub use heap::Heap;
pub use object::Object;

/// Reader 到对象存储的接口
pub trait ObjectStore {
    /// nil 句柄
    fn nil(&self) -> Handle {
        Handle::NIL
    }

    /// 驻留一个具名符号，返回其唯一句柄（不存在则创建）
    fn intern(&mut self, name: &str) -> StoreResult<Handle>;

    /// 分配一个匿名符号
    fn local_symbol(&mut self) -> StoreResult<Handle>;

    fn string(&mut self, value: &str) -> StoreResult<Handle>;

    fn integer(&mut self, value: i64) -> StoreResult<Handle>;

    fn float(&mut self, value: f64) -> StoreResult<Handle>;

    fn boolean(&mut self, value: bool) -> StoreResult<Handle>;

    /// 由扁平的 (角色, 值) 序列分配帧；奇数长度时丢弃末尾元素
    fn allocate_frame(&mut self, pairs: &[Handle]) -> StoreResult<Handle>;

    /// 由值序列分配数组
    fn allocate_array(&mut self, elements: &[Handle]) -> StoreResult<Handle>;

    /// 原地替换占位帧的内容
    fn update_frame(&mut self, frame: Handle, pairs: &[Handle]) -> StoreResult<()>;

    /// 原地替换占位数组的内容
    fn update_array(&mut self, array: Handle, elements: &[Handle]) -> StoreResult<()>;
}
