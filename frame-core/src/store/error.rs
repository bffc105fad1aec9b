//! 对象存储错误类型

use super::Handle;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// 对象数量超过上限（上限, 尝试分配后的数量）
    #[error("Object limit exceeded: limit {limit}, requested {requested}")]
    ObjectLimitExceeded { limit: usize, requested: usize },

    /// 句柄越界
    #[error("Invalid handle {0}")]
    InvalidHandle(Handle),

    /// 对象类型不匹配（如预期帧却拿到数组）
    #[error("Object {handle} is a {found}, expected a {expected}")]
    WrongObjectType {
        handle: Handle,
        expected: &'static str,
        found: &'static str,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
