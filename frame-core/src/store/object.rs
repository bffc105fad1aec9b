//! 堆上存储的对象

use super::{Handle, Slot};

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// 符号；`name` 为 `None` 时是匿名局部符号
    Symbol { name: Option<String> },
    Frame(Vec<Slot>),
    Array(Vec<Handle>),
}

impl Object {
    /// 类型名（用于错误消息和输出）
    pub fn kind_name(&self) -> &'static str {
        match self {
            Object::Nil => "nil",
            Object::Bool(_) => "bool",
            Object::Int(_) => "int",
            Object::Float(_) => "float",
            Object::String(_) => "string",
            Object::Symbol { .. } => "symbol",
            Object::Frame(_) => "frame",
            Object::Array(_) => "array",
        }
    }
}
