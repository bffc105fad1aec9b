//! 词法分析基础设施：位置追踪与字符流

mod position;
mod stream;

pub use position::{SourcePosition, SourceSpan};
pub use stream::{CharStream, StreamError, StreamResult};
