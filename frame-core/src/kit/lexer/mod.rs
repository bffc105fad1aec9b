//! Frame Lexer
//!
//! 帧文本格式的词法分析器：
//! - 流式：字符流支持增量输入
//! - 统一 Scanner trait
//! - 精准位置追踪，错误携带行列号

pub mod core;
pub mod error;
pub mod frame;
pub mod lexer;
pub mod scanner;
pub mod token_kind;
pub mod types;

pub use self::core::{CharStream, SourcePosition, SourceSpan, StreamError, StreamResult};
pub use error::LexerError;
pub use frame::FrameScanner;
pub use lexer::{Lexer, TokenSource};
pub use scanner::{ErrorKind, LexError, RecoveryAction, ScanResult, Scanner, Token};
pub use token_kind::FrameTokenKind;
pub use types::Coordinate;
