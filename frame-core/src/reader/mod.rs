//! 帧文本 Reader 与其工作区：临时栈、引用表

pub mod error;
pub mod reader;
pub mod references;
pub mod scratch;

pub use error::{ErrorLocation, ParserError, ParserErrorKind, ReadError, ReadResult};
pub use reader::Reader;
pub use references::ReferenceTable;
pub use scratch::{Mark, ScratchStack};
