//! 通用位置类型

use super::core::SourcePosition;

/// 源代码坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub line: usize,
    pub column: usize,
}

impl Default for Coordinate {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl From<SourcePosition> for Coordinate {
    fn from(pos: SourcePosition) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
