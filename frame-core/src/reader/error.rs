//! Reader 错误类型

use crate::kit::lexer::{Coordinate, LexerError};
use crate::store::StoreError;

/// 语法错误，包含位置信息
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    /// 错误类型
    pub kind: ParserErrorKind,
    /// 错误发生的位置
    pub location: ErrorLocation,
}

/// 错误位置信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorLocation {
    /// 出错 token 的起始位置
    At(Coordinate),
    /// 输入在此处结束
    Eof(Coordinate),
}

/// 语法错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum ParserErrorKind {
    /// 意外的 token
    UnexpectedToken {
        found: String,
        expected: Vec<String>,
    },
    /// 帧或数组未闭合时输入结束
    UnexpectedEndOfInput,
    /// 数字超出范围或格式错误
    InvalidNumberFormat(String),
    /// `#N#` 引用了本次会话中未定义的标签
    UndefinedReference(usize),
    /// 标签超过上限
    LabelOutOfRange { index: String, max: usize },
    /// 嵌套层数超过上限
    NestingTooDeep(usize),
}

impl ParserError {
    /// 在指定位置创建错误
    pub fn at(kind: ParserErrorKind, coordinate: Coordinate) -> Self {
        Self {
            kind,
            location: ErrorLocation::At(coordinate),
        }
    }

    /// 在输入末尾创建错误
    pub fn at_eof(kind: ParserErrorKind, coordinate: Coordinate) -> Self {
        Self {
            kind,
            location: ErrorLocation::Eof(coordinate),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        match self.location {
            ErrorLocation::At(coord) | ErrorLocation::Eof(coord) => coord,
        }
    }

    /// 获取行号
    pub fn line(&self) -> Option<usize> {
        Some(self.coordinate().line)
    }

    /// 获取列号
    pub fn column(&self) -> Option<usize> {
        Some(self.coordinate().column)
    }
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let location_prefix = match &self.location {
            ErrorLocation::At(coord) => format!("{}:{}", coord.line, coord.column),
            ErrorLocation::Eof(coord) => format!("EOF {}:{}", coord.line, coord.column),
        };

        let message = match &self.kind {
            ParserErrorKind::UnexpectedToken { found, expected } => {
                if expected.is_empty() {
                    format!("Unexpected token {found}")
                } else {
                    format!("Unexpected token {}, expected: {}", found, expected.join(", "))
                }
            }
            ParserErrorKind::UnexpectedEndOfInput => "Unexpected end of input".to_string(),
            ParserErrorKind::InvalidNumberFormat(s) => format!("Invalid number format: '{s}'"),
            ParserErrorKind::UndefinedReference(n) => format!("Undefined reference #{n}#"),
            ParserErrorKind::LabelOutOfRange { index, max } => {
                format!("Label #{index} exceeds the maximum label {max}")
            }
            ParserErrorKind::NestingTooDeep(limit) => {
                format!("Nesting deeper than {limit} levels")
            }
        };

        write!(f, "[{location_prefix}] {message}")
    }
}

impl std::error::Error for ParserError {}

/// 一次读取的统一错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadError {
    /// 词法错误（结构化）
    #[error("{0}")]
    Lexer(#[from] LexerError),

    /// 语法错误（结构化）
    #[error("{0}")]
    Parser(#[from] ParserError),

    /// 存储错误
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ReadError {
    /// 获取错误行号（如果有）
    pub fn line(&self) -> Option<usize> {
        match self {
            ReadError::Lexer(e) => Some(e.line()),
            ReadError::Parser(e) => e.line(),
            ReadError::Store(_) => None,
        }
    }

    /// 获取错误列号（如果有）
    pub fn column(&self) -> Option<usize> {
        match self {
            ReadError::Lexer(e) => Some(e.column()),
            ReadError::Parser(e) => e.column(),
            ReadError::Store(_) => None,
        }
    }

    /// 语法错误类型（如果是语法错误）
    pub fn parser_kind(&self) -> Option<&ParserErrorKind> {
        match self {
            ReadError::Parser(e) => Some(&e.kind),
            _ => None,
        }
    }
}

pub type ReadResult<T> = Result<T, ReadError>;
