//! Scanner trait 定义
//!
//! 所有文本格式的词法扫描器都需实现此 trait

use super::core::{CharStream, SourcePosition, SourceSpan, StreamResult};

/// 词法扫描器 trait
pub trait Scanner {
    /// Token 类型
    type TokenKind: Clone + PartialEq + std::fmt::Debug;

    /// 创建新扫描器
    fn new() -> Self;

    /// 扫描下一个 token
    ///
    /// 这是核心方法，驱动字符流并生成 token
    fn next_token(&mut self, stream: &mut CharStream) -> ScanResult<Token<Self::TokenKind>>;

    /// 错误恢复：跳过到下一个安全位置
    ///
    /// 默认实现跳过到下一个空白符或已知分隔符，输入耗尽时放弃
    fn recover_error(&mut self, stream: &mut CharStream) -> RecoveryAction {
        while let StreamResult::Ok(c) = stream.try_peek(0) {
            if c.is_whitespace() || is_recover_point(c) {
                break;
            }
            let _ = stream.try_advance();
        }
        match stream.try_peek(0) {
            StreamResult::Eof => RecoveryAction::Abort,
            _ => RecoveryAction::Continue,
        }
    }
}

/// Token 结构
#[derive(Debug, Clone, PartialEq)]
pub struct Token<K> {
    pub kind: K,
    pub span: SourceSpan,
    /// 原始文本（字面量和标识符才保存）
    pub text: Option<String>,
}

impl<K> Token<K> {
    /// 创建新 token（不保存文本）
    pub fn new(kind: K, span: SourceSpan) -> Self {
        Self {
            kind,
            span,
            text: None,
        }
    }

    /// 创建新 token（保存文本）
    pub fn with_text(kind: K, span: SourceSpan, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: Some(text.into()),
        }
    }

    /// 获取 token 的起始位置
    pub fn start(&self) -> SourcePosition {
        self.span.start
    }

    /// 获取 token 的结束位置
    pub fn end(&self) -> SourcePosition {
        self.span.end
    }

    /// 文本内容（无文本时为空串）
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// 扫描结果
#[derive(Debug, Clone, PartialEq)]
pub enum ScanResult<T> {
    /// 成功扫描到 token
    Token(T),
    /// 需要更多输入（流式场景）
    Incomplete,
    /// 流已结束
    Eof,
    /// 扫描错误
    Error(LexError),
}

/// 词法错误
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: ErrorKind,
    pub position: SourcePosition,
    pub message: String,
}

/// 错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// 非法字符
    InvalidChar(char),
    /// 未终止的字符串
    UnterminatedString,
    /// 数字格式错误
    InvalidNumber(String),
    /// `#` 后缺少数字标签
    InvalidLabel(String),
    /// 其他错误
    Custom(String),
}

/// 恢复动作
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryAction {
    /// 继续扫描
    Continue,
    /// 停止扫描（后续视为输入结束）
    Abort,
}

/// 判断是否为错误恢复点（安全跳过位置）
fn is_recover_point(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | ':' | ',' | ';' | '#' | '"')
}

/// 辅助函数：检查字符是否为标识符起始字符
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '/'
}

/// 辅助函数：检查字符是否为标识符延续字符
pub fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '/' | '-' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestToken {
        Colon,
        Number(i64),
    }

    #[test]
    fn test_token_new() {
        let pos = SourcePosition::start();
        let token = Token::new(TestToken::Colon, SourceSpan::at(pos));
        assert_eq!(token.kind, TestToken::Colon);
        assert!(token.text.is_none());
        assert_eq!(token.text(), "");
    }

    #[test]
    fn test_token_with_text() {
        let pos = SourcePosition::start();
        let token = Token::with_text(TestToken::Number(42), SourceSpan::at(pos), "42");
        assert_eq!(token.text, Some("42".to_string()));
        assert_eq!(token.start(), pos);
    }

    #[test]
    fn test_is_identifier_start() {
        assert!(is_identifier_start('a'));
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('/'));
        assert!(!is_identifier_start('1'));
        assert!(!is_identifier_start('-'));
    }

    #[test]
    fn test_is_identifier_continue() {
        assert!(is_identifier_continue('1'));
        assert!(is_identifier_continue('-'));
        assert!(is_identifier_continue('.'));
        assert!(!is_identifier_continue(':'));
        assert!(!is_identifier_continue('#'));
    }

    #[test]
    fn test_recover_point() {
        assert!(is_recover_point('}'));
        assert!(is_recover_point(';'));
        assert!(!is_recover_point('a'));
    }
}
