//! Lexer 主入口
//!
//! 驱动 [`FrameScanner`] 扫描字符流，对外提供带一个 token 预读的 [`TokenSource`]。
//!
//! # 示例
//!
//! ```rust
//! use frame_core::kit::lexer::{FrameTokenKind, Lexer, TokenSource};
//!
//! let mut lexer = Lexer::from_source("{a: 1}");
//! let first = lexer.next_token().unwrap().unwrap();
//! assert_eq!(first.kind, FrameTokenKind::LeftCurlyBrace);
//! ```

use super::core::{CharStream, SourcePosition, StreamError};
use super::error::LexerError;
use super::frame::FrameScanner;
use super::scanner::{RecoveryAction, ScanResult, Scanner, Token};
use super::token_kind::FrameTokenKind;

use tracing::{debug, trace, warn};

/// Reader 所需的 token 来源
pub trait TokenSource {
    /// 取出下一个 token；输入结束时返回 `None`
    fn next_token(&mut self) -> Result<Option<Token<FrameTokenKind>>, LexerError>;

    /// 预读当前 token，不消费
    fn peek_token(&mut self) -> Result<Option<&Token<FrameTokenKind>>, LexerError>;

    /// 已扫描到的位置；输入耗尽后即末尾位置
    fn position(&self) -> SourcePosition;
}

pub struct Lexer {
    scanner: FrameScanner,
    stream: CharStream,
    /// 预读缓存
    peeked: Option<Token<FrameTokenKind>>,
    /// 扫描器放弃恢复后不再产生 token
    finished: bool,
}

impl Lexer {
    /// 创建等待输入的 Lexer
    pub fn new(capacity: usize) -> Self {
        trace!(target: "frame::lexer", "Creating new Lexer with capacity {}", capacity);
        Self {
            scanner: FrameScanner::new(),
            stream: CharStream::new(capacity),
            peeked: None,
            finished: false,
        }
    }

    /// 从完整文本创建已结束输入的 Lexer
    pub fn from_source(source: &str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        trace!(target: "frame::lexer", "Creating Lexer over {} bytes", bytes.len());
        Self {
            scanner: FrameScanner::new(),
            stream: CharStream::from_bytes(bytes),
            peeked: None,
            finished: false,
        }
    }

    /// 向 Lexer 输入数据
    pub fn feed(&mut self, data: &[u8]) -> Result<(), StreamError> {
        trace!(target: "frame::lexer", "Feeding {} bytes", data.len());
        self.stream.feed(data)
    }

    /// 标记输入结束
    pub fn terminate(&mut self) {
        trace!(target: "frame::lexer", "Terminating input");
        self.stream.close();
    }

    pub fn is_finished(&self) -> bool {
        self.finished && self.peeked.is_none()
    }

    fn scan(&mut self) -> Result<Option<Token<FrameTokenKind>>, LexerError> {
        if self.finished {
            return Ok(None);
        }

        match self.scanner.next_token(&mut self.stream) {
            ScanResult::Token(token) => {
                debug!(
                    target: "frame::lexer",
                    kind = ?token.kind,
                    text = ?token.text,
                    line = token.span.start.line,
                    column = token.span.start.column,
                    "Produced token"
                );
                Ok(Some(token))
            }
            ScanResult::Incomplete => {
                // 未 terminate 的输入在此视为暂时结束
                trace!(target: "frame::lexer", "Incomplete, need more input");
                Ok(None)
            }
            ScanResult::Eof => {
                trace!(target: "frame::lexer", "Reached EOF");
                self.finished = true;
                Ok(None)
            }
            ScanResult::Error(e) => {
                warn!(target: "frame::lexer", "Lex error encountered: {:?}", e);
                if self.scanner.recover_error(&mut self.stream) == RecoveryAction::Abort {
                    self.finished = true;
                }
                Err(LexerError::from(e))
            }
        }
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Result<Option<Token<FrameTokenKind>>, LexerError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.scan(),
        }
    }

    fn peek_token(&mut self) -> Result<Option<&Token<FrameTokenKind>>, LexerError> {
        if self.peeked.is_none() {
            self.peeked = self.scan()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn position(&self) -> SourcePosition {
        self.stream.position()
    }
}
