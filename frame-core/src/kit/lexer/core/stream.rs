//! 字符流抽象
//!
//! 将输入字节转换为Unicode字符流，支持UTF-8解码、位置追踪和预读。
//! 生产者通过 `feed` 追加字节，`close` 标记EOF；消费者逐字符读取。

use super::position::SourcePosition;
use tracing::warn;

/// 已消费字节超过该阈值时压缩缓冲区
const COMPACT_THRESHOLD: usize = 64 * 1024;

/// 字符流错误
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum StreamError {
    #[error("Stream closed")]
    Closed,
}

/// 流式读取结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamResult<T> {
    /// 成功读取
    Ok(T),
    /// 需要更多输入（流式场景）
    Incomplete,
    /// 流已结束
    Eof,
}

/// 字符流
pub struct CharStream {
    /// 未消费的字节（`cursor` 之前的部分已读）
    buffer: Vec<u8>,
    /// 读取游标（字节）
    cursor: usize,
    /// 当前位置
    position: SourcePosition,
    /// 是否已关闭（EOF）
    is_closed: bool,
}

impl CharStream {
    /// 创建空的、等待输入的字符流
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            cursor: 0,
            position: SourcePosition::start(),
            is_closed: false,
        }
    }

    /// 从完整输入创建已关闭的字符流
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            buffer: bytes.to_vec(),
            cursor: 0,
            position: SourcePosition::start(),
            is_closed: true,
        }
    }

    /// 获取当前位置
    pub fn position(&self) -> SourcePosition {
        self.position
    }

    /// 是否已关闭（EOF）
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// 向流中写入数据（生产者接口）
    pub fn feed(&mut self, data: &[u8]) -> Result<(), StreamError> {
        if self.is_closed {
            warn!(target: "frame::lexer", "Attempt to feed {} bytes into closed stream", data.len());
            return Err(StreamError::Closed);
        }
        if self.cursor > COMPACT_THRESHOLD {
            self.buffer.drain(..self.cursor);
            self.cursor = 0;
        }
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    /// 关闭流（标记EOF）
    pub fn close(&mut self) {
        self.is_closed = true;
    }

    /// 尝试预读第n个字符（不消费）
    ///
    /// # Returns
    /// - `StreamResult::Ok(c)` - 成功读取字符
    /// - `StreamResult::Incomplete` - 缓冲区不足（需要更多输入）
    /// - `StreamResult::Eof` - 已到达EOF
    pub fn try_peek(&self, n: usize) -> StreamResult<char> {
        let mut offset = self.cursor;
        for _ in 0..n {
            match self.decode_at(offset) {
                StreamResult::Ok((_, len)) => offset += len,
                StreamResult::Incomplete => return StreamResult::Incomplete,
                StreamResult::Eof => return StreamResult::Eof,
            }
        }
        match self.decode_at(offset) {
            StreamResult::Ok((c, _)) => StreamResult::Ok(c),
            StreamResult::Incomplete => StreamResult::Incomplete,
            StreamResult::Eof => StreamResult::Eof,
        }
    }

    /// 尝试读取并消费一个字符
    pub fn try_advance(&mut self) -> StreamResult<char> {
        match self.decode_at(self.cursor) {
            StreamResult::Ok((c, len)) => {
                self.position.advance(c);
                self.cursor += len;
                StreamResult::Ok(c)
            }
            StreamResult::Incomplete => StreamResult::Incomplete,
            StreamResult::Eof => StreamResult::Eof,
        }
    }

    /// 检查当前字符是否匹配（不消费）
    pub fn check(&self, expected: char) -> bool {
        matches!(self.try_peek(0), StreamResult::Ok(c) if c == expected)
    }

    /// 消费当前字符如果匹配
    pub fn match_char(&mut self, expected: char) -> bool {
        if self.check(expected) {
            let _ = self.try_advance();
            true
        } else {
            false
        }
    }

    /// 解码 `offset` 处的字符，返回字符及其字节长度
    ///
    /// 非法序列解码为替换字符，只消费一个字节。
    fn decode_at(&self, offset: usize) -> StreamResult<(char, usize)> {
        let rest = self.buffer.get(offset..).unwrap_or(&[]);
        let Some(&lead_byte) = rest.first() else {
            return if self.is_closed {
                StreamResult::Eof
            } else {
                StreamResult::Incomplete
            };
        };

        let Some(seq_len) = utf8_sequence_length(lead_byte) else {
            warn!(target: "frame::lexer", "Invalid UTF-8 lead byte: 0x{:02X} at {:?}", lead_byte, self.position);
            return StreamResult::Ok((replacement_char(), 1));
        };

        if rest.len() < seq_len {
            if !self.is_closed {
                return StreamResult::Incomplete;
            }
            warn!(
                target: "frame::lexer",
                "Incomplete UTF-8 sequence at EOF: expected {} bytes, got {}",
                seq_len,
                rest.len()
            );
            return StreamResult::Ok((replacement_char(), rest.len()));
        }

        match std::str::from_utf8(&rest[..seq_len]) {
            Ok(s) => match s.chars().next() {
                Some(c) => StreamResult::Ok((c, seq_len)),
                None => StreamResult::Ok((replacement_char(), seq_len)),
            },
            Err(e) => {
                warn!(target: "frame::lexer", "UTF-8 decode error for bytes {:02X?}: {}", &rest[..seq_len], e);
                StreamResult::Ok((replacement_char(), 1))
            }
        }
    }
}

/// 获取UTF-8序列长度
fn utf8_sequence_length(lead_byte: u8) -> Option<usize> {
    match lead_byte {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None, // 续字节或超出范围
    }
}

/// Unicode替换字符（用于错误恢复）
fn replacement_char() -> char {
    '\u{FFFD}'
}
