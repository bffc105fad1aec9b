//! 帧文本格式 Scanner 实现
//!
//! 支持：
//! - 帧 `{}`、数组 `[]`、分隔符 `:` `,`
//! - 数字标签 `#N=`、`#N#`、`#N`
//! - 数字、字符串、标识符与关键字
//! - `;` 行注释

use super::core::{CharStream, SourcePosition, SourceSpan, StreamResult};
use super::scanner::{
    is_identifier_continue, is_identifier_start, ErrorKind, LexError, ScanResult, Scanner, Token,
};
use super::token_kind::{FrameTokenKind, KEYWORD_TABLE};

use tracing::{debug, trace};

/// 帧文本扫描器
pub struct FrameScanner {
    /// 当前 token 的起始位置（用于构建 span）
    token_start: SourcePosition,
    keywords: &'static [(&'static str, FrameTokenKind)],
}

impl Scanner for FrameScanner {
    type TokenKind = FrameTokenKind;

    fn new() -> Self {
        trace!(target: "frame::lexer", "Creating new FrameScanner");
        Self {
            token_start: SourcePosition::start(),
            keywords: &KEYWORD_TABLE,
        }
    }

    fn next_token(&mut self, stream: &mut CharStream) -> ScanResult<Token<FrameTokenKind>> {
        self.skip_whitespace_and_comments(stream);

        self.token_start = stream.position();
        trace!(
            target: "frame::lexer",
            line = self.token_start.line,
            column = self.token_start.column,
            "Starting token scan"
        );

        let c = match stream.try_peek(0) {
            StreamResult::Ok(c) => c,
            StreamResult::Incomplete => return ScanResult::Incomplete,
            StreamResult::Eof => return ScanResult::Eof,
        };

        match c {
            '{' => self.make_single_char(stream, FrameTokenKind::LeftCurlyBrace),
            '}' => self.make_single_char(stream, FrameTokenKind::RightCurlyBrace),
            '[' => self.make_single_char(stream, FrameTokenKind::LeftSquareBracket),
            ']' => self.make_single_char(stream, FrameTokenKind::RightSquareBracket),
            ':' => self.make_single_char(stream, FrameTokenKind::Colon),
            ',' => self.make_single_char(stream, FrameTokenKind::Comma),

            '#' => self.scan_label(stream),
            '"' => self.scan_string(stream),
            '0'..='9' => self.scan_number(stream),
            '-' => self.scan_negative(stream),

            c if is_identifier_start(c) => self.scan_identifier_or_keyword(stream),

            _ => {
                let _ = stream.try_advance();
                self.error(ErrorKind::InvalidChar(c), format!("Unexpected character '{c}'"))
            }
        }
    }
}

impl FrameScanner {
    fn error(&self, kind: ErrorKind, message: String) -> ScanResult<Token<FrameTokenKind>> {
        ScanResult::Error(LexError {
            kind,
            position: self.token_start,
            message,
        })
    }

    fn finish(
        &self,
        stream: &CharStream,
        kind: FrameTokenKind,
        text: String,
    ) -> ScanResult<Token<FrameTokenKind>> {
        let span = SourceSpan::range(self.token_start, stream.position());
        ScanResult::Token(Token::with_text(kind, span, text))
    }

    fn make_single_char(
        &mut self,
        stream: &mut CharStream,
        kind: FrameTokenKind,
    ) -> ScanResult<Token<FrameTokenKind>> {
        let _ = stream.try_advance();
        let end = stream.position();
        ScanResult::Token(Token::new(kind, SourceSpan::range(self.token_start, end)))
    }

    fn skip_whitespace_and_comments(&mut self, stream: &mut CharStream) {
        loop {
            match stream.try_peek(0) {
                StreamResult::Ok(c) if c.is_whitespace() => {
                    let _ = stream.try_advance();
                }
                StreamResult::Ok(';') => {
                    while let StreamResult::Ok(c) = stream.try_peek(0) {
                        if c == '\n' {
                            break;
                        }
                        let _ = stream.try_advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// 扫描 `#N=`、`#N#` 或 `#N`，token 文本只保留数字
    fn scan_label(&mut self, stream: &mut CharStream) -> ScanResult<Token<FrameTokenKind>> {
        let _ = stream.try_advance(); // '#'
        let digits = self.take_digits(stream);
        if digits.is_empty() {
            return self.error(
                ErrorKind::InvalidLabel("#".to_string()),
                "Expected digits after '#'".to_string(),
            );
        }

        let kind = if stream.match_char('=') {
            FrameTokenKind::LabelDef
        } else if stream.match_char('#') {
            FrameTokenKind::LabelRef
        } else {
            FrameTokenKind::LocalSymbol
        };
        debug!(target: "frame::lexer", label = %digits, ?kind, "Scanned numeric label");
        self.finish(stream, kind, digits)
    }

    fn scan_string(&mut self, stream: &mut CharStream) -> ScanResult<Token<FrameTokenKind>> {
        let _ = stream.try_advance(); // 开头的引号
        let mut value = String::new();

        loop {
            match stream.try_peek(0) {
                StreamResult::Ok('"') => {
                    let _ = stream.try_advance();
                    return self.finish(stream, FrameTokenKind::LiteralString, value);
                }
                StreamResult::Ok('\\') => {
                    let _ = stream.try_advance();
                    match stream.try_advance() {
                        StreamResult::Ok(c) => value.push(parse_escape(c)),
                        StreamResult::Incomplete => return ScanResult::Incomplete,
                        StreamResult::Eof => return self.unterminated_string(),
                    }
                }
                StreamResult::Ok(c) => {
                    value.push(c);
                    let _ = stream.try_advance();
                }
                StreamResult::Incomplete => return ScanResult::Incomplete,
                StreamResult::Eof => return self.unterminated_string(),
            }
        }
    }

    fn unterminated_string(&self) -> ScanResult<Token<FrameTokenKind>> {
        self.error(
            ErrorKind::UnterminatedString,
            "Unterminated string literal".to_string(),
        )
    }

    fn scan_negative(&mut self, stream: &mut CharStream) -> ScanResult<Token<FrameTokenKind>> {
        match stream.try_peek(1) {
            StreamResult::Ok(c) if c.is_ascii_digit() => self.scan_number(stream),
            _ => {
                let _ = stream.try_advance();
                self.error(
                    ErrorKind::InvalidNumber("-".to_string()),
                    "Expected digits after '-'".to_string(),
                )
            }
        }
    }

    /// 扫描数字：可选负号、整数部分、小数部分、指数部分
    fn scan_number(&mut self, stream: &mut CharStream) -> ScanResult<Token<FrameTokenKind>> {
        let mut value = String::new();
        let mut is_float = false;

        if stream.match_char('-') {
            value.push('-');
        }
        value.push_str(&self.take_digits(stream));

        if let (StreamResult::Ok('.'), StreamResult::Ok(c)) = (stream.try_peek(0), stream.try_peek(1)) {
            if c.is_ascii_digit() {
                let _ = stream.try_advance();
                value.push('.');
                value.push_str(&self.take_digits(stream));
                is_float = true;
            }
        }

        if let StreamResult::Ok(e @ ('e' | 'E')) = stream.try_peek(0) {
            let (sign, digit_at) = match stream.try_peek(1) {
                StreamResult::Ok(s @ ('+' | '-')) => (Some(s), 2),
                _ => (None, 1),
            };
            if matches!(stream.try_peek(digit_at), StreamResult::Ok(c) if c.is_ascii_digit()) {
                let _ = stream.try_advance();
                value.push(e);
                if let Some(s) = sign {
                    let _ = stream.try_advance();
                    value.push(s);
                }
                value.push_str(&self.take_digits(stream));
                is_float = true;
            }
        }

        // 数字后紧跟标识符字符，如 `12ab`
        if let StreamResult::Ok(c) = stream.try_peek(0) {
            if is_identifier_start(c) {
                while let StreamResult::Ok(c) = stream.try_peek(0) {
                    if !is_identifier_continue(c) {
                        break;
                    }
                    value.push(c);
                    let _ = stream.try_advance();
                }
                return self.error(
                    ErrorKind::InvalidNumber(value.clone()),
                    format!("Invalid number format '{value}'"),
                );
            }
        }

        let kind = if is_float {
            FrameTokenKind::LiteralFloat
        } else {
            FrameTokenKind::LiteralInteger
        };
        self.finish(stream, kind, value)
    }

    fn take_digits(&mut self, stream: &mut CharStream) -> String {
        let mut digits = String::new();
        while let StreamResult::Ok(c) = stream.try_peek(0) {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            let _ = stream.try_advance();
        }
        digits
    }

    fn scan_identifier_or_keyword(
        &mut self,
        stream: &mut CharStream,
    ) -> ScanResult<Token<FrameTokenKind>> {
        let mut value = String::new();

        if let StreamResult::Ok(c) = stream.try_advance() {
            value.push(c);
        }
        while let StreamResult::Ok(c) = stream.try_peek(0) {
            if !is_identifier_continue(c) {
                break;
            }
            value.push(c);
            let _ = stream.try_advance();
        }

        let kind = self.lookup_keyword(&value);
        self.finish(stream, kind, value)
    }

    fn lookup_keyword(&self, word: &str) -> FrameTokenKind {
        for (kw, kind) in self.keywords {
            if *kw == word {
                debug!(target: "frame::lexer", keyword = word, "Matched keyword");
                return *kind;
            }
        }
        FrameTokenKind::Identifier
    }
}

/// 解析转义字符
fn parse_escape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '0' => '\0',
        _ => c, // `\\`、`\"` 及未知转义保留原字符
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(input: &str) -> Vec<ScanResult<Token<FrameTokenKind>>> {
        let mut stream = CharStream::from_bytes(input.as_bytes());
        let mut scanner = FrameScanner::new();
        let mut out = Vec::new();
        loop {
            match scanner.next_token(&mut stream) {
                ScanResult::Eof => break,
                other => out.push(other),
            }
        }
        out
    }

    fn kinds(input: &str) -> Vec<FrameTokenKind> {
        scan_all(input)
            .into_iter()
            .map(|r| match r {
                ScanResult::Token(t) => t.kind,
                other => panic!("unexpected scan result: {:?}", other),
            })
            .collect()
    }

    fn first_token(input: &str) -> Token<FrameTokenKind> {
        match scan_all(input).into_iter().next() {
            Some(ScanResult::Token(t)) => t,
            other => panic!("expected token, got {:?}", other),
        }
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("{ } [ ] : ,"),
            vec![
                FrameTokenKind::LeftCurlyBrace,
                FrameTokenKind::RightCurlyBrace,
                FrameTokenKind::LeftSquareBracket,
                FrameTokenKind::RightSquareBracket,
                FrameTokenKind::Colon,
                FrameTokenKind::Comma,
            ]
        );
    }

    #[test]
    fn test_labels() {
        let def = first_token("#12=");
        assert_eq!(def.kind, FrameTokenKind::LabelDef);
        assert_eq!(def.text(), "12");

        let reference = first_token("#7#");
        assert_eq!(reference.kind, FrameTokenKind::LabelRef);
        assert_eq!(reference.text(), "7");

        let local = first_token("#3 ");
        assert_eq!(local.kind, FrameTokenKind::LocalSymbol);
        assert_eq!(local.text(), "3");
    }

    #[test]
    fn test_label_without_digits() {
        let results = scan_all("#x");
        match &results[0] {
            ScanResult::Error(e) => assert!(matches!(e.kind, ErrorKind::InvalidLabel(_))),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_label_def_followed_by_frame() {
        assert_eq!(
            kinds("#1=[#1#]"),
            vec![
                FrameTokenKind::LabelDef,
                FrameTokenKind::LeftSquareBracket,
                FrameTokenKind::LabelRef,
                FrameTokenKind::RightSquareBracket,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let int = first_token("-42");
        assert_eq!(int.kind, FrameTokenKind::LiteralInteger);
        assert_eq!(int.text(), "-42");

        let float = first_token("3.25");
        assert_eq!(float.kind, FrameTokenKind::LiteralFloat);

        let exp = first_token("1e-3");
        assert_eq!(exp.kind, FrameTokenKind::LiteralFloat);
        assert_eq!(exp.text(), "1e-3");
    }

    #[test]
    fn test_number_with_trailing_letters() {
        match &scan_all("12ab")[0] {
            ScanResult::Error(e) => assert_eq!(e.kind, ErrorKind::InvalidNumber("12ab".into())),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_string_escapes() {
        let s = first_token(r#""a\"b\n""#);
        assert_eq!(s.kind, FrameTokenKind::LiteralString);
        assert_eq!(s.text(), "a\"b\n");
    }

    #[test]
    fn test_unterminated_string() {
        match &scan_all("\"abc")[0] {
            ScanResult::Error(e) => assert_eq!(e.kind, ErrorKind::UnterminatedString),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("nil null true false /isa name-1"),
            vec![
                FrameTokenKind::Nil,
                FrameTokenKind::Nil,
                FrameTokenKind::True,
                FrameTokenKind::False,
                FrameTokenKind::Identifier,
                FrameTokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("; header\n{ ; inline\n}"),
            vec![FrameTokenKind::LeftCurlyBrace, FrameTokenKind::RightCurlyBrace]
        );
    }

    #[test]
    fn test_span_positions() {
        let results = scan_all("{\n  a: 1}");
        let ScanResult::Token(ident) = &results[1] else {
            panic!("expected identifier");
        };
        assert_eq!(ident.start().line, 2);
        assert_eq!(ident.start().column, 3);
    }
}
