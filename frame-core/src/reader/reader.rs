//! 文本 Reader
//!
//! 递归下降解析，一次线性扫描 token 流：
//! - 帧/数组的元素先压入共享的 [`ScratchStack`]，闭合后一次性拷贝进存储
//! - `#N=` 在解析复合值之前先登记占位对象，闭合时原地填充，支持自引用与互引用
//! - 嵌套深度受 `max_depth` 限制，每个 `#N=` 前缀也计一层

use std::collections::HashMap;

use frame_config::ReaderConfig;
use tracing::{debug, trace, warn};

use super::error::{ParserError, ParserErrorKind, ReadError, ReadResult};
use super::references::ReferenceTable;
use super::scratch::{Mark, ScratchStack};
use crate::kit::lexer::{Coordinate, FrameTokenKind, Token, TokenSource};
use crate::store::{Handle, ObjectStore};

type FrameToken = Token<FrameTokenKind>;

/// 把 token 流解析为存储中的对象
///
/// 引用表与局部标签表在整个会话内保持，直到 [`Reader::reset`]。
pub struct Reader<'s, S: ObjectStore + ?Sized, T: TokenSource> {
    store: &'s mut S,
    tokens: T,
    config: ReaderConfig,
    stack: ScratchStack,
    references: ReferenceTable,
    /// `#N` -> 匿名符号
    locals: HashMap<usize, Handle>,
    depth: usize,
    /// 迭代器遇到错误后停止
    halted: bool,
}

impl<'s, S: ObjectStore + ?Sized, T: TokenSource> Reader<'s, S, T> {
    pub fn new(store: &'s mut S, tokens: T, config: &ReaderConfig) -> Self {
        trace!(target: "frame::reader", json = config.json, max_depth = config.max_depth, "Creating new Reader");
        Self {
            store,
            tokens,
            config: config.clone(),
            stack: ScratchStack::with_capacity(64),
            references: ReferenceTable::new(),
            locals: HashMap::new(),
            depth: 0,
            halted: false,
        }
    }

    /// JSON 兼容模式：字符串键转换为驻留符号
    pub fn json(&self) -> bool {
        self.config.json
    }

    pub fn set_json(&mut self, json: bool) {
        self.config.json = json;
    }

    /// 开始新的独立会话
    pub fn reset(&mut self) {
        debug!(
            target: "frame::reader",
            labels = self.references.len(),
            locals = self.locals.len(),
            "Resetting reader session"
        );
        self.references.clear();
        self.locals.clear();
        self.stack.release(Mark::default());
        self.depth = 0;
        self.halted = false;
    }

    pub fn store(&self) -> &S {
        &*self.store
    }

    /// 临时栈当前高度（两次读取之间应为 0）
    pub fn scratch_len(&self) -> usize {
        self.stack.len()
    }

    /// 读取下一个顶层对象；输入结束返回 `None`
    pub fn read(&mut self) -> ReadResult<Option<Handle>> {
        if self.tokens.peek_token()?.is_none() {
            trace!(target: "frame::reader", "No more input");
            return Ok(None);
        }
        match self.parse_value() {
            Ok(handle) => {
                debug!(target: "frame::reader", %handle, "Read top-level object");
                Ok(Some(handle))
            }
            Err(e) => {
                warn!(target: "frame::reader", error = %e, "Read failed");
                debug_assert!(self.stack.is_empty() && self.depth == 0);
                Err(e)
            }
        }
    }

    /// 读取所有顶层对象，遇到第一个错误即返回
    pub fn read_all(&mut self) -> ReadResult<Vec<Handle>> {
        let mut handles = Vec::new();
        while let Some(handle) = self.read()? {
            handles.push(handle);
        }
        Ok(handles)
    }

    // ==================== 值 ====================

    /// 按前瞻 token 分派
    fn parse_value(&mut self) -> ReadResult<Handle> {
        let token = self.next_required()?;
        match token.kind {
            FrameTokenKind::LeftCurlyBrace => self.parse_frame(&token, &[]),
            FrameTokenKind::LeftSquareBracket => self.parse_array(&token, &[]),
            FrameTokenKind::LabelDef => self.parse_label_def(&token),
            FrameTokenKind::LabelRef => self.parse_label_ref(&token),
            FrameTokenKind::LocalSymbol => self.parse_local(&token),
            FrameTokenKind::Identifier => self.parse_id(&token),
            FrameTokenKind::Nil => Ok(self.store.nil()),
            FrameTokenKind::True => Ok(self.store.boolean(true)?),
            FrameTokenKind::False => Ok(self.store.boolean(false)?),
            FrameTokenKind::LiteralInteger => {
                let value = token
                    .text()
                    .parse::<i64>()
                    .map_err(|_| invalid_number(&token))?;
                Ok(self.store.integer(value)?)
            }
            FrameTokenKind::LiteralFloat => {
                let value = token
                    .text()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| invalid_number(&token))?;
                Ok(self.store.float(value)?)
            }
            FrameTokenKind::LiteralString => Ok(self.store.string(token.text())?),
            FrameTokenKind::RightCurlyBrace
            | FrameTokenKind::RightSquareBracket
            | FrameTokenKind::Colon
            | FrameTokenKind::Comma => Err(unexpected(&token, &["value"])),
        }
    }

    /// 具名符号解析为驻留句柄
    fn parse_id(&mut self, token: &FrameToken) -> ReadResult<Handle> {
        Ok(self.store.intern(token.text())?)
    }

    /// `#N`：同一会话内同一数字总是得到同一个匿名符号
    fn parse_local(&mut self, token: &FrameToken) -> ReadResult<Handle> {
        let index = self.label_index(token)?;
        if let Some(&handle) = self.locals.get(&index) {
            return Ok(handle);
        }
        let handle = self.store.local_symbol()?;
        trace!(target: "frame::reader", index, %handle, "New local symbol");
        self.locals.insert(index, handle);
        Ok(handle)
    }

    // ==================== 复合值 ====================

    /// 帧：`{ (role ':' value ','?)* }`
    ///
    /// `labels` 非空时先分配空帧作为占位并绑定到这些标签，闭合时原地填充。
    fn parse_frame(&mut self, open: &FrameToken, labels: &[usize]) -> ReadResult<Handle> {
        self.enter(open)?;
        let mark = self.stack.mark();
        let result = self.parse_frame_body(mark, labels);
        self.stack.release(mark);
        self.depth -= 1;
        result
    }

    fn parse_frame_body(&mut self, mark: Mark, labels: &[usize]) -> ReadResult<Handle> {
        let placeholder = if labels.is_empty() {
            None
        } else {
            let frame = self.store.allocate_frame(&[])?;
            trace!(target: "frame::reader", ?labels, %frame, "Registered frame placeholder");
            self.bind_labels(labels, frame);
            Some(frame)
        };

        loop {
            let token = self.next_required()?;
            match token.kind {
                FrameTokenKind::RightCurlyBrace => break,
                FrameTokenKind::Comma => continue,
                _ => {
                    let role = self.parse_role(&token)?;
                    self.expect(FrameTokenKind::Colon)?;
                    let value = self.parse_value()?;
                    self.stack.push(role);
                    self.stack.push(value);
                }
            }
        }

        let pairs = self.stack.since(mark);
        trace!(target: "frame::reader", slots = pairs.len() / 2, "Closing frame");
        match placeholder {
            Some(frame) => {
                self.store.update_frame(frame, pairs)?;
                Ok(frame)
            }
            None => Ok(self.store.allocate_frame(pairs)?),
        }
    }

    /// 槽位角色：标识符、`#N`，或字符串（JSON 模式下转为驻留符号）
    fn parse_role(&mut self, token: &FrameToken) -> ReadResult<Handle> {
        match token.kind {
            FrameTokenKind::Identifier => self.parse_id(token),
            FrameTokenKind::LocalSymbol => self.parse_local(token),
            FrameTokenKind::LiteralString if self.config.json => self.parse_id(token),
            FrameTokenKind::LiteralString => Ok(self.store.string(token.text())?),
            _ => Err(unexpected(token, &["identifier", "string", "'#N'", "'}'"])),
        }
    }

    /// 数组：`[ (value ','?)* ]`
    fn parse_array(&mut self, open: &FrameToken, labels: &[usize]) -> ReadResult<Handle> {
        self.enter(open)?;
        let mark = self.stack.mark();
        let result = self.parse_array_body(mark, labels);
        self.stack.release(mark);
        self.depth -= 1;
        result
    }

    fn parse_array_body(&mut self, mark: Mark, labels: &[usize]) -> ReadResult<Handle> {
        let placeholder = if labels.is_empty() {
            None
        } else {
            let array = self.store.allocate_array(&[])?;
            trace!(target: "frame::reader", ?labels, %array, "Registered array placeholder");
            self.bind_labels(labels, array);
            Some(array)
        };

        loop {
            match self.peek_kind()? {
                None => return Err(self.end_of_input()),
                Some(FrameTokenKind::RightSquareBracket) => {
                    self.tokens.next_token()?;
                    break;
                }
                Some(FrameTokenKind::Comma) => {
                    self.tokens.next_token()?;
                }
                Some(_) => {
                    let value = self.parse_value()?;
                    self.stack.push(value);
                }
            }
        }

        let elements = self.stack.since(mark);
        trace!(target: "frame::reader", elements = elements.len(), "Closing array");
        match placeholder {
            Some(array) => {
                self.store.update_array(array, elements)?;
                Ok(array)
            }
            None => Ok(self.store.allocate_array(elements)?),
        }
    }

    fn enter(&mut self, open: &FrameToken) -> ReadResult<()> {
        if self.depth >= self.config.max_depth {
            return Err(ParserError::at(
                ParserErrorKind::NestingTooDeep(self.config.max_depth),
                coordinate(open),
            )
            .into());
        }
        self.depth += 1;
        Ok(())
    }

    // ==================== 数字标签 ====================

    /// `#N= value`，连续的 `#A=#B=...` 迭代收集，全部绑定到同一个值
    ///
    /// 失败时按逆序恢复每个槽位的原值。
    fn parse_label_def(&mut self, token: &FrameToken) -> ReadResult<Handle> {
        let mut pending = Vec::new();
        let result = self.parse_label_chain(token, &mut pending);
        self.depth -= pending.len();
        if result.is_err() {
            for &(index, previous) in pending.iter().rev() {
                *self.references.get_or_create(index) = previous;
            }
        }
        result
    }

    /// `pending` 记录 (标签, 原值)，每登记一个标签深度加一
    fn parse_label_chain(
        &mut self,
        first: &FrameToken,
        pending: &mut Vec<(usize, Handle)>,
    ) -> ReadResult<Handle> {
        self.push_label(first, pending)?;
        while self.peek_kind()? == Some(FrameTokenKind::LabelDef) {
            let token = self.next_required()?;
            self.push_label(&token, pending)?;
        }

        let labels: Vec<usize> = pending.iter().map(|&(index, _)| index).collect();
        match self.peek_kind()? {
            Some(FrameTokenKind::LeftCurlyBrace) => {
                let open = self.next_required()?;
                self.parse_frame(&open, &labels)
            }
            Some(FrameTokenKind::LeftSquareBracket) => {
                let open = self.next_required()?;
                self.parse_array(&open, &labels)
            }
            _ => {
                let value = self.parse_value()?;
                // nil 不写入，槽位保持未定义
                if !value.is_nil() {
                    self.bind_labels(&labels, value);
                }
                Ok(value)
            }
        }
    }

    fn push_label(&mut self, token: &FrameToken, pending: &mut Vec<(usize, Handle)>) -> ReadResult<()> {
        let index = self.label_index(token)?;
        self.enter(token)?;
        let previous = *self.references.get_or_create(index);
        pending.push((index, previous));
        Ok(())
    }

    fn bind_labels(&mut self, labels: &[usize], handle: Handle) {
        for &index in labels {
            *self.references.get_or_create(index) = handle;
        }
    }

    /// `#N#`
    fn parse_label_ref(&mut self, token: &FrameToken) -> ReadResult<Handle> {
        let index = self.label_index(token)?;
        self.references.get(index).ok_or_else(|| {
            ParserError::at(ParserErrorKind::UndefinedReference(index), coordinate(token)).into()
        })
    }

    fn label_index(&self, token: &FrameToken) -> ReadResult<usize> {
        let max = self.config.max_label;
        match token.text().parse::<usize>() {
            Ok(index) if index <= max => Ok(index),
            _ => Err(ParserError::at(
                ParserErrorKind::LabelOutOfRange {
                    index: token.text().to_string(),
                    max,
                },
                coordinate(token),
            )
            .into()),
        }
    }

    // ==================== token 辅助 ====================

    fn next_required(&mut self) -> ReadResult<FrameToken> {
        match self.tokens.next_token()? {
            Some(token) => Ok(token),
            None => Err(self.end_of_input()),
        }
    }

    /// 输入在复合值未闭合时结束，位置取流末尾
    fn end_of_input(&self) -> ReadError {
        let end = Coordinate::from(self.tokens.position());
        ParserError::at_eof(ParserErrorKind::UnexpectedEndOfInput, end).into()
    }

    fn peek_kind(&mut self) -> ReadResult<Option<FrameTokenKind>> {
        Ok(self.tokens.peek_token()?.map(|t| t.kind))
    }

    fn expect(&mut self, kind: FrameTokenKind) -> ReadResult<FrameToken> {
        let token = self.next_required()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(&token, &[kind.describe()]))
        }
    }
}

impl<S: ObjectStore + ?Sized, T: TokenSource> Iterator for Reader<'_, S, T> {
    type Item = ReadResult<Handle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        let item = self.read().transpose();
        if matches!(item, Some(Err(_))) {
            self.halted = true;
        }
        item
    }
}

fn coordinate(token: &FrameToken) -> Coordinate {
    Coordinate::from(token.start())
}

fn unexpected(token: &FrameToken, expected: &[&str]) -> ReadError {
    let found = match token.kind {
        FrameTokenKind::Identifier
        | FrameTokenKind::LiteralInteger
        | FrameTokenKind::LiteralFloat
        | FrameTokenKind::LiteralString => format!("{} '{}'", token.kind.describe(), token.text()),
        _ => token.kind.describe().to_string(),
    };
    ParserError::at(
        ParserErrorKind::UnexpectedToken {
            found,
            expected: expected.iter().map(|s| s.to_string()).collect(),
        },
        coordinate(token),
    )
    .into()
}

fn invalid_number(token: &FrameToken) -> ReadError {
    ParserError::at(
        ParserErrorKind::InvalidNumberFormat(token.text().to_string()),
        coordinate(token),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kit::lexer::{LexerError, Lexer, SourcePosition, SourceSpan};
    use crate::store::{Heap, Object, Slot};
    use std::collections::VecDeque;

    /// 预先构造好的 token 序列，绕开 Lexer 单独测试 Reader
    ///
    /// 第 i 个 token 位于第 1 行第 i+1 列。
    struct VecTokens {
        tokens: VecDeque<FrameToken>,
        end: SourcePosition,
    }

    impl VecTokens {
        fn new(items: &[(FrameTokenKind, &str)]) -> Self {
            let tokens = items
                .iter()
                .enumerate()
                .map(|(i, (kind, text))| {
                    let pos = SourcePosition::new(1, i + 1, i);
                    Token::with_text(*kind, SourceSpan::at(pos), *text)
                })
                .collect();
            let end = SourcePosition::new(1, items.len() + 1, items.len());
            Self { tokens, end }
        }
    }

    impl TokenSource for VecTokens {
        fn next_token(&mut self) -> Result<Option<FrameToken>, LexerError> {
            Ok(self.tokens.pop_front())
        }

        fn peek_token(&mut self) -> Result<Option<&FrameToken>, LexerError> {
            Ok(self.tokens.front())
        }

        fn position(&self) -> SourcePosition {
            match self.tokens.front() {
                Some(token) => token.start(),
                None => self.end,
            }
        }
    }

    fn read_one(heap: &mut Heap, source: &str) -> ReadResult<Handle> {
        let mut reader = Reader::new(heap, Lexer::from_source(source), &ReaderConfig::default());
        reader.read().map(|h| h.unwrap_or(Handle::NIL))
    }

    #[test]
    fn test_stub_tokens_frame() {
        use FrameTokenKind::*;
        let mut heap = Heap::new();
        let tokens = VecTokens::new(&[
            (LeftCurlyBrace, ""),
            (Identifier, "a"),
            (Colon, ""),
            (LiteralInteger, "1"),
            (RightCurlyBrace, ""),
        ]);
        let frame = {
            let mut reader = Reader::new(&mut heap, tokens, &ReaderConfig::default());
            let frame = reader.read().unwrap().unwrap();
            assert_eq!(reader.read().unwrap(), None);
            frame
        };
        let slots = heap.frame(frame).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(heap.symbol_name(slots[0].role).unwrap(), Some("a"));
        assert_eq!(heap.get(slots[0].value).unwrap(), &Object::Int(1));
    }

    #[test]
    fn test_stub_tokens_missing_value_position() {
        use FrameTokenKind::*;
        let mut heap = Heap::new();
        let tokens = VecTokens::new(&[
            (LeftCurlyBrace, ""),
            (Identifier, "a"),
            (Colon, ""),
            (RightCurlyBrace, ""),
        ]);
        let mut reader = Reader::new(&mut heap, tokens, &ReaderConfig::default());
        let err = reader.read().unwrap_err();
        assert_eq!(err.column(), Some(4));
        assert_eq!(reader.scratch_len(), 0);
    }

    #[test]
    fn test_stub_tokens_truncated_frame_position() {
        use FrameTokenKind::*;
        let mut heap = Heap::new();
        let tokens = VecTokens::new(&[(LeftCurlyBrace, ""), (Identifier, "a"), (Colon, "")]);
        let mut reader = Reader::new(&mut heap, tokens, &ReaderConfig::default());
        let err = reader.read().unwrap_err();
        assert_eq!(err.parser_kind(), Some(&ParserErrorKind::UnexpectedEndOfInput));
        assert_eq!((err.line(), err.column()), (Some(1), Some(4)));
    }

    #[test]
    fn test_scalars() {
        let mut heap = Heap::new();
        let h = read_one(&mut heap, "42").unwrap();
        assert_eq!(heap.get(h).unwrap(), &Object::Int(42));
        let h = read_one(&mut heap, "-2.5").unwrap();
        assert_eq!(heap.get(h).unwrap(), &Object::Float(-2.5));
        let h = read_one(&mut heap, "\"hi\"").unwrap();
        assert_eq!(heap.get(h).unwrap(), &Object::String("hi".into()));
        assert_eq!(read_one(&mut heap, "null").unwrap(), Handle::NIL);
        let t = read_one(&mut heap, "true").unwrap();
        assert_eq!(heap.get(t).unwrap(), &Object::Bool(true));
    }

    #[test]
    fn test_integer_overflow() {
        let mut heap = Heap::new();
        let err = read_one(&mut heap, "99999999999999999999").unwrap_err();
        assert!(matches!(
            err.parser_kind(),
            Some(ParserErrorKind::InvalidNumberFormat(_))
        ));
    }

    #[test]
    fn test_optional_commas() {
        let mut heap = Heap::new();
        let frame = read_one(&mut heap, "{a: 1, b: [1, 2,], c: 3}").unwrap();
        let slots = heap.frame(frame).unwrap().to_vec();
        assert_eq!(slots.len(), 3);
        assert_eq!(heap.array(slots[1].value).unwrap().len(), 2);
    }

    #[test]
    fn test_string_key_outside_json_mode() {
        let mut heap = Heap::new();
        let frame = read_one(&mut heap, "{\"a\": 1}").unwrap();
        let role = heap.frame(frame).unwrap()[0].role;
        assert_eq!(heap.get(role).unwrap(), &Object::String("a".into()));
    }

    #[test]
    fn test_set_json_mode() {
        let mut heap = Heap::new();
        let frame = {
            let mut reader = Reader::new(
                &mut heap,
                Lexer::from_source("{\"a\": 1}"),
                &ReaderConfig::default(),
            );
            assert!(!reader.json());
            reader.set_json(true);
            assert!(reader.json());
            reader.read().unwrap().unwrap()
        };
        let a = heap.lookup_symbol("a").unwrap();
        assert_eq!(heap.frame(frame).unwrap()[0].role, a);
    }

    #[test]
    fn test_unexpected_role() {
        let mut heap = Heap::new();
        let err = read_one(&mut heap, "{1: 2}").unwrap_err();
        assert!(matches!(
            err.parser_kind(),
            Some(ParserErrorKind::UnexpectedToken { .. })
        ));
        assert_eq!(err.column(), Some(2));
    }

    #[test]
    fn test_missing_colon() {
        let mut heap = Heap::new();
        let err = read_one(&mut heap, "{a 1}").unwrap_err();
        match err.parser_kind() {
            Some(ParserErrorKind::UnexpectedToken { expected, .. }) => {
                assert_eq!(expected, &vec!["':'".to_string()]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_array() {
        let mut heap = Heap::new();
        let err = read_one(&mut heap, "[1 2").unwrap_err();
        assert_eq!(err.parser_kind(), Some(&ParserErrorKind::UnexpectedEndOfInput));
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.column(), Some(5));
        assert_eq!(err.to_string(), "[EOF 1:5] Unexpected end of input");
    }

    #[test]
    fn test_self_reference_frame() {
        let mut heap = Heap::new();
        let frame = read_one(&mut heap, "#5={self: #5#}").unwrap();
        let me = heap.intern("self").unwrap();
        assert_eq!(heap.frame(frame).unwrap(), &[Slot::new(me, frame)]);
    }

    #[test]
    fn test_label_on_scalar() {
        let mut heap = Heap::new();
        let array = read_one(&mut heap, "[#1=\"x\" #1#]").unwrap();
        let elems = heap.array(array).unwrap();
        assert_eq!(elems[0], elems[1]);
    }

    #[test]
    fn test_label_out_of_range() {
        let mut heap = Heap::new();
        let config = ReaderConfig {
            max_label: 10,
            ..ReaderConfig::default()
        };
        let mut reader = Reader::new(&mut heap, Lexer::from_source("#11=1"), &config);
        let err = reader.read().unwrap_err();
        assert_eq!(
            err.parser_kind(),
            Some(&ParserErrorKind::LabelOutOfRange {
                index: "11".into(),
                max: 10,
            })
        );
    }

    #[test]
    fn test_failed_definition_restores_slot() {
        let mut heap = Heap::new();
        let mut reader = Reader::new(
            &mut heap,
            Lexer::from_source("#1=[1] #1=[2 }] #1#"),
            &ReaderConfig::default(),
        );
        let first = reader.read().unwrap().unwrap();
        assert!(reader.read().is_err());
        // 失败后跳过残留的 `]`
        assert!(reader.read().is_err());
        assert_eq!(reader.read().unwrap(), Some(first));
    }

    #[test]
    fn test_chained_labels_share_placeholder() {
        let mut heap = Heap::new();
        let (array, one, two) = {
            let mut reader = Reader::new(
                &mut heap,
                Lexer::from_source("#1=#2=[#1# #2#] #1# #2#"),
                &ReaderConfig::default(),
            );
            let array = reader.read().unwrap().unwrap();
            let one = reader.read().unwrap().unwrap();
            let two = reader.read().unwrap().unwrap();
            (array, one, two)
        };
        assert_eq!(heap.array(array).unwrap(), &[array, array]);
        assert_eq!(one, array);
        assert_eq!(two, array);
    }

    #[test]
    fn test_chained_labels_on_scalar() {
        let mut heap = Heap::new();
        let array = read_one(&mut heap, "[#3=#4=\"s\" #3# #4#]").unwrap();
        let elems = heap.array(array).unwrap();
        assert_eq!(elems[0], elems[1]);
        assert_eq!(elems[0], elems[2]);
    }

    #[test]
    fn test_chained_label_defs_hit_depth_limit() {
        let mut heap = Heap::new();
        let source = format!("{}1", "#1=".repeat(100_000));
        let mut reader = Reader::new(&mut heap, Lexer::from_source(&source), &ReaderConfig::default());
        let err = reader.read().unwrap_err();
        assert_eq!(err.parser_kind(), Some(&ParserErrorKind::NestingTooDeep(256)));
        // 第 257 个 `#1=` 触发
        assert_eq!(err.column(), Some(256 * 3 + 1));
        assert_eq!(reader.scratch_len(), 0);
    }

    #[test]
    fn test_failed_chain_restores_every_slot() {
        let mut heap = Heap::new();
        let mut reader = Reader::new(
            &mut heap,
            Lexer::from_source("#1=1 #1=#2=[} #1# #2#"),
            &ReaderConfig::default(),
        );
        let first = reader.read().unwrap().unwrap();
        assert!(reader.read().is_err());
        assert_eq!(reader.read().unwrap(), Some(first));
        let err = reader.read().unwrap_err();
        assert_eq!(err.parser_kind(), Some(&ParserErrorKind::UndefinedReference(2)));
    }

    #[test]
    fn test_depth_failure_allocates_no_placeholder() {
        let mut heap = Heap::new();
        let config = ReaderConfig {
            max_depth: 2,
            ..ReaderConfig::default()
        };
        let before = heap.len();
        let err = {
            let mut reader = Reader::new(&mut heap, Lexer::from_source("#1=#2=[]"), &config);
            reader.read().unwrap_err()
        };
        assert_eq!(err.parser_kind(), Some(&ParserErrorKind::NestingTooDeep(2)));
        assert_eq!(heap.len(), before);
    }

    #[test]
    fn test_redefinition_keeps_earlier_uses() {
        let mut heap = Heap::new();
        let (a, b, c) = {
            let mut reader = Reader::new(
                &mut heap,
                Lexer::from_source("#1=[] [#1#] #1=[] [#1#]"),
                &ReaderConfig::default(),
            );
            let _ = reader.read().unwrap();
            let a = reader.read().unwrap().unwrap();
            let b = reader.read().unwrap().unwrap();
            let c = reader.read().unwrap().unwrap();
            (a, b, c)
        };
        assert_ne!(heap.array(a).unwrap()[0], b);
        assert_eq!(heap.array(c).unwrap()[0], b);
    }

    #[test]
    fn test_nil_definition_leaves_label_undefined() {
        let mut heap = Heap::new();
        let mut reader = Reader::new(
            &mut heap,
            Lexer::from_source("#2=nil #2#"),
            &ReaderConfig::default(),
        );
        assert_eq!(reader.read().unwrap(), Some(Handle::NIL));
        let err = reader.read().unwrap_err();
        assert_eq!(err.parser_kind(), Some(&ParserErrorKind::UndefinedReference(2)));
    }

    #[test]
    fn test_reset_clears_labels_and_locals() {
        let mut heap = Heap::new();
        let mut reader = Reader::new(
            &mut heap,
            Lexer::from_source("#1=[] #7 #7 #1#"),
            &ReaderConfig::default(),
        );
        reader.read().unwrap();
        let l1 = reader.read().unwrap().unwrap();
        reader.reset();
        let l2 = reader.read().unwrap().unwrap();
        assert_ne!(l1, l2);
        let err = reader.read().unwrap_err();
        assert_eq!(err.parser_kind(), Some(&ParserErrorKind::UndefinedReference(1)));
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut heap = Heap::new();
        let reader = Reader::new(
            &mut heap,
            Lexer::from_source("1 ] 2"),
            &ReaderConfig::default(),
        );
        let results: Vec<_> = reader.collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_lexer_error_surfaces() {
        let mut heap = Heap::new();
        let err = read_one(&mut heap, "[1 @]").unwrap_err();
        assert!(matches!(err, ReadError::Lexer(_)));
        assert_eq!(err.column(), Some(4));
    }

    #[test]
    fn test_store_limit_surfaces() {
        let mut heap = Heap::with_config(&frame_config::StoreConfig { max_objects: 2 });
        let err = read_one(&mut heap, "[1 2]").unwrap_err();
        assert!(matches!(err, ReadError::Store(_)));
    }
}
