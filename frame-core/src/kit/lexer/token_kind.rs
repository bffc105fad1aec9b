//! 帧文本格式的 Token 类型定义

#[derive(Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum FrameTokenKind {
    // 关键字 (1-3)
    Nil = 1,
    True,
    False,

    // 字面量 (100-102)
    LiteralInteger = 100,
    LiteralFloat,
    LiteralString,

    // 标识符 (120)
    Identifier = 120,

    // 数字标签 (130-132)，文本为标签数字
    /// `#N=`
    LabelDef = 130,
    /// `#N#`
    LabelRef,
    /// `#N`
    LocalSymbol,

    // 单字符符号 (150-155)
    Colon = 150,
    Comma,
    LeftCurlyBrace,
    RightCurlyBrace,
    LeftSquareBracket,
    RightSquareBracket,
}

impl FrameTokenKind {
    /// 用于错误消息的源码形式
    pub fn describe(&self) -> &'static str {
        match self {
            FrameTokenKind::Nil => "nil",
            FrameTokenKind::True => "true",
            FrameTokenKind::False => "false",
            FrameTokenKind::LiteralInteger => "integer",
            FrameTokenKind::LiteralFloat => "float",
            FrameTokenKind::LiteralString => "string",
            FrameTokenKind::Identifier => "identifier",
            FrameTokenKind::LabelDef => "'#N='",
            FrameTokenKind::LabelRef => "'#N#'",
            FrameTokenKind::LocalSymbol => "'#N'",
            FrameTokenKind::Colon => "':'",
            FrameTokenKind::Comma => "','",
            FrameTokenKind::LeftCurlyBrace => "'{'",
            FrameTokenKind::RightCurlyBrace => "'}'",
            FrameTokenKind::LeftSquareBracket => "'['",
            FrameTokenKind::RightSquareBracket => "']'",
        }
    }
}

/// 关键字查找表
pub(crate) static KEYWORD_TABLE: [(&str, FrameTokenKind); 4] = [
    ("nil", FrameTokenKind::Nil),
    ("null", FrameTokenKind::Nil),
    ("true", FrameTokenKind::True),
    ("false", FrameTokenKind::False),
];
