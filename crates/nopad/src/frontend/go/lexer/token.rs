//! Token definitions for the Go lexer

use crate::common::Span;
use logos::Logos;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// All token kinds in Go
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]    // Skip whitespace other than newlines
#[logos(skip r"//[^\n]*")]      // Skip line comments
pub enum TokenKind {
    // === Keywords ===
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // === Identifiers ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // === Literals ===
    // Integer literals (decimal, hex, octal, binary), `_` separators allowed
    #[regex(r"0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|[0-9][0-9_]*", |lex| lex.slice().to_string())]
    IntLiteral(String),

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?", |lex| lex.slice().to_string())]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+", |lex| lex.slice().to_string())]
    FloatLiteral(String),

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?i", |lex| lex.slice().to_string())]
    ImaginaryLiteral(String),

    #[regex(r"'([^'\\\n]|\\[^\n])*'", |lex| lex.slice().to_string())]
    RuneLiteral(String),

    #[regex(r#""([^"\\\n]|\\[^\n])*""#, |lex| lex.slice().to_string())]
    #[regex(r"`[^`]*`", |lex| lex.slice().to_string())]
    StringLiteral(String),

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,
    #[token("&^")]
    AmpCaret,

    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    LtLtEq,
    #[token(">>=")]
    GtGtEq,
    #[token("&^=")]
    AmpCaretEq,

    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<-")]
    Arrow,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("==")]
    EqEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token(":=")]
    ColonEq,
    #[token("...")]
    Ellipsis,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,

    // Line structure; the scanner turns these into `Semi` or drops them
    #[token("\n")]
    Newline,
    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    BlockComment,

    // Special
    Eof,
}

impl TokenKind {
    /// Whether a line break after this token ends the statement
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier(_)
                | TokenKind::IntLiteral(_)
                | TokenKind::FloatLiteral(_)
                | TokenKind::ImaginaryLiteral(_)
                | TokenKind::RuneLiteral(_)
                | TokenKind::StringLiteral(_)
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Fallthrough
                | TokenKind::Return
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }

    /// Whether this token can begin a type expression
    pub fn starts_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier(_)
                | TokenKind::Star
                | TokenKind::LBracket
                | TokenKind::LParen
                | TokenKind::Func
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Arrow
                | TokenKind::Struct
                | TokenKind::Interface
        )
    }

    /// Opening bracket of a balanced group
    pub fn is_open(&self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace)
    }

    /// Closing bracket of a balanced group
    pub fn is_close(&self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenKind::IntLiteral(s) => write!(f, "integer '{}'", s),
            TokenKind::FloatLiteral(s) => write!(f, "float '{}'", s),
            TokenKind::ImaginaryLiteral(s) => write!(f, "imaginary '{}'", s),
            TokenKind::RuneLiteral(s) => write!(f, "rune {}", s),
            TokenKind::StringLiteral(s) => write!(f, "string {}", s),
            TokenKind::Break => write!(f, "'break'"),
            TokenKind::Case => write!(f, "'case'"),
            TokenKind::Chan => write!(f, "'chan'"),
            TokenKind::Const => write!(f, "'const'"),
            TokenKind::Func => write!(f, "'func'"),
            TokenKind::Import => write!(f, "'import'"),
            TokenKind::Interface => write!(f, "'interface'"),
            TokenKind::Map => write!(f, "'map'"),
            TokenKind::Package => write!(f, "'package'"),
            TokenKind::Struct => write!(f, "'struct'"),
            TokenKind::Type => write!(f, "'type'"),
            TokenKind::Var => write!(f, "'var'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::Amp => write!(f, "'&'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::LtLt => write!(f, "'<<'"),
            TokenKind::GtGt => write!(f, "'>>'"),
            TokenKind::AmpCaret => write!(f, "'&^'"),
            TokenKind::Arrow => write!(f, "'<-'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::Tilde => write!(f, "'~'"),
            TokenKind::Ellipsis => write!(f, "'...'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Semi => write!(f, "';' or newline"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Eof => write!(f, "end of file"),
            _ => write!(f, "{:?}", self),
        }
    }
}
