//! Lexer implementation using logos
//!
//! Go ends statements at line breaks. The scanner applies the language's
//! semicolon rule: a newline (or a block comment spanning lines, or the end
//! of input) becomes a `Semi` token when the previous token could end a
//! statement, and is dropped otherwise.

use super::token::{Token, TokenKind};
use crate::common::{LintError, LintResult, Span};
use logos::Logos;

/// Lexer for Go source code
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    /// Buffer for peeked tokens
    peeked: Vec<Token>,
    /// Kind of the last token handed out, for semicolon insertion
    last: Option<TokenKind>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            peeked: Vec::new(),
            last: None,
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> LintResult<Token> {
        if !self.peeked.is_empty() {
            return Ok(self.peeked.remove(0));
        }
        self.scan_token()
    }

    /// Scan a new token from source, applying semicolon insertion
    fn scan_token(&mut self) -> LintResult<Token> {
        loop {
            if self.at_eof {
                let len = self.inner.source().len();
                return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
            }

            let token = match self.inner.next() {
                Some(Ok(kind)) => {
                    let span = self.inner.span();
                    Token::new(kind, Span::new(span.start, span.end))
                }
                Some(Err(())) => {
                    let span = self.inner.span();
                    return Err(LintError::lexer(
                        format!("unexpected character '{}'", self.inner.slice()),
                        Span::new(span.start, span.end),
                    ));
                }
                None => {
                    self.at_eof = true;
                    let len = self.inner.source().len();
                    if self.needs_semicolon() {
                        return Ok(self.emit(Token::new(TokenKind::Semi, Span::new(len, len))));
                    }
                    continue;
                }
            };

            let line_break = match &token.kind {
                TokenKind::Newline => true,
                TokenKind::BlockComment => self.inner.slice().contains('\n'),
                _ => return Ok(self.emit(token)),
            };

            if line_break && self.needs_semicolon() {
                return Ok(self.emit(Token::new(TokenKind::Semi, token.span)));
            }
        }
    }

    fn needs_semicolon(&self) -> bool {
        self.last.as_ref().is_some_and(TokenKind::ends_statement)
    }

    fn emit(&mut self, token: Token) -> Token {
        self.last = Some(token.kind.clone());
        token
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> LintResult<&Token> {
        self.peek_at(0)
    }

    /// Peek at the token at offset (0 = next, 1 = after next, etc.)
    pub fn peek_at(&mut self, offset: usize) -> LintResult<&Token> {
        while self.peeked.len() <= offset {
            let token = self.scan_token()?;
            self.peeked.push(token);
        }
        Ok(&self.peeked[offset])
    }

    /// Check if the next token matches the expected kind
    pub fn check(&mut self, expected: &TokenKind) -> LintResult<bool> {
        Ok(std::mem::discriminant(&self.peek()?.kind) == std::mem::discriminant(expected))
    }

    /// Check the token after the next one (2-token lookahead)
    pub fn check_lookahead(&mut self, expected: &TokenKind) -> LintResult<bool> {
        let token = self.peek_at(1)?;
        Ok(std::mem::discriminant(&token.kind) == std::mem::discriminant(expected))
    }

    /// Consume the next token if it matches, return true if consumed
    pub fn match_token(&mut self, expected: &TokenKind) -> LintResult<bool> {
        if self.check(expected)? {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Expect a specific token kind, error if not found
    pub fn expect(&mut self, expected: TokenKind) -> LintResult<Token> {
        let token = self.next_token()?;
        if std::mem::discriminant(&token.kind) == std::mem::discriminant(&expected) {
            Ok(token)
        } else {
            Err(LintError::parser(
                format!("expected {}, found {}", expected, token.kind),
                token.span,
            ))
        }
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize_all(mut self) -> LintResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get the source being lexed
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize_all()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords() {
        let mut lexer = Lexer::new("package type struct interface func map chan");

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Package));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Type));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Struct));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Interface));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Func));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Map));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Chan));
    }

    #[test]
    fn test_integer_literals() {
        let mut lexer = Lexer::new("42 0x1F 0b1010 0o777 1_000");

        for expected in ["42", "0x1F", "0b1010", "0o777", "1_000"] {
            assert!(matches!(
                lexer.next_token().unwrap().kind,
                TokenKind::IntLiteral(s) if s == expected
            ));
        }
    }

    #[test]
    fn test_semicolon_insertion() {
        let source = "type T struct {\n\ta int\n\tb *T\n}\n";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Type,
                TokenKind::Identifier("T".to_string()),
                TokenKind::Struct,
                TokenKind::LBrace,
                TokenKind::Identifier("a".to_string()),
                TokenKind::Identifier("int".to_string()),
                TokenKind::Semi,
                TokenKind::Identifier("b".to_string()),
                TokenKind::Star,
                TokenKind::Identifier("T".to_string()),
                TokenKind::Semi,
                TokenKind::RBrace,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_semicolon_at_end_of_input() {
        assert_eq!(
            kinds("package p"),
            vec![
                TokenKind::Package,
                TokenKind::Identifier("p".to_string()),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        let source = "a // line\nb /* inline */ c /* spans\nlines */ d";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Semi,
                TokenKind::Identifier("b".to_string()),
                TokenKind::Identifier("c".to_string()),
                TokenKind::Semi,
                TokenKind::Identifier("d".to_string()),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literals_and_tags() {
        let mut lexer = Lexer::new("\"a\\\"b\" `json:\"x\"`");
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::StringLiteral(s) if s == "\"a\\\"b\""
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::StringLiteral(s) if s == "`json:\"x\"`"
        ));
    }

    #[test]
    fn test_channel_arrows() {
        let kinds = kinds("<-chan int");
        assert_eq!(kinds[0], TokenKind::Arrow);
        assert_eq!(kinds[1], TokenKind::Chan);
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("a $ b").tokenize_all().unwrap_err();
        assert!(matches!(err, LintError::Lexer { span, .. } if span == Span::new(2, 3)));
    }
}
