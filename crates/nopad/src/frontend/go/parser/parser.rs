//! Recursive descent parser for Go declarations
//!
//! Type and constant declarations are parsed in full. Function and variable
//! declarations are skipped by bracket matching, but any struct type literal
//! met along the way is still parsed and kept.

use crate::common::{LintError, LintResult, Span};
use crate::frontend::go::ast::*;
use crate::frontend::go::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser for Go
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// End offset of the last consumed token
    last_end: usize,
    /// Struct literals found outside type declarations
    local_structs: Vec<LocalStruct>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            last_end: 0,
            local_structs: Vec::new(),
        }
    }

    /// Parse a complete source file
    pub fn parse_file(&mut self) -> LintResult<SourceFile> {
        let start = self.lexer.peek()?.span;

        self.expect(TokenKind::Package)?;
        let package = self.expect_identifier()?;
        self.expect_semi()?;

        let mut imports = Vec::new();
        let mut types = Vec::new();
        let mut consts = Vec::new();

        loop {
            match self.peek_kind()? {
                TokenKind::Eof => break,
                TokenKind::Semi => {
                    self.advance()?;
                }
                TokenKind::Import => imports.extend(self.parse_import_decl()?),
                TokenKind::Type => types.extend(self.parse_type_decl()?),
                TokenKind::Const => consts.extend(self.parse_const_decl()?),
                TokenKind::Func | TokenKind::Var => self.skip_declaration()?,
                other => {
                    let span = self.lexer.peek()?.span;
                    return Err(LintError::parser(
                        format!("expected declaration, found {}", other),
                        span,
                    ));
                }
            }
        }

        Ok(SourceFile {
            package,
            imports,
            types,
            consts,
            local_structs: std::mem::take(&mut self.local_structs),
            span: Span::new(start.start, self.last_end),
        })
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn advance(&mut self) -> LintResult<Token> {
        let token = self.lexer.next_token()?;
        if !matches!(token.kind, TokenKind::Eof) {
            self.last_end = token.span.end;
        }
        Ok(token)
    }

    fn peek_kind(&mut self) -> LintResult<TokenKind> {
        Ok(self.lexer.peek()?.kind.clone())
    }

    fn peek_kind_at(&mut self, offset: usize) -> LintResult<TokenKind> {
        Ok(self.lexer.peek_at(offset)?.kind.clone())
    }

    fn check(&mut self, kind: &TokenKind) -> LintResult<bool> {
        self.lexer.check(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> LintResult<bool> {
        if self.check(kind)? {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> LintResult<Token> {
        if self.check(&kind)? {
            self.advance()
        } else {
            let found = self.lexer.peek()?;
            Err(LintError::parser(
                format!("expected {}, found {}", kind, found.kind),
                found.span,
            ))
        }
    }

    /// Like `expect`, without consuming the token
    fn require(&mut self, kind: &TokenKind) -> LintResult<()> {
        if self.check(kind)? {
            return Ok(());
        }
        let found = self.lexer.peek()?;
        Err(LintError::parser(
            format!("expected {}, found {}", kind, found.kind),
            found.span,
        ))
    }

    fn expect_name(&mut self) -> LintResult<(String, Span)> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok((name, token.span)),
            other => Err(LintError::parser(
                format!("expected identifier, found {}", other),
                token.span,
            )),
        }
    }

    fn expect_identifier(&mut self) -> LintResult<String> {
        Ok(self.expect_name()?.0)
    }

    /// A declaration ends at `;`, a line break, or the end of the file
    fn expect_semi(&mut self) -> LintResult<()> {
        if self.match_token(&TokenKind::Semi)? || self.check(&TokenKind::Eof)? {
            Ok(())
        } else {
            self.expect(TokenKind::Semi).map(|_| ())
        }
    }

    /// Inside a list: either a separator or the closing token must follow
    fn expect_list_end(&mut self, close: &TokenKind) -> LintResult<()> {
        if self.check(close)? {
            Ok(())
        } else {
            self.expect(TokenKind::Semi).map(|_| ())
        }
    }

    fn span_from(&self, start: Span) -> Span {
        Span::new(start.start, self.last_end.max(start.end))
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn parse_import_decl(&mut self) -> LintResult<Vec<ImportSpec>> {
        self.expect(TokenKind::Import)?;
        let mut specs = Vec::new();

        if self.match_token(&TokenKind::LParen)? {
            while !self.check(&TokenKind::RParen)? {
                if self.match_token(&TokenKind::Semi)? {
                    continue;
                }
                specs.push(self.parse_import_spec()?);
                self.expect_list_end(&TokenKind::RParen)?;
            }
            self.expect(TokenKind::RParen)?;
        } else {
            specs.push(self.parse_import_spec()?);
        }

        self.expect_semi()?;
        Ok(specs)
    }

    fn parse_import_spec(&mut self) -> LintResult<ImportSpec> {
        let start = self.lexer.peek()?.span;
        let alias = match self.peek_kind()? {
            TokenKind::Identifier(name) => {
                self.advance()?;
                Some(name)
            }
            TokenKind::Dot => {
                self.advance()?;
                Some(".".to_string())
            }
            _ => None,
        };

        let token = self.advance()?;
        let path = match token.kind {
            TokenKind::StringLiteral(s) => unquote(&s).to_string(),
            other => {
                return Err(LintError::parser(
                    format!("expected import path, found {}", other),
                    token.span,
                ));
            }
        };

        Ok(ImportSpec {
            alias,
            path,
            span: self.span_from(start),
        })
    }

    // =========================================================================
    // Type declarations
    // =========================================================================

    fn parse_type_decl(&mut self) -> LintResult<Vec<TypeSpec>> {
        self.expect(TokenKind::Type)?;
        let mut specs = Vec::new();

        if self.match_token(&TokenKind::LParen)? {
            while !self.check(&TokenKind::RParen)? {
                if self.match_token(&TokenKind::Semi)? {
                    continue;
                }
                specs.push(self.parse_type_spec()?);
                self.expect_list_end(&TokenKind::RParen)?;
            }
            self.expect(TokenKind::RParen)?;
        } else {
            specs.push(self.parse_type_spec()?);
        }

        self.expect_semi()?;
        Ok(specs)
    }

    fn parse_type_spec(&mut self) -> LintResult<TypeSpec> {
        let start = self.lexer.peek()?.span;
        let name = self.expect_identifier()?;

        let params = if self.check(&TokenKind::LBracket)? && self.at_type_params()? {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        let alias = self.match_token(&TokenKind::Eq)?;
        let ty = self.parse_type()?;

        Ok(TypeSpec {
            name,
            params,
            alias,
            ty,
            span: self.span_from(start),
        })
    }

    /// `type A [N]T` declares an array; `type A[T any] ...` declares type
    /// parameters. Decided by the token after the first name in brackets.
    fn at_type_params(&mut self) -> LintResult<bool> {
        if !matches!(self.peek_kind_at(1)?, TokenKind::Identifier(_)) {
            return Ok(false);
        }
        Ok(matches!(
            self.peek_kind_at(2)?,
            TokenKind::Identifier(_)
                | TokenKind::Comma
                | TokenKind::Interface
                | TokenKind::Tilde
                | TokenKind::Func
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::LBracket
                | TokenKind::Struct
        ))
    }

    fn parse_type_params(&mut self) -> LintResult<Vec<String>> {
        self.expect(TokenKind::LBracket)?;
        let mut names = Vec::new();

        while !self.check(&TokenKind::RBracket)? {
            names.push(self.expect_identifier()?);
            if self.match_token(&TokenKind::Comma)? {
                continue;
            }
            // Constraint: runs to the next top-level ',' or ']'
            self.skip_until(|k| matches!(k, TokenKind::Comma | TokenKind::RBracket))?;
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        self.expect(TokenKind::RBracket)?;
        Ok(names)
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> LintResult<GoType> {
        let start = self.lexer.peek()?.span;

        match self.peek_kind()? {
            TokenKind::Identifier(_) => self.parse_type_name(),
            TokenKind::Star => {
                self.advance()?;
                let inner = self.parse_type()?;
                Ok(GoType::new(GoTypeKind::Pointer(Box::new(inner)), self.span_from(start)))
            }
            TokenKind::LBracket => {
                self.advance()?;
                if self.match_token(&TokenKind::RBracket)? {
                    let element = self.parse_type()?;
                    return Ok(GoType::new(
                        GoTypeKind::Slice(Box::new(element)),
                        self.span_from(start),
                    ));
                }
                if self.check(&TokenKind::Ellipsis)? {
                    return Err(LintError::parser(
                        "array length [...] is only allowed in composite literals",
                        start,
                    ));
                }
                let len = self.parse_const_expr()?;
                self.expect(TokenKind::RBracket)?;
                let element = self.parse_type()?;
                Ok(GoType::new(
                    GoTypeKind::Array {
                        len,
                        element: Box::new(element),
                    },
                    self.span_from(start),
                ))
            }
            TokenKind::Map => {
                self.advance()?;
                self.expect(TokenKind::LBracket)?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBracket)?;
                let value = self.parse_type()?;
                Ok(GoType::new(
                    GoTypeKind::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                    self.span_from(start),
                ))
            }
            TokenKind::Chan => {
                self.advance()?;
                let dir = if self.match_token(&TokenKind::Arrow)? {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let element = self.parse_type()?;
                Ok(GoType::new(
                    GoTypeKind::Chan {
                        dir,
                        element: Box::new(element),
                    },
                    self.span_from(start),
                ))
            }
            TokenKind::Arrow => {
                self.advance()?;
                self.expect(TokenKind::Chan)?;
                let element = self.parse_type()?;
                Ok(GoType::new(
                    GoTypeKind::Chan {
                        dir: ChanDir::Recv,
                        element: Box::new(element),
                    },
                    self.span_from(start),
                ))
            }
            TokenKind::Func => {
                self.advance()?;
                self.skip_signature()?;
                Ok(GoType::new(GoTypeKind::Func, self.span_from(start)))
            }
            TokenKind::Interface => {
                self.advance()?;
                self.require(&TokenKind::LBrace)?;
                self.skip_balanced()?;
                Ok(GoType::new(GoTypeKind::Interface, self.span_from(start)))
            }
            TokenKind::Struct => {
                let st = self.parse_struct_type()?;
                let span = st.span;
                Ok(GoType::new(GoTypeKind::Struct(st), span))
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            other => Err(LintError::parser(
                format!("expected type, found {}", other),
                start,
            )),
        }
    }

    /// `T`, `pkg.T`, optionally instantiated: `T[A, B]`
    fn parse_type_name(&mut self) -> LintResult<GoType> {
        let (first, start) = self.expect_name()?;
        let (package, name) = if self.match_token(&TokenKind::Dot)? {
            (Some(first), self.expect_identifier()?)
        } else {
            (None, first)
        };

        let mut args = Vec::new();
        if self.match_token(&TokenKind::LBracket)? {
            while !self.check(&TokenKind::RBracket)? {
                args.push(self.parse_type()?);
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::RBracket)?;
        }

        Ok(GoType::new(
            GoTypeKind::Named { package, name, args },
            self.span_from(start),
        ))
    }

    fn parse_struct_type(&mut self) -> LintResult<StructType> {
        let keyword = self.expect(TokenKind::Struct)?.span;
        self.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace)? {
            if self.match_token(&TokenKind::Semi)? {
                continue;
            }
            fields.push(self.parse_field_decl()?);
            self.expect_list_end(&TokenKind::RBrace)?;
        }
        let end = self.expect(TokenKind::RBrace)?.span;

        Ok(StructType {
            fields,
            keyword,
            span: keyword.merge(end),
        })
    }

    fn parse_field_decl(&mut self) -> LintResult<FieldDecl> {
        let start = self.lexer.peek()?.span;

        let (names, ty, embedded) = match self.peek_kind()? {
            TokenKind::Star => (Vec::new(), self.parse_type()?, true),
            TokenKind::Identifier(_) => match self.peek_kind_at(1)? {
                TokenKind::Dot | TokenKind::Semi | TokenKind::RBrace | TokenKind::StringLiteral(_) => {
                    (Vec::new(), self.parse_type_name()?, true)
                }
                _ => {
                    let mut names = vec![self.expect_identifier()?];
                    while self.match_token(&TokenKind::Comma)? {
                        names.push(self.expect_identifier()?);
                    }
                    (names, self.parse_type()?, false)
                }
            },
            other => {
                return Err(LintError::parser(
                    format!("expected field name or embedded type, found {}", other),
                    start,
                ));
            }
        };

        let tag = match self.peek_kind()? {
            TokenKind::StringLiteral(s) => {
                self.advance()?;
                Some(unquote(&s).to_string())
            }
            _ => None,
        };

        Ok(FieldDecl {
            names,
            ty,
            embedded,
            tag,
            span: self.span_from(start),
        })
    }

    /// Parameters and results after `func`; only nested struct literals are kept
    fn skip_signature(&mut self) -> LintResult<()> {
        self.require(&TokenKind::LParen)?;
        self.skip_balanced()?;

        if self.check(&TokenKind::LParen)? {
            self.skip_balanced()?;
        } else if self.lexer.peek()?.kind.starts_type() {
            let result = self.parse_type()?;
            self.keep_structs(result);
        }
        Ok(())
    }

    /// Record the outermost struct literals of a type that is otherwise dropped
    fn keep_structs(&mut self, ty: GoType) {
        match ty.kind {
            GoTypeKind::Struct(st) => self.local_structs.push(LocalStruct { name: None, ty: st }),
            GoTypeKind::Named { args, .. } => {
                for arg in args {
                    self.keep_structs(arg);
                }
            }
            GoTypeKind::Pointer(inner) | GoTypeKind::Slice(inner) => self.keep_structs(*inner),
            GoTypeKind::Array { element, .. } | GoTypeKind::Chan { element, .. } => {
                self.keep_structs(*element);
            }
            GoTypeKind::Map { key, value } => {
                self.keep_structs(*key);
                self.keep_structs(*value);
            }
            GoTypeKind::Func | GoTypeKind::Interface => {}
        }
    }

    // =========================================================================
    // Constant declarations
    // =========================================================================

    fn parse_const_decl(&mut self) -> LintResult<Vec<ConstSpec>> {
        self.expect(TokenKind::Const)?;
        let mut specs = Vec::new();

        if self.match_token(&TokenKind::LParen)? {
            let mut iota = 0;
            let mut previous: Vec<ConstExpr> = Vec::new();
            while !self.check(&TokenKind::RParen)? {
                if self.match_token(&TokenKind::Semi)? {
                    continue;
                }
                let spec = self.parse_const_spec(iota, &previous)?;
                previous.clone_from(&spec.values);
                specs.push(spec);
                iota += 1;
                self.expect_list_end(&TokenKind::RParen)?;
            }
            self.expect(TokenKind::RParen)?;
        } else {
            specs.push(self.parse_const_spec(0, &[])?);
        }

        self.expect_semi()?;
        Ok(specs)
    }

    fn parse_const_spec(&mut self, iota: u64, previous: &[ConstExpr]) -> LintResult<ConstSpec> {
        let start = self.lexer.peek()?.span;

        let mut names = vec![self.expect_name()?];
        while self.match_token(&TokenKind::Comma)? {
            names.push(self.expect_name()?);
        }

        let mut typed = false;
        if !matches!(
            self.peek_kind()?,
            TokenKind::Eq | TokenKind::Semi | TokenKind::RParen | TokenKind::Eof
        ) {
            let ty = self.parse_type()?;
            self.keep_structs(ty);
            typed = true;
        }

        let values = if self.match_token(&TokenKind::Eq)? {
            let mut values = vec![self.parse_const_expr()?];
            while self.match_token(&TokenKind::Comma)? {
                values.push(self.parse_const_expr()?);
            }
            values
        } else if previous.is_empty() || typed {
            return Err(LintError::parser("missing constant value", self.span_from(start)));
        } else {
            previous.to_vec()
        };

        Ok(ConstSpec {
            names,
            values,
            iota,
            span: self.span_from(start),
        })
    }

    // =========================================================================
    // Constant expressions
    // =========================================================================

    fn parse_const_expr(&mut self) -> LintResult<ConstExpr> {
        self.parse_binary_expr(1)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> LintResult<ConstExpr> {
        let mut lhs = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op()? {
            if op.precedence() < min_prec {
                break;
            }
            self.advance()?;
            let rhs = self.parse_binary_expr(op.precedence() + 1)?;
            let span = lhs.span.merge(rhs.span);
            lhs = ConstExpr::new(
                ConstExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        Ok(lhs)
    }

    fn peek_binary_op(&mut self) -> LintResult<Option<BinOp>> {
        let op = match self.peek_kind()? {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Rem,
            TokenKind::LtLt => BinOp::Shl,
            TokenKind::GtGt => BinOp::Shr,
            TokenKind::Amp => BinOp::And,
            TokenKind::Pipe => BinOp::Or,
            TokenKind::Caret => BinOp::Xor,
            TokenKind::AmpCaret => BinOp::AndNot,
            TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq
            | TokenKind::AmpAmp
            | TokenKind::PipePipe => BinOp::Logical,
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    fn parse_unary_expr(&mut self) -> LintResult<ConstExpr> {
        let op = match self.peek_kind()? {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Caret => UnaryOp::Complement,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_primary_expr(),
        };
        let start = self.advance()?.span;
        let operand = self.parse_unary_expr()?;
        let span = start.merge(operand.span);
        Ok(ConstExpr::new(
            ConstExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_primary_expr(&mut self) -> LintResult<ConstExpr> {
        let token = self.advance()?;
        let start = token.span;

        let mut expr = match token.kind {
            TokenKind::IntLiteral(s) => ConstExpr::new(ConstExprKind::Int(parse_int_literal(&s, start)?), start),
            TokenKind::RuneLiteral(s) => {
                let kind = rune_value(&s).map_or(ConstExprKind::Other, ConstExprKind::Int);
                ConstExpr::new(kind, start)
            }
            TokenKind::FloatLiteral(_) | TokenKind::ImaginaryLiteral(_) | TokenKind::StringLiteral(_) => {
                ConstExpr::new(ConstExprKind::Other, start)
            }
            TokenKind::Identifier(name) if name == "iota" => ConstExpr::new(ConstExprKind::Iota, start),
            TokenKind::Identifier(name) => {
                if self.match_token(&TokenKind::Dot)? {
                    let member = self.expect_identifier()?;
                    ConstExpr::new(
                        ConstExprKind::Name {
                            package: Some(name),
                            name: member,
                        },
                        self.span_from(start),
                    )
                } else {
                    ConstExpr::new(ConstExprKind::Name { package: None, name }, start)
                }
            }
            TokenKind::LParen => {
                let inner = self.parse_const_expr()?;
                let close = self.expect(TokenKind::RParen)?;
                ConstExpr::new(inner.kind, start.merge(close.span))
            }
            other => {
                return Err(LintError::parser(
                    format!("expected constant expression, found {}", other),
                    start,
                ));
            }
        };

        // Calls and conversions
        while self.check(&TokenKind::LParen)? {
            let args = self.parse_call_args()?;
            let span = self.span_from(start);
            let is_conversion = matches!(expr.kind, ConstExprKind::Name { .. });
            expr = match args {
                Some(mut args) if is_conversion && args.len() == 1 => {
                    ConstExpr::new(ConstExprKind::Convert(Box::new(args.remove(0))), span)
                }
                _ => ConstExpr::new(ConstExprKind::Other, span),
            };
        }

        Ok(expr)
    }

    /// `(a, b, ...)`; `None` when some argument is not a constant expression
    fn parse_call_args(&mut self) -> LintResult<Option<Vec<ConstExpr>>> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        let mut opaque = false;

        while !self.check(&TokenKind::RParen)? {
            if starts_const_expr(&self.peek_kind()?) {
                args.push(self.parse_const_expr()?);
            }
            if !self.check(&TokenKind::Comma)? && !self.check(&TokenKind::RParen)? {
                opaque = true;
                self.skip_until(|k| matches!(k, TokenKind::Comma | TokenKind::RParen))?;
            }
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        Ok(if opaque { None } else { Some(args) })
    }

    // =========================================================================
    // Skipping
    // =========================================================================

    /// Skip a `func` or `var` declaration up to its terminating `;`
    fn skip_declaration(&mut self) -> LintResult<()> {
        loop {
            if self.at_local_struct()? {
                self.parse_local_struct()?;
                continue;
            }
            match self.peek_kind()? {
                TokenKind::Semi => {
                    self.advance()?;
                    return Ok(());
                }
                TokenKind::Eof => return Ok(()),
                k if k.is_open() => {
                    self.skip_balanced()?;
                }
                k if k.is_close() => {
                    let span = self.lexer.peek()?.span;
                    return Err(LintError::parser(format!("unexpected {}", k), span));
                }
                _ => {
                    self.advance()?;
                }
            }
        }
    }

    /// Skip a bracketed group starting at the next token, keeping struct
    /// literals found inside it
    fn skip_balanced(&mut self) -> LintResult<Span> {
        let open = self.advance()?;
        if !open.kind.is_open() {
            return Err(LintError::parser(
                format!("expected '(', '[' or '{{', found {}", open.kind),
                open.span,
            ));
        }

        let mut depth = 1usize;
        loop {
            if self.at_local_struct()? {
                self.parse_local_struct()?;
                continue;
            }
            let token = self.advance()?;
            match &token.kind {
                k if k.is_open() => depth += 1,
                k if k.is_close() => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(open.span.merge(token.span));
                    }
                }
                TokenKind::Eof => {
                    return Err(LintError::parser("unexpected end of file", token.span));
                }
                _ => {}
            }
        }
    }

    /// Skip tokens until `stop` matches one at bracket depth zero (not consumed)
    fn skip_until(&mut self, stop: impl Fn(&TokenKind) -> bool) -> LintResult<()> {
        loop {
            let kind = self.peek_kind()?;
            if stop(&kind) {
                return Ok(());
            }
            if kind.is_open() {
                self.skip_balanced()?;
            } else if kind.is_close() || matches!(kind, TokenKind::Eof) {
                let span = self.lexer.peek()?.span;
                return Err(LintError::parser(format!("unexpected {}", kind), span));
            } else {
                self.advance()?;
            }
        }
    }

    /// `struct {` or `type Name struct {` in skipped code
    fn at_local_struct(&mut self) -> LintResult<bool> {
        match self.peek_kind()? {
            TokenKind::Struct => self.lexer.check_lookahead(&TokenKind::LBrace),
            TokenKind::Type => Ok(matches!(self.peek_kind_at(1)?, TokenKind::Identifier(_))
                && matches!(self.peek_kind_at(2)?, TokenKind::Struct)
                && matches!(self.peek_kind_at(3)?, TokenKind::LBrace)),
            _ => Ok(false),
        }
    }

    fn parse_local_struct(&mut self) -> LintResult<()> {
        let name = if self.match_token(&TokenKind::Type)? {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let ty = self.parse_struct_type()?;
        self.local_structs.push(LocalStruct { name, ty });
        Ok(())
    }
}

fn starts_const_expr(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::IntLiteral(_)
            | TokenKind::FloatLiteral(_)
            | TokenKind::ImaginaryLiteral(_)
            | TokenKind::RuneLiteral(_)
            | TokenKind::StringLiteral(_)
            | TokenKind::LParen
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Caret
            | TokenKind::Bang
    )
}

/// Strip the surrounding quotes or backticks of a string literal
fn unquote(s: &str) -> &str {
    if s.len() >= 2 { &s[1..s.len() - 1] } else { s }
}

fn parse_int_literal(s: &str, span: Span) -> LintResult<i128> {
    let digits: String = s.chars().filter(|&c| c != '_').collect();
    let (radix, body) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        _ if digits.len() > 1 && digits.starts_with('0') => (8, &digits[1..]),
        _ => (10, digits.as_str()),
    };
    i128::from_str_radix(body, radix)
        .map_err(|_| LintError::parser(format!("invalid integer literal '{}'", s), span))
}

/// Value of a rune literal; `None` for escapes that are not understood
fn rune_value(s: &str) -> Option<i128> {
    let body = unquote(s);
    let mut chars = body.chars();
    let first = chars.next()?;
    if first != '\\' {
        return if chars.next().is_none() { Some(first as i128) } else { None };
    }

    let rest = &body[1..];
    let simple = match rest {
        "a" => Some(0x07),
        "b" => Some(0x08),
        "f" => Some(0x0C),
        "n" => Some(0x0A),
        "r" => Some(0x0D),
        "t" => Some(0x09),
        "v" => Some(0x0B),
        "\\" => Some(0x5C),
        "'" => Some(0x27),
        _ => None,
    };
    if simple.is_some() {
        return simple;
    }

    match rest.as_bytes().first()? {
        b'x' | b'u' | b'U' => i128::from_str_radix(&rest[1..], 16).ok(),
        b'0'..=b'7' => i128::from_str_radix(rest, 8).ok(),
        _ => None,
    }
}
