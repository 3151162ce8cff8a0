//! Go language frontend
//!
//! This frontend handles:
//! - Lexing Go source into tokens (with semicolon insertion)
//! - Parsing type and constant declarations into a Go AST
//! - Resolving struct types to layout descriptions, one package at a time

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

use log::debug;

use crate::common::LintResult;
use crate::frontend::FrontendConfig;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use sema::{PackageScope, ResolveError, Resolver};

/// Go language frontend
pub struct GoFrontend;

impl GoFrontend {
    pub fn new() -> Self {
        Self
    }

    /// File extensions this frontend handles
    pub fn extensions(&self) -> &'static [&'static str] {
        &[".go"]
    }

    /// Parse one source file, honouring the dump flags
    pub fn parse(&self, source: &str, filename: &str, config: &FrontendConfig) -> LintResult<SourceFile> {
        if config.dump_tokens {
            eprintln!("=== Go Tokens: {} ===", filename);
            eprint!("{}", self.dump_tokens(source)?);
            eprintln!("=== End Tokens ===\n");
        }

        debug!("parsing {}", filename);
        let file = Parser::new(source).parse_file()?;

        if config.dump_ast {
            eprintln!("=== Go AST: {} ===", filename);
            eprintln!("{:#?}", file);
            eprintln!("=== End AST ===\n");
        }

        Ok(file)
    }

    pub fn dump_tokens(&self, source: &str) -> LintResult<String> {
        let tokens = Lexer::new(source).tokenize_all()?;
        let mut output = String::new();
        for token in &tokens {
            output.push_str(&format!("{:?}\n", token));
        }
        Ok(output)
    }

    pub fn dump_ast(&self, source: &str) -> LintResult<String> {
        let file = Parser::new(source).parse_file()?;
        Ok(format!("{:#?}", file))
    }
}

impl Default for GoFrontend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dumps() {
        let frontend = GoFrontend::new();
        let tokens = frontend.dump_tokens("package p\n").unwrap();
        assert!(tokens.starts_with("Token { kind: Package"));
        let ast = frontend.dump_ast("package p\ntype T struct{}\n").unwrap();
        assert!(ast.contains("name: \"T\""));
    }

    #[test]
    fn test_parse_reports_syntax_errors() {
        let frontend = GoFrontend::new();
        let config = FrontendConfig::default();
        assert!(frontend.parse("package p\ntype struct\n", "a.go", &config).is_err());
    }
}
