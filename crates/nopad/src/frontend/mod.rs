//! Language frontends
//!
//! The frontend lexes and parses source files and resolves their struct
//! types into descriptions the layout engine understands.

pub mod go;

pub use go::GoFrontend;

/// Configuration options passed to the frontend
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
}
