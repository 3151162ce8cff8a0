//! Go AST definitions
//!
//! Only what layout analysis needs is kept: imports, type and constant
//! declarations, and every struct type literal in the file. Function
//! bodies and variable initializers are not represented.

mod types;
mod decl;

pub use types::*;
pub use decl::*;
