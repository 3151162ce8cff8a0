//! Go top-level declarations

use super::{ConstExpr, GoType, StructType};
use crate::common::Span;

/// `import alias "path"`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub alias: Option<String>,
    pub path: String,
    pub span: Span,
}

impl ImportSpec {
    /// Name the import is referred to by in this file.
    ///
    /// Without an alias the package name is assumed to be the last path
    /// element, skipping a trailing major-version element such as `v2`.
    pub fn local_name(&self) -> &str {
        if let Some(alias) = &self.alias {
            return alias;
        }
        let mut parts = self.path.rsplit('/');
        let last = parts.next().unwrap_or(&self.path);
        let is_version = last.len() > 1
            && last.starts_with('v')
            && last[1..].bytes().all(|b| b.is_ascii_digit());
        if is_version {
            parts.next().unwrap_or(last)
        } else {
            last
        }
    }
}

/// `type Name[P C] T` or `type Name = T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: String,
    pub params: Vec<String>,
    pub alias: bool,
    pub ty: GoType,
    pub span: Span,
}

/// One line of a `const` declaration, with implicit repetition already
/// applied: `values` is copied from the previous line when omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstSpec {
    pub names: Vec<(String, Span)>,
    pub values: Vec<ConstExpr>,
    /// Position within the enclosing group
    pub iota: u64,
    pub span: Span,
}

/// A struct type literal found outside a type declaration (function
/// bodies, signatures, variable types)
#[derive(Debug, Clone, PartialEq)]
pub struct LocalStruct {
    /// Set for function-local `type Name struct{...}`
    pub name: Option<String>,
    pub ty: StructType,
}

/// A parsed Go source file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub types: Vec<TypeSpec>,
    pub consts: Vec<ConstSpec>,
    pub local_structs: Vec<LocalStruct>,
    pub span: Span,
}
