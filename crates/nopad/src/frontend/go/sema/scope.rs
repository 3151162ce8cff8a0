//! Package-level symbol table

use std::collections::HashMap;

use crate::common::{LintError, Span};
use crate::frontend::go::ast::{ConstExpr, SourceFile, TypeSpec};

/// A declared type and the file it was declared in
#[derive(Debug, Clone, Copy)]
pub struct TypeSymbol<'a> {
    pub file: usize,
    pub spec: &'a TypeSpec,
}

/// A declared constant
#[derive(Debug, Clone, Copy)]
pub struct ConstSymbol<'a> {
    pub file: usize,
    /// `None` when the declaration has fewer values than names
    pub value: Option<&'a ConstExpr>,
    pub iota: u64,
    pub span: Span,
}

/// Types, constants and per-file imports of one package
#[derive(Debug, Default)]
pub struct PackageScope<'a> {
    types: HashMap<&'a str, TypeSymbol<'a>>,
    consts: HashMap<&'a str, ConstSymbol<'a>>,
    /// Local import name to import path, one map per file
    imports: Vec<HashMap<&'a str, &'a str>>,
}

impl<'a> PackageScope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the declarations of all files of a package. Duplicate
    /// declarations are returned as errors tagged with their file index;
    /// the first declaration wins.
    pub fn build(files: &'a [SourceFile]) -> (Self, Vec<(usize, LintError)>) {
        let mut scope = Self::new();
        let mut errors = Vec::new();

        for (file, source) in files.iter().enumerate() {
            let mut imports = HashMap::new();
            for import in &source.imports {
                let name = import.local_name();
                if name != "_" && name != "." {
                    imports.insert(name, import.path.as_str());
                }
            }
            scope.imports.push(imports);

            for spec in &source.types {
                if spec.name == "_" {
                    continue;
                }
                if let Err(message) = scope.define_type(TypeSymbol { file, spec }) {
                    errors.push((file, LintError::semantic(message, spec.span)));
                }
            }

            for spec in &source.consts {
                for (i, (name, span)) in spec.names.iter().enumerate() {
                    if name == "_" {
                        continue;
                    }
                    let symbol = ConstSymbol {
                        file,
                        value: spec.values.get(i),
                        iota: spec.iota,
                        span: *span,
                    };
                    if let Err(message) = scope.define_const(name, symbol) {
                        errors.push((file, LintError::semantic(message, *span)));
                    }
                }
            }
        }

        (scope, errors)
    }

    fn is_defined(&self, name: &str) -> bool {
        self.types.contains_key(name) || self.consts.contains_key(name)
    }

    pub fn define_type(&mut self, symbol: TypeSymbol<'a>) -> Result<(), String> {
        let name = symbol.spec.name.as_str();
        if self.is_defined(name) {
            return Err(format!("{} redeclared in this package", name));
        }
        self.types.insert(name, symbol);
        Ok(())
    }

    pub fn define_const(&mut self, name: &'a str, symbol: ConstSymbol<'a>) -> Result<(), String> {
        if self.is_defined(name) {
            return Err(format!("{} redeclared in this package", name));
        }
        self.consts.insert(name, symbol);
        Ok(())
    }

    pub fn lookup_type(&self, name: &str) -> Option<TypeSymbol<'a>> {
        self.types.get(name).copied()
    }

    pub fn lookup_const(&self, name: &str) -> Option<ConstSymbol<'a>> {
        self.consts.get(name).copied()
    }

    /// Import path bound to `name` in the given file
    pub fn import_path(&self, file: usize, name: &str) -> Option<&'a str> {
        self.imports.get(file)?.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::go::parser::Parser;
    use pretty_assertions::assert_eq;

    fn parse_all(sources: &[&str]) -> Vec<SourceFile> {
        sources.iter().map(|s| Parser::new(s).parse_file().unwrap()).collect()
    }

    #[test]
    fn test_declarations_span_files() {
        let files = parse_all(&[
            "package p\nimport \"sync\"\ntype A struct{ m sync.Mutex }\n",
            "package p\nimport s \"strings\"\nconst N = 4\ntype B [N]A\n",
        ]);
        let (scope, errors) = PackageScope::build(&files);
        assert!(errors.is_empty());
        assert_eq!(scope.lookup_type("A").map(|s| s.file), Some(0));
        assert_eq!(scope.lookup_type("B").map(|s| s.file), Some(1));
        assert_eq!(scope.lookup_const("N").map(|s| s.iota), Some(0));
        assert_eq!(scope.import_path(0, "sync"), Some("sync"));
        assert_eq!(scope.import_path(1, "s"), Some("strings"));
        assert_eq!(scope.import_path(1, "sync"), None);
    }

    #[test]
    fn test_redeclaration_is_reported() {
        let files = parse_all(&["package p\ntype A int\n", "package p\nconst A = 1\ntype _ int\ntype _ bool\n"]);
        let (_, errors) = PackageScope::build(&files);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, 1);
        assert!(matches!(&errors[0].1, LintError::Semantic { message, .. } if message == "A redeclared in this package"));
    }
}
