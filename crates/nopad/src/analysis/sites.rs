//! Struct type literals of a package, in source order

use crate::frontend::go::ast::{GoType, GoTypeKind, SourceFile, StructType};

/// One `struct { ... }` type literal to be checked
#[derive(Debug, Clone, Copy)]
pub struct StructSite<'a> {
    pub file: usize,
    /// Declared name when the literal is the whole of a type declaration
    pub name: Option<&'a str>,
    /// Type parameters of the enclosing declaration
    pub params: &'a [String],
    /// Inside a function body or signature
    pub local: bool,
    pub ty: &'a StructType,
}

impl StructSite<'_> {
    /// Human readable name for logs
    pub fn describe(&self) -> String {
        match self.name {
            Some(name) => format!("struct {}", name),
            None => "anonymous struct".to_string(),
        }
    }
}

/// Every struct type literal in `files`, nested ones included, ordered by
/// file and then by position
pub fn collect_sites(files: &[SourceFile]) -> Vec<StructSite<'_>> {
    let mut sites = Vec::new();

    for (file, source) in files.iter().enumerate() {
        for spec in &source.types {
            let root: *const GoType = &spec.ty;
            spec.ty.walk(&mut |ty| {
                if let GoTypeKind::Struct(st) = &ty.kind {
                    sites.push(StructSite {
                        file,
                        name: std::ptr::eq(ty, root).then_some(spec.name.as_str()),
                        params: &spec.params,
                        local: false,
                        ty: st,
                    });
                }
            });
        }

        for local in &source.local_structs {
            sites.push(StructSite {
                file,
                name: local.name.as_deref(),
                params: &[],
                local: true,
                ty: &local.ty,
            });
            for field in &local.ty.fields {
                field.ty.walk(&mut |ty| {
                    if let GoTypeKind::Struct(st) = &ty.kind {
                        sites.push(StructSite {
                            file,
                            name: None,
                            params: &[],
                            local: true,
                            ty: st,
                        });
                    }
                });
            }
        }
    }

    sites.sort_by_key(|site| (site.file, site.ty.keyword.start));
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::go::parser::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sites_in_source_order() {
        let source = "package p\n\nfunc f() {\n\tvar x struct{ a bool }\n\t_ = x\n}\n\ntype Outer[T any] struct {\n\tin struct{ b int8 }\n\tp *struct{ c int16 }\n}\n\ntype Alias = []struct{ d bool }\n";
        let files = vec![Parser::new(source).parse_file().unwrap()];
        let sites = collect_sites(&files);

        let names: Vec<Option<&str>> = sites.iter().map(|s| s.name).collect();
        assert_eq!(names, vec![None, Some("Outer"), None, None, None]);

        let locals: Vec<bool> = sites.iter().map(|s| s.local).collect();
        assert_eq!(locals, vec![true, false, false, false, false]);

        assert_eq!(sites[2].params, &["T".to_string()]);
        assert_eq!(sites[1].describe(), "struct Outer");
        assert_eq!(sites[4].describe(), "anonymous struct");
    }
}
