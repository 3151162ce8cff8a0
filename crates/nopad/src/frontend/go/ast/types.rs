//! Go type expressions

use crate::common::Span;

/// A type as written in source
#[derive(Debug, Clone, PartialEq)]
pub struct GoType {
    pub kind: GoTypeKind,
    pub span: Span,
}

impl GoType {
    pub fn new(kind: GoTypeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Unqualified, uninstantiated type name
    pub fn named(name: impl Into<String>, span: Span) -> Self {
        Self::new(
            GoTypeKind::Named {
                package: None,
                name: name.into(),
                args: Vec::new(),
            },
            span,
        )
    }

    /// Visit this type and every type nested inside it, parents first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a GoType)) {
        visit(self);
        match &self.kind {
            GoTypeKind::Named { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            GoTypeKind::Pointer(inner) | GoTypeKind::Slice(inner) => inner.walk(visit),
            GoTypeKind::Array { element, .. } => element.walk(visit),
            GoTypeKind::Map { key, value } => {
                key.walk(visit);
                value.walk(visit);
            }
            GoTypeKind::Chan { element, .. } => element.walk(visit),
            GoTypeKind::Struct(st) => {
                for field in &st.fields {
                    field.ty.walk(visit);
                }
            }
            GoTypeKind::Func | GoTypeKind::Interface => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GoTypeKind {
    /// `T`, `pkg.T` or `T[A, B]`
    Named {
        package: Option<String>,
        name: String,
        args: Vec<GoType>,
    },

    /// `*T`
    Pointer(Box<GoType>),

    /// `[]T`
    Slice(Box<GoType>),

    /// `[N]T`
    Array {
        len: ConstExpr,
        element: Box<GoType>,
    },

    /// `map[K]V`
    Map {
        key: Box<GoType>,
        value: Box<GoType>,
    },

    /// `chan T`, `chan<- T`, `<-chan T`
    Chan {
        dir: ChanDir,
        element: Box<GoType>,
    },

    /// Function signature (parameters are not kept)
    Func,

    /// Interface or constraint (methods are not kept)
    Interface,

    Struct(StructType),
}

/// Channel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// `struct { ... }` type literal
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub fields: Vec<FieldDecl>,
    /// Span of the `struct` keyword, where findings are reported
    pub keyword: Span,
    pub span: Span,
}

/// One line of a struct body: `a, b T "tag"` or an embedded `T`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub names: Vec<String>,
    pub ty: GoType,
    pub embedded: bool,
    pub tag: Option<String>,
    pub span: Span,
}

impl FieldDecl {
    /// Field names in declaration order; an embedded field is named after its type
    pub fn field_names(&self) -> Vec<String> {
        if !self.embedded {
            return self.names.clone();
        }
        let base = match &self.ty.kind {
            GoTypeKind::Pointer(inner) => &inner.kind,
            other => other,
        };
        match base {
            GoTypeKind::Named { name, .. } => vec![name.clone()],
            _ => vec!["_".to_string()],
        }
    }
}

/// Integer constant expression (array lengths, `const` values)
#[derive(Debug, Clone, PartialEq)]
pub struct ConstExpr {
    pub kind: ConstExprKind,
    pub span: Span,
}

impl ConstExpr {
    pub fn new(kind: ConstExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstExprKind {
    Int(i128),
    /// Reference to another constant, possibly qualified
    Name {
        package: Option<String>,
        name: String,
    },
    Iota,
    Unary {
        op: UnaryOp,
        operand: Box<ConstExpr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<ConstExpr>,
        rhs: Box<ConstExpr>,
    },
    /// `T(x)`: conversions keep the operand's value
    Convert(Box<ConstExpr>),
    /// Anything that is not an integer constant (strings, floats, calls...)
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Complement,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    Or,
    Xor,
    AndNot,
    /// Comparison and logical operators; never integer-valued
    Logical,
}

impl BinOp {
    /// Go binary operator precedence (higher binds tighter)
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Mul | BinOp::Div | BinOp::Rem | BinOp::Shl | BinOp::Shr | BinOp::And | BinOp::AndNot => 5,
            BinOp::Add | BinOp::Sub | BinOp::Or | BinOp::Xor => 4,
            BinOp::Logical => 1,
        }
    }
}
