//! Type descriptions consumed by the layout engine
//!
//! A `TypeKind` is a fully resolved type: named and aliased types have
//! already been followed through to one of the kinds below. Nested structs
//! are owned by their parent, so a description is always a finite tree.

/// Resolved type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Complex64,
    Complex128,
    /// String header (data pointer + length)
    String,
    Pointer,
    /// Slice header (data pointer + length + capacity)
    Slice,

    /// Fixed-length array
    Array {
        element: Box<TypeKind>,
        len: u64,
    },

    /// Struct with fields in declaration order
    Struct(Vec<Field>),

    /// Interface value (type word + data word)
    Interface,
    Channel,
    Map,
    Function,
}

/// A struct field: informational name plus its resolved type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: TypeKind,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeKind) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl TypeKind {
    /// Array of `len` elements
    pub fn array(element: TypeKind, len: u64) -> Self {
        Self::Array {
            element: Box::new(element),
            len,
        }
    }

    /// Struct from an ordered field list
    pub fn structure(fields: Vec<Field>) -> Self {
        Self::Struct(fields)
    }

    /// Short human-readable name, used in dumps and logs
    pub fn describe(&self) -> String {
        match self {
            Self::Bool => "bool".to_string(),
            Self::Int8 => "int8".to_string(),
            Self::Int16 => "int16".to_string(),
            Self::Int32 => "int32".to_string(),
            Self::Int64 => "int64".to_string(),
            Self::UInt8 => "uint8".to_string(),
            Self::UInt16 => "uint16".to_string(),
            Self::UInt32 => "uint32".to_string(),
            Self::UInt64 => "uint64".to_string(),
            Self::Float32 => "float32".to_string(),
            Self::Float64 => "float64".to_string(),
            Self::Complex64 => "complex64".to_string(),
            Self::Complex128 => "complex128".to_string(),
            Self::String => "string".to_string(),
            Self::Pointer => "pointer".to_string(),
            Self::Slice => "slice".to_string(),
            Self::Array { element, len } => format!("[{}]{}", len, element.describe()),
            Self::Struct(fields) => format!("struct with {} fields", fields.len()),
            Self::Interface => "interface".to_string(),
            Self::Channel => "chan".to_string(),
            Self::Map => "map".to_string(),
            Self::Function => "func".to_string(),
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe_struct() {
        let ty = TypeKind::structure(vec![
            Field::new("a", TypeKind::Bool),
            Field::new("b", TypeKind::Int64),
        ]);
        assert_eq!(ty.to_string(), "struct with 2 fields");
    }

    #[test]
    fn test_describe_nested_array() {
        let ty = TypeKind::array(TypeKind::array(TypeKind::UInt8, 4), 2);
        assert_eq!(ty.to_string(), "[2][4]uint8");
    }
}
