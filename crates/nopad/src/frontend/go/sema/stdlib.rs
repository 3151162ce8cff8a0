//! Predeclared types and the layouts of well-known standard library types
//!
//! Standard library structs are described by their unexported fields as of
//! recent Go releases. Anything not listed here is unresolvable, and structs
//! that depend on it are skipped.

use nopad_layout::{Field, MachineModel, TypeKind};

/// `int` on the given target
fn int(model: &MachineModel) -> TypeKind {
    if model.word_size() == 8 { TypeKind::Int64 } else { TypeKind::Int32 }
}

/// `uint` and `uintptr` on the given target
fn uint(model: &MachineModel) -> TypeKind {
    if model.word_size() == 8 { TypeKind::UInt64 } else { TypeKind::UInt32 }
}

fn field(name: &str, ty: TypeKind) -> Field {
    Field::new(name, ty)
}

/// `noCopy` and `align64` markers are empty structs
fn marker() -> Field {
    field("_", TypeKind::structure(Vec::new()))
}

/// Types of the universe scope
pub fn predeclared(name: &str, model: &MachineModel) -> Option<TypeKind> {
    let kind = match name {
        "bool" => TypeKind::Bool,
        "int8" => TypeKind::Int8,
        "int16" => TypeKind::Int16,
        "int32" | "rune" => TypeKind::Int32,
        "int64" => TypeKind::Int64,
        "uint8" | "byte" => TypeKind::UInt8,
        "uint16" => TypeKind::UInt16,
        "uint32" => TypeKind::UInt32,
        "uint64" => TypeKind::UInt64,
        "int" => int(model),
        "uint" | "uintptr" => uint(model),
        "float32" => TypeKind::Float32,
        "float64" => TypeKind::Float64,
        "complex64" => TypeKind::Complex64,
        "complex128" => TypeKind::Complex128,
        "string" => TypeKind::String,
        "error" | "any" | "comparable" => TypeKind::Interface,
        _ => return None,
    };
    Some(kind)
}

fn mutex() -> TypeKind {
    TypeKind::structure(vec![field("state", TypeKind::Int32), field("sema", TypeKind::UInt32)])
}

fn atomic(value: TypeKind) -> TypeKind {
    TypeKind::structure(vec![marker(), field("v", value)])
}

/// 64-bit atomics carry an `align64` marker as well
fn atomic64(value: TypeKind) -> TypeKind {
    TypeKind::structure(vec![marker(), marker(), field("v", value)])
}

/// Type `name` exported by the package at import path `path`
pub fn package_type(path: &str, name: &str, model: &MachineModel) -> Option<TypeKind> {
    let kind = match (path, name) {
        ("unsafe", "Pointer") => TypeKind::Pointer,

        ("sync", "Mutex") => mutex(),
        ("sync", "RWMutex") => TypeKind::structure(vec![
            field("w", mutex()),
            field("writerSem", TypeKind::UInt32),
            field("readerSem", TypeKind::UInt32),
            field("readerCount", atomic(TypeKind::Int32)),
            field("readerWait", atomic(TypeKind::Int32)),
        ]),
        ("sync", "WaitGroup") => TypeKind::structure(vec![
            marker(),
            field("state", atomic64(TypeKind::UInt64)),
            field("sema", TypeKind::UInt32),
        ]),
        ("sync", "Once") => TypeKind::structure(vec![
            marker(),
            field("done", atomic(TypeKind::UInt32)),
            field("m", mutex()),
        ]),
        ("sync", "Pool") => TypeKind::structure(vec![
            marker(),
            field("local", TypeKind::Pointer),
            field("localSize", uint(model)),
            field("victim", TypeKind::Pointer),
            field("victimSize", uint(model)),
            field("New", TypeKind::Function),
        ]),
        ("sync", "Locker") => TypeKind::Interface,

        ("sync/atomic", "Int32") => atomic(TypeKind::Int32),
        ("sync/atomic", "Bool" | "Uint32") => atomic(TypeKind::UInt32),
        ("sync/atomic", "Int64") => atomic64(TypeKind::Int64),
        ("sync/atomic", "Uint64") => atomic64(TypeKind::UInt64),
        ("sync/atomic", "Uintptr") => atomic(uint(model)),
        ("sync/atomic", "Value") => TypeKind::structure(vec![field("v", TypeKind::Interface)]),
        ("sync/atomic", "Pointer") => TypeKind::structure(vec![
            field("_", TypeKind::array(TypeKind::Pointer, 0)),
            marker(),
            field("v", TypeKind::Pointer),
        ]),

        ("time", "Time") => TypeKind::structure(vec![
            field("wall", TypeKind::UInt64),
            field("ext", TypeKind::Int64),
            field("loc", TypeKind::Pointer),
        ]),
        ("time", "Duration") => TypeKind::Int64,
        ("time", "Month" | "Weekday") => int(model),

        ("context", "Context") => TypeKind::Interface,
        ("context", "CancelFunc") => TypeKind::Function,

        (
            "io",
            "Reader" | "Writer" | "Closer" | "Seeker" | "ReaderAt" | "WriterAt" | "ReadWriter" | "ReadCloser"
            | "WriteCloser" | "ReadWriteCloser",
        ) => TypeKind::Interface,

        ("net", "IP" | "IPMask" | "HardwareAddr") => TypeKind::Slice,
        ("net", "Conn" | "Listener" | "Addr" | "PacketConn") => TypeKind::Interface,

        ("bytes", "Buffer") => TypeKind::structure(vec![
            field("buf", TypeKind::Slice),
            field("off", int(model)),
            field("lastRead", TypeKind::Int8),
        ]),
        ("strings", "Builder") => TypeKind::structure(vec![
            field("addr", TypeKind::Pointer),
            field("buf", TypeKind::Slice),
        ]),
        ("strings", "Reader") => TypeKind::structure(vec![
            field("s", TypeKind::String),
            field("i", TypeKind::Int64),
            field("prevRune", int(model)),
        ]),

        ("math/big", "Int") => TypeKind::structure(vec![
            field("neg", TypeKind::Bool),
            field("abs", TypeKind::Slice),
        ]),

        ("fmt", "Stringer" | "Formatter" | "State") => TypeKind::Interface,

        ("reflect", "Type") => TypeKind::Interface,
        ("reflect", "Kind") => uint(model),
        ("reflect", "Value") => TypeKind::structure(vec![
            field("typ_", TypeKind::Pointer),
            field("ptr", TypeKind::Pointer),
            field("flag", uint(model)),
        ]),

        ("net/http", "Handler" | "ResponseWriter" | "RoundTripper") => TypeKind::Interface,
        ("net/http", "Header") => TypeKind::Map,
        ("net/http", "HandlerFunc") => TypeKind::Function,

        ("os", "FileMode") | ("io/fs", "FileMode") => TypeKind::UInt32,
        ("os", "Signal") | ("io/fs", "FileInfo" | "FS") => TypeKind::Interface,

        ("encoding/json", "RawMessage") => TypeKind::Slice,
        ("encoding/json", "Number") => TypeKind::String,
        ("encoding/json", "Marshaler" | "Unmarshaler") => TypeKind::Interface,

        _ => return None,
    };
    Some(kind)
}

/// Integer constant `name` exported by the package at import path `path`
pub fn package_const(path: &str, name: &str) -> Option<i128> {
    if path != "math" {
        return None;
    }
    let value = match name {
        "MaxInt8" => i128::from(i8::MAX),
        "MinInt8" => i128::from(i8::MIN),
        "MaxInt16" => i128::from(i16::MAX),
        "MinInt16" => i128::from(i16::MIN),
        "MaxInt32" => i128::from(i32::MAX),
        "MinInt32" => i128::from(i32::MIN),
        "MaxInt64" => i128::from(i64::MAX),
        "MinInt64" => i128::from(i64::MIN),
        "MaxUint8" => i128::from(u8::MAX),
        "MaxUint16" => i128::from(u16::MAX),
        "MaxUint32" => i128::from(u32::MAX),
        "MaxUint64" => i128::from(u64::MAX),
        _ => return None,
    };
    Some(value)
}
