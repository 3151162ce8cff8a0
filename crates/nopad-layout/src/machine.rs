//! Target machine description
//!
//! Layout rules depend on two numbers only: the pointer width and the
//! ceiling on natural alignment. The per-architecture table matches the
//! sizes the Go toolchain uses for each `GOARCH`.

use thiserror::Error;

/// Rejected machine model parameters
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    #[error("word size must be at least 1 byte")]
    ZeroWordSize,

    #[error("maximum alignment must be at least 1 byte")]
    ZeroMaxAlign,
}

/// Pointer width and maximum alignment of a compilation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MachineModel {
    word_size: u64,
    max_align: u64,
}

/// (GOARCH, word size, max align)
const ARCH_SIZES: &[(&str, u64, u64)] = &[
    ("386", 4, 4),
    ("amd64", 8, 8),
    ("amd64p32", 4, 8),
    ("arm", 4, 4),
    ("arm64", 8, 8),
    ("loong64", 8, 8),
    ("mips", 4, 4),
    ("mipsle", 4, 4),
    ("mips64", 8, 8),
    ("mips64le", 8, 8),
    ("ppc64", 8, 8),
    ("ppc64le", 8, 8),
    ("riscv64", 8, 8),
    ("s390x", 8, 8),
    ("sparc64", 8, 8),
    ("wasm", 8, 8),
];

impl MachineModel {
    /// Common 64-bit targets
    pub const AMD64: Self = Self { word_size: 8, max_align: 8 };

    /// Common 32-bit targets
    pub const I386: Self = Self { word_size: 4, max_align: 4 };

    pub fn new(word_size: u64, max_align: u64) -> Result<Self, ModelError> {
        if word_size == 0 {
            return Err(ModelError::ZeroWordSize);
        }
        if max_align == 0 {
            return Err(ModelError::ZeroMaxAlign);
        }
        Ok(Self { word_size, max_align })
    }

    /// Look up the model for a `GOARCH` name
    pub fn for_arch(arch: &str) -> Option<Self> {
        ARCH_SIZES
            .iter()
            .find(|(name, _, _)| *name == arch)
            .map(|&(_, word_size, max_align)| Self { word_size, max_align })
    }

    /// Names accepted by [`MachineModel::for_arch`]
    pub fn known_archs() -> impl Iterator<Item = &'static str> {
        ARCH_SIZES.iter().map(|(name, _, _)| *name)
    }

    pub fn word_size(&self) -> u64 {
        self.word_size
    }

    pub fn max_align(&self) -> u64 {
        self.max_align
    }
}

impl Default for MachineModel {
    fn default() -> Self {
        Self::AMD64
    }
}

impl std::fmt::Display for MachineModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "word size {}, max align {}", self.word_size, self.max_align)
    }
}
