//! Type size model
//!
//! Size, alignment and pointer-prefix rules for every [`TypeKind`]. The
//! rules follow the gc compiler's sizing: basic kinds have fixed sizes,
//! reference-like kinds are measured in machine words, and natural
//! alignment is capped at the model's `max_align`.
//!
//! Sizes saturate at `u64::MAX` instead of overflowing. Descriptions that
//! big have no layout on any target; [`MachineModel::checked_size_of`]
//! tells them apart.

use crate::kind::{Field, TypeKind};
use crate::machine::MachineModel;

/// Smallest `y >= x` such that `y % a == 0`
pub(crate) fn align_up(x: u64, a: u64) -> u64 {
    let y = x.saturating_add(a - 1);
    y - y % a
}

/// Like [`align_up`], but `None` when the result does not fit in `u64`
pub(crate) fn checked_align_up(x: u64, a: u64) -> Option<u64> {
    let y = x.checked_add(a - 1)?;
    Some(y - y % a)
}

impl MachineModel {
    /// Size of a value of type `ty`, in bytes
    pub fn size_of(&self, ty: &TypeKind) -> u64 {
        let word = self.word_size();
        match ty {
            TypeKind::Bool | TypeKind::Int8 | TypeKind::UInt8 => 1,
            TypeKind::Int16 | TypeKind::UInt16 => 2,
            TypeKind::Int32 | TypeKind::UInt32 | TypeKind::Float32 => 4,
            TypeKind::Int64 | TypeKind::UInt64 | TypeKind::Float64 | TypeKind::Complex64 => 8,
            TypeKind::Complex128 => 16,
            TypeKind::String | TypeKind::Interface => word.saturating_mul(2),
            TypeKind::Slice => word.saturating_mul(3),
            TypeKind::Pointer | TypeKind::Channel | TypeKind::Map | TypeKind::Function => word,
            TypeKind::Array { element, len } => len.saturating_mul(self.size_of(element)),
            TypeKind::Struct(fields) => crate::layout::actual_size(fields, self),
        }
    }

    /// Size of `ty`, or `None` when it does not fit the target's address
    /// space (see [`MachineModel::max_object_size`])
    pub fn checked_size_of(&self, ty: &TypeKind) -> Option<u64> {
        let size = match ty {
            TypeKind::Array { element, len } => len.checked_mul(self.checked_size_of(element)?)?,
            TypeKind::Struct(fields) => crate::layout::checked_actual_size(fields, self)?,
            _ => self.size_of(ty),
        };
        (size <= self.max_object_size()).then_some(size)
    }

    /// Largest object the target can address: 1 << 50 bytes with 8-byte
    /// words, the largest signed word otherwise
    pub fn max_object_size(&self) -> u64 {
        match self.word_size() {
            w if w >= 8 => 1 << 50,
            w => (1 << (8 * w - 1)) - 1,
        }
    }

    /// Required alignment of a value of type `ty`; always at least 1
    pub fn align_of(&self, ty: &TypeKind) -> u64 {
        match ty {
            // An array aligns like its element, whatever the length.
            TypeKind::Array { element, .. } => self.align_of(element),
            TypeKind::Struct(fields) => struct_align(fields, self),
            _ => self.size_of(ty).clamp(1, self.max_align()),
        }
    }

    /// Length of the leading byte range of `ty` that may hold a traceable
    /// reference. Zero for pointer-free types.
    ///
    /// Not consulted by [`crate::evaluate_struct`]; only the suggested field
    /// order reads it. Whether pointer-aware compaction was ever meant to
    /// gate the padding verdict is an open question.
    pub fn pointer_prefix(&self, ty: &TypeKind) -> u64 {
        let word = self.word_size();
        match ty {
            TypeKind::String
            | TypeKind::Pointer
            | TypeKind::Channel
            | TypeKind::Map
            | TypeKind::Function
            | TypeKind::Slice => word,
            TypeKind::Interface => 2 * word,
            TypeKind::Array { element, len } => {
                if *len == 0 {
                    return 0;
                }
                match self.pointer_prefix(element) {
                    0 => 0,
                    prefix => (len - 1).saturating_mul(self.size_of(element)).saturating_add(prefix),
                }
            }
            TypeKind::Struct(fields) => struct_pointer_prefix(fields, self),
            TypeKind::Bool
            | TypeKind::Int8
            | TypeKind::Int16
            | TypeKind::Int32
            | TypeKind::Int64
            | TypeKind::UInt8
            | TypeKind::UInt16
            | TypeKind::UInt32
            | TypeKind::UInt64
            | TypeKind::Float32
            | TypeKind::Float64
            | TypeKind::Complex64
            | TypeKind::Complex128 => 0,
        }
    }
}

/// Largest field alignment, or 1 for an empty struct
fn struct_align(fields: &[Field], model: &MachineModel) -> u64 {
    fields
        .iter()
        .map(|f| model.align_of(&f.ty))
        .max()
        .unwrap_or(1)
}

/// Offset at which the last pointerful field's pointer range ends
fn struct_pointer_prefix(fields: &[Field], model: &MachineModel) -> u64 {
    let mut offset = 0;
    let mut prefix = 0;
    for field in fields {
        offset = align_up(offset, model.align_of(&field.ty));
        let fp = model.pointer_prefix(&field.ty);
        if fp != 0 {
            prefix = offset.saturating_add(fp);
        }
        offset = offset.saturating_add(model.size_of(&field.ty));
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn model32() -> MachineModel {
        MachineModel::I386
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(8, 8), 8);
        assert_eq!(align_up(9, 4), 12);
        assert_eq!(align_up(5, 1), 5);
        assert_eq!(align_up(u64::MAX - 2, 8), u64::MAX - 7);
        assert_eq!(checked_align_up(9, 4), Some(12));
        assert_eq!(checked_align_up(u64::MAX - 2, 8), None);
    }

    #[test]
    fn test_basic_sizes() {
        let m = MachineModel::AMD64;
        assert_eq!(m.size_of(&TypeKind::Bool), 1);
        assert_eq!(m.size_of(&TypeKind::UInt16), 2);
        assert_eq!(m.size_of(&TypeKind::Float32), 4);
        assert_eq!(m.size_of(&TypeKind::Complex64), 8);
        assert_eq!(m.size_of(&TypeKind::Complex128), 16);
    }

    #[test]
    fn test_word_sized_kinds() {
        let m = MachineModel::AMD64;
        assert_eq!(m.size_of(&TypeKind::String), 16);
        assert_eq!(m.size_of(&TypeKind::Slice), 24);
        assert_eq!(m.size_of(&TypeKind::Interface), 16);
        assert_eq!(m.size_of(&TypeKind::Pointer), 8);
        assert_eq!(m.size_of(&TypeKind::Channel), 8);
        assert_eq!(m.size_of(&TypeKind::Map), 8);
        assert_eq!(m.size_of(&TypeKind::Function), 8);

        let m = model32();
        assert_eq!(m.size_of(&TypeKind::String), 8);
        assert_eq!(m.size_of(&TypeKind::Slice), 12);
        assert_eq!(m.size_of(&TypeKind::Map), 4);
    }

    #[test]
    fn test_alignment_is_capped() {
        let m = MachineModel::AMD64;
        assert_eq!(m.align_of(&TypeKind::Complex128), 8);
        assert_eq!(m.align_of(&TypeKind::String), 8);

        let m = model32();
        assert_eq!(m.align_of(&TypeKind::Int64), 4);
        assert_eq!(m.align_of(&TypeKind::Float64), 4);
        assert_eq!(m.align_of(&TypeKind::Int16), 2);
    }

    #[test]
    fn test_array_size_and_align() {
        let m = MachineModel::AMD64;
        let arr = TypeKind::array(TypeKind::Int32, 3);
        assert_eq!(m.size_of(&arr), 12);
        assert_eq!(m.align_of(&arr), 4);

        let empty = TypeKind::array(TypeKind::Int64, 0);
        assert_eq!(m.size_of(&empty), 0);
        assert_eq!(m.align_of(&empty), 8);
    }

    #[test]
    fn test_empty_struct() {
        let m = MachineModel::AMD64;
        let s = TypeKind::structure(vec![]);
        assert_eq!(m.size_of(&s), 0);
        assert_eq!(m.align_of(&s), 1);
        assert_eq!(m.pointer_prefix(&s), 0);
    }

    #[test]
    fn test_nested_struct_alignment() {
        let m = model32();
        let inner = TypeKind::structure(vec![
            Field::new("x", TypeKind::Int8),
            Field::new("y", TypeKind::Float64),
        ]);
        assert_eq!(m.align_of(&inner), 4);
        assert_eq!(m.size_of(&inner), 12);

        let outer = TypeKind::structure(vec![
            Field::new("flag", TypeKind::Bool),
            Field::new("inner", inner),
        ]);
        assert_eq!(m.align_of(&outer), 4);
        assert_eq!(m.size_of(&outer), 16);
    }

    #[test]
    fn test_pointer_prefix_scalars_and_references() {
        let m = MachineModel::AMD64;
        assert_eq!(m.pointer_prefix(&TypeKind::Int64), 0);
        assert_eq!(m.pointer_prefix(&TypeKind::String), 8);
        assert_eq!(m.pointer_prefix(&TypeKind::Slice), 8);
        assert_eq!(m.pointer_prefix(&TypeKind::Pointer), 8);
        assert_eq!(m.pointer_prefix(&TypeKind::Interface), 16);
    }

    #[test]
    fn test_pointer_prefix_arrays() {
        let m = MachineModel::AMD64;
        assert_eq!(m.pointer_prefix(&TypeKind::array(TypeKind::String, 0)), 0);
        assert_eq!(m.pointer_prefix(&TypeKind::array(TypeKind::Int32, 4)), 0);
        // Two strings: the first is scanned whole, the second up to its data word.
        assert_eq!(m.pointer_prefix(&TypeKind::array(TypeKind::String, 2)), 24);
    }

    #[test]
    fn test_pointer_prefix_struct() {
        let m = MachineModel::AMD64;
        let s = TypeKind::structure(vec![
            Field::new("a", TypeKind::Bool),
            Field::new("p", TypeKind::Pointer),
            Field::new("n", TypeKind::Int64),
        ]);
        assert_eq!(m.pointer_prefix(&s), 16);

        let no_ptrs = TypeKind::structure(vec![
            Field::new("a", TypeKind::Int64),
            Field::new("b", TypeKind::Int32),
        ]);
        assert_eq!(m.pointer_prefix(&no_ptrs), 0);
    }

    #[test]
    fn test_oversized_array_saturates() {
        let m = MachineModel::AMD64;
        let huge = TypeKind::array(TypeKind::Int64, 1 << 62);
        assert_eq!(m.size_of(&huge), u64::MAX);
        assert_eq!(m.checked_size_of(&huge), None);
        assert_eq!(m.pointer_prefix(&TypeKind::array(TypeKind::String, 1 << 62)), u64::MAX);
    }

    #[test]
    fn test_checked_size_respects_address_space() {
        let m = MachineModel::AMD64;
        assert_eq!(m.max_object_size(), 1 << 50);
        assert_eq!(m.checked_size_of(&TypeKind::array(TypeKind::Int64, 1 << 47)), Some(1 << 50));
        assert_eq!(m.checked_size_of(&TypeKind::array(TypeKind::Int64, 1 << 48)), None);

        // Fits in u64, but not in 31 bits
        let m = model32();
        assert_eq!(m.max_object_size(), (1 << 31) - 1);
        assert_eq!(m.checked_size_of(&TypeKind::array(TypeKind::Int64, 1 << 28)), None);
        assert_eq!(m.checked_size_of(&TypeKind::array(TypeKind::Int32, 3)), Some(12));
    }

    #[test]
    fn test_checked_size_of_struct() {
        let m = MachineModel::AMD64;
        let half = TypeKind::array(TypeKind::UInt8, 1 << 49);
        let fits = TypeKind::structure(vec![Field::new("a", half.clone()), Field::new("b", half.clone())]);
        assert_eq!(m.checked_size_of(&fits), Some(1 << 50));

        let too_big = TypeKind::structure(vec![
            Field::new("a", half.clone()),
            Field::new("b", half),
            Field::new("c", TypeKind::Bool),
        ]);
        assert_eq!(m.checked_size_of(&too_big), None);
    }
}
