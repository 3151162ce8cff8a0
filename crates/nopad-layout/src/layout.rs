//! Struct layout engine
//!
//! Simulates the sequential placement a compiler performs: each field is
//! moved up to its alignment, then the total is rounded to the struct's
//! own alignment. The reference size is the plain sum of field sizes.

use crate::kind::Field;
use crate::machine::MachineModel;
use crate::sizes::{align_up, checked_align_up};

/// Placement of one field inside a struct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    /// Position in the field list
    pub index: usize,
    /// Byte offset from the start of the struct
    pub offset: u64,
    /// Bytes occupied; a trailing zero-size field occupies 1
    pub size: u64,
    pub align: u64,
    /// Padding inserted between the previous field and this one
    pub padding_before: u64,
}

impl FieldSlot {
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

/// Place every field in order.
///
/// A zero-size last field in a struct that is not entirely zero-sized is
/// given one byte, so that a pointer to it cannot point past the end of the
/// struct into the next allocation.
pub fn field_layout(fields: &[Field], model: &MachineModel) -> Vec<FieldSlot> {
    let last = fields.len().saturating_sub(1);
    let mut offset = 0;
    let mut slots = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let align = model.align_of(&field.ty);
        let mut size = model.size_of(&field.ty);
        if index == last && size == 0 && offset != 0 {
            size = 1;
        }

        let aligned = align_up(offset, align);
        slots.push(FieldSlot {
            index,
            offset: aligned,
            size,
            align,
            padding_before: aligned.saturating_sub(offset),
        });
        offset = aligned.saturating_add(size);
    }

    slots
}

/// Padded size a compiler would give the struct
pub fn actual_size(fields: &[Field], model: &MachineModel) -> u64 {
    if fields.is_empty() {
        return 0;
    }

    let slots = field_layout(fields, model);
    let max_align = slots.iter().map(|s| s.align).max().unwrap_or(1);
    let end = slots.last().map_or(0, FieldSlot::end);
    align_up(end, max_align)
}

/// Like [`actual_size`], but `None` when the struct or one of its fields
/// does not fit the target's address space
pub fn checked_actual_size(fields: &[Field], model: &MachineModel) -> Option<u64> {
    let last = fields.len().saturating_sub(1);
    let mut offset: u64 = 0;
    let mut max_align = 1;

    for (index, field) in fields.iter().enumerate() {
        let align = model.align_of(&field.ty);
        let mut size = model.checked_size_of(&field.ty)?;
        if index == last && size == 0 && offset != 0 {
            size = 1;
        }
        offset = checked_align_up(offset, align)?.checked_add(size)?;
        max_align = max_align.max(align);
    }

    let size = checked_align_up(offset, max_align)?;
    (size <= model.max_object_size()).then_some(size)
}

/// Sum of raw field sizes, with no alignment padding anywhere
pub fn reference_size(fields: &[Field], model: &MachineModel) -> u64 {
    fields
        .iter()
        .fold(0, |sum: u64, f| sum.saturating_add(model.size_of(&f.ty)))
}

/// Bytes added after the last field to round the struct to its alignment
pub fn tail_padding(fields: &[Field], model: &MachineModel) -> u64 {
    let end = field_layout(fields, model)
        .last()
        .map_or(0, FieldSlot::end);
    actual_size(fields, model).saturating_sub(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::TypeKind;
    use pretty_assertions::assert_eq;

    fn fields(types: &[(&str, TypeKind)]) -> Vec<Field> {
        types
            .iter()
            .map(|(name, ty)| Field::new(*name, ty.clone()))
            .collect()
    }

    #[test]
    fn test_empty() {
        let m = MachineModel::AMD64;
        assert_eq!(actual_size(&[], &m), 0);
        assert_eq!(reference_size(&[], &m), 0);
        assert_eq!(tail_padding(&[], &m), 0);
        assert!(field_layout(&[], &m).is_empty());
    }

    #[test]
    fn test_no_padding() {
        let m = MachineModel::AMD64;
        let f = fields(&[("a", TypeKind::Bool), ("b", TypeKind::Bool)]);
        assert_eq!(actual_size(&f, &m), 2);
        assert_eq!(reference_size(&f, &m), 2);
    }

    #[test]
    fn test_padding_inserted() {
        let m = MachineModel::AMD64;
        let f = fields(&[("a", TypeKind::Bool), ("b", TypeKind::Int64)]);
        assert_eq!(actual_size(&f, &m), 16);
        assert_eq!(reference_size(&f, &m), 9);

        let slots = field_layout(&f, &m);
        assert_eq!(slots[1].offset, 8);
        assert_eq!(slots[1].padding_before, 7);
        assert_eq!(tail_padding(&f, &m), 0);
    }

    #[test]
    fn test_interleaved_padding() {
        let m = MachineModel::AMD64;
        let f = fields(&[
            ("a", TypeKind::Int32),
            ("b", TypeKind::Int64),
            ("c", TypeKind::Int32),
        ]);
        assert_eq!(reference_size(&f, &m), 16);
        assert_eq!(actual_size(&f, &m), 24);

        let offsets: Vec<u64> = field_layout(&f, &m).iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16]);
        assert_eq!(tail_padding(&f, &m), 4);
    }

    #[test]
    fn test_trailing_zero_size_field() {
        let m = MachineModel::AMD64;
        let f = fields(&[
            ("a", TypeKind::Int64),
            ("b", TypeKind::structure(vec![])),
        ]);
        assert_eq!(reference_size(&f, &m), 8);
        assert_eq!(actual_size(&f, &m), 16);

        let slots = field_layout(&f, &m);
        assert_eq!(slots[1].offset, 8);
        assert_eq!(slots[1].size, 1);
        assert_eq!(tail_padding(&f, &m), 7);
    }

    #[test]
    fn test_zero_size_only_is_not_bumped() {
        let m = MachineModel::AMD64;
        let f = fields(&[
            ("a", TypeKind::structure(vec![])),
            ("b", TypeKind::array(TypeKind::Int64, 0)),
        ]);
        assert_eq!(actual_size(&f, &m), 0);
    }

    #[test]
    fn test_leading_zero_size_field_is_free() {
        let m = MachineModel::AMD64;
        let f = fields(&[
            ("_", TypeKind::array(TypeKind::Int64, 0)),
            ("a", TypeKind::Int32),
        ]);
        assert_eq!(actual_size(&f, &m), 8);
        assert_eq!(reference_size(&f, &m), 4);
    }

    #[test]
    fn test_32bit_model() {
        let m = MachineModel::I386;
        let f = fields(&[("a", TypeKind::Bool), ("b", TypeKind::Int64)]);
        assert_eq!(actual_size(&f, &m), 12);
        assert_eq!(reference_size(&f, &m), 9);
    }

    #[test]
    fn test_slot_accounting_adds_up() {
        let m = MachineModel::AMD64;
        let f = fields(&[
            ("a", TypeKind::Bool),
            ("s", TypeKind::String),
            ("b", TypeKind::Int16),
            ("c", TypeKind::array(TypeKind::UInt8, 3)),
            ("d", TypeKind::Float64),
            ("e", TypeKind::Bool),
        ]);
        let slots = field_layout(&f, &m);
        let padding: u64 = slots.iter().map(|s| s.padding_before).sum();
        let used: u64 = slots.iter().map(|s| s.size).sum();
        assert_eq!(padding + used + tail_padding(&f, &m), actual_size(&f, &m));
    }

    #[test]
    fn test_checked_size_matches_layout() {
        let m = MachineModel::AMD64;
        let f = fields(&[
            ("a", TypeKind::Int32),
            ("b", TypeKind::Int64),
            ("c", TypeKind::Int32),
            ("z", TypeKind::structure(vec![])),
        ]);
        assert_eq!(checked_actual_size(&f, &m), Some(actual_size(&f, &m)));
        assert_eq!(checked_actual_size(&[], &m), Some(0));
    }

    #[test]
    fn test_huge_fields_do_not_overflow() {
        let m = MachineModel::AMD64;
        let huge = TypeKind::array(TypeKind::Int64, 1 << 62);
        let f = fields(&[("a", TypeKind::Bool), ("b", huge.clone()), ("c", huge)]);

        assert_eq!(checked_actual_size(&f, &m), None);
        assert_eq!(reference_size(&f, &m), u64::MAX);
        let slots = field_layout(&f, &m);
        assert_eq!(slots[1].padding_before, 7);
        assert_eq!(slots[2].offset, u64::MAX - 7);
        assert_eq!(tail_padding(&f, &m), 0);
    }
}
