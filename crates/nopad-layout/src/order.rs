//! Suggested field order
//!
//! A reordering heuristic in the style of the Go vet field-alignment pass.
//! It is advisory only: the padding verdict never depends on it.

use std::cmp::Ordering;

use crate::kind::Field;
use crate::layout::actual_size;
use crate::machine::MachineModel;

struct Key {
    index: usize,
    size: u64,
    align: u64,
    pointer_prefix: u64,
}

fn compare(a: &Key, b: &Key) -> Ordering {
    // Zero-size fields first.
    let zero_a = a.size == 0;
    let zero_b = b.size == 0;
    if zero_a != zero_b {
        return zero_b.cmp(&zero_a);
    }

    // Tighter alignment first.
    if a.align != b.align {
        return b.align.cmp(&a.align);
    }

    // Pointerful before pointer-free.
    let noptr_a = a.pointer_prefix == 0;
    let noptr_b = b.pointer_prefix == 0;
    if noptr_a != noptr_b {
        return noptr_a.cmp(&noptr_b);
    }

    // Between two pointerful fields, fewer trailing scalar bytes first.
    if !noptr_a {
        let trail_a = a.size.saturating_sub(a.pointer_prefix);
        let trail_b = b.size.saturating_sub(b.pointer_prefix);
        if trail_a != trail_b {
            return trail_a.cmp(&trail_b);
        }
    }

    b.size.cmp(&a.size)
}

/// Indices of `fields` in suggested order
pub fn suggested_order(fields: &[Field], model: &MachineModel) -> Vec<usize> {
    let mut keys: Vec<Key> = fields
        .iter()
        .enumerate()
        .map(|(index, f)| Key {
            index,
            size: model.size_of(&f.ty),
            align: model.align_of(&f.ty),
            pointer_prefix: model.pointer_prefix(&f.ty),
        })
        .collect();

    // Stable: ties keep declaration order.
    keys.sort_by(compare);
    keys.into_iter().map(|k| k.index).collect()
}

/// Padded size of the struct with its fields in suggested order
pub fn suggested_size(fields: &[Field], model: &MachineModel) -> u64 {
    let reordered: Vec<Field> = suggested_order(fields, model)
        .into_iter()
        .map(|i| fields[i].clone())
        .collect();
    actual_size(&reordered, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::evaluate_struct;
    use crate::kind::TypeKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sorts_by_alignment() {
        let m = MachineModel::AMD64;
        let f = vec![
            Field::new("a", TypeKind::Bool),
            Field::new("b", TypeKind::Int64),
            Field::new("c", TypeKind::Bool),
        ];
        assert_eq!(suggested_order(&f, &m), vec![1, 0, 2]);
        assert_eq!(suggested_size(&f, &m), 16);
    }

    #[test]
    fn test_zero_size_first_and_pointers_before_scalars() {
        let m = MachineModel::AMD64;
        let f = vec![
            Field::new("n", TypeKind::Int64),
            Field::new("p", TypeKind::Pointer),
            Field::new("z", TypeKind::structure(vec![])),
            Field::new("s", TypeKind::String),
        ];
        // s (16 bytes, 8 trailing) goes after p (8 bytes, 0 trailing).
        assert_eq!(suggested_order(&f, &m), vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        let m = MachineModel::AMD64;
        let f = vec![
            Field::new("x", TypeKind::Int32),
            Field::new("y", TypeKind::Float32),
            Field::new("z", TypeKind::UInt32),
        ];
        assert_eq!(suggested_order(&f, &m), vec![0, 1, 2]);
    }

    #[test]
    fn test_suggestion_does_not_change_verdict() {
        let m = MachineModel::AMD64;
        let f = vec![
            Field::new("a", TypeKind::Bool),
            Field::new("b", TypeKind::Int64),
            Field::new("c", TypeKind::Bool),
        ];
        // Even the best order still leaves tail padding, and the verdict
        // is still measured against the unaligned sum.
        let finding = evaluate_struct(&f, &m).unwrap();
        assert_eq!(finding.actual_size, 24);
        assert_eq!(finding.reference_size, 10);
        assert!(suggested_size(&f, &m) < finding.actual_size);
    }
}
