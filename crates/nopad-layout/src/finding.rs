//! Padding verdict for a single struct

use crate::kind::Field;
use crate::layout::{actual_size, reference_size};
use crate::machine::MachineModel;

/// A struct whose padded size differs from the sum of its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Finding {
    pub actual_size: u64,
    pub reference_size: u64,
}

impl Finding {
    /// Bytes of padding in the layout
    pub fn padding(&self) -> u64 {
        self.actual_size.saturating_sub(self.reference_size)
    }
}

/// Evaluate one struct: `Some` when its layout contains padding.
///
/// Each call is self-contained; nested struct fields are sized through the
/// same engine but are not reported here.
pub fn evaluate_struct(fields: &[Field], model: &MachineModel) -> Option<Finding> {
    let actual = actual_size(fields, model);
    let reference = reference_size(fields, model);

    if actual == reference {
        return None;
    }

    Some(Finding {
        actual_size: actual,
        reference_size: reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::TypeKind;
    use pretty_assertions::assert_eq;

    fn named(types: Vec<TypeKind>) -> Vec<Field> {
        types
            .into_iter()
            .enumerate()
            .map(|(i, ty)| Field::new(format!("f{i}"), ty))
            .collect()
    }

    #[test]
    fn test_empty_struct_has_no_finding() {
        assert_eq!(evaluate_struct(&[], &MachineModel::AMD64), None);
    }

    #[test]
    fn test_packed_struct_has_no_finding() {
        let f = named(vec![TypeKind::Bool, TypeKind::Bool]);
        assert_eq!(evaluate_struct(&f, &MachineModel::AMD64), None);

        let f = named(vec![TypeKind::Int64, TypeKind::Int32, TypeKind::Int16, TypeKind::Bool, TypeKind::Bool]);
        assert_eq!(evaluate_struct(&f, &MachineModel::AMD64), None);
    }

    #[test]
    fn test_padding_is_reported() {
        let f = named(vec![TypeKind::Bool, TypeKind::Int64]);
        let finding = evaluate_struct(&f, &MachineModel::AMD64).unwrap();
        assert_eq!(finding, Finding { actual_size: 16, reference_size: 9 });
        assert_eq!(finding.padding(), 7);
    }

    #[test]
    fn test_interleaved_padding_is_reported() {
        let f = named(vec![TypeKind::Int32, TypeKind::Int64, TypeKind::Int32]);
        assert_eq!(
            evaluate_struct(&f, &MachineModel::AMD64),
            Some(Finding { actual_size: 24, reference_size: 16 })
        );
    }

    #[test]
    fn test_trailing_zero_size_is_reported() {
        let f = named(vec![TypeKind::Int64, TypeKind::structure(vec![])]);
        assert_eq!(
            evaluate_struct(&f, &MachineModel::AMD64),
            Some(Finding { actual_size: 16, reference_size: 8 })
        );
    }

    #[test]
    fn test_order_changes_actual_but_not_reference() {
        let m = MachineModel::AMD64;
        let orders = [
            vec![TypeKind::Bool, TypeKind::Int64, TypeKind::Bool],
            vec![TypeKind::Int64, TypeKind::Bool, TypeKind::Bool],
            vec![TypeKind::Bool, TypeKind::Bool, TypeKind::Int64],
        ];
        let results: Vec<(u64, u64)> = orders
            .into_iter()
            .map(|types| {
                let f = named(types);
                (actual_size(&f, &m), reference_size(&f, &m))
            })
            .collect();

        assert_eq!(results, vec![(24, 10), (16, 10), (16, 10)]);
    }

    #[test]
    fn test_repeated_evaluation_is_identical() {
        let f = named(vec![
            TypeKind::Bool,
            TypeKind::structure(named(vec![TypeKind::Int16, TypeKind::Pointer])),
            TypeKind::array(TypeKind::Complex128, 2),
        ]);
        let first = evaluate_struct(&f, &MachineModel::AMD64);
        let second = evaluate_struct(&f, &MachineModel::AMD64);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reference_never_exceeds_actual() {
        let samples = vec![
            vec![],
            vec![TypeKind::Bool],
            vec![TypeKind::Int8, TypeKind::Complex128, TypeKind::Int8],
            vec![TypeKind::String, TypeKind::Bool, TypeKind::Slice, TypeKind::Int16],
            vec![TypeKind::array(TypeKind::Int32, 0)],
            vec![TypeKind::Int32, TypeKind::array(TypeKind::Int64, 0)],
            vec![TypeKind::Map, TypeKind::structure(named(vec![TypeKind::Bool, TypeKind::Float64])), TypeKind::Bool],
        ];
        for model in [MachineModel::AMD64, MachineModel::I386, MachineModel::new(4, 8).unwrap()] {
            for types in &samples {
                let f = named(types.clone());
                assert!(reference_size(&f, &model) <= actual_size(&f, &model), "{types:?} on {model}");
            }
        }
    }
}
