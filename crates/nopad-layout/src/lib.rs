//! # nopad-layout - struct padding detection engine
//!
//! Given an ordered list of fields and a target [`MachineModel`], computes
//! the padded size a compiler's sequential layout produces and compares it
//! with the raw sum of the field sizes. A struct is flagged when the two
//! differ.
//!
//! ```
//! use nopad_layout::{evaluate_struct, Field, Finding, MachineModel, TypeKind};
//!
//! let fields = vec![
//!     Field::new("ok", TypeKind::Bool),
//!     Field::new("count", TypeKind::Int64),
//! ];
//!
//! let finding = evaluate_struct(&fields, &MachineModel::AMD64);
//! assert_eq!(finding, Some(Finding { actual_size: 16, reference_size: 9 }));
//! ```
//!
//! ## Modules
//!
//! - [`kind`] - resolved type descriptions
//! - [`machine`] - word size and alignment ceiling of a target
//! - [`sizes`] - size, alignment and pointer-prefix rules
//! - [`layout`] - sequential field placement
//! - [`finding`] - the padding verdict
//! - [`order`] - advisory field reordering
//!
//! Everything here is pure: no I/O, no shared state, safe to call from any
//! number of threads at once.

pub mod finding;
pub mod kind;
pub mod layout;
pub mod machine;
pub mod order;
pub mod sizes;

pub use finding::{Finding, evaluate_struct};
pub use kind::{Field, TypeKind};
pub use layout::{FieldSlot, actual_size, checked_actual_size, field_layout, reference_size, tail_padding};
pub use machine::{MachineModel, ModelError};
pub use order::{suggested_order, suggested_size};
