//! Semantic analysis module
//!
//! Builds the package scope and resolves Go types to the layout engine's
//! type descriptions.

mod consts;
mod resolver;
mod scope;
mod stdlib;

pub use consts::ConstEvaluator;
pub use resolver::{ResolveError, Resolver};
pub use scope::{ConstSymbol, PackageScope, TypeSymbol};
pub use stdlib::{package_const, package_type, predeclared};
