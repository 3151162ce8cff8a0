//! Padding analysis
//!
//! Finds every struct type of a package, resolves its fields and asks the
//! layout engine whether the compiler will pad it.

mod padding;
mod sites;

pub use padding::{Analysis, PaddingAnalyzer, Report, Suggestion};
pub use sites::{StructSite, collect_sites};
