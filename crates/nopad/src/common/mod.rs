//! Common infrastructure shared by the front end, analyzer and driver

mod error;
mod span;

pub use error::{DiagnosticReporter, LintError, LintResult};
pub use span::Span;
