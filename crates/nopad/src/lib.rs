//! nopad - padding detection for Go structs
//!
//! Reads Go packages, resolves every struct type to a layout description and
//! reports the structs whose compiled size exceeds the sum of their field
//! sizes on the chosen target.
//!
//! ## Architecture
//!
//! - **Frontend** (`frontend/`): Go lexing, parsing and type resolution
//! - **Analysis** (`analysis/`): struct discovery and the padding check
//! - **Driver** (`driver/`): file discovery, parallel package runs, output
//! - **Common** (`common/`): errors, spans, diagnostics
//!
//! The layout rules themselves live in the `nopad_layout` crate.

pub mod analysis;
pub mod common;
pub mod driver;
pub mod frontend;

// Re-exports for convenience
pub use analysis::{PaddingAnalyzer, Report};
pub use common::{DiagnosticReporter, LintError, LintResult, Span};
pub use driver::{LintConfig, Outcome, OutputFormat, Pipeline};
pub use frontend::{FrontendConfig, GoFrontend};
