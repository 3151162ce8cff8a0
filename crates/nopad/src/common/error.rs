//! Error types and diagnostic reporting

use std::path::PathBuf;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use nopad_layout::ModelError;
use thiserror::Error;

use super::Span;
use crate::analysis::Report;

/// Lint error with source location where one exists
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("Semantic error at {span:?}: {message}")]
    Semantic { message: String, span: Span },

    #[error("Type error at {span:?}: {message}")]
    Type { message: String, span: Span },

    #[error("unknown architecture '{arch}' (known: {known})")]
    UnknownArch { arch: String, known: String },

    #[error("invalid machine model: {0}")]
    Model(#[from] ModelError),

    #[error("no Go files matched {patterns}")]
    NoFiles { patterns: String },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot encode JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LintError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn semantic(message: impl Into<String>, span: Span) -> Self {
        Self::Semantic {
            message: message.into(),
            span,
        }
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::Type {
            message: message.into(),
            span,
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Source location of the error, if it has one
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. }
            | Self::Parser { span, .. }
            | Self::Semantic { span, .. }
            | Self::Type { span, .. } => Some(*span),
            _ => None,
        }
    }

    /// Errors that stop the run from being trusted, as opposed to source
    /// problems that only affect the file they occur in
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownArch { .. }
                | Self::Model(_)
                | Self::NoFiles { .. }
                | Self::Read { .. }
                | Self::Json(_)
                | Self::Io(_)
        )
    }
}

pub type LintResult<T> = Result<T, LintError>;

/// Diagnostic reporter for pretty terminal output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(color: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(color),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// 1-based line and column of a byte offset
    pub fn location(&self, file_id: usize, offset: usize) -> Option<(usize, usize)> {
        self.files
            .location(file_id, offset)
            .ok()
            .map(|loc| (loc.line_number, loc.column_number))
    }

    pub fn report_error(&self, file_id: usize, error: &LintError) {
        let diagnostic = match error {
            LintError::Lexer { message, span } => Diagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![Label::primary(file_id, *span).with_message(message)]),

            LintError::Parser { message, span } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![Label::primary(file_id, *span).with_message(message)]),

            LintError::Semantic { message, span } => Diagnostic::error()
                .with_message("Semantic error")
                .with_labels(vec![Label::primary(file_id, *span).with_message(message)]),

            LintError::Type { message, span } => Diagnostic::error()
                .with_message("Type error")
                .with_labels(vec![Label::primary(file_id, *span).with_message(message)]),

            other => Diagnostic::error().with_message(other.to_string()),
        };

        self.emit(&diagnostic);
    }

    /// Report an error that is not tied to any source file
    pub fn report_plain(&self, error: &LintError) {
        self.emit(&Diagnostic::error().with_message(error.to_string()));
    }

    /// Report a padded struct as a warning on its `struct` keyword
    pub fn report_finding(&self, file_id: usize, report: &Report) {
        let label = match &report.struct_name {
            Some(name) => format!("struct `{name}` is padded"),
            None => "anonymous struct is padded".to_string(),
        };

        let mut notes = report.padding_notes();
        if let Some(suggestion) = &report.suggestion {
            notes.push(format!(
                "ordering fields as [{}] gives {} bytes",
                suggestion.order.join(", "),
                suggestion.size
            ));
        }

        let diagnostic = Diagnostic::warning()
            .with_message(report.message())
            .with_labels(vec![Label::primary(file_id, report.span).with_message(label)])
            .with_notes(notes);

        self.emit(&diagnostic);
    }

    fn emit(&self, diagnostic: &Diagnostic<usize>) {
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
