//! Lint driver and pipeline orchestration
//!
//! discover files -> read -> parse -> group into packages -> analyze each
//! package in parallel -> report

mod discover;
mod report;

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use codespan_reporting::term::termcolor::ColorChoice;
use log::debug;
use nopad_layout::MachineModel;
use rayon::prelude::*;

use crate::analysis::{Analysis, PaddingAnalyzer, Report};
use crate::common::{DiagnosticReporter, LintError, LintResult};
use crate::frontend::go::SourceFile;
use crate::frontend::{FrontendConfig, GoFrontend};

pub use discover::discover;
pub use report::{JsonFinding, json_findings, reporter_for, to_json};

/// How findings are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Diagnostics on stderr
    #[default]
    Text,
    /// A JSON array on stdout
    Json,
}

/// Configuration of a lint run
#[derive(Debug, Clone)]
pub struct LintConfig {
    pub model: MachineModel,
    pub suggest: bool,
    pub format: OutputFormat,
    pub color: ColorChoice,
    pub frontend: FrontendConfig,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            model: MachineModel::default(),
            suggest: false,
            format: OutputFormat::Text,
            color: ColorChoice::Auto,
            frontend: FrontendConfig::default(),
        }
    }
}

/// A source file that was read successfully
#[derive(Debug, Clone)]
pub struct SourceText {
    pub path: PathBuf,
    pub source: String,
}

/// Everything a run found, before printing
#[derive(Debug, Default)]
pub struct LintRun {
    /// Files in path order; report and error file indices point in here
    pub files: Vec<SourceText>,
    pub reports: Vec<Report>,
    pub errors: Vec<(Option<usize>, LintError)>,
}

impl LintRun {
    pub fn outcome(&self) -> Outcome {
        Outcome {
            findings: self.reports.len(),
            errors: self.errors.len(),
            fatal: self.errors.iter().any(|(_, e)| e.is_fatal()),
        }
    }
}

/// Summary of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub findings: usize,
    pub errors: usize,
    pub fatal: bool,
}

impl Outcome {
    /// 1 when some input could not be read, 3 when structs were reported, 0 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.fatal {
            1
        } else if self.findings > 0 {
            3
        } else {
            0
        }
    }
}

/// Lint pipeline that coordinates the frontend and the analyzer
pub struct Pipeline {
    config: LintConfig,
    frontend: GoFrontend,
}

impl Pipeline {
    pub fn new(config: LintConfig) -> Self {
        Self {
            config,
            frontend: GoFrontend::new(),
        }
    }

    /// Lint the packages matched by `patterns` and print the results
    pub fn run(&self, patterns: &[String]) -> LintResult<Outcome> {
        let run = self.lint(patterns)?;

        let reporter = reporter_for(&run, DiagnosticReporter::with_color(self.config.color));
        report::emit_errors(&run, &reporter);

        match self.config.format {
            OutputFormat::Text => report::emit_text(&run, &reporter),
            OutputFormat::Json => {
                let json = to_json(&json_findings(&run, &reporter))?;
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", json)?;
            }
        }

        let outcome = run.outcome();
        debug!(
            "{} findings, {} errors in {} files",
            outcome.findings,
            outcome.errors,
            run.files.len()
        );
        Ok(outcome)
    }

    /// Lint the packages matched by `patterns` without printing anything.
    ///
    /// An empty pattern list means the current directory. Fails only when
    /// a pattern names a missing path or nothing matched; unreadable files
    /// and source errors are collected in the returned run.
    pub fn lint(&self, patterns: &[String]) -> LintResult<LintRun> {
        let default = [".".to_string()];
        let patterns = if patterns.is_empty() { &default[..] } else { patterns };

        let paths = discover(patterns, self.frontend.extensions())?;
        if paths.is_empty() {
            return Err(LintError::NoFiles {
                patterns: patterns.join(" "),
            });
        }

        let mut run = LintRun::default();

        // Phase 1: reading
        let texts: Vec<LintResult<SourceText>> = paths
            .par_iter()
            .map(|path| {
                fs::read_to_string(path)
                    .map(|source| SourceText {
                        path: path.clone(),
                        source,
                    })
                    .map_err(|e| LintError::read(path, e))
            })
            .collect();
        for text in texts {
            match text {
                Ok(text) => run.files.push(text),
                Err(e) => run.errors.push((None, e)),
            }
        }

        // Phase 2: parsing
        let parsed: Vec<LintResult<SourceFile>> = run
            .files
            .par_iter()
            .map(|file| {
                let name = file.path.display().to_string();
                self.frontend.parse(&file.source, &name, &self.config.frontend)
            })
            .collect();

        // Phase 3: packages are the files of one directory sharing a package clause
        let mut packages: BTreeMap<(&Path, String), Vec<(usize, SourceFile)>> = BTreeMap::new();
        for (id, result) in parsed.into_iter().enumerate() {
            match result {
                Ok(file) => {
                    let dir = run.files[id].path.parent().unwrap_or(Path::new(""));
                    packages.entry((dir, file.package.clone())).or_default().push((id, file));
                }
                Err(e) => run.errors.push((Some(id), e)),
            }
        }
        debug!("{} files in {} packages", run.files.len(), packages.len());

        // Phase 4: analysis
        let analyzer = PaddingAnalyzer::new(self.config.model, self.config.suggest);
        let results: Vec<(Vec<usize>, Analysis)> = packages
            .into_values()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|package| {
                let (ids, files): (Vec<usize>, Vec<SourceFile>) = package.into_iter().unzip();
                let analysis = analyzer.analyze(&files);
                (ids, analysis)
            })
            .collect();

        let mut reports = Vec::new();
        for (ids, analysis) in results {
            for mut report in analysis.reports {
                report.file = ids[report.file];
                reports.push(report);
            }
            for (file, error) in analysis.errors {
                run.errors.push((Some(ids[file]), error));
            }
        }

        reports.sort_by_key(|r| (r.file, r.span.start));
        reports.dedup_by(|a, b| a.file == b.file && a.span == b.span && a.message() == b.message());
        run.reports = reports;

        run.errors.sort_by_key(|(file, e)| (*file, e.span().map(|s| s.start)));
        Ok(run)
    }
}
