//! nopad - reports Go structs whose layout contains padding
//!
//! Usage: nopad [OPTIONS] [PATTERNS]...

use std::env;
use std::process;

use anyhow::Context;
use clap::{Parser as ClapParser, ValueEnum};
use codespan_reporting::term::termcolor::ColorChoice;
use nopad::common::LintError;
use nopad::driver::{LintConfig, OutputFormat, Pipeline};
use nopad::frontend::FrontendConfig;
use nopad_layout::MachineModel;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum Format {
    /// Diagnostics on stderr
    #[default]
    Text,
    /// JSON array on stdout
    Json,
}

/// When to use colors
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(ClapParser, Debug)]
#[command(name = "nopad")]
#[command(version)]
#[command(about = "Reports Go structs that the compiler pads between or after fields", long_about = None)]
struct Args {
    /// Files, directories, or `dir/...` trees to check (default: current directory)
    patterns: Vec<String>,

    /// Target architecture (default: $GOARCH, else amd64)
    #[arg(long, value_name = "GOARCH")]
    arch: Option<String>,

    /// Override the pointer width of the target, in bytes
    #[arg(long, value_name = "BYTES")]
    word_size: Option<u64>,

    /// Override the maximum alignment of the target, in bytes
    #[arg(long, value_name = "BYTES")]
    max_align: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Suggest a field order with less padding
    #[arg(long)]
    suggest: bool,

    /// Colored diagnostics
    #[arg(long, value_enum, default_value = "auto")]
    color: Color,

    /// Verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn machine_model(args: &Args) -> Result<MachineModel, LintError> {
    let arch = args
        .arch
        .clone()
        .or_else(|| env::var("GOARCH").ok().filter(|a| !a.is_empty()))
        .unwrap_or_else(|| "amd64".to_string());

    let base = MachineModel::for_arch(&arch).ok_or_else(|| LintError::UnknownArch {
        known: MachineModel::known_archs().collect::<Vec<_>>().join(", "),
        arch,
    })?;

    Ok(MachineModel::new(
        args.word_size.unwrap_or(base.word_size()),
        args.max_align.unwrap_or(base.max_align()),
    )?)
}

fn run(args: &Args) -> anyhow::Result<i32> {
    let model = machine_model(args).context("invalid target")?;
    log::debug!("target: {}", model);

    let config = LintConfig {
        model,
        suggest: args.suggest,
        format: match args.format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        },
        color: match args.color {
            Color::Auto => ColorChoice::Auto,
            Color::Always => ColorChoice::Always,
            Color::Never => ColorChoice::Never,
        },
        frontend: FrontendConfig {
            dump_tokens: args.dump_tokens,
            dump_ast: args.dump_ast,
        },
    };

    let outcome = Pipeline::new(config).run(&args.patterns)?;
    Ok(outcome.exit_code())
}
