//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Credence CLI - Score claims against a network of responders.
#[derive(Debug, Parser)]
#[command(name = "credence")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CREDENCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Dispatch mode, overriding the configuration file
    #[arg(short, long, value_enum, global = true, env = "CREDENCE_DISPATCH_MODE")]
    pub mode: Option<ModeArg>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// Pretty-printed JSON
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one claim
    Analyze(AnalyzeArgs),

    /// Show dispatcher health
    Health(HealthArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Claim text, or a URL with `--kind url`
    pub claim: String,

    /// Kind of claim
    #[arg(short, long, value_enum, default_value = "text")]
    pub kind: KindArg,

    /// Responders to request
    #[arg(short = 'n', long)]
    pub min_responders: Option<u32>,

    /// Dispatch deadline in milliseconds
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,
}

/// Arguments for the health command.
#[derive(Debug, Parser)]
pub struct HealthArgs {
    /// Query the responder network before reporting
    #[arg(short, long)]
    pub probe: bool,
}

/// Claim kind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    /// Free-text statement
    Text,
    /// Link to an article
    Url,
}

/// Dispatch mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    /// Query the responder network
    Live,
    /// Generate responses locally
    Simulated,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<KindArg> for credence_domain::ClaimKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Text => credence_domain::ClaimKind::Text,
            KindArg::Url => credence_domain::ClaimKind::Reference,
        }
    }
}

impl From<ModeArg> for credence_dispatch::DispatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Live => credence_dispatch::DispatchMode::Live,
            ModeArg::Simulated => credence_dispatch::DispatchMode::Simulated,
        }
    }
}
