use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use plankit::{DeclarationPolicy, Dialect};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plansum")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Append a validated change summary to Terraform plan job logs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, env = "PLANSUM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the log followed by its synthesized summary
    Annotate(AnnotateArgs),

    /// Show the plan summary without the log
    Summary(SummaryArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Shared
// ============================================================================

#[derive(Args)]
pub struct ClassifyArgs {
    /// Marker set to classify lines with
    #[arg(long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// What to do when the log declares totals more than once
    #[arg(long, value_enum)]
    pub duplicate_declaration: Option<PolicyArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DialectArg {
    Auto,
    Markup,
    Plain,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Auto => Dialect::Auto,
            DialectArg::Markup => Dialect::Markup,
            DialectArg::Plain => Dialect::Plain,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Last,
    First,
    Reject,
}

impl From<PolicyArg> for DeclarationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Last => DeclarationPolicy::Last,
            PolicyArg::First => DeclarationPolicy::First,
            PolicyArg::Reject => DeclarationPolicy::Reject,
        }
    }
}

// ============================================================================
// Annotate
// ============================================================================

#[derive(Parser)]
pub struct AnnotateArgs {
    /// Job log to annotate
    pub log: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Milliseconds between readiness checks
    #[arg(long, env = "PLANSUM_INTERVAL_MS")]
    pub interval_ms: Option<u64>,

    /// Maximum number of readiness checks
    #[arg(long, env = "PLANSUM_MAX_RETRY")]
    pub max_retry: Option<u32>,

    /// Text that marks the log as complete
    #[arg(long)]
    pub ready_marker: Option<String>,

    /// Summarize immediately without waiting for the log
    #[arg(long)]
    pub no_wait: bool,

    #[command(flatten)]
    pub classify: ClassifyArgs,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Numbered, colored terminal text
    Text,
    /// Job log line elements
    Markup,
}

// ============================================================================
// Summary
// ============================================================================

#[derive(Parser)]
pub struct SummaryArgs {
    /// Job log to summarize
    pub log: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub classify: ClassifyArgs,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the config file location
    Path,
}
