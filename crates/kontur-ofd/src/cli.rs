//! Clap derive structures for the `kontur-ofd` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// kontur-ofd -- fetch fiscal receipts from Kontur OFD
#[derive(Debug, Parser)]
#[command(
    name = "kontur-ofd",
    version,
    about = "Fetch fiscal receipts from the Kontur OFD API",
    long_about = "Authenticates against Kontur OFD, walks every organization and\n\
        cashbox on the account, and prints the fiscal receipts recorded on a date.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "KONTUR_OFD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Profile to use from the config file
    #[arg(long, short = 'p', env = "KONTUR_OFD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Account login (overrides profile)
    #[arg(long, env = "KONTUR_OFD_LOGIN", global = true)]
    pub login: Option<String>,

    /// Account password (overrides profile)
    #[arg(long, env = "KONTUR_OFD_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// OFD API key (overrides profile)
    #[arg(long, env = "KONTUR_OFD_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OFD data API
    #[arg(long, env = "KONTUR_OFD_API_URL", global = true)]
    pub api_url: Option<String>,

    /// URL of the password authentication endpoint
    #[arg(long, env = "KONTUR_OFD_AUTH_URL", global = true)]
    pub auth_url: Option<String>,

    /// Request timeout in seconds (default: no explicit timeout)
    #[arg(long, env = "KONTUR_OFD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "KONTUR_OFD_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch every receipt recorded on a date across all cashboxes
    #[command(alias = "r")]
    Receipts(ReceiptsArgs),

    /// List organizations on the account
    #[command(alias = "orgs")]
    Organizations,

    /// List cashboxes registered to an organization
    #[command(alias = "kkt")]
    Cashboxes(CashboxesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ReceiptsArgs {
    /// Date to fetch, passed to the API unchanged (e.g. 2024-03-01)
    #[arg(long, short = 'd')]
    pub date: String,
}

#[derive(Debug, Args)]
pub struct CashboxesArgs {
    /// Organization id (see `kontur-ofd organizations`)
    #[arg(long)]
    pub org: String,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
