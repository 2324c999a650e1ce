//! Clap derive structures for the `flowgate` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// flowgate -- grant students access to course servers over an SDN fabric
#[derive(Debug, Parser)]
#[command(
    name = "flowgate",
    version,
    about = "Provision authorized network paths through an SDN controller",
    long_about = "Resolves where a student's host and a course server attach to the\n\
        fabric, asks the controller for the route between them, and installs\n\
        forwarding rules for one service in both directions.",
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
    /// Controller REST URL (overrides config)
    #[arg(long, short = 'c', env = "FLOWGATE_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "FLOWGATE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Catalog YAML file (overrides config)
    #[arg(long, env = "FLOWGATE_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FLOWGATE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FLOWGATE_INSECURE", global = true)]
    pub insecure: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive menu over the catalog and live connections
    Menu,

    /// Inspect a catalog file offline
    #[command(alias = "cat")]
    Catalog(CatalogArgs),

    /// Authorize and provision a connection in one shot
    Connect(ConnectArgs),

    /// Show where a host attaches to the fabric
    Locate {
        /// Host MAC address
        mac: String,
    },

    /// Trace and plan the path between two hosts (installs nothing)
    Path {
        /// Source MAC address
        src: String,
        /// Destination MAC address
        dst: String,
    },

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Catalog ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List courses
    Courses,

    /// List students
    Students,

    /// List servers and their services
    Servers,

    /// Show one course in detail, or the whole catalog
    Show {
        /// Course code
        course: Option<String>,
    },

    /// Check whether a student may reach a service (offline)
    Check(ConnectArgs),
}

// ── Connect ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConnectArgs {
    /// Student code
    pub student: String,

    /// Server name
    pub server: String,

    /// Service name (e.g. ssh)
    pub service: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
