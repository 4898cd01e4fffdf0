//! CLI argument parsing and command definitions.
//!
//! One binary, file-driven: records arrive as a JSON array, specs as a
//! JSON document in the canonical wire shape. Every command prints JSON
//! to stdout so output pipes cleanly into other tools.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "CRIBRA_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter a records file through a spec.
    Filter {
        /// Path to the JSON records file (an array).
        #[arg(short, long)]
        records: String,

        /// Path to the JSON spec file.
        #[arg(short, long)]
        spec: String,
    },

    /// Rank a records file through a spec.
    Rank {
        /// Path to the JSON records file (an array).
        #[arg(short, long)]
        records: String,

        /// Path to the JSON spec file.
        #[arg(short, long)]
        spec: String,

        /// Retain only the k highest-scoring records.
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Page size.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Page start.
        #[arg(short, long)]
        offset: Option<usize>,

        /// Score reducer: sum, min, or max.
        #[arg(long, default_value = "sum")]
        reducer: String,
    },

    /// Explain one record's outcome clause by clause.
    Explain {
        /// Path to the JSON records file (an array).
        #[arg(short, long)]
        records: String,

        /// Path to the JSON spec file.
        #[arg(short, long)]
        spec: String,

        /// Index of the record to explain.
        #[arg(short, long, default_value = "0")]
        index: usize,
    },

    /// Validate a spec file and report structural problems.
    Validate {
        /// Path to the JSON spec file.
        #[arg(short, long)]
        spec: String,
    },

    /// Configuration operations.
    Config(ConfigCommand),

    /// Print version information.
    Version,
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Print the effective configuration as TOML.
    Show,
}

// ============================================================================
// Tests
// ============================================================================
