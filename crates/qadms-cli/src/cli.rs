use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "qadms",
    about = "QADMS: design-token normalization and deterministic design-system rule audits",
    version
)]
pub struct Cli {
    /// Path to a TOML config file (default: ./qadms.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a token export into the canonical model
    Normalize {
        /// Path to the export JSON (`-` for stdin)
        payload: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run rule evaluators over a token export
    Rules {
        /// Path to the export JSON (`-` for stdin)
        payload: String,

        /// Rule id to run (repeatable; default: all rules)
        #[arg(long = "rule")]
        rules: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run every rule and print the aggregated, sorted audit report
    Audit {
        /// Source identifier the audit is reported against
        source_id: String,

        /// Path to the export JSON (`-` for stdin)
        payload: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalize an export and record it as a new token version
    Import {
        /// Source identifier to import into
        source_id: String,

        /// Path to the export JSON (`-` for stdin)
        payload: String,

        /// Path to the token version store (JSONL)
        #[arg(long)]
        store: Option<String>,

        /// Source type recorded when the source is first seen
        #[arg(long)]
        source_type: Option<String>,

        /// Input format recorded on the version
        #[arg(long)]
        input_format: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored token versions for a source
    Versions {
        /// Source identifier
        source_id: String,

        /// Path to the token version store (JSONL)
        #[arg(long)]
        store: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
