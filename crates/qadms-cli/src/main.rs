//! QADMS CLI: the `qadms` command.

mod cli;
mod commands;
mod config;
mod logging;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let config = config::load_or_exit(cli.config.as_deref());
    logging::init(config.log_filter.as_deref());

    match cli.command {
        Commands::Normalize { payload, json } => commands::normalize::run(payload, json),

        Commands::Rules {
            payload,
            rules,
            json,
        } => commands::rules::run(payload, rules, json),

        Commands::Audit {
            source_id,
            payload,
            json,
        } => commands::audit::run(source_id, payload, json),

        Commands::Import {
            source_id,
            payload,
            store,
            source_type,
            input_format,
            json,
        } => commands::import::run(commands::import::Args {
            source_id,
            payload,
            store: store.unwrap_or(config.store_path.clone()),
            source_type: source_type.unwrap_or(config.source_type.clone()),
            input_format: input_format.unwrap_or(config.input_format.clone()),
            json,
        }),

        Commands::Versions {
            source_id,
            store,
            json,
        } => commands::versions::run(source_id, store.unwrap_or(config.store_path), json),
    }
}
