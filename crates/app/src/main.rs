//! Saldo CLI - bank statement categorization
//!
//! Usage:
//!   saldo ingest FILE [--debits OUT] [--credits OUT] [--all OUT] [--json]
//!   saldo report FILE
//!   saldo categories list
//!   saldo categories add NAME [KEYWORD...]

mod cli;
mod commands;
mod config;
mod session;

use anyhow::Result;
use clap::Parser;
use saldo_import::ReadOptions;
use saldo_storage::CategoryStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{CategoriesAction, Cli, Commands};
use commands::ExportTargets;
use config::Config;
use session::Session;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // RUST_LOG wins over the config file
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();

    let categories_path = cli
        .categories
        .clone()
        .unwrap_or_else(|| config.categories_path.clone());
    tracing::debug!(path = %categories_path.display(), "category store");

    let read_options = ReadOptions {
        csv_delimiter: config.delimiter()?,
    };
    let mut session = Session::open(CategoryStore::new(categories_path), read_options);

    match cli.command {
        Commands::Ingest {
            file,
            debits,
            credits,
            all,
            json,
        } => commands::cmd_ingest(
            &session,
            &file,
            ExportTargets {
                debits: debits.as_deref(),
                credits: credits.as_deref(),
                all: all.as_deref(),
            },
            json,
        ),
        Commands::Report { file } => commands::cmd_report(&session, &file, config.weekly_window),
        Commands::Categories { action } => match action {
            CategoriesAction::List => commands::cmd_categories_list(&session),
            CategoriesAction::Add { name, keywords } => {
                commands::cmd_categories_add(&mut session, &name, &keywords)
            }
        },
    }
}
