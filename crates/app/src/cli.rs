use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Saldo - bank statement categorization and spending reports
#[derive(Parser, Debug)]
#[command(name = "saldo")]
#[command(about = "Ingest bank statements, categorize transactions and report spending", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Category file, overriding the config's categories_path
    #[arg(long, global = true)]
    pub categories: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a statement and print counts, diagnostics and category totals
    Ingest {
        /// Statement file (.xlsx, .xls, .ods or .csv)
        file: PathBuf,

        /// Write debit rows to this CSV file
        #[arg(long)]
        debits: Option<PathBuf>,

        /// Write credit rows to this CSV file
        #[arg(long)]
        credits: Option<PathBuf>,

        /// Write every row to this CSV file
        #[arg(long)]
        all: Option<PathBuf>,

        /// Print the full outcome as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Print spending analytics for a statement
    Report {
        /// Statement file (.xlsx, .xls, .ods or .csv)
        file: PathBuf,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoriesAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoriesAction {
    /// List categories with their keyword counts
    List,

    /// Add a category with optional keywords
    Add {
        /// Category name
        name: String,

        /// Exact descriptions that belong to this category
        keywords: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ingest_with_exports() {
        let cli = Cli::try_parse_from([
            "saldo", "ingest", "jan.xlsx", "--debits", "out.csv", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Ingest {
                file,
                debits,
                credits,
                all,
                json,
            } => {
                assert_eq!(file, PathBuf::from("jan.xlsx"));
                assert_eq!(debits, Some(PathBuf::from("out.csv")));
                assert!(credits.is_none());
                assert!(all.is_none());
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_categories_add_with_global_flag() {
        let cli = Cli::try_parse_from([
            "saldo",
            "categories",
            "add",
            "Subscriptions",
            "NETFLIX",
            "SPOTIFY",
            "--categories",
            "cats.json",
        ])
        .unwrap();
        assert_eq!(cli.categories, Some(PathBuf::from("cats.json")));
        match cli.command {
            Commands::Categories {
                action: CategoriesAction::Add { name, keywords },
            } => {
                assert_eq!(name, "Subscriptions");
                assert_eq!(keywords, vec!["NETFLIX", "SPOTIFY"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn report_requires_a_file() {
        assert!(Cli::try_parse_from(["saldo", "report"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
