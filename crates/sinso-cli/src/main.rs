mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sinso",
    version,
    about = "Income-tax filing notice extractor and progressive tax calculator"
)]
struct Cli {
    /// Log every field miss and probe outcome (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a filing notice (PDF or JSON page dump) into structured records
    Parse {
        /// Path to PDF or JSON page dump
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Compute the progressive income tax of a filing notice step by step
    Calculate {
        /// Path to PDF or JSON page dump
        input_file: PathBuf,

        /// Predefined bracket table (default: 2024)
        #[arg(short, long, value_name = "YEAR", conflicts_with = "table")]
        preset: Option<String>,

        /// Custom JSON bracket table
        #[arg(short, long, value_name = "FILE")]
        table: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Derive the template risk narrative of a filing notice
    Analyze {
        /// Path to PDF or JSON page dump
        input_file: PathBuf,

        /// Predefined bracket table (default: 2024)
        #[arg(short, long, value_name = "YEAR", conflicts_with = "table")]
        preset: Option<String>,

        /// Custom JSON bracket table
        #[arg(short, long, value_name = "FILE")]
        table: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate bracket tables
    Brackets {
        #[command(subcommand)]
        action: BracketsAction,
    },
}

#[derive(Subcommand)]
enum BracketsAction {
    /// List predefined bracket tables
    List,
    /// Print a bracket table with a worked example per bracket
    Explain {
        /// Preset name (e.g., "2024")
        preset: String,
    },
    /// Validate a custom bracket table file
    Validate {
        /// Path to JSON bracket table
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let result = match cli.command {
        Commands::Parse {
            input_file,
            output,
            out,
        } => commands::parse::run(input_file, &output, out),
        Commands::Calculate {
            input_file,
            preset,
            table,
            output,
        } => commands::calculate::run(input_file, preset, table, &output),
        Commands::Analyze {
            input_file,
            preset,
            table,
            output,
        } => commands::analyze::run(input_file, preset, table, &output),
        Commands::Brackets { action } => match action {
            BracketsAction::List => commands::brackets::list(),
            BracketsAction::Explain { preset } => commands::brackets::explain(&preset),
            BracketsAction::Validate { file } => commands::brackets::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
