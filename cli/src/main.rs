use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;
use xidlgen::{compile_schema_to_typescript, describe_to_json, summarize_to_json};
use xidlgen_compiler::{CompilerOptions, XidlError};

#[derive(Parser)]
#[command(name = "xidlgen")]
#[command(about = "Generate TypeScript SOAP clients from XIDL schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a TypeScript client module from an `.xidl` schema
    GenTs {
        /// Input `.xidl` schema file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.ts` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with compiler options
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Parse and verify a schema, printing a JSON summary to stdout
    Check {
        /// Input `.xidl` schema file
        #[arg(short, long)]
        input: PathBuf,

        /// JSON file with compiler options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the whole interface model instead of a summary
        #[arg(long)]
        model: bool,
    },
}

fn load_options(config: Option<&Path>) -> Result<CompilerOptions, XidlError> {
    match config {
        Some(path) => CompilerOptions::load(path),
        None => Ok(CompilerOptions::default()),
    }
}

fn main() -> Result<(), XidlError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::GenTs { input, output, config } => {
            let options = load_options(config.as_deref())?;
            let text = fs::read_to_string(input)?;
            // Nothing is written unless the whole compile succeeded.
            let ts_code = compile_schema_to_typescript(&text, &options)?;
            if let Some(out_path) = output {
                fs::write(out_path, &ts_code)?;
                info!(input = %input.display(), output = %out_path.display(), "wrote TypeScript client");
            } else {
                print!("{}", ts_code);
            }
            Ok(())
        }

        Commands::Check { input, config, model } => {
            let options = load_options(config.as_deref())?;
            let text = fs::read_to_string(input)?;
            let json = if *model {
                describe_to_json(&text, &options)?
            } else {
                summarize_to_json(&text, &options)?
            };
            println!("{}", json);
            Ok(())
        }
    }
}
