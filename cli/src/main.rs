use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use brine_sdp::{decode_message_to_json, JsonError};
use brine_sdp_compiler::{compile_schema, generate, parse, to_runtime_schema, BackendKind, SdpError};

#[derive(Parser)]
#[command(name = "bsdp")]
#[command(about = "Check schemas, generate Rust code, or decode framed SDP messages", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a `.sdp` schema, printing every diagnostic
    Check {
        /// Input `.sdp` file
        schema: PathBuf,
    },

    /// Print the parsed schema as JSON (no validation)
    Ast {
        /// Input `.sdp` file
        schema: PathBuf,
    },

    /// Generate Rust code from a `.sdp` schema
    Gen {
        /// Input `.sdp` file
        schema: PathBuf,

        /// Output `.rs` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a framed message to JSON (printed to stdout)
    Decode {
        /// Schema the message was encoded with
        schema: PathBuf,

        /// File holding one framed message
        message: PathBuf,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Check { .. } => "check",
            Commands::Ast { .. } => "ast",
            Commands::Gen { .. } => "gen",
            Commands::Decode { .. } => "decode",
        }
    }

    fn schema(&self) -> &Path {
        match self {
            Commands::Check { schema }
            | Commands::Ast { schema }
            | Commands::Gen { schema, .. }
            | Commands::Decode { schema, .. } => schema,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Sdp(#[from] SdpError),

    #[error(transparent)]
    Decode(#[from] JsonError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn read_schema(path: &Path) -> Result<String, CliError> {
    Ok(fs::read_to_string(path).map_err(SdpError::Io)?)
}

fn run(command: &Commands) -> Result<(), CliError> {
    tracing::info!(command = command.name(), schema = %command.schema().display(), "running");
    match command {
        Commands::Check { schema } => {
            let parsed = compile_schema(&read_schema(schema)?)?;
            println!("{}: ok ({} structs)", schema.display(), parsed.structs.len());
            Ok(())
        }

        Commands::Ast { schema } => {
            let parsed = parse(&read_schema(schema)?)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }

        Commands::Gen { schema, output } => {
            let parsed = compile_schema(&read_schema(schema)?)?;
            let files = generate(&parsed, BackendKind::Rust)?;
            for file in files {
                if let Some(out_path) = output {
                    fs::write(out_path, &file.contents).map_err(SdpError::Io)?;
                    tracing::debug!(path = %out_path.display(), bytes = file.contents.len(), "wrote generated file");
                    println!("Generated {} → {}", schema.display(), out_path.display());
                } else {
                    print!("{}", file.contents);
                }
            }
            Ok(())
        }

        Commands::Decode { schema, message } => {
            let parsed = compile_schema(&read_schema(schema)?)?;
            let runtime = to_runtime_schema(&parsed)?;
            let bytes = fs::read(message).map_err(SdpError::Io)?;
            tracing::debug!(path = %message.display(), bytes = bytes.len(), "read message");
            println!("{}", decode_message_to_json(&runtime, &bytes)?);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
