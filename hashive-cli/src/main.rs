//! Hashive CLI - command-line tool for Hashive databases
//!
//! This binary provides command-line interfaces for:
//! - pack: ingest one JSON document into a database file
//! - query: resolve a path and print the value as JSON
//! - dump: materialize the whole database as JSON

use clap::{Parser, Subcommand};
use hashive_io::{write_file_json, Hashive, Value};
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hashive")]
#[command(about = "Single-file read-only hierarchical key/value store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a JSON document into a Hashive database
    Pack {
        /// Input JSON file
        input: PathBuf,
        /// Output database file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Resolve a path and print the value as JSON
    Query {
        /// Database file
        db: PathBuf,
        /// Path elements: object keys or array indices
        path: Vec<String>,
        /// Read buffer size in bytes (0 disables buffering)
        #[arg(long)]
        buffer_size: Option<usize>,
    },
    /// Print the whole database as JSON
    Dump {
        /// Database file
        db: PathBuf,
    },
}

fn print_value(value: &Value) -> Result<(), Box<dyn Error>> {
    let rendered = serde_json::Value::from(value);
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack { input, output } => {
            let json = File::open(&input)?;
            write_file_json(&output, json)?;
            eprintln!("packed {} -> {}", input.display(), output.display());
        }
        Commands::Query {
            db,
            path,
            buffer_size,
        } => {
            let mut h = Hashive::open(&db, buffer_size)?;
            let elements: Vec<&str> = path.iter().map(String::as_str).collect();
            let value = h.query(&elements)?;
            print_value(&value)?;
        }
        Commands::Dump { db } => {
            let mut h = Hashive::open(&db, None)?;
            let value = h.query(&[])?;
            print_value(&value)?;
        }
    }

    Ok(())
}
