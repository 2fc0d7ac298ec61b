//! Dana semantic checker
//!
//! Reads a parsed program (JSON form of the AST) and reports the first
//! semantic error, if any.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use danac::feedback::CheckReport;
use danac::frontend::ast::Stmt;
use danac::stdlib::BuiltinRegistry;
use danac::Checker;

/// Dana semantic checker
#[derive(Parser, Debug)]
#[command(name = "danac")]
#[command(version = "0.1.0")]
#[command(about = "Dana semantic checker - name resolution, scoping and type checking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a parsed program
    Check {
        /// JSON-encoded top-level declaration list
        input: PathBuf,

        /// Print a structured JSON report
        #[arg(long)]
        json: bool,
    },
    /// List the built-in function signatures
    Builtins {
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let outcome = match &cli.command {
        Commands::Check { input, json } => check_file(input, *json),
        Commands::Builtins { json } => list_builtins(*json).map(|()| true),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}

/// Returns whether the program passed
fn check_file(input: &Path, json: bool) -> Result<bool> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let program: Vec<Stmt> = serde_json::from_str(&source)
        .with_context(|| format!("decoding AST from {}", input.display()))?;
    info!("loaded {} top-level declarations from {}", program.len(), input.display());

    let result = Checker::new()?.check_program(&program);

    if json {
        let file = input.to_string_lossy();
        println!("{}", CheckReport::from_result(&result, Some(&*file)).to_json());
    } else {
        match &result {
            Ok(()) => println!("{}: semantic check passed", input.display()),
            Err(e) => eprintln!("{}:{}: semantic error: {}", input.display(), e.line(), e),
        }
    }

    Ok(result.is_ok())
}

fn list_builtins(json: bool) -> Result<()> {
    let registry = BuiltinRegistry::new();
    if json {
        let funcs: Vec<_> = registry.all().collect();
        println!("{}", serde_json::to_string_pretty(&funcs)?);
    } else {
        for func in registry.all() {
            println!("{}", func.header());
        }
    }
    Ok(())
}
