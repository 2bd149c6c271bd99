//! Credit Ledger CLI
//!
//! Reads a JSON document describing a credit limit and an ordered event
//! stream, and prints the formatted credit summary.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- events.json
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use credit_ledger::{summarize_json, EngineError, Result};
use std::env;
use std::fs;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(EngineError::MissingArgument);
    }

    let input = fs::read_to_string(&args[1])?;
    let summary = summarize_json(&input)?;
    println!("{}", summary);

    Ok(())
}
