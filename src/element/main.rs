//! # Element CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, and this file only
//! invokes `cli::run()` and handles process termination. Everything from the API
//! inward is in the library; see its crate docs for the layering.

use colored::Colorize;

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e.to_string().red());
        std::process::exit(1);
    }
}
