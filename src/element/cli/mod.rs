//! # CLI Layer
//!
//! One possible UI client for element, and the only place that knows about
//! terminal I/O, prompts and exit codes.
//!
//! ## Confirmations
//!
//! `release`, `rollback` and `publish -m` affect stores that already use the block,
//! so they ask first, naming the block and its current version. `-s/--silent`
//! skips the question. Answering no exits with status 1.
//!
//! ## Module Structure
//!
//! - `commands`: context setup and per-command handlers
//! - `prompt`: line-based questions on stdin
//! - `render`: messages, category lists and block details
//! - `setup`: argument parsing via clap

mod commands;
mod prompt;
mod render;
pub mod setup;

pub use commands::run;
