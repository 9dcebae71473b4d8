//! # Element Architecture
//!
//! Element manages the lifecycle of a **block**, a packaged UI component, against a
//! remote block registry: scaffolding, publishing to staging, updating, releasing,
//! rolling back and starting new major versions.
//!
//! It is a library that happens to have a CLI client. The lifecycle rules live in
//! the library and never assume a terminal.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, prints, sets exit codes       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Guards, registry calls, settings record transitions      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┼────────────────┐
//!              ▼               ▼                ▼
//!         store/          registry/        toolchain.rs
//!   settings + token    HTTP registry     build tool + git
//! ```
//!
//! ## The Settings Record
//!
//! Each block directory holds a `.element-block` file ([`model::BlockRecord`]). It is
//! this machine's cache of what the registry holds for the block:
//!
//! - `id` is present exactly when the block has been published.
//! - `activeVersion` starts at 1 and never decreases. Every reader goes through
//!   [`model::BlockRecord::active_version`], which treats a missing or zero value as 1.
//! - `isPublic` only changes through `update --toggle-public`.
//! - `isReleased` is true when the registry serves released content for the active
//!   version with nothing pending in staging. Publishing, updating and new major
//!   versions clear it, `release` sets it and `rollback` flips it.
//!
//! Commands write the record only after the registry accepted the request, so a
//! failed command leaves it as it was. The one exception is a new major version,
//! which stores the attempted version up front and restores it on failure.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): unit tests against [`store::memory::InMemoryStore`],
//!    the mock registry and the fake toolchain. Most tests live here.
//! 2. **API** (`api.rs`): dispatch and an end-to-end lifecycle over the same fakes.
//! 3. **CLI** (`tests/`): the binary driven with `assert_cmd` in temp directories.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each command
//! - [`store`]: Settings record, credential token and build outputs
//! - [`registry`]: Registry client and wire types
//! - [`toolchain`]: Build tool and git processes
//! - [`validation`]: Guards run before lifecycle commands
//! - [`model`]: `BlockRecord`, `BlockUpdate`, integrations
//! - [`config`]: Endpoints, build command and runtime flags
//! - [`formatting`], [`images`]: Name casing, version sorting, thumbnails
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatting;
pub mod images;
pub mod model;
pub mod registry;
pub mod store;
pub mod toolchain;
pub mod validation;
