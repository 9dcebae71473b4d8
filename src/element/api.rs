//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry
//! point for every element operation, regardless of the UI in front of it.
//!
//! It dispatches to `commands/*.rs`, passes along the runtime configuration, and
//! returns `Result<CmdResult>`. It does no printing and holds no business logic.
//!
//! ## Generic Over Its Collaborators
//!
//! `ElementApi<S, R, T>` is generic over the storage backend, the registry and the
//! toolchain:
//! - Production: `ElementApi<FileStore, HttpRegistry, SystemToolchain>`
//! - Testing: `ElementApi<InMemoryStore, MockRegistry, FakeToolchain>`

use crate::commands::{self, CmdResult};
use crate::config::ElementConfig;
use crate::error::Result;
use crate::model::BlockRecord;
use crate::registry::Registry;
use crate::store::DataStore;
use crate::toolchain::Toolchain;

pub struct ElementApi<S: DataStore, R: Registry, T: Toolchain> {
    store: S,
    registry: R,
    toolchain: T,
    config: ElementConfig,
}

impl<S: DataStore, R: Registry, T: Toolchain> ElementApi<S, R, T> {
    pub fn new(store: S, registry: R, toolchain: T, config: ElementConfig) -> Self {
        Self {
            store,
            registry,
            toolchain,
            config,
        }
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<CmdResult> {
        commands::login::login(&mut self.store, &self.registry, username, password)
    }

    pub fn logout(&mut self) -> Result<CmdResult> {
        commands::login::logout(&mut self.store)
    }

    pub fn new_block(&mut self, name: &str) -> Result<CmdResult> {
        commands::scaffold::run(&mut self.store, &self.toolchain, &self.config, name)
    }

    pub fn categories(&self) -> Result<CmdResult> {
        commands::categories::run(&self.store, &self.registry)
    }

    pub fn info(&self, version: Option<u32>) -> Result<CmdResult> {
        commands::info::run(&self.store, &self.registry, version)
    }

    pub fn publish(&mut self, options: &PublishOptions) -> Result<CmdResult> {
        commands::publish::run(
            &mut self.store,
            &self.registry,
            &self.toolchain,
            &self.config,
            options,
        )
    }

    pub fn new_major_version(&mut self) -> Result<CmdResult> {
        commands::major::run(
            &mut self.store,
            &self.registry,
            &self.toolchain,
            &self.config,
        )
    }

    pub fn update(&mut self, options: &UpdateOptions) -> Result<CmdResult> {
        commands::update::run(
            &mut self.store,
            &self.registry,
            &self.toolchain,
            &self.config,
            options,
        )
    }

    pub fn release(&mut self, note: Option<&str>) -> Result<CmdResult> {
        commands::release::run(&mut self.store, &self.registry, note)
    }

    pub fn rollback(&mut self) -> Result<CmdResult> {
        commands::rollback::run(&mut self.store, &self.registry)
    }

    /// The local settings record, for confirmation prompts.
    pub fn block(&self) -> Result<BlockRecord> {
        crate::validation::ensure_block_directory(&self.store)
    }
}

pub use crate::commands::publish::PublishOptions;
pub use crate::commands::update::UpdateOptions;
pub use commands::{CmdMessage, MessageLevel};
