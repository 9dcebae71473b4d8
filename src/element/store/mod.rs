//! # Storage Layer
//!
//! Everything the tool reads from or writes to disk goes through the [`DataStore`]
//! trait: the block settings record, the credential token, and the read-only build
//! outputs that publish and update upload.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage rooted at the block directory
//!   - Settings record in `.element-block` (pretty JSON)
//!   - Credential token in `~/.volusionrc`
//!   - Bundles under `dist/`, thumbnail at `thumbnail.png`
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!
//! ## Storage Format
//!
//! ```text
//! my-block/
//! ├── .element-block            # BlockRecord
//! ├── thumbnail.png             # optional, embedded when under 1000 kb
//! └── dist/
//!     ├── component.umd.min.js  # sent by default
//!     ├── component.umd.js      # sent by `update --unminified`
//!     └── defaultConfig.json    # optional
//! ```
//!
//! Writes to the settings record are merges: fields absent from a [`BlockUpdate`]
//! keep their stored values.

use crate::error::Result;
use crate::model::{BlockRecord, BlockUpdate};
use serde_json::Value;
use std::path::Path;

pub mod fs;
pub mod memory;

pub const BLOCK_SETTINGS_FILE: &str = ".element-block";
pub const RC_FILE: &str = ".volusionrc";
pub const THUMBNAIL_PATH: &str = "thumbnail.png";
pub const DEFAULT_CONFIG_PATH: &str = "dist/defaultConfig.json";

/// Which build output to upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bundle {
    Minified,
    Unminified,
}

impl Bundle {
    pub fn for_flag(unminified: bool) -> Self {
        if unminified {
            Bundle::Unminified
        } else {
            Bundle::Minified
        }
    }

    pub fn relative_path(&self) -> &'static str {
        match self {
            Bundle::Minified => "dist/component.umd.min.js",
            Bundle::Unminified => "dist/component.umd.js",
        }
    }
}

/// Abstract interface over the block directory and the user's credential.
pub trait DataStore {
    /// Directory of the block this store operates on.
    fn root(&self) -> &Path;

    /// Whether a settings record exists in the block directory
    fn has_block(&self) -> bool;

    /// Read the settings record. Fails with `NotABlockDirectory` when absent.
    fn read_block(&self) -> Result<BlockRecord>;

    /// Merge `update` onto the stored record, persist it and return the result.
    fn write_block(&mut self, update: &BlockUpdate) -> Result<BlockRecord>;

    /// Write a fresh record into `dir` (relative to the root), replacing any existing one.
    fn create_block(&mut self, dir: &Path, record: &BlockRecord) -> Result<()>;

    fn read_token(&self) -> Result<Option<String>>;

    fn write_token(&mut self, token: &str) -> Result<()>;

    /// Remove the token. Returns false if there was none.
    fn delete_token(&mut self) -> Result<bool>;

    /// Contents of a built bundle, or `None` if it has not been built.
    fn read_bundle(&self, bundle: Bundle) -> Result<Option<String>>;

    /// User-authored default configuration, `{}` when absent.
    fn read_default_config(&self) -> Result<Value>;

    fn read_thumbnail(&self) -> Result<Option<Vec<u8>>>;
}
