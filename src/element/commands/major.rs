//! `element publish -m`: start a new major version of a published block.
//!
//! The attempted version is written to the settings record before the upload and
//! restored if anything fails. On success the registry decides the final number:
//! the record takes the highest major version the registry reports as active, which
//! can be ahead of the local increment when someone else bumped the block too.

use crate::commands::{build_bundle, lifecycle_message, CmdMessage, CmdResult};
use crate::config::ElementConfig;
use crate::error::{ElementError, Result, ValidationError};
use crate::model::{BlockRecord, BlockUpdate};
use crate::registry::{MajorVersionAck, MajorVersionPayload, Registry};
use crate::store::{Bundle, DataStore};
use crate::toolchain::Toolchain;
use crate::validation::{ensure_block_directory, ensure_logged_in, ensure_published};
use std::path::Path;
use tracing::warn;

/// Git branch holding the sources of a major version.
pub fn branch_name(version: u32) -> String {
    format!("v{}", version)
}

pub fn run<S: DataStore, R: Registry, T: Toolchain>(
    store: &mut S,
    registry: &R,
    toolchain: &T,
    config: &ElementConfig,
) -> Result<CmdResult> {
    let token = ensure_logged_in(store)?;
    let record = ensure_block_directory(store)?;
    let id = ensure_published(&record)?;

    let previous = record.active_version();
    let next = previous
        .checked_add(1)
        .ok_or(ValidationError::VersionOverflow(previous))?;
    let in_repository = toolchain.is_repository(store.root());
    if in_repository && toolchain.branch_exists(store.root(), &branch_name(next))? {
        return Err(ElementError::VersionBranchConflict(branch_name(next)));
    }

    store.write_block(&BlockUpdate {
        active_version: Some(next),
        ..BlockUpdate::default()
    })?;

    let ack = match submit(store, registry, toolchain, config, &token, &id) {
        Ok(ack) => ack,
        Err(e) => {
            restore(store, &record);
            return Err(e);
        }
    };

    let active = ack.max_reported().unwrap_or(next).max(previous);
    let record = store.write_block(&BlockUpdate {
        active_version: Some(active),
        is_released: Some(false),
        ..BlockUpdate::default()
    })?;

    let mut result = CmdResult::default();
    result.add_message(lifecycle_message("Published", &record, "for staging"));
    if in_repository {
        create_version_branch(store, toolchain, active, &mut result);
    }
    Ok(result.with_record(record))
}

fn submit<S: DataStore, R: Registry, T: Toolchain>(
    store: &S,
    registry: &R,
    toolchain: &T,
    config: &ElementConfig,
    token: &str,
    id: &str,
) -> Result<MajorVersionAck> {
    let content = build_bundle(store, toolchain, config, Bundle::Minified)?;
    let payload = MajorVersionPayload {
        content,
        default_config: store.read_default_config()?,
    };
    registry.create_major_version(token, id, &payload)
}

/// Rewrite the record as it was read before the bump.
fn restore<S: DataStore>(store: &mut S, before: &BlockRecord) {
    if let Err(e) = store.create_block(Path::new(""), before) {
        warn!(
            "Could not restore activeVersion {} after a failed major version: {}",
            before.active_version(),
            e
        );
    }
}

/// Branch failures are reported but don't undo a bump the registry already accepted.
fn create_version_branch<S: DataStore, T: Toolchain>(
    store: &S,
    toolchain: &T,
    version: u32,
    result: &mut CmdResult,
) {
    let branch = branch_name(version);
    let outcome = match toolchain.branch_exists(store.root(), &branch) {
        Ok(true) => Err(ElementError::VersionBranchConflict(branch.clone())),
        Ok(false) => {
            toolchain.create_branch(store.root(), &branch, &format!("init {}", branch))
        }
        Err(e) => Err(e),
    };
    match outcome {
        Ok(()) => result.add_message(CmdMessage::info(format!(
            "Switched to a new branch {}",
            branch
        ))),
        Err(e) => result.add_message(CmdMessage::warning(format!(
            "Could not create branch {}: {}",
            branch, e
        ))),
    }
}
