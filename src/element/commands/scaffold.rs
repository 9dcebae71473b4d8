//! `element new <name>`: start a block from the boilerplate repository.
//!
//! A partially created directory is left in place when a step fails.

use crate::commands::{CmdMessage, CmdResult};
use crate::config::ElementConfig;
use crate::error::{Result, StateError, ValidationError};
use crate::formatting::{format_name, to_pascal_case};
use crate::model::BlockRecord;
use crate::store::DataStore;
use crate::toolchain::Toolchain;
use std::fs;
use std::path::Path;

/// Placeholder component name used throughout the boilerplate.
pub const TEMPLATE_NAME: &str = "HelloWorldBlock";

/// Starter files that do not belong in a new block.
const STARTER_EXTRAS: &[&str] = &["CODE_OF_CONDUCT.md", "LICENSE", "docs", ".git"];

/// Files that mention the placeholder component name.
const NAMED_FILES: &[&str] = &["local/index.html", "rollup.config.js"];

pub fn run<S: DataStore, T: Toolchain>(
    store: &mut S,
    toolchain: &T,
    config: &ElementConfig,
    name: &str,
) -> Result<CmdResult> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingName.into());
    }

    let target = store.root().join(name);
    if target.exists() {
        return Err(StateError::BlockExists(name.into()).into());
    }
    if store.has_block() {
        return Err(StateError::NestedBlock.into());
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Cloning boilerplate for {}...",
        name
    )));
    toolchain.clone_repo(&config.boilerplate_url, &target)?;
    result.add_message(CmdMessage::info(format!(
        "Saved boilerplate to ./{}; now updating...",
        name
    )));

    for extra in STARTER_EXTRAS {
        if let Err(e) = remove_path(&target.join(extra)) {
            result.add_message(CmdMessage::warning(format!(
                "Problem removing {}/{}: {}",
                name, extra, e
            )));
        }
    }

    let component = to_pascal_case(name);
    let mut updated = Vec::new();
    for file in NAMED_FILES {
        if rename_component(&target.join(file), &component)? {
            updated.push(format!("{}/{}", name, file));
        }
    }

    let record = BlockRecord::scaffolded(format_name(name), component);
    store.create_block(Path::new(name), &record)?;

    result.add_message(CmdMessage::success(format!(
        "Updated files {}!",
        updated.join(", ")
    )));
    Ok(result.with_record(record))
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else if path.exists() {
        fs::remove_file(path)
    } else {
        Ok(())
    }
}

/// Replace the placeholder in `path`; returns whether the file changed.
fn rename_component(path: &Path, component: &str) -> Result<bool> {
    let content = fs::read_to_string(path)?;
    if !content.contains(TEMPLATE_NAME) {
        return Ok(false);
    }
    fs::write(path, content.replace(TEMPLATE_NAME, component))?;
    Ok(true)
}
