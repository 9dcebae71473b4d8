//! First publish of a block to staging.
//!
//! Nothing is written to the settings record until the registry has acknowledged
//! the create request. A failure anywhere before that point leaves the record
//! exactly as it was, so a local id always refers to a block the registry knows.

use crate::commands::{build_bundle, lifecycle_message, metadata_for, thumbnail_payload, CmdResult};
use crate::config::ElementConfig;
use crate::error::{Result, ValidationError};
use crate::formatting::format_name;
use crate::model::{BlockUpdate, DEFAULT_VERSION};
use crate::registry::{BlockPayload, Registry};
use crate::store::{Bundle, DataStore};
use crate::toolchain::Toolchain;
use crate::validation::{
    ensure_block_directory, ensure_logged_in, ensure_not_published, resolve_integration,
    validate_cache_duration, validate_category,
};

#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Overrides the display name stored at scaffold time.
    pub name: Option<String>,
    pub category: Option<String>,
    pub integration: Option<String>,
    pub cache_duration: Option<String>,
}

pub fn run<S: DataStore, R: Registry, T: Toolchain>(
    store: &mut S,
    registry: &R,
    toolchain: &T,
    config: &ElementConfig,
    options: &PublishOptions,
) -> Result<CmdResult> {
    let token = ensure_logged_in(store)?;
    let mut record = ensure_block_directory(store)?;
    ensure_not_published(&record)?;

    let requested = options
        .category
        .as_deref()
        .ok_or(ValidationError::MissingCategory)?;
    let category = validate_category(requested, &registry.categories(&token)?)?;
    let integration_id = options
        .integration
        .as_deref()
        .map(resolve_integration)
        .transpose()?;
    let cache_duration = options
        .cache_duration
        .as_deref()
        .map(validate_cache_duration)
        .transpose()?;

    // The published name is the bundle's global and stays as scaffolded.
    if let Some(name) = options.name.as_deref().filter(|n| !n.trim().is_empty()) {
        record.display_name = format_name(name);
    }

    let content = build_bundle(store, toolchain, config, Bundle::Minified)?;
    let default_config = store.read_default_config()?;
    let mut result = CmdResult::default();
    let thumbnail = thumbnail_payload(store, &mut result)?;

    let id = registry.allocate_block_id(&token)?;
    let payload = BlockPayload {
        content,
        default_config,
        id: Some(id.clone()),
        integration_id,
        metadata: metadata_for(&record, Some(category.clone()), false, thumbnail),
        output_cache_duration: cache_duration,
        version: None,
    };
    let ack = registry.create_block(&token, &payload)?;

    let record = store.write_block(&BlockUpdate {
        id: Some(ack.id.unwrap_or(id)),
        display_name: Some(record.display_name),
        published_name: Some(record.published_name),
        category: Some(category),
        integration_id,
        is_public: Some(false),
        published: Some(true),
        is_released: Some(false),
        active_version: Some(DEFAULT_VERSION),
        output_cache_duration: cache_duration,
    })?;

    result.add_message(lifecycle_message("Published", &record, "for staging"));
    Ok(result.with_record(record))
}
