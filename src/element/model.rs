use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version assumed whenever a record has no usable `activeVersion`.
pub const DEFAULT_VERSION: u32 = 1;

/// Integrations a block can target, mapped to the numeric ids the registry understands.
pub const INTEGRATIONS: &[(&str, u32)] = &[("element", 1), ("v1", 2)];

/// Publication state of one block, persisted as `.element-block` in the block directory.
///
/// This is a local cache of what the registry holds as seen from this machine; it can
/// drift if edited by hand or if a remote call partially fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub published_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<u32>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub published: bool,
    /// Whether the registry serves released content for `active_version`, with
    /// nothing pending in staging.
    #[serde(default)]
    pub is_released: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_cache_duration: Option<u64>,
    // Keys written by other tools or older versions survive a rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockRecord {
    /// Record written when a block is scaffolded: named, never published.
    pub fn scaffolded(display_name: String, published_name: String) -> Self {
        Self {
            display_name,
            published_name,
            active_version: Some(DEFAULT_VERSION),
            ..Self::default()
        }
    }

    /// The current version, falling back to 1 when absent or zero.
    pub fn active_version(&self) -> u32 {
        match self.active_version {
            Some(v) if v > 0 => v,
            _ => DEFAULT_VERSION,
        }
    }

    pub fn is_published(&self) -> bool {
        self.published || self.id.is_some()
    }

    /// Overlay every field set in `update`; everything else is kept.
    pub fn apply(&mut self, update: &BlockUpdate) {
        if let Some(id) = &update.id {
            self.id = Some(id.clone());
        }
        if let Some(name) = &update.display_name {
            self.display_name = name.clone();
        }
        if let Some(name) = &update.published_name {
            self.published_name = name.clone();
        }
        if let Some(category) = &update.category {
            self.category = Some(category.clone());
        }
        if let Some(integration_id) = update.integration_id {
            self.integration_id = Some(integration_id);
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
        if let Some(published) = update.published {
            self.published = published;
        }
        if let Some(is_released) = update.is_released {
            self.is_released = is_released;
        }
        if let Some(version) = update.active_version {
            self.active_version = Some(version);
        }
        if let Some(duration) = update.output_cache_duration {
            self.output_cache_duration = Some(duration);
        }
    }

    pub fn merged(mut self, update: &BlockUpdate) -> Self {
        self.apply(update);
        self
    }
}

/// A partial [`BlockRecord`]: `None` fields leave the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockUpdate {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub published_name: Option<String>,
    pub category: Option<String>,
    pub integration_id: Option<u32>,
    pub is_public: Option<bool>,
    pub published: Option<bool>,
    pub is_released: Option<bool>,
    pub active_version: Option<u32>,
    pub output_cache_duration: Option<u64>,
}

/// Look up an integration id by name, ignoring case.
pub fn integration_id(name: &str) -> Option<u32> {
    let wanted = name.trim().to_lowercase();
    INTEGRATIONS
        .iter()
        .find(|(known, _)| *known == wanted)
        .map(|(_, id)| *id)
}

pub fn integration_names() -> Vec<String> {
    INTEGRATIONS.iter().map(|(name, _)| name.to_string()).collect()
}
