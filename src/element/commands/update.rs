use crate::commands::{build_bundle, lifecycle_message, metadata_for, thumbnail_payload, CmdResult};
use crate::config::ElementConfig;
use crate::error::Result;
use crate::model::BlockUpdate;
use crate::registry::{BlockPayload, Registry};
use crate::store::{Bundle, DataStore};
use crate::toolchain::Toolchain;
use crate::validation::{
    ensure_block_directory, ensure_logged_in, ensure_published, resolve_integration,
    validate_cache_duration, validate_category,
};

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub toggle_public: bool,
    /// Send the unminified bundle, for debugging.
    pub unminified: bool,
    pub category: Option<String>,
    pub integration: Option<String>,
    pub cache_duration: Option<String>,
}

/// Replace the staged content of the active version.
pub fn run<S: DataStore, R: Registry, T: Toolchain>(
    store: &mut S,
    registry: &R,
    toolchain: &T,
    config: &ElementConfig,
    options: &UpdateOptions,
) -> Result<CmdResult> {
    let token = ensure_logged_in(store)?;
    let record = ensure_block_directory(store)?;
    let id = ensure_published(&record)?;

    let is_public = if options.toggle_public {
        !record.is_public
    } else {
        record.is_public
    };

    let category = match options.category.as_deref() {
        Some(requested) if !same_category(record.category.as_deref(), requested) => {
            Some(validate_category(requested, &registry.categories(&token)?)?)
        }
        _ => record.category.clone(),
    };
    let integration_id = match options.integration.as_deref() {
        Some(name) => Some(resolve_integration(name)?),
        None => record.integration_id,
    };
    let cache_duration = match options.cache_duration.as_deref() {
        Some(input) => Some(validate_cache_duration(input)?),
        None => record.output_cache_duration,
    };

    let bundle = Bundle::for_flag(options.unminified);
    let content = build_bundle(store, toolchain, config, bundle)?;
    let default_config = store.read_default_config()?;
    let mut result = CmdResult::default();
    let thumbnail = thumbnail_payload(store, &mut result)?;

    let payload = BlockPayload {
        content,
        default_config,
        id: None,
        integration_id,
        metadata: metadata_for(&record, category.clone(), is_public, thumbnail),
        output_cache_duration: cache_duration,
        version: Some(record.active_version()),
    };
    registry.update_block(&token, &id, &payload)?;

    let record = store.write_block(&BlockUpdate {
        category,
        integration_id,
        is_public: Some(is_public),
        is_released: Some(false),
        output_cache_duration: cache_duration,
        ..BlockUpdate::default()
    })?;

    result.add_message(lifecycle_message("Updated", &record, "for staging"));
    Ok(result.with_record(record))
}

fn same_category(stored: Option<&str>, requested: &str) -> bool {
    stored.is_some_and(|s| s.eq_ignore_ascii_case(requested.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ElementError, StateError, ValidationError};
    use crate::registry::mock::{Call, Endpoint, MockRegistry};
    use crate::store::memory::fixtures::{StoreFixture, BLOCK_ID};
    use crate::toolchain::fake::FakeToolchain;

    fn sent_payload(registry: &MockRegistry) -> BlockPayload {
        registry
            .calls()
            .into_iter()
            .find_map(|c| match c {
                Call::Update(_, p) => Some(p),
                _ => None,
            })
            .unwrap()
    }

    fn published() -> StoreFixture {
        StoreFixture::new().logged_in().published("hero", 3).built()
    }

    #[test]
    fn test_toggle_public_keeps_version() {
        let mut store = published().store;
        let registry = MockRegistry::new();
        let options = UpdateOptions {
            toggle_public: true,
            ..UpdateOptions::default()
        };

        let result = run(
            &mut store,
            &registry,
            &FakeToolchain::new(),
            &ElementConfig::default(),
            &options,
        )
        .unwrap();

        let record = store.read_block().unwrap();
        assert!(record.is_public);
        assert_eq!(record.active_version, Some(3));
        assert_eq!(record.id.as_deref(), Some(BLOCK_ID));
        assert_eq!(
            result.messages.last().unwrap().content,
            "Updated Hero v3 for staging\nID block-123"
        );

        let payload = sent_payload(&registry);
        assert!(payload.metadata.is_public);
        assert_eq!(payload.version, Some(3));
        assert_eq!(payload.content, "block()");
        // Same category, no need to ask the registry.
        assert!(!registry.calls().contains(&Call::Categories));
    }

    #[test]
    fn test_unminified_bundle() {
        let mut store = published().store;
        let registry = MockRegistry::new();
        let options = UpdateOptions {
            unminified: true,
            ..UpdateOptions::default()
        };

        run(
            &mut store,
            &registry,
            &FakeToolchain::new(),
            &ElementConfig::default(),
            &options,
        )
        .unwrap();

        assert_eq!(sent_payload(&registry).content, "function block() {}");
        assert!(!store.read_block().unwrap().is_public);
    }

    #[test]
    fn test_changed_category_is_revalidated() {
        let mut store = published().store;
        let registry = MockRegistry::new();
        let options = UpdateOptions {
            category: Some("gadgets".into()),
            ..UpdateOptions::default()
        };

        let err = run(
            &mut store,
            &registry,
            &FakeToolchain::new(),
            &ElementConfig::default(),
            &options,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ElementError::Validation(ValidationError::InvalidCategory { .. })
        ));
        assert_eq!(registry.count(Endpoint::Update), 0);
        assert_eq!(store.read_block().unwrap().category.as_deref(), Some("Layout"));
    }

    #[test]
    fn test_new_category_integration_and_cache() {
        let mut store = published().store;
        let registry = MockRegistry::new();
        let options = UpdateOptions {
            category: Some("widgets".into()),
            integration: Some("element".into()),
            cache_duration: Some("0".into()),
            ..UpdateOptions::default()
        };

        run(
            &mut store,
            &registry,
            &FakeToolchain::new(),
            &ElementConfig::default(),
            &options,
        )
        .unwrap();

        let record = store.read_block().unwrap();
        assert_eq!(record.category.as_deref(), Some("Widgets"));
        assert_eq!(record.integration_id, Some(1));
        assert_eq!(record.output_cache_duration, Some(0));
        assert_eq!(sent_payload(&registry).output_cache_duration, Some(0));
    }

    #[test]
    fn test_failed_update_leaves_record_unchanged() {
        let mut store = published().store;
        let before = store.read_block().unwrap();
        let registry = MockRegistry::new();
        registry.fail(Endpoint::Update, 502);
        let options = UpdateOptions {
            toggle_public: true,
            ..UpdateOptions::default()
        };

        assert!(run(
            &mut store,
            &registry,
            &FakeToolchain::new(),
            &ElementConfig::default(),
            &options,
        )
        .is_err());
        assert_eq!(store.read_block().unwrap(), before);
    }

    #[test]
    fn test_requires_published_block() {
        let mut store = StoreFixture::new().logged_in().scaffolded("hero").built().store;
        let err = run(
            &mut store,
            &MockRegistry::new(),
            &FakeToolchain::new(),
            &ElementConfig::default(),
            &UpdateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ElementError::State(StateError::NotPublished)));
    }
}
