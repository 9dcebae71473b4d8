//! Preconditions checked before any lifecycle command touches the registry.
//!
//! Each guard returns the value it proved to exist (the token, the record, the
//! bundle) so callers don't have to read it twice.

use crate::error::{Result, StateError, ValidationError};
use crate::model::{integration_id, integration_names, BlockRecord};
use crate::store::{Bundle, DataStore};

pub fn ensure_logged_in<S: DataStore>(store: &S) -> Result<String> {
    store
        .read_token()?
        .ok_or_else(|| StateError::NotLoggedIn.into())
}

pub fn ensure_block_directory<S: DataStore>(store: &S) -> Result<BlockRecord> {
    if !store.has_block() {
        return Err(StateError::NotABlockDirectory.into());
    }
    store.read_block()
}

pub fn ensure_not_published(record: &BlockRecord) -> Result<()> {
    if record.is_published() {
        return Err(StateError::AlreadyPublished.into());
    }
    Ok(())
}

/// The registry id of a published block.
pub fn ensure_published(record: &BlockRecord) -> Result<String> {
    match &record.id {
        Some(id) if record.is_published() => Ok(id.clone()),
        _ => Err(StateError::NotPublished.into()),
    }
}

pub fn ensure_built<S: DataStore>(store: &S, bundle: Bundle) -> Result<String> {
    store
        .read_bundle(bundle)?
        .ok_or_else(|| StateError::NotBuilt(store.root().join(bundle.relative_path())).into())
}

/// Match `category` against `valid` ignoring case, returning the registry's spelling.
pub fn validate_category(category: &str, valid: &[String]) -> Result<String> {
    let wanted = category.trim();
    if wanted.is_empty() {
        return Err(ValidationError::MissingCategory.into());
    }
    let wanted_lower = wanted.to_lowercase();
    valid
        .iter()
        .find(|name| name.to_lowercase() == wanted_lower)
        .cloned()
        .ok_or_else(|| {
            ValidationError::InvalidCategory {
                category: wanted.to_string(),
                valid: valid.to_vec(),
            }
            .into()
        })
}

pub fn resolve_integration(name: &str) -> Result<u32> {
    integration_id(name).ok_or_else(|| {
        ValidationError::InvalidIntegration {
            name: name.to_string(),
            valid: integration_names(),
        }
        .into()
    })
}

/// Seconds, as a non-negative whole number.
pub fn validate_cache_duration(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidCacheDuration(input.to_string()).into());
    }
    trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidCacheDuration(input.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ElementError;
    use crate::store::memory::fixtures::{StoreFixture, BLOCK_ID, TOKEN};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn login_requires_a_token() {
        let store = StoreFixture::new().store;
        assert!(matches!(
            ensure_logged_in(&store),
            Err(ElementError::State(StateError::NotLoggedIn))
        ));

        let store = StoreFixture::new().logged_in().store;
        assert_eq!(ensure_logged_in(&store).unwrap(), TOKEN);
    }

    #[test]
    fn block_directory_requires_settings() {
        let store = StoreFixture::new().store;
        assert!(matches!(
            ensure_block_directory(&store),
            Err(ElementError::State(StateError::NotABlockDirectory))
        ));

        let store = StoreFixture::new().scaffolded("my widget").store;
        let record = ensure_block_directory(&store).unwrap();
        assert_eq!(record.published_name, "MyWidget");
    }

    #[test]
    fn published_guards_are_exclusive() {
        let scaffolded = StoreFixture::new().scaffolded("hero").store.read_block().unwrap();
        assert!(ensure_not_published(&scaffolded).is_ok());
        assert!(matches!(
            ensure_published(&scaffolded),
            Err(ElementError::State(StateError::NotPublished))
        ));

        let published = StoreFixture::new()
            .published("hero", 1)
            .store
            .read_block()
            .unwrap();
        assert_eq!(ensure_published(&published).unwrap(), BLOCK_ID);
        assert!(matches!(
            ensure_not_published(&published),
            Err(ElementError::State(StateError::AlreadyPublished))
        ));
    }

    #[test]
    fn built_bundle_must_exist() {
        let store = StoreFixture::new().scaffolded("hero").store;
        match ensure_built(&store, Bundle::Minified) {
            Err(ElementError::State(StateError::NotBuilt(path))) => {
                assert!(path.ends_with("dist/component.umd.min.js"));
            }
            other => panic!("unexpected: {other:?}"),
        }

        let store = StoreFixture::new().scaffolded("hero").built().store;
        assert_eq!(ensure_built(&store, Bundle::Minified).unwrap(), "block()");
    }

    #[test]
    fn category_match_ignores_case() {
        assert_eq!(
            validate_category("Widgets", &names(&["widgets"])).unwrap(),
            "widgets"
        );
    }

    #[test]
    fn unknown_category_lists_valid_names() {
        let err = validate_category("gadgets", &names(&["widgets", "Layout"])).unwrap_err();
        match err {
            ElementError::Validation(ValidationError::InvalidCategory { category, valid }) => {
                assert_eq!(category, "gadgets");
                assert_eq!(valid, names(&["widgets", "Layout"]));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_category_is_missing() {
        assert!(matches!(
            validate_category("  ", &names(&["widgets"])),
            Err(ElementError::Validation(ValidationError::MissingCategory))
        ));
    }

    #[test]
    fn integrations_resolve_from_table() {
        assert_eq!(resolve_integration("ELEMENT").unwrap(), 1);
        assert_eq!(resolve_integration("v1").unwrap(), 2);
        assert!(matches!(
            resolve_integration("shopify"),
            Err(ElementError::Validation(ValidationError::InvalidIntegration { .. }))
        ));
    }

    #[test]
    fn cache_duration_is_a_whole_number() {
        assert_eq!(validate_cache_duration("0").unwrap(), 0);
        assert_eq!(validate_cache_duration(" 3600 ").unwrap(), 3600);
        for bad in ["-1", "1.5", "soon", ""] {
            assert!(
                matches!(
                    validate_cache_duration(bad),
                    Err(ElementError::Validation(ValidationError::InvalidCacheDuration(_)))
                ),
                "{bad} should be rejected"
            );
        }
    }
}
