use crate::commands::{lifecycle_message, CmdResult};
use crate::error::Result;
use crate::model::BlockUpdate;
use crate::registry::{Registry, ReleasePayload};
use crate::store::DataStore;
use crate::validation::{ensure_block_directory, ensure_logged_in, ensure_published};

/// Push the staged content of the active version to production.
///
/// Releasing an already released version just sends the note again.
pub fn run<S: DataStore, R: Registry>(
    store: &mut S,
    registry: &R,
    note: Option<&str>,
) -> Result<CmdResult> {
    let token = ensure_logged_in(store)?;
    let record = ensure_block_directory(store)?;
    let id = ensure_published(&record)?;

    let payload = ReleasePayload {
        note: note.unwrap_or_default().to_string(),
        version: record.active_version(),
    };
    registry.release_block(&token, &id, &payload)?;

    let record = store.write_block(&BlockUpdate {
        is_released: Some(true),
        ..BlockUpdate::default()
    })?;

    let mut result = CmdResult::default();
    result.add_message(lifecycle_message("Released", &record, "for production"));
    Ok(result.with_record(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::mock::{Call, Endpoint, MockRegistry};
    use crate::store::memory::fixtures::{StoreFixture, BLOCK_ID};

    #[test]
    fn test_release_marks_version_live() {
        let mut store = StoreFixture::new().logged_in().published("hero", 2).store;
        let registry = MockRegistry::new();

        let result = run(&mut store, &registry, Some("Fixes the footer")).unwrap();

        assert!(store.read_block().unwrap().is_released);
        assert_eq!(
            registry.calls(),
            vec![Call::Release(
                BLOCK_ID.into(),
                ReleasePayload {
                    note: "Fixes the footer".into(),
                    version: 2,
                }
            )]
        );
        assert_eq!(
            result.messages[0].content,
            "Released Hero v2 for production\nID block-123"
        );
    }

    #[test]
    fn test_missing_version_releases_v1() {
        let mut store = StoreFixture::new()
            .logged_in()
            .published("hero", 0)
            .store;
        let registry = MockRegistry::new();

        run(&mut store, &registry, None).unwrap();

        match &registry.calls()[0] {
            Call::Release(_, payload) => {
                assert_eq!(payload.version, 1);
                assert!(payload.note.is_empty());
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[test]
    fn test_releasing_twice_resends_note() {
        let mut store = StoreFixture::new().logged_in().published("hero", 3).store;
        let registry = MockRegistry::new();

        run(&mut store, &registry, Some("First")).unwrap();
        let before = store.read_block().unwrap();
        let result = run(&mut store, &registry, Some("Second")).unwrap();

        let after = store.read_block().unwrap();
        assert!(after.is_released);
        assert_eq!(after, before);
        assert_eq!(result.record, Some(after));
        assert_eq!(registry.count(Endpoint::Release), 2);
        assert_eq!(
            registry.calls()[1],
            Call::Release(
                BLOCK_ID.into(),
                ReleasePayload {
                    note: "Second".into(),
                    version: 3,
                }
            )
        );
    }

    #[test]
    fn test_failed_release_keeps_staging_state() {
        let mut store = StoreFixture::new().logged_in().published("hero", 1).store;
        let registry = MockRegistry::new();
        registry.fail(Endpoint::Release, 500);

        assert!(run(&mut store, &registry, None).is_err());
        assert!(!store.read_block().unwrap().is_released);
    }
}
