use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::BlockUpdate;
use crate::registry::{Registry, RollbackPayload};
use crate::store::DataStore;
use crate::validation::{ensure_block_directory, ensure_logged_in, ensure_published};

/// Undo the latest step of the active version.
///
/// A released version goes back to staging and the previous release is served
/// again; a staged-only version is removed from staging. Either way the version
/// number stays put and only the released flag flips.
pub fn run<S: DataStore, R: Registry>(store: &mut S, registry: &R) -> Result<CmdResult> {
    let token = ensure_logged_in(store)?;
    let record = ensure_block_directory(store)?;
    let id = ensure_published(&record)?;

    let payload = RollbackPayload {
        version: record.active_version(),
    };
    registry.rollback_block(&token, &id, &payload)?;

    let was_released = record.is_released;
    let record = store.write_block(&BlockUpdate {
        is_released: Some(!was_released),
        ..BlockUpdate::default()
    })?;

    let summary = if was_released {
        format!(
            "Rolled back {} v{} to staging",
            record.display_name,
            record.active_version()
        )
    } else {
        format!(
            "Removed {} v{} from staging",
            record.display_name,
            record.active_version()
        )
    };

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("{}\nID {}", summary, id)));
    Ok(result.with_record(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::mock::{Call, Endpoint, MockRegistry};
    use crate::store::memory::fixtures::{StoreFixture, BLOCK_ID};

    #[test]
    fn test_rollback_released_version_to_staging() {
        let mut store = StoreFixture::new()
            .logged_in()
            .published("hero", 2)
            .with_record(&BlockUpdate {
                is_released: Some(true),
                ..BlockUpdate::default()
            })
            .store;
        let registry = MockRegistry::new();

        let result = run(&mut store, &registry).unwrap();

        let record = store.read_block().unwrap();
        assert!(!record.is_released);
        assert_eq!(record.active_version, Some(2));
        assert_eq!(
            result.messages[0].content,
            "Rolled back Hero v2 to staging\nID block-123"
        );
        assert_eq!(
            registry.calls(),
            vec![Call::Rollback(BLOCK_ID.into(), RollbackPayload { version: 2 })]
        );
    }

    #[test]
    fn test_rollback_staged_version_removes_it() {
        let mut store = StoreFixture::new().logged_in().published("hero", 1).store;

        let result = run(&mut store, &MockRegistry::new()).unwrap();

        let record = store.read_block().unwrap();
        assert!(record.is_released);
        assert_eq!(record.active_version, Some(1));
        assert!(result.messages[0]
            .content
            .starts_with("Removed Hero v1 from staging"));
    }

    #[test]
    fn test_failed_rollback_changes_nothing() {
        let mut store = StoreFixture::new().logged_in().published("hero", 1).store;
        let before = store.read_block().unwrap();
        let registry = MockRegistry::new();
        registry.fail(Endpoint::Rollback, 400);

        assert!(run(&mut store, &registry).is_err());
        assert_eq!(store.read_block().unwrap(), before);
    }
}
