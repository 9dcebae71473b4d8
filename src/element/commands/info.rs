use crate::commands::CmdResult;
use crate::error::Result;
use crate::formatting::sort_versions;
use crate::registry::Registry;
use crate::store::DataStore;
use crate::validation::{ensure_block_directory, ensure_logged_in, ensure_published};

/// Fetch the registry's view of the current block, newest versions first.
pub fn run<S: DataStore, R: Registry>(
    store: &S,
    registry: &R,
    version: Option<u32>,
) -> Result<CmdResult> {
    let token = ensure_logged_in(store)?;
    let record = ensure_block_directory(store)?;
    let id = ensure_published(&record)?;

    let mut details = registry.get_block(&token, &id, version)?;
    details.versions = sort_versions(std::mem::take(&mut details.versions));

    Ok(CmdResult::default()
        .with_record(record)
        .with_details(details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::mock::{Call, MockRegistry};
    use crate::registry::{BlockDetails, VersionInfo};
    use crate::store::memory::fixtures::{StoreFixture, BLOCK_ID};
    use chrono::{TimeZone, Utc};

    fn version(v: u32, day: u32) -> VersionInfo {
        VersionInfo {
            version: v,
            created_on: Some(Utc.with_ymd_and_hms(2019, 3, day, 12, 0, 0).unwrap()),
            ..VersionInfo::default()
        }
    }

    #[test]
    fn test_versions_are_sorted_newest_first() {
        let store = StoreFixture::new().logged_in().published("hero", 2).store;
        let registry = MockRegistry::new().with_details(BlockDetails {
            versions: vec![version(1, 1), version(2, 3), version(1, 5)],
            ..BlockDetails::default()
        });

        let result = run(&store, &registry, None).unwrap();
        let details = result.details.unwrap();

        assert_eq!(details.id, BLOCK_ID);
        let order: Vec<(u32, u32)> = details
            .versions
            .iter()
            .map(|v| (v.version, chrono::Datelike::day(&v.created_on.unwrap())))
            .collect();
        assert_eq!(order, vec![(2, 3), (1, 5), (1, 1)]);
    }

    #[test]
    fn test_passes_requested_version() {
        let store = StoreFixture::new().logged_in().published("hero", 2).store;
        let registry = MockRegistry::new();

        run(&store, &registry, Some(1)).unwrap();

        assert_eq!(registry.calls(), vec![Call::Get(BLOCK_ID.into(), Some(1))]);
    }

    #[test]
    fn test_unpublished_block_has_no_info() {
        let store = StoreFixture::new().logged_in().scaffolded("hero").store;
        let registry = MockRegistry::new();

        assert!(run(&store, &registry, None).is_err());
        assert!(registry.calls().is_empty());
    }
}
