use crate::commands::CmdResult;
use crate::error::Result;
use crate::registry::Registry;
use crate::store::DataStore;
use crate::validation::ensure_logged_in;

pub fn run<S: DataStore, R: Registry>(store: &S, registry: &R) -> Result<CmdResult> {
    let token = ensure_logged_in(store)?;
    let categories = registry.categories(&token)?;
    Ok(CmdResult::default().with_categories(categories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ElementError, StateError};
    use crate::registry::mock::MockRegistry;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn test_lists_registry_categories() {
        let store = StoreFixture::new().logged_in().store;
        let result = run(&store, &MockRegistry::new()).unwrap();
        assert_eq!(result.categories, vec!["Layout", "Widgets"]);
    }

    #[test]
    fn test_requires_login() {
        let store = StoreFixture::new().store;
        let registry = MockRegistry::new();
        assert!(matches!(
            run(&store, &registry),
            Err(ElementError::State(StateError::NotLoggedIn))
        ));
        assert!(registry.calls().is_empty());
    }
}
