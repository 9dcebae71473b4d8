use super::{Bundle, DataStore};
use crate::error::{Result, StateError};
use crate::model::{BlockRecord, BlockUpdate};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory storage for testing and development.
/// Does NOT persist data.
pub struct InMemoryStore {
    root: PathBuf,
    blocks: HashMap<PathBuf, BlockRecord>,
    token: Option<String>,
    bundles: HashMap<Bundle, String>,
    default_config: Option<Value>,
    thumbnail: Option<Vec<u8>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/block"),
            blocks: HashMap::new(),
            token: None,
            bundles: HashMap::new(),
            default_config: None,
            thumbnail: None,
        }
    }

    fn key(&self, dir: &Path) -> PathBuf {
        if dir.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(dir)
        }
    }

    pub fn set_bundle(&mut self, bundle: Bundle, content: impl Into<String>) {
        self.bundles.insert(bundle, content.into());
    }

    pub fn set_default_config(&mut self, config: Value) {
        self.default_config = Some(config);
    }

    pub fn set_thumbnail(&mut self, bytes: Vec<u8>) {
        self.thumbnail = Some(bytes);
    }
}

impl DataStore for InMemoryStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn has_block(&self) -> bool {
        self.blocks.contains_key(&self.root)
    }

    fn read_block(&self) -> Result<BlockRecord> {
        self.blocks
            .get(&self.root)
            .cloned()
            .ok_or_else(|| StateError::NotABlockDirectory.into())
    }

    fn write_block(&mut self, update: &BlockUpdate) -> Result<BlockRecord> {
        let record = self.read_block()?.merged(update);
        self.blocks.insert(self.root.clone(), record.clone());
        Ok(record)
    }

    fn create_block(&mut self, dir: &Path, record: &BlockRecord) -> Result<()> {
        self.blocks.insert(self.key(dir), record.clone());
        Ok(())
    }

    fn read_token(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }

    fn write_token(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn delete_token(&mut self) -> Result<bool> {
        Ok(self.token.take().is_some())
    }

    fn read_bundle(&self, bundle: Bundle) -> Result<Option<String>> {
        Ok(self.bundles.get(&bundle).cloned())
    }

    fn read_default_config(&self) -> Result<Value> {
        Ok(self
            .default_config
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default())))
    }

    fn read_thumbnail(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.thumbnail.clone())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use std::path::Path;

    pub const TOKEN: &str = "test-token";
    pub const BLOCK_ID: &str = "block-123";

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn logged_in(mut self) -> Self {
            self.store.write_token(TOKEN).unwrap();
            self
        }

        /// A freshly scaffolded, never published block.
        pub fn scaffolded(mut self, name: &str) -> Self {
            let record = BlockRecord::scaffolded(
                crate::formatting::format_name(name),
                crate::formatting::to_pascal_case(name),
            );
            self.store.create_block(Path::new(""), &record).unwrap();
            self
        }

        /// A block published at `version`.
        pub fn published(mut self, name: &str, version: u32) -> Self {
            self = self.scaffolded(name);
            self.store
                .write_block(&BlockUpdate {
                    id: Some(BLOCK_ID.into()),
                    published: Some(true),
                    active_version: Some(version),
                    category: Some("Layout".into()),
                    ..BlockUpdate::default()
                })
                .unwrap();
            self
        }

        pub fn built(mut self) -> Self {
            self.store.set_bundle(Bundle::Minified, "block()");
            self.store
                .set_bundle(Bundle::Unminified, "function block() {}");
            self
        }

        pub fn with_record(mut self, update: &BlockUpdate) -> Self {
            self.store.write_block(update).unwrap();
            self
        }
    }
}
