use super::{Bundle, DataStore, BLOCK_SETTINGS_FILE, DEFAULT_CONFIG_PATH, THUMBNAIL_PATH};
use crate::error::{ElementError, Result, StateError};
use crate::model::{BlockRecord, BlockUpdate};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct FileStore {
    root: PathBuf,
    token_path: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf, token_path: PathBuf) -> Self {
        Self { root, token_path }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(BLOCK_SETTINGS_FILE)
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    fn save_record(path: &Path, record: &BlockRecord) -> Result<()> {
        let content = serde_json::to_string_pretty(record).map_err(ElementError::Serialization)?;
        fs::write(path, content).map_err(ElementError::Io)?;
        Ok(())
    }

    /// Read a file, mapping "not found" to `None`.
    fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ElementError::Io(e)),
        }
    }
}

impl DataStore for FileStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn has_block(&self) -> bool {
        self.settings_path().is_file()
    }

    fn read_block(&self) -> Result<BlockRecord> {
        let content = match fs::read_to_string(self.settings_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StateError::NotABlockDirectory.into())
            }
            Err(e) => return Err(ElementError::Io(e)),
        };
        let record = serde_json::from_str(&content).map_err(ElementError::Serialization)?;
        Ok(record)
    }

    fn write_block(&mut self, update: &BlockUpdate) -> Result<BlockRecord> {
        let record = self.read_block()?.merged(update);
        Self::save_record(&self.settings_path(), &record)?;
        Ok(record)
    }

    fn create_block(&mut self, dir: &Path, record: &BlockRecord) -> Result<()> {
        let dir = self.root.join(dir);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(ElementError::Io)?;
        }
        Self::save_record(&dir.join(BLOCK_SETTINGS_FILE), record)
    }

    fn read_token(&self) -> Result<Option<String>> {
        Ok(Self::read_optional(&self.token_path)?
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
            .filter(|token| !token.is_empty()))
    }

    fn write_token(&mut self, token: &str) -> Result<()> {
        if let Some(parent) = self.token_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(ElementError::Io)?;
            }
        }
        fs::write(&self.token_path, token).map_err(ElementError::Io)?;
        Ok(())
    }

    fn delete_token(&mut self) -> Result<bool> {
        match fs::remove_file(&self.token_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ElementError::Io(e)),
        }
    }

    fn read_bundle(&self, bundle: Bundle) -> Result<Option<String>> {
        Ok(Self::read_optional(&self.root.join(bundle.relative_path()))?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn read_default_config(&self) -> Result<Value> {
        match Self::read_optional(&self.root.join(DEFAULT_CONFIG_PATH))? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes).map_err(ElementError::Serialization)?),
            None => Ok(Value::Object(Default::default())),
        }
    }

    fn read_thumbnail(&self) -> Result<Option<Vec<u8>>> {
        Self::read_optional(&self.root.join(THUMBNAIL_PATH))
    }
}
