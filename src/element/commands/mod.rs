use crate::config::ElementConfig;
use crate::error::Result;
use crate::images::{prepare_thumbnail, Thumbnail, THUMBNAIL_CEILING};
use crate::model::BlockRecord;
use crate::registry::{BlockDetails, BlockMetadata, BlockNames};
use crate::store::{Bundle, DataStore, THUMBNAIL_PATH};
use crate::toolchain::Toolchain;
use crate::validation::ensure_built;
use tracing::debug;

pub mod categories;
pub mod info;
pub mod login;
pub mod major;
pub mod publish;
pub mod release;
pub mod rollback;
pub mod scaffold;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// The settings record after the command ran, when it touched one.
    pub record: Option<BlockRecord>,
    pub categories: Vec<String>,
    pub details: Option<BlockDetails>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_record(mut self, record: BlockRecord) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_details(mut self, details: BlockDetails) -> Self {
        self.details = Some(details);
        self
    }

    #[cfg(test)]
    pub(crate) fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}

/// Run the build (unless skipped) and return the requested bundle.
pub(crate) fn build_bundle<S: DataStore, T: Toolchain>(
    store: &S,
    toolchain: &T,
    config: &ElementConfig,
    bundle: Bundle,
) -> Result<String> {
    if !config.skip_build {
        toolchain.build(store.root(), &config.build_command)?;
    }
    ensure_built(store, bundle)
}

pub(crate) fn metadata_for(
    record: &BlockRecord,
    category: Option<String>,
    is_public: bool,
    thumbnail: String,
) -> BlockMetadata {
    BlockMetadata {
        category,
        is_public,
        names: BlockNames {
            display_name: record.display_name.clone(),
            published_name: record.published_name.clone(),
        },
        note: String::new(),
        thumbnail,
    }
}

/// Success line shared by the lifecycle commands: "<verb> <name> v<N> <where>\nID <id>".
pub(crate) fn lifecycle_message(verb: &str, record: &BlockRecord, target: &str) -> CmdMessage {
    CmdMessage::success(format!(
        "{} {} v{} {}\nID {}",
        verb,
        record.display_name,
        record.active_version(),
        target,
        record.id.as_deref().unwrap_or_default()
    ))
}

/// Base64 thumbnail for the payload; an oversized image is dropped with a warning.
pub(crate) fn thumbnail_payload<S: DataStore>(store: &S, result: &mut CmdResult) -> Result<String> {
    let thumbnail = prepare_thumbnail(store.read_thumbnail()?)?;
    match &thumbnail {
        Thumbnail::TooLarge(size) => result.add_message(CmdMessage::warning(format!(
            "{} is {} bytes, over the {} limit; sending without a thumbnail.",
            THUMBNAIL_PATH, size, THUMBNAIL_CEILING
        ))),
        Thumbnail::Missing => debug!("No {} found", THUMBNAIL_PATH),
        Thumbnail::Embedded(_) => {}
    }
    Ok(thumbnail.payload())
}
