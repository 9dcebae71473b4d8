use std::path::PathBuf;
use thiserror::Error;

/// Bad or missing local input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select or enter a category name.")]
    MissingCategory,

    #[error(
        "{category} is not a valid category name. Please enter a valid category name:\n\t- {}",
        .valid.join("\n\t- ")
    )]
    InvalidCategory {
        category: String,
        valid: Vec<String>,
    },

    #[error(
        "{name} is not a valid integration. Please enter one of:\n\t- {}",
        .valid.join("\n\t- ")
    )]
    InvalidIntegration { name: String, valid: Vec<String> },

    #[error("Cache duration must be a non-negative whole number of seconds, got '{0}'.")]
    InvalidCacheDuration(String),

    #[error("A block name is required.")]
    MissingName,

    #[error("Invalid size '{0}'. Expected something like '500kb' or '1 MB'.")]
    InvalidSize(String),

    #[error("Version {0} in .element-block cannot be followed by a new major version.")]
    VersionOverflow(u32),
}

/// A precondition on the local block state does not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Please log in before proceeding. Use the `login` command.")]
    NotLoggedIn,

    #[error(
        "This does not seem to be a block directory. Please double-check where you think you are."
    )]
    NotABlockDirectory,

    #[error(
        "A built file is not present at {}. Please ensure you have built your block with `npm run build`.",
        .0.display()
    )]
    NotBuilt(PathBuf),

    #[error("Please ensure you have published the block first.")]
    NotPublished,

    #[error(
        "This block has already been published to staging. Please try running the `update` command to update the contents of this block, the `release` command to push your block live, or `publish -m` to start a new major version."
    )]
    AlreadyPublished,

    #[error("{} block already exists.\nPlease choose a new name and try again.", .0.display())]
    BlockExists(PathBuf),

    #[error(
        "Please run this command from a directory that does not already contain block files."
    )]
    NestedBlock,
}

#[derive(Error, Debug)]
pub enum ElementError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("Request failed{}: {message}", .status.map(|s| format!(" with status {}", s)).unwrap_or_default())]
    Network {
        status: Option<u16>,
        message: String,
    },

    #[error(
        "Your total upload size -- block, screenshot, and metadata -- was approximately {approx_kb} kb and the maximum payload size is 1000 kb. Please reduce your payload size; for an easy win, try decreasing the size of the thumbnail."
    )]
    PayloadTooLarge { approx_kb: u64 },

    #[error("A branch named {0} already exists. Check out that branch to continue work on that major version.")]
    VersionBranchConflict(String),

    #[error("{0}")]
    Tool(String),

    #[error("Operation cancelled.")]
    Declined,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ElementError {
    fn from(err: reqwest::Error) -> Self {
        ElementError::Network {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ElementError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_category_lists_valid_names() {
        let err = ValidationError::InvalidCategory {
            category: "gadgets".into(),
            valid: vec!["Layout".into(), "Widgets".into()],
        };
        let text = err.to_string();
        assert!(text.starts_with("gadgets is not a valid category name."));
        assert!(text.contains("\t- Layout\n\t- Widgets"));
    }

    #[test]
    fn network_error_includes_status_when_known() {
        let err = ElementError::Network {
            status: Some(500),
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "Request failed with status 500: boom");

        let err = ElementError::Network {
            status: None,
            message: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "Request failed: connection refused");
    }
}
