use crate::error::{Result, ValidationError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

/// Largest thumbnail embedded in a publish or update payload.
pub const THUMBNAIL_CEILING: &str = "1000kb";

static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\d+)\s?([kmg]b)\s*$").expect("size pattern is valid"));

/// Parse a human size such as "100 kb" or "1 GB" using decimal units.
pub fn convert_to_bytes(size: &str) -> Result<u64> {
    let invalid = || ValidationError::InvalidSize(size.to_string());
    let caps = SIZE_RE.captures(size).ok_or_else(invalid)?;
    let value: u64 = caps[1].parse().map_err(|_| invalid())?;
    let multiplier = match caps[2].to_lowercase().as_str() {
        "kb" => 1_000,
        "mb" => 1_000_000,
        "gb" => 1_000_000_000,
        _ => return Err(invalid().into()),
    };
    value.checked_mul(multiplier).ok_or_else(|| invalid().into())
}

/// Strictly smaller than the ceiling.
pub fn is_image_small_enough(size_in_bytes: u64, ceiling: &str) -> Result<bool> {
    Ok(size_in_bytes < convert_to_bytes(ceiling)?)
}

/// Outcome of preparing the optional thumbnail for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    Embedded(String),
    Missing,
    TooLarge(u64),
}

impl Thumbnail {
    /// The base64 payload, or an empty string when nothing is embedded.
    pub fn payload(&self) -> String {
        match self {
            Thumbnail::Embedded(data) => data.clone(),
            _ => String::new(),
        }
    }
}

pub fn prepare_thumbnail(bytes: Option<Vec<u8>>) -> Result<Thumbnail> {
    let Some(bytes) = bytes else {
        return Ok(Thumbnail::Missing);
    };
    let size = bytes.len() as u64;
    if is_image_small_enough(size, THUMBNAIL_CEILING)? {
        Ok(Thumbnail::Embedded(STANDARD.encode(&bytes)))
    } else {
        Ok(Thumbnail::TooLarge(size))
    }
}
