use std::path::PathBuf;
use thiserror::Error;

use crate::tiles::ChannelId;

/// The main error type for stitchprep operations.
#[derive(Debug, Error)]
pub enum StitchPrepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed acquisition metadata in {path}: {message}")]
    MalformedMetadata { path: PathBuf, message: String },

    #[error("Malformed tile file name '{file_name}': {message}")]
    MalformedFileName { file_name: String, message: String },

    #[error("Channel {channel} not found in arrangement (available: {})", format_channels(.available))]
    ChannelNotFound {
        channel: ChannelId,
        available: Vec<ChannelId>,
    },

    #[error("Unsupported tiling mode: '{0}' (supported: snake, grid)")]
    UnsupportedTilingMode(String),

    #[error("Invalid configuration field '{field}': {message}")]
    ConfigValidation { field: &'static str, message: String },

    #[error("Failed to parse YAML parameters from {path}: {source}")]
    ConfigYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON parameters from {path}: {source}")]
    ConfigJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[source] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_channels(channels: &[ChannelId]) -> String {
    if channels.is_empty() {
        return "none".to_string();
    }
    channels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
