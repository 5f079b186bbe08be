//! Metadata-to-dataset pipeline.
//!
//! Reads acquisition metadata, arranges the tiles of one channel, and
//! optionally writes the dataset description for that channel.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::StitchPrepError;
use crate::tiles::io_acquisition_xml::{read_acquisition_xml, AcquisitionMetadata};
use crate::tiles::io_dataset_xml::{write_dataset_xml, DatasetDescription};
use crate::tiles::{Arrangement, ChannelId, ChannelLayout, FilePattern, TileSize};

/// One channel's layout together with the dataset's tile size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TileLayout {
    pub layout: ChannelLayout,
    pub tile_size: TileSize,
}

impl TileLayout {
    /// Dataset description for these tiles using `pattern`.
    pub fn describe(&self, pattern: FilePattern) -> DatasetDescription {
        DatasetDescription::from_layout(pattern, self.tile_size, &self.layout)
    }
}

impl fmt::Display for TileLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Channel {}", self.layout.channel)?;
        writeln!(f, "  tile count: {}", self.layout.tile_count)?;
        writeln!(f, "  distinct tiles: {}", self.layout.tiles.len())?;
        writeln!(f, "  tile size: {}", self.tile_size)?;
        for (id, location) in &self.layout.tiles {
            writeln!(f, "  tile {id}: {location}")?;
        }
        Ok(())
    }
}

/// Arrange already-parsed metadata for `channel`.
pub fn arrange_metadata(
    metadata: &AcquisitionMetadata,
    channel: ChannelId,
) -> Result<TileLayout, StitchPrepError> {
    let arrangement = Arrangement::from_records(&metadata.records);
    let layout = arrangement.select_channel(channel)?;

    let tile_size = metadata
        .tile_size
        .ok_or_else(|| StitchPrepError::MalformedMetadata {
            path: metadata.source.clone(),
            message: "no <Image> element to read the tile size from".to_string(),
        })?;

    if !layout.is_in_tile_order() {
        tracing::debug!(
            channel = %channel,
            "tiles were discovered out of tile-id order"
        );
    }

    Ok(TileLayout { layout, tile_size })
}

/// Read the metadata file at `path` and arrange `channel`.
pub fn arrange_acquisition(path: &Path, channel: ChannelId) -> Result<TileLayout, StitchPrepError> {
    let metadata = read_acquisition_xml(path)?;
    arrange_metadata(&metadata, channel)
}

/// Arrange `channel` from `metadata_path` and write its dataset description to `output_path`.
pub fn describe_acquisition(
    metadata_path: &Path,
    channel: ChannelId,
    pattern: &str,
    output_path: &Path,
) -> Result<TileLayout, StitchPrepError> {
    let pattern = FilePattern::parse(pattern)?;
    let tiles = arrange_acquisition(metadata_path, channel)?;
    write_dataset_xml(output_path, &tiles.describe(pattern))?;
    Ok(tiles)
}
