//! Per-channel tile arrangement.
//!
//! Scanners emit one `<Image>` per tile per z-plane or timepoint, so the
//! same `(channel, tile)` pair usually appears several times. The first
//! position seen for a pair is kept and later ones are dropped.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::ids::{ChannelId, TileId};
use super::location::CanonicalLocation;
use super::record::TileRecord;
use crate::error::StitchPrepError;

/// Tiles of one channel in first-occurrence order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelTiles {
    order: Vec<(TileId, CanonicalLocation)>,
    seen: HashSet<TileId>,
}

impl ChannelTiles {
    /// Inserts a tile unless its id is already present. Returns whether it was inserted.
    pub fn insert(&mut self, tile: TileId, location: CanonicalLocation) -> bool {
        if !self.seen.insert(tile) {
            return false;
        }
        self.order.push((tile, location));
        true
    }

    pub fn get(&self, tile: TileId) -> Option<CanonicalLocation> {
        self.order
            .iter()
            .find(|(id, _)| *id == tile)
            .map(|(_, loc)| *loc)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tiles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(TileId, CanonicalLocation)> {
        self.order.iter()
    }

    pub fn max_tile_id(&self) -> Option<TileId> {
        self.seen.iter().copied().max()
    }
}

/// Mapping from channel to its deduplicated tiles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arrangement {
    channels: BTreeMap<ChannelId, ChannelTiles>,
}

impl Arrangement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an arrangement from records in order.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TileRecord>,
    {
        let mut arrangement = Self::new();
        for record in records {
            arrangement.insert(record);
        }
        arrangement
    }

    /// Adds a record; a repeated `(channel, tile)` pair is a no-op returning `false`.
    pub fn insert(&mut self, record: &TileRecord) -> bool {
        let location = CanonicalLocation::from_raw(record.x, record.y);
        let inserted = self
            .channels
            .entry(record.channel)
            .or_default()
            .insert(record.tile, location);

        if !inserted {
            tracing::debug!(
                channel = %record.channel,
                tile = %record.tile,
                x = record.x,
                y = record.y,
                "duplicate tile position ignored"
            );
        }
        inserted
    }

    pub fn channel(&self, channel: ChannelId) -> Option<&ChannelTiles> {
        self.channels.get(&channel)
    }

    /// Channel ids in ascending order.
    pub fn channel_ids(&self) -> Vec<ChannelId> {
        self.channels.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Selects one channel's layout for serialization.
    ///
    /// Tile numbering is assumed zero-based and dense, so the tile count is
    /// the largest tile id plus one. Gaps are reported but not rejected. The
    /// count is a `u64` so that a tile id of `u32::MAX` still has a successor.
    pub fn select_channel(&self, channel: ChannelId) -> Result<ChannelLayout, StitchPrepError> {
        let tiles = self
            .channels
            .get(&channel)
            .filter(|tiles| !tiles.is_empty())
            .ok_or_else(|| StitchPrepError::ChannelNotFound {
                channel,
                available: self.channel_ids(),
            })?;

        let tile_count = tiles
            .max_tile_id()
            .map(|max| u64::from(max.as_u32()) + 1)
            .unwrap_or(0);

        if tile_count != tiles.len() as u64 {
            tracing::warn!(
                channel = %channel,
                tile_count,
                distinct_tiles = tiles.len(),
                "tile numbering has gaps"
            );
        }

        Ok(ChannelLayout {
            channel,
            tile_count,
            tiles: tiles.iter().copied().collect(),
        })
    }
}

/// One channel's tiles, ready for the dataset description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChannelLayout {
    pub channel: ChannelId,
    /// `max(tile_id) + 1`.
    pub tile_count: u64,
    /// Tiles in first-occurrence order.
    pub tiles: Vec<(TileId, CanonicalLocation)>,
}

impl ChannelLayout {
    /// Locations in first-occurrence order.
    pub fn locations(&self) -> Vec<CanonicalLocation> {
        self.tiles.iter().map(|(_, loc)| *loc).collect()
    }

    /// Tiles sorted by ascending tile id.
    pub fn sorted_by_tile_id(&self) -> Vec<(TileId, CanonicalLocation)> {
        let mut tiles = self.tiles.clone();
        tiles.sort_by_key(|(id, _)| *id);
        tiles
    }

    /// True when first-occurrence order already matches ascending tile ids.
    pub fn is_in_tile_order(&self) -> bool {
        self.tiles.windows(2).all(|pair| pair[0].0 < pair[1].0)
    }
}
