//! Records extracted from acquisition metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ChannelId, TileId};

/// One `<Image>` entry of the acquisition metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub channel: ChannelId,
    pub tile: TileId,
    /// Raw stage position in pixels.
    pub x: u64,
    pub y: u64,
}

impl TileRecord {
    pub fn new(channel: u32, tile: u32, x: u64, y: u64) -> Self {
        Self {
            channel: ChannelId::new(channel),
            tile: TileId::new(tile),
            x,
            y,
        }
    }
}

/// Pixel dimensions shared by every tile of a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    pub x: u32,
    pub y: u32,
}

impl TileSize {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Formats as `"<x> <y> 1"`, the single-plane view size string.
impl fmt::Display for TileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} 1", self.x, self.y)
    }
}
