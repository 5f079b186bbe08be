//! Tile arrangement for stitchprep.
//!
//! This module turns scan-acquisition metadata into the tile layout
//! BigStitcher needs:
//!
//! 1. [`io_acquisition_xml`] extracts one [`TileRecord`] per `<Image>` and
//!    the shared [`TileSize`].
//! 2. [`CanonicalLocation::from_raw`] normalizes each raw pixel position.
//! 3. [`Arrangement`] deduplicates tiles per channel (first position wins)
//!    and yields a [`ChannelLayout`] for the selected channel.
//! 4. [`io_dataset_xml`] serializes that layout as a dataset description.
//!
//! # Example
//!
//! ```
//! use stitchprep::tiles::{Arrangement, ChannelId, TileRecord};
//!
//! let records = [
//!     TileRecord::new(0, 0, 0, 0),
//!     TileRecord::new(0, 1, 1000, 0),
//!     TileRecord::new(0, 1, 2000, 0),
//! ];
//! let layout = Arrangement::from_records(&records)
//!     .select_channel(ChannelId::new(0))
//!     .unwrap();
//! assert_eq!(layout.tile_count, 2);
//! ```

mod arrangement;
mod ids;
pub mod io_acquisition_xml;
pub mod io_dataset_xml;
mod location;
mod pattern;
mod record;

// Re-export core types for convenient access
pub use arrangement::{Arrangement, ChannelLayout, ChannelTiles};
pub use ids::{ChannelId, TileId};
pub use location::CanonicalLocation;
pub use pattern::FilePattern;
pub use record::{TileRecord, TileSize};
