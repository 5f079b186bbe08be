//! ImageJ macro generation for BigStitcher.
//!
//! Two macros are produced from user parameters:
//!
//! - the stitching macro ([`render_stitch_macro`]), which defines the
//!   dataset and registers the tiles, written as
//!   `reg<region>_bigstitcher_macro.ijm` in the output directory;
//! - the fusion macro ([`render_fuse_macro`]), which fuses a registered
//!   dataset to TIFF, written as `fuse_only_macro.ijm` in the image
//!   directory.
//!
//! Rendering is pure; [`writer`] does the file output.

mod config;
mod fuse;
mod paths;
mod stitch;
pub mod writer;

pub use config::{FuseConfig, MacroConfig, TileSpec, TilingMode};
pub use fuse::render_fuse_macro;
pub use paths::to_posix_string;
pub use stitch::render_stitch_macro;
pub use writer::{
    generate_fuse_macro, generate_stitch_macro, write_macro, FUSE_MACRO_FILE_NAME,
};
