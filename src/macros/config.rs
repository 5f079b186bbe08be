//! Stitching and fusion parameters.
//!
//! Both configs deserialize from YAML or JSON parameter files. Missing keys
//! fall back to the defaults below, which match a single-tile scan at
//! 1 µm/pixel with 10 % lateral overlap.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StitchPrepError;
use crate::tiles::FilePattern;

const DEFAULT_XML_FILE_NAME: &str = "dataset.xml";
const DEFAULT_PATTERN: &str = "1_{xxxxx}_Z001.tif";

/// Tiles to load, either as a count (`1..=n`) or an explicit one-based list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileSpec {
    Count(u32),
    List(Vec<u32>),
}

impl TileSpec {
    /// Renders the comma-separated tile list, e.g. `1,2,3,4,5` for `Count(5)`.
    pub fn expand(&self) -> String {
        match self {
            TileSpec::Count(n) => join_numbers(1..=*n),
            TileSpec::List(tiles) => join_numbers(tiles.iter().copied()),
        }
    }

    fn validate(&self) -> Result<(), StitchPrepError> {
        match self {
            TileSpec::Count(0) => Err(invalid("num_tiles", "tile count must be at least 1")),
            TileSpec::Count(_) => Ok(()),
            TileSpec::List(tiles) if tiles.is_empty() => {
                Err(invalid("num_tiles", "tile list must not be empty"))
            }
            TileSpec::List(tiles) if tiles.contains(&0) => {
                Err(invalid("num_tiles", "tile list entries are one-based"))
            }
            TileSpec::List(_) => Ok(()),
        }
    }
}

impl Default for TileSpec {
    fn default() -> Self {
        TileSpec::Count(1)
    }
}

fn join_numbers(numbers: impl Iterator<Item = u32>) -> String {
    numbers
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// How tiles were acquired across the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TilingMode {
    Snake,
    Grid,
}

impl TilingMode {
    /// The `grid_type` value BigStitcher expects, padding included.
    pub fn token(&self) -> &'static str {
        match self {
            TilingMode::Snake => "[Snake: Right & Down      ]",
            TilingMode::Grid => "[Grid: Right & Down      ]",
        }
    }
}

impl FromStr for TilingMode {
    type Err = StitchPrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snake" => Ok(TilingMode::Snake),
            "grid" => Ok(TilingMode::Grid),
            other => Err(StitchPrepError::UnsupportedTilingMode(other.to_string())),
        }
    }
}

/// Parameters of the stitching macro.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroConfig {
    /// Directory holding the tile images.
    pub img_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Dataset description file name, created inside `img_dir`.
    pub xml_file_name: String,
    /// Tile file name pattern with a `{x..x}` index placeholder.
    pub pattern: String,
    pub num_tiles: TileSpec,
    pub num_tiles_x: u32,
    pub num_tiles_y: u32,
    /// Overlap between neighbouring tiles, in percent.
    pub overlap_x: f64,
    pub overlap_y: f64,
    pub overlap_z: f64,
    /// Physical pixel pitch in µm.
    pub pixel_distance_x: f64,
    pub pixel_distance_y: f64,
    pub pixel_distance_z: f64,
    /// `snake` or `grid`.
    pub tiling_mode: String,
    /// Only used to name the macro file.
    pub region: u32,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            img_dir: PathBuf::new(),
            out_dir: PathBuf::new(),
            xml_file_name: DEFAULT_XML_FILE_NAME.to_string(),
            pattern: DEFAULT_PATTERN.to_string(),
            num_tiles: TileSpec::default(),
            num_tiles_x: 1,
            num_tiles_y: 1,
            overlap_x: 10.0,
            overlap_y: 10.0,
            overlap_z: 1.0,
            pixel_distance_x: 1.0,
            pixel_distance_y: 1.0,
            pixel_distance_z: 1.0,
            tiling_mode: String::new(),
            region: 1,
        }
    }
}

impl MacroConfig {
    /// Loads parameters from a `.json` file, or YAML for any other extension.
    pub fn load(path: &Path) -> Result<Self, StitchPrepError> {
        let text = fs::read_to_string(path).map_err(StitchPrepError::Io)?;
        if has_json_extension(path) {
            serde_json::from_str(&text).map_err(|source| StitchPrepError::ConfigJsonParse {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_yaml::from_str(&text).map_err(|source| StitchPrepError::ConfigYamlParse {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// `reg<region>_bigstitcher_macro.ijm`.
    pub fn macro_file_name(&self) -> String {
        format!("reg{}_bigstitcher_macro.ijm", self.region)
    }

    /// Path of the dataset description the macro creates and reuses.
    pub fn xml_path(&self) -> PathBuf {
        self.img_dir.join(&self.xml_file_name)
    }

    /// Checks every field and resolves the tiling mode.
    pub fn validate(&self) -> Result<TilingMode, StitchPrepError> {
        require_path("img_dir", &self.img_dir)?;
        require_path("out_dir", &self.out_dir)?;
        require_text("xml_file_name", &self.xml_file_name)?;
        FilePattern::parse(&self.pattern)?;
        self.num_tiles.validate()?;

        if self.num_tiles_x == 0 {
            return Err(invalid("num_tiles_x", "must be at least 1"));
        }
        if self.num_tiles_y == 0 {
            return Err(invalid("num_tiles_y", "must be at least 1"));
        }

        require_overlap("overlap_x", self.overlap_x)?;
        require_overlap("overlap_y", self.overlap_y)?;
        require_overlap("overlap_z", self.overlap_z)?;
        require_pixel_distance("pixel_distance_x", self.pixel_distance_x)?;
        require_pixel_distance("pixel_distance_y", self.pixel_distance_y)?;
        require_pixel_distance("pixel_distance_z", self.pixel_distance_z)?;

        require_text("tiling_mode", &self.tiling_mode)?;
        self.tiling_mode.parse()
    }
}

/// Parameters of the fusion macro.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuseConfig {
    /// Channel directory holding the dataset description; the macro is written here.
    pub img_dir: PathBuf,
    /// Where fused TIFF stacks are saved.
    pub out_dir: PathBuf,
    pub xml_file_name: String,
}

impl Default for FuseConfig {
    fn default() -> Self {
        Self {
            img_dir: PathBuf::from("."),
            out_dir: PathBuf::from("."),
            xml_file_name: DEFAULT_XML_FILE_NAME.to_string(),
        }
    }
}

impl FuseConfig {
    pub fn xml_path(&self) -> PathBuf {
        self.img_dir.join(&self.xml_file_name)
    }

    pub fn validate(&self) -> Result<(), StitchPrepError> {
        require_path("img_dir", &self.img_dir)?;
        require_path("out_dir", &self.out_dir)?;
        require_text("xml_file_name", &self.xml_file_name)
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn invalid(field: &'static str, message: &str) -> StitchPrepError {
    StitchPrepError::ConfigValidation {
        field,
        message: message.to_string(),
    }
}

fn require_path(field: &'static str, path: &Path) -> Result<(), StitchPrepError> {
    if path.as_os_str().is_empty() {
        return Err(invalid(field, "must be set"));
    }
    Ok(())
}

fn require_text(field: &'static str, value: &str) -> Result<(), StitchPrepError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "must be set"));
    }
    Ok(())
}

fn require_overlap(field: &'static str, value: f64) -> Result<(), StitchPrepError> {
    if !value.is_finite() || !(0.0..100.0).contains(&value) {
        return Err(StitchPrepError::ConfigValidation {
            field,
            message: format!("{value} is not a percentage in [0, 100)"),
        });
    }
    Ok(())
}

fn require_pixel_distance(field: &'static str, value: f64) -> Result<(), StitchPrepError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(StitchPrepError::ConfigValidation {
            field,
            message: format!("{value} is not a positive distance"),
        });
    }
    Ok(())
}
