//! BigStitcher dataset description (`SpimData`) writer.
//!
//! Produces a single-timepoint, single-angle, single-illumination dataset
//! for one channel. Every tile becomes one view setup whose registration
//! translates it to its canonical location, so BigStitcher opens the
//! dataset with tiles already placed at their stage positions.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::arrangement::ChannelLayout;
use super::ids::{ChannelId, TileId};
use super::location::CanonicalLocation;
use super::pattern::FilePattern;
use super::record::TileSize;
use crate::error::StitchPrepError;

const SPIM_DATA_VERSION: &str = "0.2";
const IMAGE_LOADER_FORMAT: &str = "spimreconstruction.filelist";
const REGISTRATION_NAME: &str = "Translation to Regular Grid";

/// Values the dataset description is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetDescription {
    pub pattern: FilePattern,
    pub channel: ChannelId,
    pub tile_count: u64,
    pub tile_size: TileSize,
    pub tiles: Vec<(TileId, CanonicalLocation)>,
}

impl DatasetDescription {
    /// Describes one channel's layout.
    pub fn from_layout(pattern: FilePattern, tile_size: TileSize, layout: &ChannelLayout) -> Self {
        Self {
            pattern,
            channel: layout.channel,
            tile_count: layout.tile_count,
            tile_size,
            tiles: layout.tiles.clone(),
        }
    }
}

/// Write a dataset description XML file, replacing any existing file.
pub fn write_dataset_xml(path: &Path, description: &DatasetDescription) -> Result<(), StitchPrepError> {
    let xml = to_dataset_xml_string(description)?;
    fs::write(path, xml).map_err(|source| StitchPrepError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        tiles = description.tiles.len(),
        "wrote dataset description"
    );
    Ok(())
}

/// Serialize a dataset description to an XML string.
///
/// Tiles are emitted in ascending tile-id order regardless of the order in
/// which they were discovered.
pub fn to_dataset_xml_string(description: &DatasetDescription) -> Result<String, StitchPrepError> {
    let mut tiles = description.tiles.clone();
    tiles.sort_by_key(|(id, _)| *id);

    if let Some((id, _)) = tiles
        .iter()
        .find(|(id, _)| u64::from(id.as_u32()) >= description.tile_count)
    {
        return Err(StitchPrepError::ConfigValidation {
            field: "tile_count",
            message: format!(
                "tile {} is outside the declared tile count {}",
                id, description.tile_count
            ),
        });
    }

    let max_index_digits = description.tile_count.saturating_sub(1).to_string().len();
    if max_index_digits > description.pattern.width() {
        tracing::warn!(
            pattern = %description.pattern,
            tile_count = description.tile_count,
            "pattern placeholder is narrower than the largest tile index"
        );
    }

    let channel = description.channel;
    let mut xml = String::new();
    writeln!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>").expect("write to string");
    writeln!(xml, "<SpimData version=\"{SPIM_DATA_VERSION}\">").expect("write to string");
    writeln!(xml, "  <BasePath type=\"relative\">.</BasePath>").expect("write to string");
    writeln!(xml, "  <SequenceDescription>").expect("write to string");

    writeln!(xml, "    <ImageLoader format=\"{IMAGE_LOADER_FORMAT}\">").expect("write to string");
    writeln!(xml, "      <imglib2container>ArrayImgFactory</imglib2container>")
        .expect("write to string");
    writeln!(xml, "      <ZGrouped>false</ZGrouped>").expect("write to string");
    writeln!(xml, "      <files>").expect("write to string");
    for (id, _) in &tiles {
        writeln!(
            xml,
            "        <FileMapping view_setup=\"{id}\" timepoint=\"0\" series=\"0\" channel=\"0\">"
        )
        .expect("write to string");
        writeln!(
            xml,
            "          <file type=\"relative\">{}</file>",
            xml_escape(&description.pattern.file_name(id.as_u32()))
        )
        .expect("write to string");
        writeln!(xml, "        </FileMapping>").expect("write to string");
    }
    writeln!(xml, "      </files>").expect("write to string");
    writeln!(xml, "    </ImageLoader>").expect("write to string");

    writeln!(xml, "    <ViewSetups>").expect("write to string");
    for (id, _) in &tiles {
        writeln!(xml, "      <ViewSetup>").expect("write to string");
        writeln!(xml, "        <id>{id}</id>").expect("write to string");
        writeln!(xml, "        <name>{id}</name>").expect("write to string");
        writeln!(xml, "        <size>{}</size>", description.tile_size).expect("write to string");
        writeln!(xml, "        <voxelSize>").expect("write to string");
        writeln!(xml, "          <unit>pixel</unit>").expect("write to string");
        writeln!(xml, "          <size>1.0 1.0 1.0</size>").expect("write to string");
        writeln!(xml, "        </voxelSize>").expect("write to string");
        writeln!(xml, "        <attributes>").expect("write to string");
        writeln!(xml, "          <illumination>0</illumination>").expect("write to string");
        writeln!(xml, "          <channel>{channel}</channel>").expect("write to string");
        writeln!(xml, "          <tile>{id}</tile>").expect("write to string");
        writeln!(xml, "          <angle>0</angle>").expect("write to string");
        writeln!(xml, "        </attributes>").expect("write to string");
        writeln!(xml, "      </ViewSetup>").expect("write to string");
    }

    write_single_attribute(&mut xml, "illumination", "Illumination", "0");
    write_single_attribute(&mut xml, "channel", "Channel", &channel.to_string());

    writeln!(xml, "      <Attributes name=\"tile\">").expect("write to string");
    for (id, location) in &tiles {
        writeln!(xml, "        <Tile>").expect("write to string");
        writeln!(xml, "          <id>{id}</id>").expect("write to string");
        writeln!(xml, "          <name>{id}</name>").expect("write to string");
        writeln!(xml, "          <location>{location}</location>").expect("write to string");
        writeln!(xml, "        </Tile>").expect("write to string");
    }
    writeln!(xml, "      </Attributes>").expect("write to string");

    write_single_attribute(&mut xml, "angle", "Angle", "0");
    writeln!(xml, "    </ViewSetups>").expect("write to string");

    writeln!(xml, "    <Timepoints type=\"pattern\">").expect("write to string");
    writeln!(xml, "      <integerpattern>0</integerpattern>").expect("write to string");
    writeln!(xml, "    </Timepoints>").expect("write to string");
    writeln!(xml, "    <MissingViews />").expect("write to string");
    writeln!(xml, "  </SequenceDescription>").expect("write to string");

    writeln!(xml, "  <ViewRegistrations>").expect("write to string");
    for (id, location) in &tiles {
        writeln!(xml, "    <ViewRegistration timepoint=\"0\" setup=\"{id}\">")
            .expect("write to string");
        writeln!(xml, "      <ViewTransform type=\"affine\">").expect("write to string");
        writeln!(xml, "        <Name>{REGISTRATION_NAME}</Name>").expect("write to string");
        writeln!(
            xml,
            "        <affine>1.0 0.0 0.0 {}.0 0.0 1.0 0.0 {}.0 0.0 0.0 1.0 {}.0</affine>",
            location.x,
            location.y,
            location.z()
        )
        .expect("write to string");
        writeln!(xml, "      </ViewTransform>").expect("write to string");
        writeln!(xml, "    </ViewRegistration>").expect("write to string");
    }
    writeln!(xml, "  </ViewRegistrations>").expect("write to string");

    writeln!(xml, "  <ViewInterestPoints />").expect("write to string");
    writeln!(xml, "  <BoundingBoxes />").expect("write to string");
    writeln!(xml, "  <PointSpreadFunctions />").expect("write to string");
    writeln!(xml, "  <StitchingResults />").expect("write to string");
    writeln!(xml, "  <IntensityAdjustments />").expect("write to string");
    writeln!(xml, "</SpimData>").expect("write to string");

    Ok(xml)
}

fn write_single_attribute(xml: &mut String, name: &str, element: &str, id: &str) {
    writeln!(xml, "      <Attributes name=\"{name}\">").expect("write to string");
    writeln!(xml, "        <{element}>").expect("write to string");
    writeln!(xml, "          <id>{id}</id>").expect("write to string");
    writeln!(xml, "          <name>{id}</name>").expect("write to string");
    writeln!(xml, "        </{element}>").expect("write to string");
    writeln!(xml, "      </Attributes>").expect("write to string");
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
