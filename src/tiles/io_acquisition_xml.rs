//! Acquisition metadata XML reader.
//!
//! The scanner exports one `<Image>` element per captured tile directly
//! under the document root. Each carries a `<Bounds>` element whose
//! attributes hold the tile's position and identity:
//!
//! - `StartX`, `StartY`: stage position in pixels
//! - `StartC`: channel index
//! - `StartM`: mosaic (tile) index
//! - `SizeX`, `SizeY`: tile dimensions in pixels
//!
//! Tile file names follow `<prefix>_m<tile>_<channel>_<suffix>`, which
//! [`parse_tile_file_name`] decodes independently of the attributes.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use super::ids::TileId;
use super::record::{TileRecord, TileSize};
use crate::error::StitchPrepError;

const IMAGE_TAG: &str = "Image";
const BOUNDS_TAG: &str = "Bounds";
const FILE_NAME_SEPARATOR: char = '_';
const TILE_FIELD_PREFIX: char = 'm';

/// Everything the arrangement needs from one metadata document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AcquisitionMetadata {
    /// Where the document came from: the file path, or `<string>`/`<bytes>`.
    pub source: PathBuf,
    /// One record per `<Image>`, in document order.
    pub records: Vec<TileRecord>,
    /// Tile dimensions, read from the first `<Image>`; `None` for an empty document.
    pub tile_size: Option<TileSize>,
}

/// Read an acquisition metadata XML file.
pub fn read_acquisition_xml(path: &Path) -> Result<AcquisitionMetadata, StitchPrepError> {
    let xml = fs::read_to_string(path).map_err(StitchPrepError::Io)?;
    parse_acquisition_xml_str(&xml, path)
}

/// Parse acquisition metadata from a string.
pub fn from_acquisition_xml_str(xml: &str) -> Result<AcquisitionMetadata, StitchPrepError> {
    parse_acquisition_xml_str(xml, Path::new("<string>"))
}

/// Parse acquisition metadata from bytes (must be valid UTF-8).
pub fn from_acquisition_xml_slice(bytes: &[u8]) -> Result<AcquisitionMetadata, StitchPrepError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| StitchPrepError::MalformedMetadata {
        path: PathBuf::from("<bytes>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    parse_acquisition_xml_str(xml, Path::new("<bytes>"))
}

fn parse_acquisition_xml_str(
    xml: &str,
    path: &Path,
) -> Result<AcquisitionMetadata, StitchPrepError> {
    let document = Document::parse(xml).map_err(|source| StitchPrepError::MalformedMetadata {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let root = document.root_element();
    let mut metadata = AcquisitionMetadata {
        source: path.to_path_buf(),
        ..AcquisitionMetadata::default()
    };

    for (idx, image_node) in root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == IMAGE_TAG)
        .enumerate()
    {
        let context = format!("<{IMAGE_TAG}> #{idx}");
        let bounds = child_element(image_node, BOUNDS_TAG).ok_or_else(|| {
            StitchPrepError::MalformedMetadata {
                path: path.to_path_buf(),
                message: format!("missing <{BOUNDS_TAG}> in {context}"),
            }
        })?;

        if metadata.tile_size.is_none() {
            metadata.tile_size = Some(read_tile_size(bounds, path, &context)?);
        }
        metadata.records.push(read_position(bounds, path, &context)?);
    }

    tracing::debug!(
        path = %path.display(),
        records = metadata.records.len(),
        "parsed acquisition metadata"
    );

    Ok(metadata)
}

/// Extract channel, tile and position from a `<Bounds>` element.
pub fn extract_position(bounds: Node<'_, '_>) -> Result<TileRecord, StitchPrepError> {
    read_position(bounds, Path::new("<node>"), "<Bounds>")
}

/// Extract the tile pixel size from an `<Image>` element's `<Bounds>`.
pub fn extract_tile_size(image: Node<'_, '_>) -> Result<TileSize, StitchPrepError> {
    let path = Path::new("<node>");
    let bounds =
        child_element(image, BOUNDS_TAG).ok_or_else(|| StitchPrepError::MalformedMetadata {
            path: path.to_path_buf(),
            message: format!("missing <{BOUNDS_TAG}> in <{IMAGE_TAG}>"),
        })?;
    read_tile_size(bounds, path, "<Bounds>")
}

/// Decode `(channel_name, tile_id)` from a tile file name.
///
/// Fields are separated by `_`. The channel name is the second-to-last field
/// and the tile id the third-to-last, with one leading `m` stripped:
/// `scan_m003_DAPI_ORG.tif` yields `("DAPI", 3)`.
pub fn parse_tile_file_name(file_name: &str) -> Result<(String, TileId), StitchPrepError> {
    let fields: Vec<&str> = file_name.split(FILE_NAME_SEPARATOR).collect();
    if fields.len() < 3 {
        return Err(StitchPrepError::MalformedFileName {
            file_name: file_name.to_string(),
            message: format!(
                "expected at least 3 '{FILE_NAME_SEPARATOR}'-separated fields, found {}",
                fields.len()
            ),
        });
    }

    let channel_name = fields[fields.len() - 2].to_string();
    let tile_field = fields[fields.len() - 3];
    let digits = tile_field
        .strip_prefix(TILE_FIELD_PREFIX)
        .unwrap_or(tile_field);
    let tile = digits
        .parse::<u32>()
        .map_err(|_| StitchPrepError::MalformedFileName {
            file_name: file_name.to_string(),
            message: format!("invalid tile field '{tile_field}'; expected '{TILE_FIELD_PREFIX}<u32>'"),
        })?;

    Ok((channel_name, TileId::new(tile)))
}

fn read_position(
    bounds: Node<'_, '_>,
    path: &Path,
    context: &str,
) -> Result<TileRecord, StitchPrepError> {
    let x = parse_required_attr::<u64>(bounds, "StartX", path, context)?;
    let y = parse_required_attr::<u64>(bounds, "StartY", path, context)?;
    let channel = parse_required_attr::<u32>(bounds, "StartC", path, context)?;
    let tile = parse_required_attr::<u32>(bounds, "StartM", path, context)?;
    Ok(TileRecord::new(channel, tile, x, y))
}

fn read_tile_size(
    bounds: Node<'_, '_>,
    path: &Path,
    context: &str,
) -> Result<TileSize, StitchPrepError> {
    let x = parse_required_attr::<u32>(bounds, "SizeX", path, context)?;
    let y = parse_required_attr::<u32>(bounds, "SizeY", path, context)?;
    Ok(TileSize::new(x, y))
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn required_attr<'a>(
    node: Node<'a, '_>,
    attr: &str,
    path: &Path,
    context: &str,
) -> Result<&'a str, StitchPrepError> {
    node.attribute(attr)
        .ok_or_else(|| StitchPrepError::MalformedMetadata {
            path: path.to_path_buf(),
            message: format!("missing '{attr}' attribute in {context}"),
        })
}

fn parse_required_attr<T: std::str::FromStr>(
    node: Node<'_, '_>,
    attr: &str,
    path: &Path,
    context: &str,
) -> Result<T, StitchPrepError> {
    let raw = required_attr(node, attr, path, context)?;
    raw.trim()
        .parse::<T>()
        .map_err(|_| StitchPrepError::MalformedMetadata {
            path: path.to_path_buf(),
            message: format!(
                "invalid '{attr}' value '{raw}' in {context}; expected non-negative integer"
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Metadata>
  <Image>
    <Bounds StartX="0" StartY="0" StartC="0" StartM="0" SizeX="2048" SizeY="1536"/>
  </Image>
  <Image>
    <Bounds StartX="1843" StartY="0" StartC="0" StartM="1" SizeX="2048" SizeY="1536"/>
  </Image>
  <Image>
    <Bounds StartX="0" StartY="0" StartC="1" StartM="0" SizeX="2048" SizeY="1536"/>
  </Image>
</Metadata>"#;

    #[test]
    fn parses_records_in_document_order() {
        let metadata = from_acquisition_xml_str(SAMPLE).expect("parse");
        assert_eq!(
            metadata.records,
            vec![
                TileRecord::new(0, 0, 0, 0),
                TileRecord::new(0, 1, 1843, 0),
                TileRecord::new(1, 0, 0, 0),
            ]
        );
        assert_eq!(metadata.tile_size, Some(TileSize::new(2048, 1536)));
        assert_eq!(metadata.source, Path::new("<string>"));
    }

    #[test]
    fn empty_document_has_no_tile_size() {
        let metadata = from_acquisition_xml_str("<Metadata/>").expect("parse");
        assert!(metadata.records.is_empty());
        assert_eq!(metadata.tile_size, None);
    }

    #[test]
    fn missing_attribute_is_malformed() {
        let xml = r#"<Metadata><Image><Bounds StartX="0" StartY="0" StartC="0" SizeX="1" SizeY="1"/></Image></Metadata>"#;
        let err = from_acquisition_xml_str(xml).unwrap_err();
        match err {
            StitchPrepError::MalformedMetadata { message, .. } => {
                assert!(message.contains("'StartM'"));
                assert!(message.contains("#0"));
            }
            other => panic!("expected MalformedMetadata, got {other:?}"),
        }
    }

    #[test]
    fn negative_coordinate_is_malformed() {
        let xml = r#"<Metadata><Image><Bounds StartX="-5" StartY="0" StartC="0" StartM="0" SizeX="1" SizeY="1"/></Image></Metadata>"#;
        let err = from_acquisition_xml_str(xml).unwrap_err();
        assert!(matches!(err, StitchPrepError::MalformedMetadata { .. }));
    }

    #[test]
    fn missing_bounds_is_malformed() {
        let xml = r#"<Metadata><Image/></Metadata>"#;
        let err = from_acquisition_xml_str(xml).unwrap_err();
        match err {
            StitchPrepError::MalformedMetadata { message, .. } => {
                assert!(message.contains("<Bounds>"))
            }
            other => panic!("expected MalformedMetadata, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let err = from_acquisition_xml_slice(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, StitchPrepError::MalformedMetadata { .. }));
    }

    #[test]
    fn extracts_from_single_nodes() {
        let document = Document::parse(SAMPLE).expect("xml");
        let image = document
            .root_element()
            .children()
            .find(|n| n.is_element())
            .expect("image node");
        let bounds = child_element(image, BOUNDS_TAG).expect("bounds");

        assert_eq!(
            extract_position(bounds).expect("position"),
            TileRecord::new(0, 0, 0, 0)
        );
        assert_eq!(
            extract_tile_size(image).expect("size"),
            TileSize::new(2048, 1536)
        );
    }

    #[test]
    fn parses_tile_file_name() {
        let (channel, tile) =
            parse_tile_file_name("191114_hBrest_rep_b4-1-MIP_m012_DAPI_ORG.tif").expect("parse");
        assert_eq!(channel, "DAPI");
        assert_eq!(tile, TileId::new(12));
    }

    #[test]
    fn file_name_with_too_few_fields_is_malformed() {
        let err = parse_tile_file_name("m001_DAPI").unwrap_err();
        assert!(matches!(err, StitchPrepError::MalformedFileName { .. }));
    }

    #[test]
    fn file_name_with_non_numeric_tile_is_malformed() {
        let err = parse_tile_file_name("scan_mXYZ_DAPI_ORG.tif").unwrap_err();
        match err {
            StitchPrepError::MalformedFileName { message, .. } => {
                assert!(message.contains("mXYZ"))
            }
            other => panic!("expected MalformedFileName, got {other:?}"),
        }
    }
}
