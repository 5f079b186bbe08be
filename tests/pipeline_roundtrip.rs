//! Integration tests for the metadata-to-dataset pipeline and macro output.

use std::fs;
use std::path::Path;

use roxmltree::Document;
use stitchprep::macros::{
    generate_fuse_macro, generate_stitch_macro, FuseConfig, MacroConfig, TileSpec,
    FUSE_MACRO_FILE_NAME,
};
use stitchprep::pipeline::{arrange_acquisition, arrange_metadata, describe_acquisition};
use stitchprep::tiles::io_acquisition_xml::{from_acquisition_xml_str, parse_tile_file_name};
use stitchprep::tiles::{CanonicalLocation, ChannelId, TileSize};
use stitchprep::StitchPrepError;

const FIXTURE: &str = "tests/fixtures/sample_metadata.xml";

#[test]
fn fixture_arranges_first_channel() {
    let tiles = arrange_acquisition(Path::new(FIXTURE), ChannelId::new(0)).expect("arrange");

    assert_eq!(tiles.layout.tile_count, 4);
    assert_eq!(tiles.layout.tiles.len(), 4);
    assert_eq!(tiles.tile_size, TileSize::new(2048, 1536));
    // The repeated tile 1 record at (1850, 4) is ignored.
    assert_eq!(tiles.layout.tiles[1].1, CanonicalLocation::from_raw(1843, 0));
}

#[test]
fn largest_tile_id_does_not_wrap_tile_count() {
    let metadata = from_acquisition_xml_str(
        r#"<Metadata><Image><Bounds StartX="0" StartY="0" StartC="0" StartM="4294967295" SizeX="8" SizeY="8"/></Image></Metadata>"#,
    )
    .expect("parse");
    let tiles = arrange_metadata(&metadata, ChannelId::new(0)).expect("arrange");

    assert_eq!(tiles.layout.tile_count, 4_294_967_296);
    assert_eq!(tiles.layout.tiles.len(), 1);
}

#[test]
fn describe_writes_parseable_dataset() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("dataset_gen.xml");

    describe_acquisition(
        Path::new(FIXTURE),
        ChannelId::new(0),
        "191114_scan_m{xxx}_DAPI_ORG.tif",
        &output,
    )
    .expect("describe");

    let xml = fs::read_to_string(&output).expect("read output");
    let doc = Document::parse(&xml).expect("valid xml");
    assert_eq!(doc.root_element().tag_name().name(), "SpimData");

    let registrations = doc
        .descendants()
        .filter(|n| n.has_tag_name("ViewRegistration"))
        .count();
    assert_eq!(registrations, 4);

    let files: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("file"))
        .filter_map(|n| n.text())
        .collect();
    for file in &files {
        let (channel, _) = parse_tile_file_name(file).expect("decodable file name");
        assert_eq!(channel, "DAPI");
    }
    assert_eq!(files.len(), 4);
}

#[test]
fn describe_rejects_pattern_without_placeholder() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("dataset_gen.xml");

    let err = describe_acquisition(Path::new(FIXTURE), ChannelId::new(0), "tile.tif", &output)
        .unwrap_err();
    assert!(matches!(
        err,
        StitchPrepError::ConfigValidation {
            field: "pattern",
            ..
        }
    ));
    assert!(!output.exists());
}

#[test]
fn stitch_macro_file_is_named_after_region() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let config = MacroConfig {
        img_dir: temp.path().to_path_buf(),
        out_dir: temp.path().to_path_buf(),
        num_tiles: TileSpec::Count(5),
        tiling_mode: "grid".to_string(),
        region: 3,
        ..Default::default()
    };

    let path = generate_stitch_macro(&config).expect("generate");
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("reg3_bigstitcher_macro.ijm")
    );

    let text = fs::read_to_string(&path).expect("read macro");
    assert!(text.contains("1,2,3,4,5"));
    assert!(text.contains("[Grid: Right & Down      ]"));
}

#[test]
fn fuse_macro_file_name_is_fixed() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let out_dir = temp.path().join("fused");
    fs::create_dir_all(&out_dir).expect("create out dir");

    let config = FuseConfig {
        img_dir: temp.path().to_path_buf(),
        out_dir,
        xml_file_name: "dataset_gen.xml".to_string(),
    };

    let path = generate_fuse_macro(&config).expect("generate");
    assert_eq!(path, temp.path().join(FUSE_MACRO_FILE_NAME));
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("fuse_only_macro.ijm")
    );
}

#[test]
fn unwritable_output_directory_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let config = MacroConfig {
        img_dir: temp.path().to_path_buf(),
        out_dir: temp.path().join("missing"),
        tiling_mode: "snake".to_string(),
        ..Default::default()
    };

    let err = generate_stitch_macro(&config).unwrap_err();
    assert!(matches!(err, StitchPrepError::OutputWrite { .. }));
}
