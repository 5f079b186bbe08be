#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use stitchprep::tiles::{ChannelId, TileId, TileRecord};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_tile_record(max_channel: u32, max_tile: u32) -> impl Strategy<Value = TileRecord> {
    (0..=max_channel, 0..=max_tile, 0u64..100_000, 0u64..100_000)
        .prop_map(|(channel, tile, x, y)| TileRecord::new(channel, tile, x, y))
}

pub fn arb_records(
    max_channel: u32,
    max_tile: u32,
    max_len: usize,
) -> impl Strategy<Value = Vec<TileRecord>> {
    proptest::collection::vec(arb_tile_record(max_channel, max_tile), 1..=max_len)
}

/// First-seen position per `(channel, tile)`, computed independently of the crate.
pub fn first_positions(records: &[TileRecord]) -> BTreeMap<(ChannelId, TileId), (u64, u64)> {
    let mut out = BTreeMap::new();
    for record in records {
        out.entry((record.channel, record.tile))
            .or_insert((record.x, record.y));
    }
    out
}

pub fn distinct_tiles(records: &[TileRecord], channel: ChannelId) -> BTreeSet<TileId> {
    records
        .iter()
        .filter(|r| r.channel == channel)
        .map(|r| r.tile)
        .collect()
}

/// Builds an acquisition metadata document with one `<Image>` per record.
pub fn metadata_xml(records: &[TileRecord], size_x: u32, size_y: u32) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Metadata>\n");
    for record in records {
        writeln!(
            xml,
            "  <Image><Bounds StartX=\"{}\" StartY=\"{}\" StartC=\"{}\" StartM=\"{}\" SizeX=\"{size_x}\" SizeY=\"{size_y}\"/></Image>",
            record.x, record.y, record.channel, record.tile
        )
        .expect("write to string");
    }
    xml.push_str("</Metadata>\n");
    xml
}
