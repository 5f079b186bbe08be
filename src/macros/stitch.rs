//! BigStitcher stitching macro.
//!
//! The macro defines the dataset, computes pairwise shifts by phase
//! correlation, filters links below 0.7 correlation, runs the two-round
//! global optimization and quits Fiji. Everything outside the substituted
//! values is consumed verbatim by BigStitcher's macro recorder syntax.

use super::config::MacroConfig;
use super::paths::to_posix_string;
use crate::error::StitchPrepError;

/// Render the stitching macro for `config`.
pub fn render_stitch_macro(config: &MacroConfig) -> Result<String, StitchPrepError> {
    let tiling_mode = config.validate()?;

    let img_dir = to_posix_string(&config.img_dir, "img_dir")?;
    let path_to_xml_file = to_posix_string(&config.xml_path(), "xml_file_name")?;
    let pattern = &config.pattern;
    let num_tiles = config.num_tiles.expand();
    let num_tiles_x = config.num_tiles_x;
    let num_tiles_y = config.num_tiles_y;
    let overlap_x = config.overlap_x;
    let overlap_y = config.overlap_y;
    let overlap_z = config.overlap_z;
    let pixel_distance_x = config.pixel_distance_x;
    let pixel_distance_y = config.pixel_distance_y;
    let pixel_distance_z = config.pixel_distance_z;
    let tiling_mode = tiling_mode.token();

    Ok(format!(
        r#"
    // define dataset
    run("BigStitcher",
        "select=define" +
        " define_dataset=[Manual Loader (Bioformats based)]" +
        " project_filename={path_to_xml_file}" +
        " multiple_timepoints=[NO (one time-point)]" +
        " multiple_channels=[NO (one channel)]" +
        " _____multiple_illumination_directions=[NO (one illumination direction)]" +
        " multiple_angles=[NO (one angle)]" +
        " multiple_tiles=[YES (one file per tile)]" +
        " image_file_directory={img_dir}" +
        " image_file_pattern={pattern}" +
        " timepoints_=1" +
        " tiles_={num_tiles}" +
        " move_tiles_to_grid_(per_angle)?=[Move Tile to Grid (Macro-scriptable)]" +
        " grid_type={tiling_mode}" +
        " tiles_x={num_tiles_x}" +
        " tiles_y={num_tiles_y}" +
        " tiles_z=1" +
        " overlap_x_(%)={overlap_x}" +
        " overlap_y_(%)={overlap_y}" +
        " overlap_z_(%)={overlap_z}" +
        " calibration_type=[Same voxel-size for all views]" +
        " calibration_definition=[User define voxel-size(s)]" +
        " imglib2_data_container=[ArrayImg (faster)]" +
        " pixel_distance_x={pixel_distance_x}" +
        " pixel_distance_y={pixel_distance_y}" +
        " pixel_distance_z={pixel_distance_z}" +
        " pixel_unit=um");

    // calculate pairwise shifts
    run("Calculate pairwise shifts ...",
        "select={path_to_xml_file}" +
        " process_angle=[All angles]" +
        " process_channel=[All channels]" +
        " process_illumination=[All illuminations]" +
        " process_tile=[All tiles]" +
        " process_timepoint=[All Timepoints]" +
        " method=[Phase Correlation]" +
        " show_expert_algorithm_parameters" +
        " downsample_in_x=1" +
        " downsample_in_y=1" +
        " number=5" +
        " minimal=10" +
        " subpixel");

    // filter shifts with 0.7 corr. threshold
    run("Filter pairwise shifts ...",
        "select={path_to_xml_file}" +
        " filter_by_link_quality" +
        " min_r=0.7" +
        " max_r=1" +
        " max_shift_in_x=0" +
        " max_shift_in_y=0" +
        " max_shift_in_z=0" +
        " max_displacement=0");

    // do global optimization
    run("Optimize globally and apply shifts ...",
        "select={path_to_xml_file}" +
        " process_angle=[All angles]" +
        " process_channel=[All channels]" +
        " process_illumination=[All illuminations]" +
        " process_tile=[All tiles]" +
        " process_timepoint=[All Timepoints]" +
        " relative=2.500" +
        " absolute=3.500" +
        " global_optimization_strategy=[Two-Round using Metadata to align unconnected Tiles]" +
        " fix_group_0-0,");


    // quit after we are finished
    run("Quit");
    eval("script", "System.exit(0);");

    "#
    ))
}
