//! BigStitcher fusion macro.

use super::config::FuseConfig;
use super::paths::to_posix_string;
use crate::error::StitchPrepError;

/// Render the fusion macro for `config`.
///
/// Fuses all views of the dataset to 16-bit compressed TIFF stacks in
/// `out_dir`, one per timepoint and channel.
pub fn render_fuse_macro(config: &FuseConfig) -> Result<String, StitchPrepError> {
    config.validate()?;

    let path_to_xml_file = to_posix_string(&config.xml_path(), "xml_file_name")?;
    let out_dir = to_posix_string(&config.out_dir, "out_dir")?;

    Ok(format!(
        r#"
    // fuse dataset, save as TIFF
    run("Fuse dataset ...",
        "select={path_to_xml_file}" +
        " process_angle=[All angles]" +
        " process_channel=[All channels]" +
        " process_illumination=[All illuminations]" +
        " process_tile=[All tiles]" +
        " process_timepoint=[All Timepoints]" +
        " bounding_box=[All Views]" +
        " downsampling=1" +
        " pixel_type=[16-bit unsigned integer]" +
        " interpolation=[Linear Interpolation]" +
        " image=[Precompute Image]" +
        " interest_points_for_non_rigid=[-= Disable Non-Rigid =-]" +
        " blend produce=[Each timepoint & channel]" +
        " fused_image=[Save as (compressed) TIFF stacks]" +
        " output_file_directory={out_dir}");

    "#
    ))
}
