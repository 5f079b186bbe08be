//! Macro file output.

use std::fs;
use std::path::{Path, PathBuf};

use super::config::{FuseConfig, MacroConfig};
use super::fuse::render_fuse_macro;
use super::stitch::render_stitch_macro;
use crate::error::StitchPrepError;

/// File name of the fusion macro, written next to the dataset description.
pub const FUSE_MACRO_FILE_NAME: &str = "fuse_only_macro.ijm";

/// Write `text` to `dir/file_name`, replacing any existing file.
///
/// The directory must already exist.
pub fn write_macro(dir: &Path, file_name: &str, text: &str) -> Result<PathBuf, StitchPrepError> {
    let path = dir.join(file_name);
    fs::write(&path, text).map_err(|source| StitchPrepError::OutputWrite {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = text.len(), "wrote macro");
    Ok(path)
}

/// Render the stitching macro and write it to `out_dir/reg<region>_bigstitcher_macro.ijm`.
pub fn generate_stitch_macro(config: &MacroConfig) -> Result<PathBuf, StitchPrepError> {
    let text = render_stitch_macro(config)?;
    write_macro(&config.out_dir, &config.macro_file_name(), &text)
}

/// Render the fusion macro and write it to `img_dir/fuse_only_macro.ijm`.
pub fn generate_fuse_macro(config: &FuseConfig) -> Result<PathBuf, StitchPrepError> {
    let text = render_fuse_macro(config)?;
    write_macro(&config.img_dir, FUSE_MACRO_FILE_NAME, &text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_existing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let first = write_macro(temp.path(), "a.ijm", "first").expect("write first");
        let second = write_macro(temp.path(), "a.ijm", "second").expect("write second");
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second).expect("read"), "second");
    }

    #[test]
    fn missing_directory_is_write_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("does-not-exist");
        let err = write_macro(&missing, "a.ijm", "text").unwrap_err();
        match err {
            StitchPrepError::OutputWrite { path, .. } => {
                assert_eq!(path, missing.join("a.ijm"))
            }
            other => panic!("expected OutputWrite, got {other:?}"),
        }
    }
}
