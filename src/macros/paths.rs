//! Path rendering for macro text.
//!
//! ImageJ macros take POSIX-style absolute paths on every platform.

use std::path::{absolute, Path, MAIN_SEPARATOR};

use crate::error::StitchPrepError;

/// Makes `path` absolute (without resolving symlinks) and joins it with `/`.
pub fn to_posix_string(path: &Path, field: &'static str) -> Result<String, StitchPrepError> {
    let resolved = absolute(path).map_err(|source| StitchPrepError::ConfigValidation {
        field,
        message: format!("cannot resolve '{}': {source}", path.display()),
    })?;

    let text = resolved.to_string_lossy();
    if MAIN_SEPARATOR == '\\' {
        Ok(text.replace('\\', "/"))
    } else {
        Ok(text.into_owned())
    }
}
