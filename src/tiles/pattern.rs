//! Tile file name patterns.
//!
//! BigStitcher addresses per-tile files with a pattern such as
//! `scan_m{xxx}_DAPI_ORG.tif`, where the run of `x` characters inside braces
//! is replaced by the zero-padded tile index.

use std::fmt;

use crate::error::StitchPrepError;

/// A parsed file name pattern with exactly one `{x..x}` placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePattern {
    raw: String,
    prefix_end: usize,
    suffix_start: usize,
    width: usize,
}

impl FilePattern {
    /// Parses a pattern, requiring exactly one placeholder.
    pub fn parse(raw: &str) -> Result<Self, StitchPrepError> {
        let mut found: Option<(usize, usize)> = None;
        let mut search_from = 0;

        while let Some(rel) = raw[search_from..].find('{') {
            let open = search_from + rel;
            let body_start = open + 1;
            let body_len = raw[body_start..]
                .bytes()
                .take_while(|b| *b == b'x')
                .count();
            let close = body_start + body_len;

            if body_len > 0 && raw[close..].starts_with('}') {
                if found.is_some() {
                    return Err(invalid_pattern(
                        raw,
                        "contains more than one {x..x} placeholder",
                    ));
                }
                found = Some((open, close + 1));
                search_from = close + 1;
            } else {
                search_from = body_start;
            }
        }

        let Some((prefix_end, suffix_start)) = found else {
            return Err(invalid_pattern(raw, "missing {x..x} tile index placeholder"));
        };

        Ok(Self {
            raw: raw.to_string(),
            prefix_end,
            suffix_start,
            width: suffix_start - prefix_end - 2,
        })
    }

    /// The pattern text as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of digits the tile index is padded to.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Expands the placeholder with `index`, zero-padded to the placeholder width.
    pub fn file_name(&self, index: u32) -> String {
        format!(
            "{}{:0width$}{}",
            &self.raw[..self.prefix_end],
            index,
            &self.raw[self.suffix_start..],
            width = self.width
        )
    }
}

impl fmt::Display for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn invalid_pattern(raw: &str, reason: &str) -> StitchPrepError {
    StitchPrepError::ConfigValidation {
        field: "pattern",
        message: format!("'{raw}' {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_zero_padded_index() {
        let pattern = FilePattern::parse("scan_m{xxx}_DAPI_ORG.tif").expect("parse");
        assert_eq!(pattern.width(), 3);
        assert_eq!(pattern.file_name(7), "scan_m007_DAPI_ORG.tif");
        assert_eq!(pattern.file_name(1234), "scan_m1234_DAPI_ORG.tif");
    }

    #[test]
    fn default_macro_pattern_parses() {
        let pattern = FilePattern::parse("1_{xxxxx}_Z001.tif").expect("parse");
        assert_eq!(pattern.file_name(12), "1_00012_Z001.tif");
    }

    #[test]
    fn ignores_braces_that_are_not_placeholders() {
        let pattern = FilePattern::parse("{a}_{xx}.tif").expect("parse");
        assert_eq!(pattern.file_name(3), "{a}_03.tif");
    }

    #[test]
    fn rejects_missing_placeholder() {
        let err = FilePattern::parse("tile.tif").unwrap_err();
        match err {
            StitchPrepError::ConfigValidation { field, message } => {
                assert_eq!(field, "pattern");
                assert!(message.contains("missing"));
            }
            other => panic!("expected ConfigValidation, got {other:?}"),
        }
    }

    #[test]
    fn rejects_two_placeholders() {
        assert!(FilePattern::parse("{xx}_{xxx}.tif").is_err());
    }

    #[test]
    fn rejects_empty_braces() {
        assert!(FilePattern::parse("tile_{}.tif").is_err());
    }
}
