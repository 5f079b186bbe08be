//! Canonical tile locations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tile position in the dataset description's coordinate frame.
///
/// Raw stage positions are already expressed in pixels, so the mapping is
/// the identity onto the z = 0 plane. Two distinct raw positions therefore
/// never share a canonical location, and ordering follows `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalLocation {
    pub x: u64,
    pub y: u64,
}

impl CanonicalLocation {
    /// Canonicalizes a raw pixel position.
    #[inline]
    pub fn from_raw(x: u64, y: u64) -> Self {
        Self { x, y }
    }

    /// The z component; tiles of a 2D scan all lie in one plane.
    #[inline]
    pub fn z(&self) -> u64 {
        0
    }
}

/// Formats as the space-separated `x y z` triple used by `<location>`.
impl fmt::Display for CanonicalLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = CanonicalLocation::from_raw(1000, 250);
        assert_eq!(loc.to_string(), "1000 250 0");
    }

    #[test]
    fn test_location_ordering_follows_x_then_y() {
        let a = CanonicalLocation::from_raw(0, 500);
        let b = CanonicalLocation::from_raw(100, 0);
        let c = CanonicalLocation::from_raw(100, 1);
        assert!(a < b);
        assert!(b < c);
    }
}
