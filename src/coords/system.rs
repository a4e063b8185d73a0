//! Coordinate-system tags.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::util::{Error, Result};

/// Coordinate system in which sample locations are expressed.
///
/// Equality and hashing go by tag text, so `Other("Spherical")` is the
/// same system as `Spherical`.
#[derive(Clone, Debug)]
pub enum CoordinateSystem {
    /// `(range, azimuth, elevation)`: range in the data's length unit,
    /// azimuth clockwise from north and elevation above the horizon, both
    /// in degrees.
    Spherical,
    /// `(x, y, z)` with x east, y north, z up.
    Cartesian,
    /// Any other tag. Only the identity conversion is available.
    Other(String),
}

impl PartialEq for CoordinateSystem {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for CoordinateSystem {}

impl Hash for CoordinateSystem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl CoordinateSystem {
    /// The tag as stored in archives.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Spherical => "Spherical",
            Self::Cartesian => "Cartesian",
            Self::Other(name) => name,
        }
    }

    /// The named variant for known tags; [`From<&str>`] applied to the tag.
    pub fn canonical(&self) -> Self {
        Self::from(self.as_str())
    }
}

impl From<&str> for CoordinateSystem {
    fn from(tag: &str) -> Self {
        match tag {
            "Spherical" => Self::Spherical,
            "Cartesian" => Self::Cartesian,
            other => Self::Other(other.to_string()),
        }
    }
}

impl FromStr for CoordinateSystem {
    type Err = Error;

    /// Parse a tag; only the empty string is rejected.
    fn from_str(tag: &str) -> Result<Self> {
        if tag.is_empty() {
            return Err(Error::argument("empty coordinate system tag"));
        }
        Ok(Self::from(tag))
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(CoordinateSystem::from("Spherical"), CoordinateSystem::Spherical);
        assert_eq!(CoordinateSystem::from("Cartesian").to_string(), "Cartesian");
        // Tags are case sensitive.
        assert_eq!(
            CoordinateSystem::from("cartesian"),
            CoordinateSystem::Other("cartesian".to_string())
        );
        assert_eq!(CoordinateSystem::from("ENU").as_str(), "ENU");
        assert_eq!("Spherical".parse::<CoordinateSystem>().unwrap(), CoordinateSystem::Spherical);
        assert!("".parse::<CoordinateSystem>().is_err());
    }

    #[test]
    fn test_other_with_known_tag_is_canonical() {
        use std::collections::HashSet;

        let spelled = CoordinateSystem::Other("Spherical".to_string());
        assert_eq!(spelled, CoordinateSystem::Spherical);
        assert_ne!(spelled, CoordinateSystem::Cartesian);
        assert!(matches!(spelled.canonical(), CoordinateSystem::Spherical));

        let set: HashSet<CoordinateSystem> = [spelled, CoordinateSystem::Spherical].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
