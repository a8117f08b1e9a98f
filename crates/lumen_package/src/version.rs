//! Semantic versions and the half-open ranges used to pin dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `(major, minor, patch)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version { major, minor, patch }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError(pub String);

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad version format: {:?}", self.0)
    }
}

impl std::error::Error for VersionParseError {}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(VersionParseError(s.to_string()));
        }
        let parse = |p: &str| p.parse::<u32>().map_err(|_| VersionParseError(s.to_string()));
        Ok(Version {
            major: parse(parts[0])?,
            minor: parse(parts[1])?,
            patch: parse(parts[2])?,
        })
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A dependency version constraint of the form `MIN <= v < MAX`, stored
/// and round-tripped through its exact textual spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    pub min: Version,
    pub max: Version,
    raw: String,
}

impl VersionRange {
    pub fn new(min: Version, max: Version) -> Self {
        let raw = format!("{} <= v < {}", min, max);
        VersionRange { min, max, raw }
    }

    pub fn contains(&self, v: &Version) -> bool {
        *v >= self.min && *v < self.max
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for VersionRange {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionParseError(s.to_string());
        let mid = s.find("<= v <").ok_or_else(invalid)?;
        let (min_part, rest) = s.split_at(mid);
        let max_part = &rest["<= v <".len()..];
        let min = min_part.trim().parse::<Version>().map_err(|_| invalid())?;
        let max = max_part.trim().parse::<Version>().map_err(|_| invalid())?;
        Ok(VersionRange {
            min,
            max,
            raw: s.trim().to_string(),
        })
    }
}

impl Serialize for VersionRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_round_trips_through_display_and_parse() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.to_string(), "1.2.3");
        assert_eq!("1.2.3".parse::<Version>().unwrap(), v);
    }

    #[test]
    fn malformed_version_is_an_error() {
        assert!("1.2".parse::<Version>().is_err());
        assert!("a.b.c".parse::<Version>().is_err());
    }

    #[test]
    fn version_range_parses_and_contains_checks_bounds() {
        let range: VersionRange = "1.0.0 <= v < 2.0.0".parse().unwrap();
        assert!(range.contains(&Version::new(1, 0, 0)));
        assert!(range.contains(&Version::new(1, 9, 9)));
        assert!(!range.contains(&Version::new(2, 0, 0)));
        assert!(!range.contains(&Version::new(0, 9, 9)));
    }

    #[test]
    fn version_range_round_trips_verbatim() {
        let raw = "1.2.3 <= v < 2.0.0";
        let range: VersionRange = raw.parse().unwrap();
        assert_eq!(range.as_str(), raw);
        assert_eq!(range.to_string(), raw);
    }

    #[test]
    fn malformed_version_ranges_are_rejected() {
        assert!("1.0.0 <= v <= 1.2.0".parse::<VersionRange>().is_err());
        assert!("1.0 <= v < 1.2.0".parse::<VersionRange>().is_err());
        assert!("foo".parse::<VersionRange>().is_err());
    }

    #[test]
    fn version_range_serde_round_trips_through_json() {
        let range: VersionRange = "1.0.0 <= v < 2.0.0".parse().unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, "\"1.0.0 <= v < 2.0.0\"");
        let back: VersionRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
    }
}
