//! Semantic versions and host compatibility ranges.
//!
//! Plugins declare the host versions they work with as a [`VersionRange`];
//! the host checks its own [`SemanticVersion`] against that range before
//! letting the plugin register anything.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Result type for version parsing.
pub type VersionResult<T> = Result<T, VersionError>;

/// Malformed version or range input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Not a `MAJOR.MINOR.PATCH` triple.
    #[error("Invalid semantic version '{input}'. Expected 'MAJOR.MINOR.PATCH'")]
    InvalidVersion { input: String },

    /// Range text does not follow the range grammar.
    #[error("Invalid version range '{input}': {reason}")]
    InvalidRange { input: String, reason: String },

    /// Minimum is not strictly below the maximum.
    #[error("Empty version range: minimum {min} must be less than maximum {max}")]
    EmptyRange { min: SemanticVersion, max: SemanticVersion },
}

/// A minimal semantic version (`MAJOR.MINOR.PATCH`).
///
/// Ordering is lexicographic over the triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemanticVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl SemanticVersion {
    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parse `MAJOR.MINOR.PATCH`.
    pub fn parse(input: &str) -> VersionResult<Self> {
        let invalid = || VersionError::InvalidVersion { input: input.to_string() };

        let parts: Vec<&str> = input.trim().split('.').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let mut components = [0u32; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }

        Ok(Self::new(components[0], components[1], components[2]))
    }

    pub const fn major(&self) -> u32 {
        self.major
    }

    pub const fn minor(&self) -> u32 {
        self.minor
    }

    pub const fn patch(&self) -> u32 {
        self.patch
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Host compatibility window: inclusive minimum, exclusive maximum.
///
/// Either bound may be absent; with both absent the range matches every
/// version and formats as `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionRange {
    min_inclusive: Option<SemanticVersion>,
    max_exclusive: Option<SemanticVersion>,
}

impl VersionRange {
    /// Matches any host version.
    pub const ANY: Self = Self { min_inclusive: None, max_exclusive: None };

    /// Create a range, rejecting `min >= max`.
    pub fn new(
        min_inclusive: Option<SemanticVersion>,
        max_exclusive: Option<SemanticVersion>,
    ) -> VersionResult<Self> {
        if let (Some(min), Some(max)) = (min_inclusive, max_exclusive) {
            if min >= max {
                return Err(VersionError::EmptyRange { min, max });
            }
        }
        Ok(Self { min_inclusive, max_exclusive })
    }

    /// `>=min`
    pub const fn at_least(min: SemanticVersion) -> Self {
        Self { min_inclusive: Some(min), max_exclusive: None }
    }

    /// `<max`
    pub const fn below(max: SemanticVersion) -> Self {
        Self { min_inclusive: None, max_exclusive: Some(max) }
    }

    pub const fn min_inclusive(&self) -> Option<SemanticVersion> {
        self.min_inclusive
    }

    pub const fn max_exclusive(&self) -> Option<SemanticVersion> {
        self.max_exclusive
    }

    /// Whether this range places no constraint at all.
    pub const fn is_any(&self) -> bool {
        self.min_inclusive.is_none() && self.max_exclusive.is_none()
    }

    /// Check whether `version` falls inside the range.
    pub fn contains(&self, version: SemanticVersion) -> bool {
        if let Some(min) = self.min_inclusive {
            if version < min {
                return false;
            }
        }
        if let Some(max) = self.max_exclusive {
            if version >= max {
                return false;
            }
        }
        true
    }

    /// Parse one of `*`, `>=x.y.z`, `<x.y.z` or `>=x.y.z <a.b.c`.
    ///
    /// Tokens are not limited to two: a repeated `>=` or `<` token replaces
    /// the earlier bound of the same kind, so `>=1.0.0 >=2.0.0` means
    /// `>=2.0.0`.
    pub fn parse(input: &str) -> VersionResult<Self> {
        let invalid = |reason: &str| VersionError::InvalidRange {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("range is empty"));
        }
        if trimmed == "*" {
            return Ok(Self::ANY);
        }

        let mut min = None;
        let mut max = None;

        for token in trimmed.split_whitespace() {
            if let Some(rest) = token.strip_prefix(">=") {
                min = Some(SemanticVersion::parse(rest).map_err(|_| invalid("bad minimum"))?);
            } else if let Some(rest) = token.strip_prefix('<') {
                max = Some(SemanticVersion::parse(rest).map_err(|_| invalid("bad maximum"))?);
            } else {
                return Err(invalid(&format!("unrecognized token '{token}'")));
            }
        }

        if min.is_none() && max.is_none() {
            return Err(invalid("no constraints"));
        }

        Self::new(min, max)
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::ANY
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min_inclusive, self.max_exclusive) {
            (None, None) => f.write_str("*"),
            (Some(min), None) => write!(f, ">={min}"),
            (None, Some(max)) => write!(f, "<{max}"),
            (Some(min), Some(max)) => write!(f, ">={min} <{max}"),
        }
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn v(major: u32, minor: u32, patch: u32) -> SemanticVersion {
        SemanticVersion::new(major, minor, patch)
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(SemanticVersion::parse("1.2.3").unwrap(), v(1, 2, 3));
        assert_eq!(SemanticVersion::parse(" 0.10.0 ").unwrap(), v(0, 10, 0));
    }

    #[test]
    fn test_version_round_trip() {
        for (a, b, c) in [(0, 0, 0), (1, 2, 3), (10, 0, 42), (u32::MAX, 7, 0)] {
            assert_eq!(SemanticVersion::parse(&v(a, b, c).to_string()).unwrap(), v(a, b, c));
        }
    }

    #[test]
    fn test_invalid_versions() {
        for input in ["", "1", "1.2", "1.2.3.4", "a.b.c", "1.-2.3", "1..3", "1.2.x", "-1.0.0"] {
            let err = SemanticVersion::parse(input).unwrap_err();
            assert!(err.to_string().contains(input), "error should name '{input}': {err}");
        }
    }

    #[test]
    fn test_version_ordering() {
        assert!(v(1, 0, 0) > v(0, 9, 9));
        assert!(v(1, 2, 0) < v(1, 10, 0));
        assert!(v(1, 2, 3) < v(1, 2, 4));
        assert_eq!(v(2, 0, 0).cmp(&v(2, 0, 0)), Ordering::Equal);
    }

    #[test]
    fn test_range_boundaries() {
        let range = VersionRange::new(Some(v(1, 0, 0)), Some(v(2, 0, 0))).unwrap();

        assert!(!range.contains(v(0, 9, 9)));
        assert!(range.contains(v(1, 0, 0)));
        assert!(range.contains(v(1, 99, 0)));
        assert!(!range.contains(v(2, 0, 0)));
    }

    #[test]
    fn test_any_contains_everything() {
        assert!(VersionRange::ANY.contains(v(0, 0, 0)));
        assert!(VersionRange::ANY.contains(v(99, 0, 1)));
    }

    #[test]
    fn test_parse_ranges() {
        assert_eq!(VersionRange::parse("*").unwrap(), VersionRange::ANY);
        assert_eq!(VersionRange::parse(">=1.2.3").unwrap(), VersionRange::at_least(v(1, 2, 3)));
        assert_eq!(VersionRange::parse("<2.0.0").unwrap(), VersionRange::below(v(2, 0, 0)));

        let both = VersionRange::parse("  >=0.1.0   <1.0.0 ").unwrap();
        assert_eq!(both.min_inclusive(), Some(v(0, 1, 0)));
        assert_eq!(both.max_exclusive(), Some(v(1, 0, 0)));

        let repeated = VersionRange::parse(">=1.0.0 <5.0.0 >=2.0.0").unwrap();
        assert_eq!(repeated.to_string(), ">=2.0.0 <5.0.0");
    }

    #[test]
    fn test_range_formatting() {
        assert_eq!(VersionRange::ANY.to_string(), "*");
        assert_eq!(VersionRange::at_least(v(1, 0, 0)).to_string(), ">=1.0.0");
        assert_eq!(VersionRange::below(v(2, 0, 0)).to_string(), "<2.0.0");
        assert_eq!(VersionRange::parse(">=1.0.0 <2.0.0").unwrap().to_string(), ">=1.0.0 <2.0.0");
        assert_eq!(VersionRange::parse(&VersionRange::ANY.to_string()).unwrap(), VersionRange::ANY);
    }

    #[test]
    fn test_empty_range_rejected() {
        assert!(matches!(
            VersionRange::parse(">=2.0.0 <2.0.0"),
            Err(VersionError::EmptyRange { .. })
        ));
        assert!(VersionRange::new(Some(v(3, 0, 0)), Some(v(2, 0, 0))).is_err());
    }

    #[test]
    fn test_invalid_ranges() {
        for input in ["", "   ", "1.0.0", "=1.0.0", ">1.0.0", ">=1.0", "<x.y.z", ">=1.0.0 ~2"] {
            assert!(VersionRange::parse(input).is_err(), "'{input}' should fail");
        }
    }

    #[test]
    fn test_serde_uses_text_form() {
        let range = VersionRange::parse(">=0.1.0 <1.0.0").unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, "\">=0.1.0 <1.0.0\"");

        let back: VersionRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);

        let version: SemanticVersion = serde_json::from_str("\"0.3.1\"").unwrap();
        assert_eq!(version, v(0, 3, 1));
    }
}
