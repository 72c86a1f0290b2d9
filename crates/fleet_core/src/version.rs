//! Target versions of the mobility data specification.
//!
//! Supported range is `[0.2.0, 0.4.0)`. `MAJOR.MINOR` inputs are read as
//! `MAJOR.MINOR.0`.

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::error::FleetError;

pub const LOWER_SUPPORTED: Version = Version::new(0, 2, 0);
pub const UPPER_UNSUPPORTED: Version = Version::new(0, 4, 0);

/// First version whose records carry `publication_time` and millisecond timestamps.
const PUBLICATION_TIME_SINCE: Version = Version::new(0, 3, 0);

/// Unit for integer timestamps on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampUnit {
    Seconds,
    Milliseconds,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MdsVersion(Version);

impl MdsVersion {
    /// Parse and check against the supported range.
    pub fn parse(input: &str) -> Result<Self, FleetError> {
        let trimmed = input.trim();
        let padded = match trimmed.split('.').count() {
            1 => format!("{trimmed}.0.0"),
            2 => format!("{trimmed}.0"),
            _ => trimmed.to_string(),
        };
        let version = Version::parse(&padded).map_err(|_| FleetError::InvalidVersion(input.to_string()))?;
        let version = Self(version);
        if !version.is_supported() {
            return Err(FleetError::UnsupportedVersion(version.to_string()));
        }
        Ok(version)
    }

    /// Lowest supported version; the default target.
    pub fn lower() -> Self {
        Self(LOWER_SUPPORTED)
    }

    pub fn is_supported(&self) -> bool {
        LOWER_SUPPORTED <= self.0 && self.0 < UPPER_UNSUPPORTED
    }

    pub fn has_publication_time(&self) -> bool {
        self.0 >= PUBLICATION_TIME_SINCE
    }

    pub fn timestamp_unit(&self) -> TimestampUnit {
        if self.0 >= PUBLICATION_TIME_SINCE {
            TimestampUnit::Milliseconds
        } else {
            TimestampUnit::Seconds
        }
    }

    /// `MAJOR.MINOR`, as sent in API headers.
    pub fn header(&self) -> String {
        format!("{}.{}", self.0.major, self.0.minor)
    }
}

impl Default for MdsVersion {
    fn default() -> Self {
        Self::lower()
    }
}

impl fmt::Display for MdsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for MdsVersion {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_versions() {
        assert_eq!(MdsVersion::parse("0.3").expect("0.3").to_string(), "0.3.0");
        assert_eq!(MdsVersion::parse("0.2.1").expect("0.2.1").header(), "0.2");
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert_eq!(
            MdsVersion::parse("0.4.0"),
            Err(FleetError::UnsupportedVersion("0.4.0".to_string()))
        );
        assert_eq!(
            MdsVersion::parse("0.1"),
            Err(FleetError::UnsupportedVersion("0.1.0".to_string()))
        );
        assert!(matches!(MdsVersion::parse("banana"), Err(FleetError::InvalidVersion(_))));
    }

    #[test]
    fn publication_time_and_units_follow_version() {
        let old = MdsVersion::parse("0.2.0").expect("0.2.0");
        let new = MdsVersion::parse("0.3.1").expect("0.3.1");
        assert!(!old.has_publication_time());
        assert_eq!(old.timestamp_unit(), TimestampUnit::Seconds);
        assert!(new.has_publication_time());
        assert_eq!(new.timestamp_unit(), TimestampUnit::Milliseconds);
        assert!(old < new);
    }
}
