//! Format version numbers.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A `major.minor.release` format version.
///
/// Ordering is lexicographic over the three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub release: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, release: u32) -> Self {
        Self {
            major,
            minor,
            release,
        }
    }
}

/// Format version stamped on newly created files.
pub const CURRENT_FORMAT_VERSION: Version = Version::new(2, 5, 0);

impl FromStr for Version {
    type Err = Error;

    /// Parse `"a"`, `"a.b"` or `"a.b.c"`; missing fields are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidVersion(s.to_string());
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }
        let mut fields = [0u32; 3];
        let mut parts = trimmed.split('.');
        for field in fields.iter_mut() {
            match parts.next() {
                Some(p) => *field = p.parse().map_err(|_| invalid())?,
                None => break,
            }
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Version::new(fields[0], fields[1], fields[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_and_partial() {
        assert_eq!("2.5.0".parse::<Version>().unwrap(), Version::new(2, 5, 0));
        assert_eq!("2.4".parse::<Version>().unwrap(), Version::new(2, 4, 0));
        assert_eq!("3".parse::<Version>().unwrap(), Version::new(3, 0, 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Version>().is_err());
        assert!("2.x".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert!("-1".parse::<Version>().is_err());
    }

    #[test]
    fn ordering() {
        assert!(Version::new(2, 5, 0) > Version::new(2, 4, 9));
        assert!(Version::new(1, 0, 0) < Version::new(1, 0, 1));
        assert!(Version::default() <= CURRENT_FORMAT_VERSION);
    }

    #[test]
    fn display_roundtrips() {
        let v = Version::new(2, 5, 1);
        assert_eq!(v.to_string().parse::<Version>().unwrap(), v);
    }
}
