//! Four-part release identity.
//!
//! A version is `major.minor.point.build`. The first three parts come from a
//! one-line release file checked into the project; the build number comes
//! from CI (the `BUILD_NUMBER` variable) or falls back to a fixed dev value.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Build number used when CI does not provide one.
pub const DEV_BUILD_NUMBER: u32 = 1337;

/// Environment variable CI sets to the build number.
pub const DEFAULT_BUILD_NUMBER_ENV: &str = "BUILD_NUMBER";

/// Release version: major, minor, point and build number.
///
/// Ordering compares the parts left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    major: u32,
    minor: u32,
    point: u32,
    build: u32,
}

impl Version {
    /// Create a version from its four parts.
    #[must_use]
    pub const fn new(major: u32, minor: u32, point: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            point,
            build,
        }
    }

    /// Parse a three-part release string (`1.2.3`) and attach a build number.
    pub fn from_release(text: &str, build: u32) -> Result<Self> {
        let [major, minor, point] = parse_parts::<3>(text.trim())?;
        Ok(Self::new(major, minor, point, build))
    }

    /// Read a release file and attach a build number.
    ///
    /// Only the first line is considered.
    pub fn load(path: &Path, build: u32) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let first = contents.lines().next().unwrap_or_default();
        tracing::debug!(path = %path.display(), release = first.trim(), "loaded release file");
        Self::from_release(first, build)
    }

    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    #[must_use]
    pub const fn point(&self) -> u32 {
        self.point
    }

    #[must_use]
    pub const fn build(&self) -> u32 {
        self.build
    }

    /// The parts in order, as emitted into generated sources.
    #[must_use]
    pub const fn parts(&self) -> [u32; 4] {
        [self.major, self.minor, self.point, self.build]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.point, self.build
        )
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let [major, minor, point, build] = parse_parts::<4>(s.trim())?;
        Ok(Self::new(major, minor, point, build))
    }
}

fn parse_parts<const N: usize>(text: &str) -> Result<[u32; N]> {
    let mut parts = [0; N];
    let mut count = 0;

    for piece in text.split('.') {
        if count == N {
            count += 1;
            break;
        }
        parts[count] = piece
            .parse()
            .map_err(|_| Error::InvalidVersion(format!("{text:?}: {piece:?} is not a number")))?;
        count += 1;
    }

    if count != N {
        return Err(Error::InvalidVersion(format!(
            "{text:?}: expected {N} period-separated parts"
        )));
    }
    Ok(parts)
}

/// Resolves the build number for the current invocation.
pub struct BuildNumber;

impl BuildNumber {
    /// Read the build number from `var`, or use `default` when it is unset.
    pub fn resolve(var: &str, default: u32) -> Result<u32> {
        Self::from_value(var, std::env::var(var).ok().as_deref(), default)
    }

    /// Interpret an already-read value of `var`.
    ///
    /// Empty values count as unset.
    pub fn from_value(var: &str, value: Option<&str>, default: u32) -> Result<u32> {
        match value.map(str::trim) {
            None | Some("") => {
                tracing::debug!(var, default, "build number unset, using default");
                Ok(default)
            }
            Some(value) => value.parse().map_err(|_| Error::InvalidBuildNumber {
                var: var.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_part_version() {
        let version: Version = "1.2.3.4".parse().unwrap();
        assert_eq!(version, Version::new(1, 2, 3, 4));
        assert_eq!(version.to_string(), "1.2.3.4");
    }

    #[test]
    fn rejects_wrong_part_count() {
        assert!("1.2.3".parse::<Version>().is_err());
        assert!("1.2.3.4.5".parse::<Version>().is_err());
        assert!(Version::from_release("1.2", 1).is_err());
        assert!(Version::from_release("1.2.3.4", 1).is_err());
    }

    #[test]
    fn rejects_non_numeric_parts() {
        let err = "1.x.3.4".parse::<Version>().unwrap_err();
        assert!(err.to_string().contains("\"x\""));
        assert!("1.-2.3.4".parse::<Version>().is_err());
        assert!("1..3.4".parse::<Version>().is_err());
    }

    #[test]
    fn release_string_is_trimmed() {
        let version = Version::from_release(" 3.10.0\n", 42).unwrap();
        assert_eq!(version.parts(), [3, 10, 0, 42]);
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Version::new(1, 2, 3, 4) < Version::new(1, 2, 4, 0));
        assert!(Version::new(2, 0, 0, 0) > Version::new(1, 99, 99, 99));
        assert!(Version::new(1, 2, 3, 4) < Version::new(1, 2, 3, 5));
    }

    #[test]
    fn load_reads_first_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mb_version");
        std::fs::write(&path, "2.5.1\nignored\n").unwrap();

        let version = Version::load(&path, DEV_BUILD_NUMBER).unwrap();
        assert_eq!(version, Version::new(2, 5, 1, 1337));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Version::load(&dir.path().join("nope"), 1).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn build_number_defaults_when_unset() {
        assert_eq!(BuildNumber::from_value("BUILD_NUMBER", None, 1337).unwrap(), 1337);
        assert_eq!(BuildNumber::from_value("BUILD_NUMBER", Some(""), 7).unwrap(), 7);
    }

    #[test]
    fn build_number_from_value() {
        assert_eq!(BuildNumber::from_value("BUILD_NUMBER", Some("512"), 1337).unwrap(), 512);
    }

    #[test]
    fn build_number_rejects_garbage() {
        let err = BuildNumber::from_value("CI_BUILD", Some("abc"), 1).unwrap_err();
        assert!(err.to_string().contains("$CI_BUILD"));
    }
}
