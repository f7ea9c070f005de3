//! Three-part numeric versions and interval ranges over them.
//!
//! Ranges use interval notation: `[` and `]` mark closed endpoints, `(` and
//! `)` open ones, and a bare version means "this version or later". Open
//! endpoints let the installer exclude a single broken release without
//! excluding its neighbours.
//!
//! ```
//! use nodejs_provision::{Version, VersionRange};
//!
//! let range: VersionRange = "[0.8.6,0.9.0)".parse().unwrap();
//! assert!(range.includes(&Version::new(0, 8, 6)));
//! assert!(!range.includes(&Version::new(0, 9, 0)));
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A `major.minor.patch` version. Ordering is lexicographic over the triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a strict `N.N.N` string.
    ///
    /// Leading zeros are accepted and normalized away, so `"007.01.2"`
    /// displays as `7.1.2`.
    pub fn parse(s: &str) -> Result<Self> {
        parse_components(s, false).map_err(|message| Error::InvalidVersion {
            version: s.to_string(),
            message,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Split a dotted version into numbers.
///
/// With `partial` set, one to three components are accepted and the missing
/// ones default to zero (range endpoints such as `0` in `[0,0.8.6)`).
fn parse_components(s: &str, partial: bool) -> std::result::Result<Version, String> {
    let tokens: Vec<&str> = s.split('.').collect();
    let allowed = if partial { 1..=3 } else { 3..=3 };

    if !allowed.contains(&tokens.len()) {
        return Err(format!(
            "expected {} dot-separated components, found {}",
            if partial { "1 to 3" } else { "3" },
            tokens.len()
        ));
    }

    let mut parts = [0u32; 3];
    for (part, token) in parts.iter_mut().zip(&tokens) {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("component '{}' is not a number", token));
        }
        *part = token
            .parse()
            .map_err(|_| format!("component '{}' is out of range", token))?;
    }

    Ok(Version::new(parts[0], parts[1], parts[2]))
}

/// An interval of versions with independently open or closed endpoints.
///
/// A missing right endpoint means the range is unbounded above; such a range
/// is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionRange {
    left: Version,
    left_closed: bool,
    right: Option<Version>,
    right_closed: bool,
    empty: bool,
}

impl VersionRange {
    pub fn new(
        left: Version,
        left_closed: bool,
        right: Option<Version>,
        right_closed: bool,
    ) -> Self {
        // Closedness of a missing endpoint is meaningless; normalize it so
        // equal ranges hash equally.
        let right_closed = right.is_some() && right_closed;
        let empty = match right {
            Some(right) => left > right || (left == right && !(left_closed && right_closed)),
            None => false,
        };

        Self {
            left,
            left_closed,
            right,
            right_closed,
            empty,
        }
    }

    /// `version` and everything after it.
    pub fn at_least(version: Version) -> Self {
        Self::new(version, true, None, false)
    }

    /// Exactly one version, `[version,version]`.
    pub fn exact(version: Version) -> Self {
        Self::new(version, true, Some(version), true)
    }

    /// Parse `[left,right)`-style interval notation or a bare version.
    ///
    /// Endpoints may omit trailing components (`0` is `0.0.0`) and an empty
    /// right endpoint (`[1.0.0,)`) leaves the range unbounded. Whitespace is
    /// allowed around delimiters but not inside a version.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        let left_closed = match trimmed.as_bytes().first() {
            None => return Err(range_error(s, "range is empty")),
            Some(b'[') => true,
            Some(b'(') => false,
            Some(_) => {
                if trimmed.ends_with(&[']', ')'][..]) {
                    return Err(range_error(s, "closing delimiter without opening delimiter"));
                }
                return parse_components(trimmed, true)
                    .map(Self::at_least)
                    .map_err(|message| range_error(s, message));
            }
        };

        let right_closed = match trimmed.as_bytes().last() {
            Some(b']') if trimmed.len() > 1 => true,
            Some(b')') if trimmed.len() > 1 => false,
            _ => return Err(range_error(s, "missing closing delimiter ']' or ')'")),
        };

        let inner = &trimmed[1..trimmed.len() - 1];
        let Some((left, right)) = inner.split_once(',') else {
            return Err(range_error(s, "expected two endpoints separated by ','"));
        };
        if right.contains(',') {
            return Err(range_error(s, "expected exactly two endpoints"));
        }

        let endpoint = |text: &str| parse_components(text, true).map_err(|message| range_error(s, message));
        let left = endpoint(left.trim())?;
        let right = match right.trim() {
            "" => None,
            right => Some(endpoint(right)?),
        };

        Ok(Self::new(left, left_closed, right, right_closed))
    }

    pub fn left(&self) -> Version {
        self.left
    }

    pub fn right(&self) -> Option<Version> {
        self.right
    }

    pub fn is_left_closed(&self) -> bool {
        self.left_closed
    }

    pub fn is_right_closed(&self) -> bool {
        self.right_closed
    }

    /// True when no version can satisfy both endpoints.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Check whether `version` lies inside the interval.
    pub fn includes(&self, version: &Version) -> bool {
        if self.empty {
            return false;
        }

        let above_left = if self.left_closed {
            self.left <= *version
        } else {
            self.left < *version
        };
        if !above_left {
            return false;
        }

        match self.right {
            None => true,
            Some(right) if self.right_closed => *version <= right,
            Some(right) => *version < right,
        }
    }
}

fn range_error(range: &str, message: impl Into<String>) -> Error {
    Error::InvalidVersionRange {
        range: range.to_string(),
        message: message.into(),
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.right {
            None if self.left_closed => write!(f, "{}", self.left),
            None => write!(f, "({},)", self.left),
            Some(right) => write!(
                f,
                "{}{},{}{}",
                if self.left_closed { '[' } else { '(' },
                self.left,
                right,
                if self.right_closed { ']' } else { ')' }
            ),
        }
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
