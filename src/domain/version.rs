use crate::error::{ReleaseTagError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Release version tuple, ordered numerically field by field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub micro: u64,
}

fn tag_regex() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| {
        Regex::new(r"^v(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)$")
            .expect("release tag regex is valid")
    })
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Version {
            major,
            minor,
            micro,
        }
    }

    /// Parse a release tag of the exact form `vMAJOR.MINOR.MICRO`.
    ///
    /// Components with leading zeros are rejected so that formatting a parsed
    /// tag always reproduces the original string.
    pub fn from_tag(tag: &str) -> Result<Self> {
        let caps = tag_regex()
            .captures(tag)
            .ok_or_else(|| ReleaseTagError::MalformedTag(tag.to_string()))?;

        let field = |i: usize| -> Result<u64> {
            caps[i]
                .parse::<u64>()
                .map_err(|_| ReleaseTagError::MalformedTag(tag.to_string()))
        };

        Ok(Version {
            major: field(1)?,
            minor: field(2)?,
            micro: field(3)?,
        })
    }

    /// Tag name for this version (e.g., Version(1,2,3) -> "v1.2.3")
    pub fn tag_name(&self) -> String {
        format!("v{}", self)
    }

    /// Next maintenance release in the same MAJOR.MINOR series
    pub fn next_micro(&self) -> Result<Self> {
        let micro = self
            .micro
            .checked_add(1)
            .ok_or_else(|| ReleaseTagError::MalformedTag(self.tag_name()))?;

        Ok(Version { micro, ..*self })
    }

    /// Whether this version belongs to the MAJOR.MINOR series
    pub fn in_series(&self, major: u64, minor: u64) -> bool {
        self.major == major && self.minor == minor
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}
