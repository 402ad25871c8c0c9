use crate::error::{ReleaseTagError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Branch kinds that releases can be cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseBranch {
    /// `master`: major releases
    Master,
    /// `maint`: next patch release of the highest series overall
    Maint,
    /// `maint-MAJOR.MINOR`: patch releases of one series
    MaintSeries { major: u64, minor: u64 },
}

fn series_regex() -> &'static Regex {
    static SERIES_RE: OnceLock<Regex> = OnceLock::new();
    SERIES_RE.get_or_init(|| {
        Regex::new(r"^maint-([0-9]+)\.([0-9]+)$").expect("maintenance branch regex is valid")
    })
}

impl ReleaseBranch {
    /// Classify a branch name
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "master" => return Ok(ReleaseBranch::Master),
            "maint" => return Ok(ReleaseBranch::Maint),
            _ => {}
        }

        let caps = series_regex()
            .captures(name)
            .ok_or_else(|| ReleaseTagError::InvalidBranch(name.to_string()))?;

        // Digits-only captures can still overflow u64
        let major = caps[1]
            .parse::<u64>()
            .map_err(|_| ReleaseTagError::InvalidBranch(name.to_string()))?;
        let minor = caps[2]
            .parse::<u64>()
            .map_err(|_| ReleaseTagError::InvalidBranch(name.to_string()))?;

        Ok(ReleaseBranch::MaintSeries { major, minor })
    }

    /// Check if this is a maintenance branch
    pub fn is_maintenance(&self) -> bool {
        !matches!(self, ReleaseBranch::Master)
    }

    /// Human-readable name of the release series this branch feeds
    pub fn series(&self) -> String {
        match self {
            ReleaseBranch::Master => "major".to_string(),
            ReleaseBranch::Maint => "vX.Y.Z".to_string(),
            ReleaseBranch::MaintSeries { major, minor } => format!("v{}.{}.Z", major, minor),
        }
    }
}

impl fmt::Display for ReleaseBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseBranch::Master => write!(f, "master"),
            ReleaseBranch::Maint => write!(f, "maint"),
            ReleaseBranch::MaintSeries { major, minor } => write!(f, "maint-{}.{}", major, minor),
        }
    }
}
