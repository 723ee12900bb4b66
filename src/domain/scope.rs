use crate::error::{Result, SemvError};
use std::fmt;
use std::str::FromStr;

/// Which version component a bump targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Major,
    Minor,
    Patch,
}

/// Requested bump scope
///
/// `Auto` defers the major/minor/patch decision to a heuristic over the
/// changed-line percentage since the last tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Major,
    Minor,
    Patch,
    Auto,
}

impl Scope {
    /// Resolve to a concrete bump target
    ///
    /// `Auto` selects minor when the changed-line percentage exceeds the
    /// configured threshold, patch at or below it.
    pub fn resolve(&self, changed_line_pct: f64, minor_threshold_pct: f64) -> Bump {
        match self {
            Scope::Major => Bump::Major,
            Scope::Minor => Bump::Minor,
            Scope::Patch => Bump::Patch,
            Scope::Auto => {
                if changed_line_pct > minor_threshold_pct {
                    Bump::Minor
                } else {
                    Bump::Patch
                }
            }
        }
    }
}

impl FromStr for Scope {
    type Err = SemvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Scope::Major),
            "minor" => Ok(Scope::Minor),
            "patch" => Ok(Scope::Patch),
            "auto" => Ok(Scope::Auto),
            other => Err(SemvError::parse(format!(
                "Unknown scope: '{}' (expected major, minor, patch or auto)",
                other
            ))),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Major => write!(f, "major"),
            Scope::Minor => write!(f, "minor"),
            Scope::Patch => write!(f, "patch"),
            Scope::Auto => write!(f, "auto"),
        }
    }
}
