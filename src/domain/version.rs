use crate::domain::channel::{Channel, PreRelease};
use crate::domain::scope::Bump;
use crate::error::{Result, SemvError};
use std::cmp::Ordering;
use std::fmt;

/// Semantic version: major.minor.patch with an optional pre-release segment
/// and optional build metadata
///
/// Versions are immutable; bumping or re-channeling constructs a new value.
/// Build metadata never participates in ordering or equality.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub prerelease: Option<PreRelease>,
    pub build: Option<String>,
}

impl Version {
    /// Create a final-channel version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// The zero version, used as the reference when no final tag exists
    pub fn zero() -> Self {
        Version::new(0, 0, 0)
    }

    /// Parse a version from a tag string
    ///
    /// The configured prefix (e.g. "v") is optional on input: both "v1.2.3"
    /// and "1.2.3" parse when the prefix is "v". The body must be
    /// `MAJOR.MINOR.PATCH`, optionally `-<channel>.<counter>`, optionally
    /// `+<metadata>`.
    pub fn parse(text: &str, prefix: &str) -> Result<Self> {
        let body = if !prefix.is_empty() {
            text.strip_prefix(prefix).unwrap_or(text)
        } else {
            text
        };

        let re = regex::Regex::new(
            r"^(\d+)\.(\d+)\.(\d+)(?:-([a-zA-Z]+)\.(\d+))?(?:\+([0-9A-Za-z.\-]+))?$",
        )
        .map_err(|e| SemvError::parse(format!("Internal version pattern error: {}", e)))?;

        let captures = re.captures(body).ok_or_else(|| {
            SemvError::parse(format!(
                "Invalid version format: '{}' - expected X.Y.Z[-channel.N][+meta]",
                text
            ))
        })?;

        let number = |i: usize, what: &str| -> Result<u32> {
            captures[i]
                .parse::<u32>()
                .map_err(|_| SemvError::parse(format!("Invalid {} version: {}", what, &captures[i])))
        };

        let major = number(1, "major")?;
        let minor = number(2, "minor")?;
        let patch = number(3, "patch")?;

        let prerelease = match (captures.get(4), captures.get(5)) {
            (Some(channel), Some(counter)) => {
                let channel: Channel = channel.as_str().parse()?;
                let counter = counter.as_str().parse::<u32>().map_err(|_| {
                    SemvError::parse(format!("Invalid pre-release counter in '{}'", text))
                })?;
                Some(PreRelease::new(channel, counter)?)
            }
            _ => None,
        };

        let build = captures.get(6).map(|m| m.as_str().to_string());

        Ok(Version {
            major,
            minor,
            patch,
            prerelease,
            build,
        })
    }

    /// The channel this version sits on (`final` when there is no
    /// pre-release segment)
    pub fn channel(&self) -> Channel {
        self.prerelease.map(|p| p.channel).unwrap_or(Channel::Final)
    }

    /// Whether this is a final release (no pre-release segment)
    pub fn is_final(&self) -> bool {
        self.prerelease.is_none()
    }

    /// Bump the targeted component, resetting lower-order components
    ///
    /// Always produces a final-channel version with no build metadata.
    pub fn bump(&self, bump: Bump) -> Self {
        match bump {
            Bump::Major => Version::new(self.major + 1, 0, 0),
            Bump::Minor => Version::new(self.major, self.minor + 1, 0),
            Bump::Patch => Version::new(self.major, self.minor, self.patch + 1),
        }
    }

    /// Same version line, stripped to the final channel
    pub fn stripped(&self) -> Self {
        Version::new(self.major, self.minor, self.patch)
    }

    /// Same version line with the given pre-release segment
    pub fn with_prerelease(&self, prerelease: PreRelease) -> Self {
        Version {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            prerelease: Some(prerelease),
            build: None,
        }
    }

    /// Format with the configured tag prefix ("" for plain mode)
    pub fn format(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pr) = &self.prerelease {
            write!(f, "-{}", pr)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

// Total order: (major, minor, patch), then channel rank, then counter.
// Build metadata is excluded from both ordering and equality.
impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| self.channel().cmp(&other.channel()))
            .then_with(|| {
                let counter = |v: &Version| v.prerelease.map(|p| p.counter).unwrap_or(0);
                counter(self).cmp(&counter(other))
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}
