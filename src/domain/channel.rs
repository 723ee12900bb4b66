//! Release channels and pre-release segments.
//!
//! Four channels are recognized, ordered by maturity:
//! `alpha < beta < rc < final`. The final channel never carries a counter;
//! every other channel carries a positive per-version-line counter.

use crate::error::{Result, SemvError};
use std::fmt;
use std::str::FromStr;

/// Release channel, ordered by maturity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Channel {
    Alpha,
    Beta,
    Rc,
    Final,
}

impl Channel {
    /// Numeric rank used by the total order: alpha(0) < beta(1) < rc(2) < final(3)
    pub fn rank(&self) -> u8 {
        match self {
            Channel::Alpha => 0,
            Channel::Beta => 1,
            Channel::Rc => 2,
            Channel::Final => 3,
        }
    }
}

impl FromStr for Channel {
    type Err = SemvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "alpha" | "a" => Ok(Channel::Alpha),
            "beta" | "b" => Ok(Channel::Beta),
            "rc" | "candidate" => Ok(Channel::Rc),
            "final" => Ok(Channel::Final),
            other => Err(SemvError::parse(format!(
                "Unknown release channel: '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Alpha => write!(f, "alpha"),
            Channel::Beta => write!(f, "beta"),
            Channel::Rc => write!(f, "rc"),
            Channel::Final => write!(f, "final"),
        }
    }
}

/// Pre-release segment of a version: a non-final channel plus its counter
///
/// Rendered as `<channel>.<counter>`, e.g. "beta.2". The counter starts at 1
/// for the first pre-release on a version line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PreRelease {
    pub channel: Channel,
    pub counter: u32,
}

impl PreRelease {
    /// Create a pre-release segment
    ///
    /// Fails if the channel is `final` (finals carry no counter) or the
    /// counter is zero.
    pub fn new(channel: Channel, counter: u32) -> Result<Self> {
        if channel == Channel::Final {
            return Err(SemvError::parse(
                "A final version cannot carry a pre-release counter",
            ));
        }
        if counter == 0 {
            return Err(SemvError::parse("Pre-release counter must be positive"));
        }
        Ok(PreRelease { channel, counter })
    }

    /// First pre-release on a version line for the given channel
    pub fn first(channel: Channel) -> Result<Self> {
        PreRelease::new(channel, 1)
    }

    /// Parse a pre-release segment like "rc.2"
    pub fn parse(s: &str) -> Result<Self> {
        let (channel_part, counter_part) = s.split_once('.').ok_or_else(|| {
            SemvError::parse(format!(
                "Pre-release segment '{}' is missing a counter (expected <channel>.<n>)",
                s
            ))
        })?;

        let channel: Channel = channel_part.parse()?;
        let counter = counter_part.parse::<u32>().map_err(|_| {
            SemvError::parse(format!("Invalid pre-release counter: '{}'", counter_part))
        })?;

        PreRelease::new(channel, counter)
    }

    /// Next counter on the same channel
    pub fn incremented(&self) -> Self {
        PreRelease {
            channel: self.channel,
            counter: self.counter + 1,
        }
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.channel, self.counter)
    }
}
