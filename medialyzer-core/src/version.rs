//! Version triples and the parsers that produce them from UA substrings and plugin
//! descriptors.

use std::fmt;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit-run pattern"));

/// A `(major, minor, patch)` version. Patch is 0 when the source string omits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VersionTriple {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionTriple {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Returns true if this version is at least `major.minor`.
    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        *self >= VersionTriple::new(major, minor, 0)
    }

    /// Parses a dot-delimited plugin version such as `"17.0.0.134"`.
    ///
    /// Major and minor are required; a missing or unreadable patch defaults to 0.
    pub fn parse_dotted(version: &str) -> Option<Self> {
        let mut parts = version.split('.');
        let major = parts.next().and_then(parse_int_prefix)?;
        let minor = parts.next().and_then(parse_int_prefix)?;
        let patch = parts.next().and_then(parse_int_prefix).unwrap_or(0);
        Some(Self::new(major, minor, patch))
    }

    /// Parses a free-text plugin description such as `"Shockwave Flash 17.0 r134"` or
    /// `"WIN 11,2,202,235"` by taking the first three digit runs.
    pub fn parse_description(description: &str) -> Option<Self> {
        let mut runs = DIGIT_RUN
            .find_iter(description)
            .take(3)
            .map(|m| m.as_str().parse::<u32>().ok());

        let major = runs.next().flatten()?;
        let minor = runs.next().flatten()?;
        let patch = runs.next().flatten().unwrap_or(0);
        Some(Self::new(major, minor, patch))
    }

    /// Builds a version from regex groups 1, 2 and an optional group 3.
    pub(crate) fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let group = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        let major = group(1)?;
        let minor = group(2)?;
        let patch = group(3).unwrap_or(0);
        Some(Self::new(major, minor, patch))
    }
}

impl fmt::Display for VersionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Reads the leading integer of `s` the way `parseInt(s, 10)` does, ignoring leading
/// whitespace and trailing garbage. Returns `None` when no digits lead the string.
fn parse_int_prefix(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    s[..end].parse().ok()
}
