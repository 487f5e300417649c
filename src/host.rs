//! First-party hostnames and the match patterns they are parsed from.

use std::fmt;

use serde::Serialize;

use crate::error::MatchPatternError;

/// Scheme stripped from a first-party match pattern.
const SCHEME_PREFIX: &str = "https://";
/// Only `www.` hosts are treated as first-party Google properties.
const HOST_PREFIX: &str = "www.";
/// Path wildcard stripped from the end of a match pattern.
const PATH_SUFFIX: &str = "/*";

/// A bare hostname such as `www.google.com`.
///
/// Never contains a scheme, a path, a port or wildcard characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Hostname(String);

impl Hostname {
    /// Parse a bare hostname.
    pub fn parse(host: &str) -> Result<Self, MatchPatternError> {
        validate_host(host).map_err(|reason| MatchPatternError::InvalidHost {
            pattern: host.to_string(),
            reason,
        })?;
        Ok(Self(host.to_string()))
    }

    /// Parse a content-script match pattern of the form `https://www.<host>/*`.
    ///
    /// Returns [`MatchPatternError::UnsupportedShape`] for any other shape, and
    /// [`MatchPatternError::InvalidHost`] when the shape matches but the host
    /// part is unusable.
    pub fn from_match_pattern(pattern: &str) -> Result<Self, MatchPatternError> {
        let host = pattern
            .strip_prefix(SCHEME_PREFIX)
            .filter(|rest| rest.starts_with(HOST_PREFIX))
            .and_then(|rest| rest.strip_suffix(PATH_SUFFIX))
            .ok_or_else(|| MatchPatternError::UnsupportedShape(pattern.to_string()))?;

        validate_host(host).map_err(|reason| MatchPatternError::InvalidHost {
            pattern: pattern.to_string(),
            reason,
        })?;

        Ok(Self(host.to_string()))
    }

    /// Get the hostname as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hostname with forward slashes escaped for use inside a regex.
    ///
    /// Validated hosts never contain `/`, so this leaves every host unchanged.
    /// It mirrors the escaping of the existing regexFilter strings, which also
    /// leave dots unescaped.
    pub fn regex_escaped(&self) -> String {
        self.0.replace('/', "\\/")
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn validate_host(host: &str) -> Result<(), &'static str> {
    if host.is_empty() {
        return Err("empty host");
    }
    if host.starts_with('.') || host.ends_with('.') || host.contains("..") {
        return Err("empty label");
    }
    for c in host.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '.' => {}
            '*' => return Err("wildcard in host"),
            '/' | '?' | '#' => return Err("path in host"),
            ':' => return Err("port or scheme in host"),
            c if c.is_whitespace() => return Err("whitespace in host"),
            _ => return Err("unexpected character in host"),
        }
    }
    Ok(())
}
