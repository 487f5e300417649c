//! Extension manifest input and first-party host extraction.

use ahash::AHashSet;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, MatchPatternError, Result};
use crate::host::Hostname;

/// Content script that marks Google properties as first parties.
pub const GOOGLE_FIRST_PARTY_SCRIPT: &str = "js/firstparties/google.js";

/// The parts of an extension manifest the generator reads.
///
/// All other manifest keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Content script declarations
    #[serde(default)]
    pub content_scripts: Vec<ContentScript>,
}

/// A single content script declaration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentScript {
    /// Script identifiers loaded by this declaration
    #[serde(default)]
    pub js: Vec<String>,
    /// URL match patterns the scripts are injected into
    #[serde(default)]
    pub matches: Vec<String>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a manifest from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Extract first-party hosts for `script_id` from this manifest.
    pub fn first_party_hosts(&self, script_id: &str) -> Result<Vec<Hostname>> {
        extract_google_hosts(&self.content_scripts, script_id)
    }
}

/// Extract the hosts of the content script declaration that loads `script_id`.
///
/// Exactly one declaration must load the script. Only `https://www.<host>/*`
/// patterns contribute hosts; other shapes are skipped. Declaration order is
/// preserved and duplicates are kept.
pub fn extract_google_hosts(entries: &[ContentScript], script_id: &str) -> Result<Vec<Hostname>> {
    let matching: Vec<&ContentScript> = entries
        .iter()
        .filter(|entry| entry.js.iter().any(|js| js == script_id))
        .collect();

    let entry = match matching.as_slice() {
        [entry] => *entry,
        _ => {
            return Err(Error::Configuration {
                script_id: script_id.to_string(),
                found: matching.len(),
            })
        }
    };

    let mut hosts = Vec::with_capacity(entry.matches.len());
    let mut seen = AHashSet::new();

    for pattern in &entry.matches {
        match Hostname::from_match_pattern(pattern) {
            Ok(host) => {
                if !seen.insert(host.clone()) {
                    log::warn!("Duplicate first-party host {}, rules will be emitted twice", host);
                }
                hosts.push(host);
            }
            Err(MatchPatternError::UnsupportedShape(p)) => {
                log::debug!("Skipping match pattern {}", p);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(hosts)
}
