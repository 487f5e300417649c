//! Generator configuration and the priority tier registry.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::manifest::GOOGLE_FIRST_PARTY_SCRIPT;

/// Named rule priorities shared by all generated rule sets.
///
/// The consuming engine resolves conflicts between rule sets by priority, so
/// these values are only meaningful relative to each other. [`validate`]
/// checks the orderings the generated rules rely on.
///
/// [`validate`]: PriorityTiers::validate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityTiers {
    /// Blocking rules (gen_204 beacons)
    pub block: u32,
    /// Redirect-bypass rewrites
    pub redirect: u32,
    /// Pass-through for redirector URLs the rewrites cannot handle
    pub redirect_passthrough: u32,
    /// DNT and Sec-GPC header injection
    pub dnt_header: u32,
    /// DNT policy check exemption
    pub dnt_check_allow: u32,
}

impl Default for PriorityTiers {
    fn default() -> Self {
        Self {
            block: 1,
            redirect: 1,
            redirect_passthrough: 2,
            dnt_header: 4,
            dnt_check_allow: 5,
        }
    }
}

impl PriorityTiers {
    /// Load tiers from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Check the cross-list ordering invariants.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("block", self.block),
            ("redirect", self.redirect),
            ("redirect_passthrough", self.redirect_passthrough),
            ("dnt_header", self.dnt_header),
            ("dnt_check_allow", self.dnt_check_allow),
        ] {
            if value == 0 {
                return Err(Error::PriorityConflict(format!(
                    "{} priority must be at least 1",
                    name
                )));
            }
        }

        if self.dnt_check_allow <= self.block {
            return Err(Error::PriorityConflict(format!(
                "dnt_check_allow ({}) must outrank block ({})",
                self.dnt_check_allow, self.block
            )));
        }

        if self.redirect_passthrough <= self.redirect {
            return Err(Error::PriorityConflict(format!(
                "redirect_passthrough ({}) must outrank redirect ({})",
                self.redirect_passthrough, self.redirect
            )));
        }

        Ok(())
    }
}

/// Configuration for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Content script whose match patterns list the first-party Google hosts
    pub first_party_script: String,
    /// Rule priorities
    pub priorities: PriorityTiers,
}

impl GeneratorConfig {
    /// Create a new GeneratorConfig.
    pub fn new(first_party_script: impl Into<String>, priorities: PriorityTiers) -> Self {
        Self {
            first_party_script: first_party_script.into(),
            priorities,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(GOOGLE_FIRST_PARTY_SCRIPT, PriorityTiers::default())
    }
}
