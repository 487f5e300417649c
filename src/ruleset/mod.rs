//! Orchestration of a full generation run.
//!
//! A run builds every rule set in memory, validates and serializes all of
//! them, and only then hands them to a [`RuleSetSink`]. A failure anywhere
//! before the write step leaves every destination untouched.

mod sink;

pub use sink::{DirectorySink, MemorySink, RuleSetSink};

use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::generator::{
    build_dnt_policy_rule, build_dnt_signal_rules, build_gen204_block_rules,
    build_google_redirect_rules,
};
use crate::manifest::{extract_google_hosts, Manifest};
use crate::rule_list::RuleList;

/// The static rule sets produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleSetName {
    /// Allow EFF DNT policy checks
    DntPolicy,
    /// DNT and Sec-GPC request headers
    DntSignal,
    /// Google gen_204 beacon blocking
    Gen204,
    /// Google outbound link redirector bypass
    BypassRedirects,
}

impl RuleSetName {
    /// All rule sets, in generation order.
    pub const ALL: [RuleSetName; 4] = [
        RuleSetName::DntPolicy,
        RuleSetName::DntSignal,
        RuleSetName::Gen204,
        RuleSetName::BypassRedirects,
    ];

    /// Get the internal name of this rule set.
    pub fn name(&self) -> &'static str {
        match self {
            RuleSetName::DntPolicy => "dnt_policy",
            RuleSetName::DntSignal => "dnt_signal",
            RuleSetName::Gen204 => "gen204",
            RuleSetName::BypassRedirects => "bypass_redirects",
        }
    }

    /// File the rule set is stored in.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// Human-readable description used in generation reports.
    pub fn description(&self) -> &'static str {
        match self {
            RuleSetName::DntPolicy => "EFF's DNT policy",
            RuleSetName::DntSignal => "DNT signal",
            RuleSetName::Gen204 => "Google gen204 beacon block",
            RuleSetName::BypassRedirects => "Google redirect",
        }
    }

    /// Parse a rule set name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.strip_suffix(".json").unwrap_or(s);
        Self::ALL.into_iter().find(|name| name.name() == s)
    }
}

impl fmt::Display for RuleSetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every rule list of a run, keyed by rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRuleSets {
    sets: Vec<(RuleSetName, RuleList)>,
}

impl GeneratedRuleSets {
    /// Get the rule list for a rule set.
    pub fn get(&self, name: RuleSetName) -> Option<&RuleList> {
        self.sets
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, list)| list)
    }

    /// Iterate over rule sets in generation order.
    pub fn iter(&self) -> impl Iterator<Item = (RuleSetName, &RuleList)> {
        self.sets.iter().map(|(name, list)| (*name, list))
    }

    /// Rule count per rule set.
    pub fn report(&self) -> GenerationReport {
        GenerationReport {
            counts: self.iter().map(|(name, list)| (name, list.len())).collect(),
        }
    }

    /// Serialize every rule list.
    ///
    /// Fails without partial output if any list cannot be serialized.
    pub fn serialize(&self) -> Result<Vec<(RuleSetName, String)>> {
        let mut serialized = Vec::with_capacity(self.sets.len());
        for (name, list) in self.iter() {
            serialized.push((name, list.to_json()?));
        }
        Ok(serialized)
    }
}

/// Number of rules generated per rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    counts: Vec<(RuleSetName, usize)>,
}

impl GenerationReport {
    /// Rule count for a rule set, zero if it was not generated.
    pub fn count(&self, name: RuleSetName) -> usize {
        self.counts
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Total number of rules across all rule sets.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Iterate over `(rule set, count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (RuleSetName, usize)> + '_ {
        self.counts.iter().copied()
    }

    /// Log one line per rule set.
    pub fn log(&self) {
        for line in self.summary_lines() {
            log::info!("{}", line);
        }
    }

    /// One "Generated N ... rule(s)" line per rule set.
    pub fn summary_lines(&self) -> Vec<String> {
        self.iter()
            .map(|(name, count)| {
                let noun = if count == 1 { "rule" } else { "rules" };
                format!("Generated {} {} {}", count, name.description(), noun)
            })
            .collect()
    }
}

/// Generate every rule set from the extension manifest.
///
/// Fails before producing anything if the priority tiers are inconsistent,
/// if the first-party content script cannot be resolved, or if a generated
/// list does not validate.
pub fn generate_all_rule_sets(
    manifest: &Manifest,
    config: &GeneratorConfig,
) -> Result<GeneratedRuleSets> {
    let tiers = &config.priorities;
    tiers.validate()?;

    let dnt_policy = build_dnt_policy_rule(tiers);
    let dnt_signal = build_dnt_signal_rules(tiers);

    let hosts = extract_google_hosts(&manifest.content_scripts, &config.first_party_script)?;
    log::debug!("Found {} first-party Google hosts", hosts.len());

    let gen204 = build_gen204_block_rules(&hosts, tiers);
    let bypass_redirects = build_google_redirect_rules(&hosts, tiers);

    let sets = vec![
        (RuleSetName::DntPolicy, dnt_policy),
        (RuleSetName::DntSignal, dnt_signal),
        (RuleSetName::Gen204, gen204),
        (RuleSetName::BypassRedirects, bypass_redirects),
    ];

    for (name, list) in &sets {
        list.validate(name.name())?;
    }

    Ok(GeneratedRuleSets { sets })
}

/// Serialize all rule sets, then write each one to `sink`.
///
/// Nothing is written unless every rule set serializes. The first failed
/// write aborts the remaining ones.
pub fn write_rule_sets(sets: &GeneratedRuleSets, sink: &mut dyn RuleSetSink) -> Result<GenerationReport> {
    let serialized = sets.serialize()?;

    for (name, json) in &serialized {
        sink.write(*name, json)?;
    }

    let report = sets.report();
    report.log();
    Ok(report)
}

/// Compare stored rule sets in `dir` with freshly generated ones.
///
/// Returns the rule sets whose file is missing or differs from `sets`.
/// Stored files that exist but do not parse or validate are errors.
pub fn find_stale_rule_sets(sets: &GeneratedRuleSets, dir: &Path) -> Result<Vec<RuleSetName>> {
    let mut stale = Vec::new();

    for (name, expected) in sets.iter() {
        let path = dir.join(name.file_name());
        if !path.exists() {
            log::warn!("{:?} is missing", path);
            stale.push(name);
            continue;
        }

        let stored = RuleList::from_json(&fs::read_to_string(&path)?)?;
        stored.validate(name.name())?;

        if &stored != expected {
            log::warn!(
                "{:?} is out of date ({} rules stored, {} expected)",
                path,
                stored.len(),
                expected.len()
            );
            stale.push(name);
        }
    }

    Ok(stale)
}
