//! dnr-rulegen - Static declarativeNetRequest rule set compiler.
//!
//! This crate generates the static rule sets a privacy extension ships with,
//! from the extension's own `manifest.json`:
//!
//! - **DNT policy**: exempt EFF DNT policy checks from blocking
//! - **DNT signal**: send `DNT: 1` and `Sec-GPC: 1` on every request
//! - **gen204**: block Google `gen_204` beacons on first-party Google hosts
//! - **Redirect bypass**: rewrite Google `/url?q=...` links to their destination
//!
//! # Quick Start
//!
//! ```ignore
//! use dnr_rulegen::{generate_all_rule_sets, write_rule_sets, DirectorySink, GeneratorConfig, Manifest};
//!
//! let manifest = Manifest::load("src/manifest.json")?;
//! let sets = generate_all_rule_sets(&manifest, &GeneratorConfig::default())?;
//!
//! let mut sink = DirectorySink::new("src/data/dnr");
//! let report = write_rule_sets(&sets, &mut sink)?;
//! println!("{} rules", report.total());
//! ```
//!
//! # Rule ids and priorities
//!
//! Ids are unique within each rule set and assigned from 1 in emission order.
//! Priorities come from [`PriorityTiers`], which is validated before any rule
//! is generated so that cross-set orderings (the DNT policy exemption
//! outranking blocking rules, for example) always hold.

mod config;
mod error;
mod host;
mod manifest;
mod rule_list;

pub mod generator;
pub mod rule;
pub mod ruleset;

// Re-export core types
pub use config::{GeneratorConfig, PriorityTiers};
pub use error::{Error, MatchPatternError, Result};
pub use host::Hostname;
pub use manifest::{extract_google_hosts, ContentScript, Manifest, GOOGLE_FIRST_PARTY_SCRIPT};
pub use rule::{Rule, RuleAction, RuleCondition};
pub use rule_list::{RuleList, RuleListBuilder};

// Re-export generators
pub use generator::{
    build_dnt_policy_rule, build_dnt_signal_rules, build_gen204_block_rules,
    build_google_redirect_rules,
};

// Re-export orchestration
pub use ruleset::{
    find_stale_rule_sets, generate_all_rule_sets, write_rule_sets, DirectorySink,
    GeneratedRuleSets, GenerationReport, MemorySink, RuleSetName, RuleSetSink,
};
