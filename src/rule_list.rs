//! Rule lists: id assignment, validation and serialization.

use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rule::{Rule, RuleAction, RuleCondition};

/// Matches `\N` back-references in a regexSubstitution.
static BACKREFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(\d)").unwrap());

/// An ordered, self-contained list of rules stored as one static rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleList {
    rules: Vec<Rule>,
}

impl RuleList {
    /// Create an empty rule list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule list from its JSON form.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize to pretty JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the list holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rules in insertion order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Iterate over the rules.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Look up a rule by id.
    pub fn get(&self, id: u32) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Check the list against the engine's static rule constraints.
    ///
    /// `list` names the list in error messages.
    pub fn validate(&self, list: &str) -> Result<()> {
        let invalid = |reason: String| Error::InvalidRule {
            list: list.to_string(),
            reason,
        };

        let mut ids = AHashSet::with_capacity(self.rules.len());

        for rule in &self.rules {
            if rule.id == 0 {
                return Err(invalid("rule id must be positive".to_string()));
            }
            if !ids.insert(rule.id) {
                return Err(invalid(format!("duplicate rule id {}", rule.id)));
            }
            if rule.priority == 0 {
                return Err(invalid(format!("rule {} has priority 0", rule.id)));
            }

            let group_count = match &rule.condition.regex_filter {
                Some(filter) => match Regex::new(filter) {
                    Ok(re) => Some(re.captures_len() - 1),
                    Err(e) => {
                        return Err(invalid(format!(
                            "rule {} has an invalid regexFilter: {}",
                            rule.id, e
                        )))
                    }
                },
                None => None,
            };

            match &rule.action {
                RuleAction::Redirect { redirect } => {
                    let groups = group_count.ok_or_else(|| {
                        invalid(format!(
                            "rule {} uses regexSubstitution without a regexFilter",
                            rule.id
                        ))
                    })?;
                    for cap in BACKREFERENCE.captures_iter(&redirect.regex_substitution) {
                        let group: usize = cap[1].parse().unwrap_or(usize::MAX);
                        if group > groups {
                            return Err(invalid(format!(
                                "rule {} references group \\{} but regexFilter has {} groups",
                                rule.id, group, groups
                            )));
                        }
                    }
                }
                RuleAction::ModifyHeaders { request_headers } if request_headers.is_empty() => {
                    return Err(invalid(format!(
                        "rule {} modifies no headers",
                        rule.id
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a RuleList {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Builds a [`RuleList`], assigning ids sequentially from 1 in push order.
#[derive(Debug)]
pub struct RuleListBuilder {
    rules: Vec<Rule>,
    next_id: u32,
}

impl RuleListBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a builder with room for `capacity` rules.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    /// Append a rule and return the id it was given.
    pub fn push(&mut self, priority: u32, action: RuleAction, condition: RuleCondition) -> u32 {
        let id = self.next_id;
        self.rules.push(Rule {
            id,
            priority,
            action,
            condition,
        });
        self.next_id += 1;
        id
    }

    /// Finish the list.
    pub fn build(self) -> RuleList {
        RuleList { rules: self.rules }
    }
}

impl Default for RuleListBuilder {
    fn default() -> Self {
        Self::new()
    }
}
