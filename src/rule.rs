//! declarativeNetRequest rule schema.
//!
//! These types serialize to the JSON shape the browser's static rule set
//! loader expects:
//!
//! ```json
//! {
//!   "id": 1,
//!   "priority": 1,
//!   "action": { "type": "block" },
//!   "condition": { "resourceTypes": ["ping"], "urlFilter": "|https://www.google.com/gen_204^" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique within its rule list, starting at 1
    pub id: u32,
    /// Higher wins when several rules match the same request
    pub priority: u32,
    pub action: RuleAction,
    pub condition: RuleCondition,
}

/// What to do with a matching request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuleAction {
    Allow,
    Block,
    ModifyHeaders {
        #[serde(rename = "requestHeaders")]
        request_headers: Vec<HeaderInfo>,
    },
    Redirect {
        redirect: Redirect,
    },
}

impl RuleAction {
    /// The action's wire `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            RuleAction::Allow => "allow",
            RuleAction::Block => "block",
            RuleAction::ModifyHeaders { .. } => "modifyHeaders",
            RuleAction::Redirect { .. } => "redirect",
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Redirect target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    /// Substitution for the matched `regexFilter`, with `\1`-style back-references
    pub regex_substitution: String,
}

/// A request header modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub header: String,
    pub operation: HeaderOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl HeaderInfo {
    /// Set `header` to `value`, overwriting any existing value.
    pub fn set(header: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            operation: HeaderOperation::Set,
            value: Some(value.into()),
        }
    }
}

/// Header modification operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderOperation {
    Append,
    Set,
    Remove,
}

/// Request matching predicate. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<Vec<ResourceType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_filter: Option<String>,
}

impl RuleCondition {
    /// A condition that matches every request.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to the given resource types.
    pub fn resource_types(mut self, types: &[ResourceType]) -> Self {
        self.resource_types = Some(types.to_vec());
        self
    }

    /// Match with a `urlFilter` pattern (`|`, `*` and `^` syntax).
    pub fn url_filter(mut self, filter: impl Into<String>) -> Self {
        self.url_filter = Some(filter.into());
        self
    }

    /// Match with a regular expression over the full URL.
    pub fn regex_filter(mut self, filter: impl Into<String>) -> Self {
        self.regex_filter = Some(filter.into());
        self
    }
}

/// Kind of network request a condition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Top-level document navigation
    MainFrame,
    SubFrame,
    Stylesheet,
    Script,
    Image,
    Font,
    Object,
    /// Asynchronous script request (XHR/fetch)
    #[serde(rename = "xmlhttprequest")]
    XmlHttpRequest,
    /// Beacon / hyperlink auditing ping
    Ping,
    CspReport,
    Media,
    #[serde(rename = "websocket")]
    WebSocket,
    #[serde(rename = "webtransport")]
    WebTransport,
    #[serde(rename = "webbundle")]
    WebBundle,
    Other,
}
