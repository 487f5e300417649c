//! Google outbound-link redirector bypass.
//!
//! Search results link through `https://<host>/url?...&q=<destination>`.
//! For every first-party host this emits four redirect rules that rewrite
//! such URLs to the destination, followed by an allow rule for URL-encoded
//! variants the rewrites cannot capture.

use crate::config::PriorityTiers;
use crate::host::Hostname;
use crate::rule::{Redirect, ResourceType, RuleAction, RuleCondition};
use crate::rule_list::{RuleList, RuleListBuilder};

/// Query shapes carrying the destination, most specific first.
///
/// Only one rule wins per request and the engine does not order regex rules
/// by specificity, so the order here is the order they are emitted in.
pub const REDIRECT_QUERY_PARAMS: [&str; 4] = [".+&q", "q", ".+&url", "url"];

/// Rules emitted for each host.
const RULES_PER_HOST: usize = REDIRECT_QUERY_PARAMS.len() + 1;

/// Build the redirect-bypass rules, five per host.
///
/// Host `i` (0-indexed) gets ids `5i+1..=5i+5`.
pub fn build_google_redirect_rules(hosts: &[Hostname], tiers: &PriorityTiers) -> RuleList {
    let mut rules = RuleListBuilder::with_capacity(hosts.len() * RULES_PER_HOST);

    for host in hosts {
        let escaped = host.regex_escaped();

        for param in REDIRECT_QUERY_PARAMS {
            rules.push(
                tiers.redirect,
                RuleAction::Redirect {
                    redirect: Redirect {
                        regex_substitution: "\\1".to_string(),
                    },
                },
                RuleCondition::any()
                    .regex_filter(format!(
                        r"^https://{}/url\?{}=(https?://[^&]+).*$",
                        escaped, param
                    ))
                    .resource_types(&[ResourceType::MainFrame]),
            );
        }

        // regexSubstitution cannot decode %-escaped destinations
        // (w3c/webextensions#302), so let those through untouched.
        rules.push(
            tiers.redirect_passthrough,
            RuleAction::Allow,
            RuleCondition::any()
                .url_filter(format!("|https://{}/url?*%*|", host))
                .resource_types(&[ResourceType::MainFrame]),
        );
    }

    rules.build()
}
