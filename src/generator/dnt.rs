//! DNT policy exemption and DNT/GPC signal rules.

use crate::config::PriorityTiers;
use crate::rule::{HeaderInfo, ResourceType, RuleAction, RuleCondition};
use crate::rule_list::{RuleList, RuleListBuilder};

/// Well-known DNT policy document on any host, anchored at both ends.
pub const DNT_POLICY_URL_FILTER: &str = "|https://*/.well-known/dnt-policy.txt|";

/// Allow EFF DNT policy check requests even when their domains would
/// otherwise be blocked.
pub fn build_dnt_policy_rule(tiers: &PriorityTiers) -> RuleList {
    let mut rules = RuleListBuilder::with_capacity(1);
    rules.push(
        tiers.dnt_check_allow,
        RuleAction::Allow,
        RuleCondition::any()
            .resource_types(&[ResourceType::XmlHttpRequest])
            .url_filter(DNT_POLICY_URL_FILTER),
    );
    rules.build()
}

/// Send `DNT: 1` and `Sec-GPC: 1` on every request.
///
/// The first rule covers top-level documents, the second everything else.
pub fn build_dnt_signal_rules(tiers: &PriorityTiers) -> RuleList {
    let mut rules = RuleListBuilder::with_capacity(2);
    rules.push(
        tiers.dnt_header,
        privacy_signal_headers(),
        RuleCondition::any().resource_types(&[ResourceType::MainFrame]),
    );
    // no resourceTypes: every type except main_frame
    rules.push(tiers.dnt_header, privacy_signal_headers(), RuleCondition::any());
    rules.build()
}

fn privacy_signal_headers() -> RuleAction {
    RuleAction::ModifyHeaders {
        request_headers: vec![HeaderInfo::set("DNT", "1"), HeaderInfo::set("Sec-GPC", "1")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::HeaderOperation;

    #[test]
    fn test_dnt_policy_rule() {
        let tiers = PriorityTiers::default();
        let rules = build_dnt_policy_rule(&tiers);

        assert_eq!(rules.len(), 1);
        let rule = &rules.rules()[0];
        assert_eq!(rule.id, 1);
        assert_eq!(rule.priority, tiers.dnt_check_allow);
        assert_eq!(rule.action, RuleAction::Allow);
        assert_eq!(
            rule.condition.resource_types,
            Some(vec![ResourceType::XmlHttpRequest])
        );
        assert_eq!(
            rule.condition.url_filter.as_deref(),
            Some("|https://*/.well-known/dnt-policy.txt|")
        );
    }

    #[test]
    fn test_dnt_policy_priority_follows_tiers() {
        let tiers = PriorityTiers {
            dnt_check_allow: 42,
            ..Default::default()
        };
        assert_eq!(build_dnt_policy_rule(&tiers).rules()[0].priority, 42);
    }

    #[test]
    fn test_dnt_signal_rules() {
        let tiers = PriorityTiers::default();
        let rules = build_dnt_signal_rules(&tiers);

        assert_eq!(rules.len(), 2);
        for rule in &rules {
            assert_eq!(rule.priority, tiers.dnt_header);
            match &rule.action {
                RuleAction::ModifyHeaders { request_headers } => {
                    let headers: Vec<(&str, HeaderOperation, Option<&str>)> = request_headers
                        .iter()
                        .map(|h| (h.header.as_str(), h.operation, h.value.as_deref()))
                        .collect();
                    assert_eq!(
                        headers,
                        vec![
                            ("DNT", HeaderOperation::Set, Some("1")),
                            ("Sec-GPC", HeaderOperation::Set, Some("1")),
                        ]
                    );
                }
                other => panic!("unexpected action {}", other),
            }
        }

        assert_eq!(
            rules.rules()[0].condition.resource_types,
            Some(vec![ResourceType::MainFrame])
        );
        assert_eq!(rules.rules()[1].condition, RuleCondition::any());
        assert_eq!(rules.rules()[1].id, 2);
    }

    #[test]
    fn test_dnt_rules_validate() {
        let tiers = PriorityTiers::default();
        assert!(build_dnt_policy_rule(&tiers).validate("dnt_policy").is_ok());
        assert!(build_dnt_signal_rules(&tiers).validate("dnt_signal").is_ok());
    }
}
