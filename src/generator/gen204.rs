//! Google gen_204 beacon blocking.

use crate::config::PriorityTiers;
use crate::host::Hostname;
use crate::rule::{ResourceType, RuleAction, RuleCondition};
use crate::rule_list::{RuleList, RuleListBuilder};

/// Block `gen_204` pings on every first-party Google host, one rule per host.
pub fn build_gen204_block_rules(hosts: &[Hostname], tiers: &PriorityTiers) -> RuleList {
    let mut rules = RuleListBuilder::with_capacity(hosts.len());

    for host in hosts {
        rules.push(
            tiers.block,
            RuleAction::Block,
            RuleCondition::any()
                .resource_types(&[ResourceType::Ping])
                // `^` stops `/gen_204` from matching longer path segments
                .url_filter(format!("|https://{}/gen_204^", host)),
        );
    }

    rules.build()
}
