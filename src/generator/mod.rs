//! Rule set generators.
//!
//! Each generator is a pure function producing one complete [`RuleList`]
//! with ids assigned from 1.
//!
//! [`RuleList`]: crate::RuleList

mod dnt;
mod gen204;
mod redirect;

pub use dnt::{build_dnt_policy_rule, build_dnt_signal_rules, DNT_POLICY_URL_FILTER};
pub use gen204::build_gen204_block_rules;
pub use redirect::{build_google_redirect_rules, REDIRECT_QUERY_PARAMS};
