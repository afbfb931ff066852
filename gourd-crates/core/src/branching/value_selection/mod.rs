//! Strategies for turning a selected variable into a decision.
mod in_domain_max;
mod in_domain_min;
mod in_domain_random;
mod in_domain_split;
mod reverse_in_domain_split;
mod value_selector;

pub use in_domain_max::InDomainMax;
pub use in_domain_min::InDomainMin;
pub use in_domain_random::InDomainRandom;
pub use in_domain_split::InDomainSplit;
pub use reverse_in_domain_split::ReverseInDomainSplit;
pub use value_selector::ValueSelector;
