//! First-match rule evaluation

use lead_router_core::{Lead, Rule};

/// Find the applicable rule for `lead`.
///
/// `rules` must already be filtered to active rules and sorted ascending
/// by priority; the first rule whose every present condition holds wins.
/// Equal priorities break by list order, which makes the tie-break
/// deterministic. `None` is the normal no-match outcome, not an error.
pub fn first_match<'a>(rules: &[&'a Rule], lead: &Lead) -> Option<&'a Rule> {
    rules
        .iter()
        .find(|rule| rule.conditions.satisfied_by(lead))
        .copied()
}
