//! First-match rule evaluation over a zone set.

use crate::{ClassificationRule, ClassifyError, ConditionClass, Result};
use peatkit_metrics::metric_defs;
use peatkit_survey::{ZoneId, ZoneSet};
use std::collections::BTreeMap;

/// Assign a condition class to every zone.
///
/// Rules are evaluated in ascending priority (stable for equal
/// priorities, so list order is the tie-break); the first rule whose
/// predicate holds against the zone's attributes decides its class.
///
/// # Errors
/// [`ClassifyError::NoMatchingRule`] for the first zone no rule matches.
/// Callers are expected to end their rule list with
/// [`ClassificationRule::default_rule`]; its absence is a configuration
/// error, never a silent default.
pub fn classify(
    zones: &ZoneSet,
    rules: &[ClassificationRule],
) -> Result<BTreeMap<ZoneId, ConditionClass>> {
    let mut ordered: Vec<&ClassificationRule> = rules.iter().collect();
    ordered.sort_by_key(|r| r.priority);

    let mut classes = BTreeMap::new();
    for zone in zones.zones() {
        let class = ordered
            .iter()
            .find(|r| r.matches(zone))
            .map(|r| r.class)
            .ok_or(ClassifyError::NoMatchingRule { zone: zone.id })?;
        classes.insert(zone.id, class);
    }

    metrics::counter!(metric_defs::CLASSIFY_ZONES.name).increment(classes.len() as u64);
    log::debug!("classified {} zones", classes.len());
    Ok(classes)
}
