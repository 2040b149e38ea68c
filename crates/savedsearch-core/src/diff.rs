//! Significance of differences between desired and observed values.

use crate::actions;
use crate::fields::{self, FieldMap, FieldSpec, FieldValue, ACTIONS};
use crate::payload::desired_value;
use crate::store::ConfigStore;

/// A remote sentinel default against an empty desired value is not a change.
pub fn is_insignificant(desired: &str, observed: &str, default_value: &str) -> bool {
    observed == default_value && desired.is_empty()
}

/// Whether moving `observed` to `desired` is a real change for `spec`.
pub fn is_significant(spec: &FieldSpec, desired: &FieldValue, observed: Option<&FieldValue>) -> bool {
    let desired_text = desired.to_string();

    if spec.name == ACTIONS {
        let observed_text = observed.map(|v| v.to_string()).unwrap_or_default();
        return !actions::equal_as_action_sets(&desired_text, &observed_text);
    }

    if let Some(sentinel) = spec.sentinel {
        // Reconciled views leave a sentinel-valued field unset.
        let observed_text = observed
            .map(|v| v.to_string())
            .unwrap_or_else(|| sentinel.to_string());
        if is_insignificant(&desired_text, &observed_text, sentinel) {
            return false;
        }
        return desired_text != observed_text;
    }

    match observed {
        Some(have) => have != desired,
        None => !matches!(desired, FieldValue::Str(s) if s.is_empty()),
    }
}

/// Fields whose desired value differs significantly from the current view.
/// Computed-only fields and fields the operator left unset are never planned.
pub fn plan<D, C>(desired: &D, current: &C) -> FieldMap
where
    D: ConfigStore + ?Sized,
    C: ConfigStore + ?Sized,
{
    fields::FIELDS
        .iter()
        .filter_map(|spec| {
            let want = desired_value(spec, desired)?;
            is_significant(spec, &want, current.get(spec.name)).then(|| (spec.name.to_string(), want))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{lookup, WEBHOOK_PRIORITY};
    use crate::store::{DesiredSearch, ResourceState};

    const SUMMARY: &str = "action_jira_service_desk_param_jira_summary";

    #[test]
    fn sentinel_against_empty_is_insignificant() {
        for d in ["Splunk Alert: $name$", "The alert condition for '$name$' was triggered."] {
            assert!(is_insignificant("", d, d));
            assert!(!is_insignificant("x", d, d));
        }
        assert!(!is_insignificant("", "something else", "Splunk Alert: $name$"));
    }

    #[test]
    fn sentinel_field_unset_in_view_matches_empty_desired() {
        let spec = lookup(SUMMARY).unwrap();
        assert!(!is_significant(spec, &FieldValue::from(""), None));
        assert!(is_significant(spec, &FieldValue::from("Disk full"), None));
        assert!(!is_significant(
            spec,
            &FieldValue::from("Disk full"),
            Some(&FieldValue::from("Disk full"))
        ));
    }

    #[test]
    fn reordered_actions_are_not_a_change() {
        let spec = lookup(ACTIONS).unwrap();
        assert!(!is_significant(
            spec,
            &FieldValue::from("email,webhook"),
            Some(&FieldValue::from("webhook, email"))
        ));
        assert!(is_significant(
            spec,
            &FieldValue::from("email"),
            Some(&FieldValue::from("email,webhook"))
        ));
    }

    #[test]
    fn plan_lists_only_real_changes() {
        let mut current = ResourceState::new("s");
        current.set("search", "index=main".into());
        current.set("actions", "email,webhook".into());
        current.set("cron_schedule", "*/5 * * * *".into());
        current.set("is_visible", true.into());
        current.set("action_slack_param_attachment", "none".into());
        current.set(WEBHOOK_PRIORITY, 1i64.into());
        current.set("action_webhook", true.into());

        let desired = DesiredSearch::new("s")
            .with("search", "index=main")
            .with("actions", "webhook,email")
            .with("cron_schedule", "*/10 * * * *")
            .with(SUMMARY, "");

        let changes = plan(&desired, &current);
        assert_eq!(changes.len(), 1, "unexpected plan: {changes:?}");
        assert_eq!(changes["cron_schedule"], FieldValue::from("*/10 * * * *"));
    }

    #[test]
    fn plan_includes_rederived_priority() {
        let mut current = ResourceState::new("s");
        current.set(WEBHOOK_PRIORITY, 1i64.into());
        current.set("is_visible", true.into());
        current.set("action_slack_param_attachment", "none".into());

        let desired = DesiredSearch::new("s")
            .with("severity", "High")
            .with("precision", "Low");
        let changes = plan(&desired, &current);
        assert_eq!(changes[WEBHOOK_PRIORITY], FieldValue::Int(2));
        assert_eq!(changes["severity"], FieldValue::from("High"));
        assert!(!changes.contains_key("action_webhook"));
    }
}
