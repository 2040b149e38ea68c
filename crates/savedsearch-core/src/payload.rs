//! Request bodies built from operator config, including derived values.

use crate::actions;
use crate::fields::{self, FieldMap, FieldSpec, FieldValue, ACTIONS, PRECISION, SEVERITY, WEBHOOK_PRIORITY};
use crate::priority::{self, PriorityInputs};
use crate::store::ConfigStore;

/// Webhook priority the operator asked for, or the one derived from severity
/// and precision.
pub fn webhook_priority<S: ConfigStore + ?Sized>(desired: &S) -> i64 {
    let explicit_override = desired.get(WEBHOOK_PRIORITY).and_then(|value| {
        let spec = fields::lookup(WEBHOOK_PRIORITY)?;
        fields::coerce(spec, value.clone()).ok()?.as_int()
    });
    let inputs = PriorityInputs::from_text(
        &desired.get_str(SEVERITY),
        &desired.get_str(PRECISION),
        explicit_override,
    );
    priority::effective_priority(&inputs)
}

/// Value the operator wants for a settable field: the supplied value, else the
/// declared default. Action lists come back canonical and the webhook priority
/// is always present.
pub fn desired_value<S: ConfigStore + ?Sized>(spec: &FieldSpec, desired: &S) -> Option<FieldValue> {
    if spec.is_computed_only() {
        return None;
    }
    if spec.name == WEBHOOK_PRIORITY {
        return Some(FieldValue::Int(webhook_priority(desired)));
    }
    let value = match desired.get(spec.name) {
        Some(v) => fields::coerce(spec, v.clone()).ok()?,
        None => spec.default_value()?,
    };
    if spec.name == ACTIONS {
        return Some(FieldValue::Str(actions::normalize(&value.to_string())));
    }
    Some(value)
}

/// Read-only flags mirroring membership in the canonical action set.
pub fn action_flags(normalized_actions: &str) -> FieldMap {
    fields::FIELDS
        .iter()
        .filter_map(|spec| {
            let action = spec.mirrors_action?;
            Some((
                spec.name.to_string(),
                FieldValue::Bool(actions::contains(normalized_actions, action)),
            ))
        })
        .collect()
}

/// Full body for entity creation.
pub fn create_payload<S: ConfigStore + ?Sized>(desired: &S) -> FieldMap {
    let mut payload: FieldMap = fields::FIELDS
        .iter()
        .filter_map(|spec| desired_value(spec, desired).map(|v| (spec.name.to_string(), v)))
        .collect();

    let normalized = payload
        .get(ACTIONS)
        .map(|v| v.to_string())
        .unwrap_or_default();
    payload.extend(action_flags(&normalized));
    payload
}
