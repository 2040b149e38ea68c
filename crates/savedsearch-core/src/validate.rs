use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ReconcileError, Result};
use crate::fields::{self, SEARCH};
use crate::store::ConfigStore;

static HTTP_URL_RE: OnceLock<Regex> = OnceLock::new();

fn http_url_re() -> &'static Regex {
    HTTP_URL_RE.get_or_init(|| Regex::new(r"^https?://[^\s]+$").unwrap())
}

pub fn is_http_url(s: &str) -> bool {
    http_url_re().is_match(s)
}

/// Entity names are the remote primary key and double as state file names.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ReconcileError::validation("name", "must not be empty"));
    }
    if name.trim() != name {
        return Err(ReconcileError::validation(
            "name",
            "must not start or end with whitespace",
        ));
    }
    if name.chars().any(char::is_control) {
        return Err(ReconcileError::validation("name", "must not contain control characters"));
    }
    Ok(())
}

/// Every operator-supplied field must be known, settable, of the declared
/// kind and satisfy its format constraint.
pub fn validate_desired<S: ConfigStore + ?Sized>(desired: &S) -> Result<()> {
    validate_name(desired.name())?;
    for (name, value) in desired.fields() {
        let spec = fields::lookup(name)
            .ok_or_else(|| ReconcileError::validation(name, "unknown field"))?;
        if spec.is_computed_only() {
            return Err(ReconcileError::validation(
                name,
                "computed from `actions` and cannot be set",
            ));
        }
        let typed = fields::coerce(spec, value.clone())?;
        fields::check(spec, &typed)?;
    }
    Ok(())
}

pub fn validate_for_create<S: ConfigStore + ?Sized>(desired: &S) -> Result<()> {
    validate_desired(desired)?;
    let has_search = desired
        .get(SEARCH)
        .is_some_and(|v| !v.to_string().trim().is_empty());
    if !has_search {
        return Err(ReconcileError::validation(
            SEARCH,
            "required when creating a new search",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldValue;
    use crate::store::DesiredSearch;

    #[test]
    fn names() {
        assert!(validate_name("Errors in the last hour").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("  padded ").is_err());
        assert!(validate_name("tab\there").is_err());
    }

    #[test]
    fn rejects_unknown_and_computed_fields() {
        let desired = DesiredSearch::new("s").with("no_such_field", "x");
        assert!(matches!(
            validate_desired(&desired),
            Err(ReconcileError::Validation { field, .. }) if field == "no_such_field"
        ));

        let desired = DesiredSearch::new("s").with("action_webhook", true);
        assert!(validate_desired(&desired).is_err());
    }

    #[test]
    fn rejects_out_of_range_categoricals() {
        let desired = DesiredSearch::new("s").with("severity", "Severe");
        assert!(validate_desired(&desired).is_err());
        let desired = DesiredSearch::new("s").with("precision", "Medium");
        assert!(validate_desired(&desired).is_ok());
    }

    #[test]
    fn rejects_bad_webhook_url() {
        let desired = DesiredSearch::new("s").with("action_webhook_param_url", "hooks.example.com");
        assert!(validate_desired(&desired).is_err());
    }

    #[test]
    fn create_requires_search() {
        let desired = DesiredSearch::new("s");
        assert!(validate_for_create(&desired).is_err());
        let desired = desired.with(SEARCH, FieldValue::from("index=main error"));
        assert!(validate_for_create(&desired).is_ok());
    }
}
