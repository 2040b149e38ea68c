use serde_yaml::{Mapping, Value};

use crate::error::{ReconcileError, Result};
use crate::fields::ALERT_TRACK;
use crate::types::AlertTrack;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

type Migration = fn(Mapping) -> Result<Mapping>;

/// `MIGRATIONS[n]` upgrades a field mapping from version `n` to `n + 1`.
const MIGRATIONS: &[Migration] = &[alert_track_v0_to_v1];

/// Run every pending migration on a persisted field mapping, one version at a
/// time.
///
/// To add a schema change, bump [`CURRENT_SCHEMA_VERSION`] and append the
/// `V(n) -> V(n+1)` step to `MIGRATIONS`.
pub fn upgrade(state: Mapping, from_version: u32) -> Result<Mapping> {
    if from_version > CURRENT_SCHEMA_VERSION {
        return Err(ReconcileError::migration(format!(
            "state schema version {from_version} is newer than supported version {CURRENT_SCHEMA_VERSION}"
        )));
    }

    let mut state = state;
    for version in from_version..CURRENT_SCHEMA_VERSION {
        let step = MIGRATIONS[version as usize];
        state = step(state)?;
        tracing::debug!(from = version, to = version + 1, "migrated state schema");
    }
    Ok(state)
}

/// v0 persisted `alert_track` as text. v1 stores the tri-state directly:
/// a boolean, or `"auto"`.
fn alert_track_v0_to_v1(mut state: Mapping) -> Result<Mapping> {
    let raw = state
        .get(ALERT_TRACK)
        .ok_or_else(|| ReconcileError::migration("v0 state has no 'alert_track' field"))?;

    let Value::String(text) = raw else {
        return Err(ReconcileError::migration(format!(
            "v0 'alert_track' must be text, found {raw:?}"
        )));
    };

    let track = match text.as_str() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => AlertTrack::True,
        "0" | "f" | "F" | "FALSE" | "false" | "False" => AlertTrack::False,
        "auto" => {
            // Boolean parsing never defined "auto"; keep it as the explicit
            // tri-state value and flag it for review.
            tracing::warn!("alert_track 'auto' carried over from v0 state unchanged; confirm the intended tracking mode");
            AlertTrack::Auto
        }
        other => {
            return Err(ReconcileError::migration(format!(
                "v0 'alert_track' value '{other}' is not a boolean or 'auto'"
            )))
        }
    };

    state.insert(ALERT_TRACK.into(), serde_yaml::to_value(track)?);
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v0(track: Value) -> Mapping {
        let mut m = Mapping::new();
        m.insert("search".into(), "index=main".into());
        m.insert(ALERT_TRACK.into(), track);
        m
    }

    #[test]
    fn text_booleans_become_booleans() {
        let out = upgrade(v0("true".into()), 0).unwrap();
        assert_eq!(out.get(ALERT_TRACK), Some(&Value::Bool(true)));
        let out = upgrade(v0("false".into()), 0).unwrap();
        assert_eq!(out.get(ALERT_TRACK), Some(&Value::Bool(false)));
        assert_eq!(out.get("search"), Some(&Value::from("index=main")));
    }

    #[test]
    fn auto_is_preserved_as_tri_state() {
        let out = upgrade(v0("auto".into()), 0).unwrap();
        assert_eq!(out.get(ALERT_TRACK), Some(&Value::from("auto")));
    }

    #[test]
    fn missing_or_mistyped_field_fails() {
        let mut m = v0("true".into());
        m.remove(ALERT_TRACK);
        assert!(matches!(upgrade(m, 0), Err(ReconcileError::Migration(_))));
        assert!(matches!(upgrade(v0(Value::Bool(true)), 0), Err(ReconcileError::Migration(_))));
        assert!(matches!(upgrade(v0("maybe".into()), 0), Err(ReconcileError::Migration(_))));
    }

    #[test]
    fn current_version_is_untouched() {
        let m = v0(Value::Bool(true));
        assert_eq!(upgrade(m.clone(), CURRENT_SCHEMA_VERSION).unwrap(), m);
    }

    #[test]
    fn future_version_is_rejected() {
        assert!(upgrade(Mapping::new(), CURRENT_SCHEMA_VERSION + 1).is_err());
    }
}
