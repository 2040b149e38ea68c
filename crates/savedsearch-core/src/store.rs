use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ReconcileError, Result};
use crate::fields::{self, FieldMap, FieldValue};
use crate::migrations::{self, CURRENT_SCHEMA_VERSION};
use crate::paths;
use crate::permissions::AclScope;
use crate::types::EntityStatus;

// ---------------------------------------------------------------------------
// ConfigStore
// ---------------------------------------------------------------------------

/// Typed field access over one entity's attributes.
pub trait ConfigStore {
    fn name(&self) -> &str;

    fn fields(&self) -> &FieldMap;

    fn set(&mut self, field: &str, value: FieldValue);

    fn unset(&mut self, field: &str);

    fn acl(&self) -> Option<&AclScope>;

    fn set_acl(&mut self, acl: AclScope);

    fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields().get(field)
    }

    /// Whether a value was supplied for `field`.
    fn is_set(&self, field: &str) -> bool {
        self.fields().contains_key(field)
    }

    fn get_str(&self, field: &str) -> String {
        self.get(field).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Replace every field with `values`.
    fn set_all(&mut self, values: FieldMap) {
        let stale: Vec<String> = self.fields().keys().cloned().collect();
        for field in stale {
            self.unset(&field);
        }
        for (field, value) in values {
            self.set(&field, value);
        }
    }
}

// ---------------------------------------------------------------------------
// DesiredSearch
// ---------------------------------------------------------------------------

/// Operator-declared state of one saved search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredSearch {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<AclScope>,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl DesiredSearch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            acl: None,
            fields: FieldMap::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn with_acl(mut self, acl: AclScope) -> Self {
        self.acl = Some(acl);
        self
    }

    /// Parse a YAML document and coerce every field to its declared kind.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let mut desired: DesiredSearch = serde_yaml::from_str(data)?;
        let mut typed = FieldMap::new();
        for (name, value) in std::mem::take(&mut desired.fields) {
            let spec = fields::lookup(&name)
                .ok_or_else(|| ReconcileError::validation(&name, "unknown field"))?;
            typed.insert(name, fields::coerce(spec, value)?);
        }
        desired.fields = typed;
        Ok(desired)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }
}

impl ConfigStore for DesiredSearch {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &FieldMap {
        &self.fields
    }

    fn set(&mut self, field: &str, value: FieldValue) {
        self.fields.insert(field.to_string(), value);
    }

    fn unset(&mut self, field: &str) {
        self.fields.remove(field);
    }

    fn acl(&self) -> Option<&AclScope> {
        self.acl.as_ref()
    }

    fn set_acl(&mut self, acl: AclScope) {
        self.acl = Some(acl);
    }
}

// ---------------------------------------------------------------------------
// ResourceState
// ---------------------------------------------------------------------------

/// Locally persisted reconciled view of one remote entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    #[serde(default)]
    pub schema_version: u32,
    pub name: String,
    #[serde(default)]
    pub status: EntityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<AclScope>,
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

impl ResourceState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            name: name.into(),
            status: EntityStatus::Absent,
            acl: None,
            fields: FieldMap::new(),
            synced_at: None,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn exists(root: &Path, name: &str) -> bool {
        paths::state_path(root, name).exists()
    }

    pub fn load(root: &Path, name: &str) -> Result<Self> {
        let path = paths::state_path(root, name);
        if !paths::savedsearch_dir(root).is_dir() {
            return Err(ReconcileError::NotInitialized);
        }
        if !path.exists() {
            return Err(ReconcileError::NotFound(name.to_string()));
        }
        let (state, _) = Self::load_file(&path)?;
        Ok(state)
    }

    /// Load a state file, upgrading it to the current schema. The flag is
    /// true when a migration ran.
    pub fn load_file(path: &Path) -> Result<(Self, bool)> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    pub fn from_yaml(data: &str) -> Result<(Self, bool)> {
        let mut raw: serde_yaml::Mapping = serde_yaml::from_str(data)?;
        let version = match raw.get("schema_version") {
            None | Some(serde_yaml::Value::Null) => 0,
            Some(value) => value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| {
                    ReconcileError::migration(format!("unsupported schema_version {value:?}"))
                })?,
        };

        let migrated = version != CURRENT_SCHEMA_VERSION;
        if migrated {
            let fields = match raw.remove("fields") {
                Some(serde_yaml::Value::Mapping(m)) => m,
                Some(serde_yaml::Value::Null) | None => serde_yaml::Mapping::new(),
                Some(_) => return Err(ReconcileError::migration("'fields' is not a mapping")),
            };
            let upgraded = migrations::upgrade(fields, version)?;
            raw.insert("fields".into(), serde_yaml::Value::Mapping(upgraded));
            raw.insert("schema_version".into(), CURRENT_SCHEMA_VERSION.into());
        }

        let mut state: ResourceState = serde_yaml::from_value(serde_yaml::Value::Mapping(raw))?;
        state.fields = state
            .fields
            .into_iter()
            .filter_map(|(name, value)| {
                let Some(spec) = fields::lookup(&name) else {
                    tracing::warn!(state = %state.name, field = %name, "dropping unknown field from state");
                    return None;
                };
                match fields::coerce(spec, value) {
                    Ok(v) => Some((name, v)),
                    Err(err) => {
                        tracing::warn!(state = %state.name, field = %name, error = %err, "dropping unreadable field from state");
                        None
                    }
                }
            })
            .collect();
        Ok((state, migrated))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        self.save_to(&paths::state_path(root, &self.name))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    pub fn remove(root: &Path, name: &str) -> Result<()> {
        let path = paths::state_path(root, name);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl ConfigStore for ResourceState {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &FieldMap {
        &self.fields
    }

    fn set(&mut self, field: &str, value: FieldValue) {
        self.fields.insert(field.to_string(), value);
    }

    fn unset(&mut self, field: &str) {
        self.fields.remove(field);
    }

    fn acl(&self) -> Option<&AclScope> {
        self.acl.as_ref()
    }

    fn set_acl(&mut self, acl: AclScope) {
        self.acl = Some(acl);
    }

    fn set_all(&mut self, values: FieldMap) {
        self.fields = values;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
