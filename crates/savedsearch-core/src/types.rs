use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::ReconcileError;

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sharing {
    User,
    App,
    Global,
    System,
}

impl Sharing {
    pub fn as_str(self) -> &'static str {
        match self {
            Sharing::User => "user",
            Sharing::App => "app",
            Sharing::Global => "global",
            Sharing::System => "system",
        }
    }
}

impl fmt::Display for Sharing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sharing {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sharing::User),
            "app" => Ok(Sharing::App),
            "global" => Ok(Sharing::Global),
            "system" => Ok(Sharing::System),
            _ => Err(ReconcileError::validation(
                "acl.sharing",
                format!("'{s}' is not one of user, app, global, system"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Severity / Precision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn all() -> &'static [&'static str] {
        &["Critical", "High", "Medium", "Low"]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Critical" => Ok(Severity::Critical),
            "High" => Ok(Severity::High),
            "Medium" => Ok(Severity::Medium),
            "Low" => Ok(Severity::Low),
            _ => Err(ReconcileError::validation(
                "severity",
                format!("expected one of {}, got '{s}'", Severity::all().join(", ")),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    High,
    Medium,
    Low,
}

impl Precision {
    pub fn all() -> &'static [&'static str] {
        &["High", "Medium", "Low"]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Precision::High => "High",
            Precision::Medium => "Medium",
            Precision::Low => "Low",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Precision {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Precision::High),
            "Medium" => Ok(Precision::Medium),
            "Low" => Ok(Precision::Low),
            _ => Err(ReconcileError::validation(
                "precision",
                format!("expected one of {}, got '{s}'", Precision::all().join(", ")),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// AlertTrack
// ---------------------------------------------------------------------------

/// Tri-state alert tracking setting.
///
/// Serialized as a plain boolean for `True`/`False` and as the string
/// `"auto"` for `Auto`, which is the layout of schema version 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertTrack {
    True,
    False,
    Auto,
}

impl AlertTrack {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertTrack::True => "true",
            AlertTrack::False => "false",
            AlertTrack::Auto => "auto",
        }
    }

    /// Parse the textual representation used on the wire and in v0 state.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "true" | "1" => Some(AlertTrack::True),
            "false" | "0" => Some(AlertTrack::False),
            "auto" => Some(AlertTrack::Auto),
            _ => None,
        }
    }
}

impl From<bool> for AlertTrack {
    fn from(b: bool) -> Self {
        if b {
            AlertTrack::True
        } else {
            AlertTrack::False
        }
    }
}

impl fmt::Display for AlertTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AlertTrack {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AlertTrack::True => serializer.serialize_bool(true),
            AlertTrack::False => serializer.serialize_bool(false),
            AlertTrack::Auto => serializer.serialize_str("auto"),
        }
    }
}

impl<'de> Deserialize<'de> for AlertTrack {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(b.into()),
            Raw::Text(s) => AlertTrack::parse(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid alert_track '{s}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// EntityStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    #[default]
    Absent,
    Created,
    Synced,
    Drifted,
    Deleted,
}

impl EntityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityStatus::Absent => "absent",
            EntityStatus::Created => "created",
            EntityStatus::Synced => "synced",
            EntityStatus::Drifted => "drifted",
            EntityStatus::Deleted => "deleted",
        }
    }

    pub fn can_transition_to(self, next: EntityStatus) -> bool {
        use EntityStatus::*;
        matches!(
            (self, next),
            (Absent, Created)
                | (Absent, Synced)
                | (Created, Synced)
                | (Synced, Synced)
                | (Synced, Drifted)
                | (Drifted, Synced)
                | (Drifted, Drifted)
                | (Created, Deleted)
                | (Synced, Deleted)
                | (Drifted, Deleted)
        )
    }

    pub fn transition(self, next: EntityStatus) -> crate::Result<EntityStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ReconcileError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
                reason: "not a legal lifecycle step".to_string(),
            })
        }
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CollectionKind
// ---------------------------------------------------------------------------

/// REST collection a permission update is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    SavedSearches,
}

impl CollectionKind {
    /// Path segments of the collection below `/servicesNS/{owner}/{app}/`.
    pub fn segments(self) -> (&'static str, &'static str) {
        match self {
            CollectionKind::SavedSearches => ("saved", "searches"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
