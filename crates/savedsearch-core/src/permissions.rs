use serde::{Deserialize, Serialize};

use crate::types::Sharing;

pub const DEFAULT_OWNER: &str = "nobody";
pub const DEFAULT_APP: &str = "search";

/// Owner/app context plus sharing level and role permissions of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclScope {
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_app")]
    pub app: String,
    /// `None` leaves the remote's default sharing in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing: Option<Sharing>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub write: Vec<String>,
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

fn default_app() -> String {
    DEFAULT_APP.to_string()
}

impl Default for AclScope {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            app: default_app(),
            sharing: None,
            read: Vec::new(),
            write: Vec::new(),
        }
    }
}

impl AclScope {
    pub fn new(owner: impl Into<String>, app: impl Into<String>, sharing: Option<Sharing>) -> Self {
        Self {
            owner: owner.into(),
            app: app.into(),
            sharing,
            read: Vec::new(),
            write: Vec::new(),
        }
    }

    pub fn is_private(&self) -> bool {
        self.sharing == Some(Sharing::User)
    }
}

/// Scope an entity is created (and addressed) under. Without an operator
/// supplied ACL block this is the `nobody`/`search` pseudo-default.
pub fn resolve_for_create(requested: Option<&AclScope>) -> AclScope {
    match requested {
        Some(acl) => acl.clone(),
        None => AclScope::default(),
    }
}

/// Owner used for update calls. Anything shared beyond a single user is
/// addressed as `nobody`; otherwise the remote would fork a private copy.
pub fn resolve_for_update(requested: &AclScope) -> String {
    if requested.is_private() {
        requested.owner.clone()
    } else {
        DEFAULT_OWNER.to_string()
    }
}
