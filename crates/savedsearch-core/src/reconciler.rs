//! Create/read/update/delete lifecycle against the remote collection.
//!
//! Each call is a sequence of blocking remote round trips with no rollback:
//! if a later step fails, earlier steps stay applied remotely. In particular
//! an update whose permission step fails leaves new content under stale
//! permissions, and a create whose confirmatory read fails leaves the entity
//! in place. Calls for one entity name must be serialized by the caller;
//! different names are independent.

use chrono::Utc;
use tracing::{debug, info};

use crate::actions;
use crate::client::RemoteResourceClient;
use crate::diff;
use crate::error::{ReconcileError, Result};
use crate::fields::{self, FieldMap, ACTIONS};
use crate::payload;
use crate::permissions::{self, AclScope};
use crate::store::{ConfigStore, ResourceState};
use crate::types::{CollectionKind, EntityStatus};
use crate::validate;
use crate::wire::{self, Entry};

pub struct Reconciler<C> {
    client: C,
    kind: CollectionKind,
}

impl<C: RemoteResourceClient> Reconciler<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            kind: CollectionKind::SavedSearches,
        }
    }

    // ---------------------------------------------------------------------------
    // Create
    // ---------------------------------------------------------------------------

    /// Create the entity, assign permissions if an ACL block was supplied, and
    /// return the reconciled view read back from the remote.
    pub fn create<S: ConfigStore + ?Sized>(&self, desired: &S) -> Result<ResourceState> {
        validate::validate_for_create(desired)?;
        let name = desired.name();
        let scope = permissions::resolve_for_create(desired.acl());
        let body = payload::create_payload(desired);

        info!(name, owner = %scope.owner, app = %scope.app, "creating saved search");
        debug!(fields = body.len(), "create payload");
        self.client.create(name, &scope.owner, &scope.app, &body)?;

        if let Some(requested) = desired.acl() {
            info!(name, sharing = ?requested.sharing, "assigning permissions");
            self.client.update_permissions(
                &requested.owner,
                &requested.app,
                name,
                requested,
                self.kind,
            )?;
        }

        let mut state = ResourceState::new(name);
        state.status = state.status.transition(EntityStatus::Created)?;
        state.acl = desired.acl().cloned();
        self.refresh(&mut state)?;
        Ok(state)
    }

    // ---------------------------------------------------------------------------
    // Read
    // ---------------------------------------------------------------------------

    fn fetch(&self, name: &str, scope: &AclScope) -> Result<Entry> {
        debug!(name, owner = %scope.owner, app = %scope.app, "reading saved search");
        let response = self.client.read(name, &scope.owner, &scope.app)?;
        wire::find_entry(name, &response)
    }

    /// Fetch the entity named exactly `name` and write its reconciled view and
    /// ACL into `store`.
    pub fn read<S: ConfigStore + ?Sized>(&self, name: &str, scope: &AclScope, store: &mut S) -> Result<()> {
        let entry = self.fetch(name, scope)?;
        store.set_all(reconciled_fields(&entry));
        if let Some(acl) = &entry.acl {
            store.set_acl(AclScope::from(acl));
        }
        Ok(())
    }

    /// Re-read a tracked entity and mark it synced.
    pub fn refresh(&self, state: &mut ResourceState) -> Result<()> {
        let next = state.status.transition(EntityStatus::Synced)?;
        let scope = permissions::resolve_for_create(state.acl.as_ref());
        let name = state.name.clone();
        self.read(&name, &scope, state)?;
        state.status = next;
        state.synced_at = Some(Utc::now());
        Ok(())
    }

    /// Adopt an existing remote entity that has no local view yet.
    pub fn import(&self, name: &str, acl: Option<&AclScope>) -> Result<ResourceState> {
        validate::validate_name(name)?;
        let mut state = ResourceState::new(name);
        state.acl = acl.cloned();
        self.refresh(&mut state)?;
        Ok(state)
    }

    // ---------------------------------------------------------------------------
    // Update
    // ---------------------------------------------------------------------------

    /// Push significant changes and permissions, then re-read.
    pub fn update<S: ConfigStore + ?Sized>(&self, desired: &S, state: &mut ResourceState) -> Result<()> {
        if matches!(state.status, EntityStatus::Absent | EntityStatus::Deleted) {
            return Err(ReconcileError::InvalidTransition {
                from: state.status.to_string(),
                to: EntityStatus::Synced.to_string(),
                reason: format!("'{}' does not exist remotely", state.name),
            });
        }
        if desired.name() != state.name {
            return Err(ReconcileError::validation(
                "name",
                format!("is immutable ('{}' -> '{}')", state.name, desired.name()),
            ));
        }
        validate::validate_desired(desired)?;

        let requested = desired
            .acl()
            .or(state.acl.as_ref())
            .cloned()
            .unwrap_or_default();
        let owner = permissions::resolve_for_update(&requested);
        let changes = diff::plan(desired, &*state);
        let name = state.name.clone();

        info!(name = %name, owner = %owner, app = %requested.app, changes = changes.len(), "updating saved search");
        self.client.update(&name, &owner, &requested.app, &changes)?;

        info!(name = %name, owner = %owner, sharing = ?requested.sharing, "updating permissions");
        self.client
            .update_permissions(&owner, &requested.app, &name, &requested, self.kind)?;

        state.acl = Some(requested);
        self.refresh(state)
    }

    // ---------------------------------------------------------------------------
    // Delete
    // ---------------------------------------------------------------------------

    pub fn delete(&self, name: &str, scope: &AclScope) -> Result<()> {
        info!(name, owner = %scope.owner, app = %scope.app, "deleting saved search");
        let response = self.client.delete(name, &scope.owner, &scope.app)?;
        if response.is_success() {
            Ok(())
        } else {
            Err(wire::decode_error(&response))
        }
    }

    /// Delete a tracked entity under its recorded scope.
    pub fn delete_state(&self, state: &mut ResourceState) -> Result<()> {
        let next = state.status.transition(EntityStatus::Deleted)?;
        let scope = state.acl.clone().unwrap_or_default();
        self.delete(&state.name, &scope)?;
        state.status = next;
        Ok(())
    }
}

/// Compare desired config against the tracked view. A tracked entity with
/// significant differences is marked drifted, and back to synced once none
/// remain.
pub fn plan<S: ConfigStore + ?Sized>(desired: &S, state: &mut ResourceState) -> Result<FieldMap> {
    let changes = diff::plan(desired, &*state);
    if matches!(state.status, EntityStatus::Synced | EntityStatus::Drifted) {
        let next = if changes.is_empty() {
            EntityStatus::Synced
        } else {
            EntityStatus::Drifted
        };
        state.status = state.status.transition(next)?;
    }
    debug!(name = %state.name, changes = changes.len(), "planned changes");
    Ok(changes)
}

/// Typed view of a remote entry. Sentinel defaults are left unset and the
/// action list is canonical.
pub fn reconciled_fields(entry: &Entry) -> FieldMap {
    let mut view = FieldMap::new();
    for spec in fields::FIELDS {
        let Some(raw) = entry.content.get(spec.wire) else {
            continue;
        };
        let Some(mut value) = fields::decode_wire(spec, raw) else {
            continue;
        };
        if spec.sentinel.is_some_and(|sentinel| value.to_string() == sentinel) {
            continue;
        }
        if spec.name == ACTIONS {
            value = actions::normalize(&value.to_string()).into();
        }
        view.insert(spec.name.to_string(), value);
    }
    view
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RemoteResponse;
    use crate::fields::{FieldValue, WEBHOOK_PRIORITY};
    use crate::store::DesiredSearch;
    use crate::types::Sharing;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create { name: String, owner: String, app: String, fields: FieldMap },
        Read { name: String, owner: String, app: String },
        Update { name: String, owner: String, app: String, fields: FieldMap },
        Perms { owner: String, app: String, name: String, acl: AclScope },
        Delete { name: String, owner: String, app: String },
    }

    /// Records every call; reads and deletes pop scripted responses.
    #[derive(Default)]
    struct FakeClient {
        calls: RefCell<Vec<Call>>,
        reads: RefCell<VecDeque<RemoteResponse>>,
        deletes: RefCell<VecDeque<RemoteResponse>>,
        fail_perms: bool,
    }

    impl FakeClient {
        fn with_reads(bodies: &[&str]) -> Self {
            let client = FakeClient::default();
            for body in bodies {
                client.reads.borrow_mut().push_back(RemoteResponse::new(200, *body));
            }
            client
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn perms_calls(&self) -> Vec<Call> {
            self.calls()
                .into_iter()
                .filter(|c| matches!(c, Call::Perms { .. }))
                .collect()
        }
    }

    impl RemoteResourceClient for FakeClient {
        fn create(&self, name: &str, owner: &str, app: &str, fields: &FieldMap) -> Result<()> {
            self.calls.borrow_mut().push(Call::Create {
                name: name.into(),
                owner: owner.into(),
                app: app.into(),
                fields: fields.clone(),
            });
            Ok(())
        }

        fn read(&self, name: &str, owner: &str, app: &str) -> Result<RemoteResponse> {
            self.calls.borrow_mut().push(Call::Read {
                name: name.into(),
                owner: owner.into(),
                app: app.into(),
            });
            Ok(self
                .reads
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| RemoteResponse::new(200, r#"{"entry":[]}"#)))
        }

        fn update(&self, name: &str, owner: &str, app: &str, fields: &FieldMap) -> Result<()> {
            self.calls.borrow_mut().push(Call::Update {
                name: name.into(),
                owner: owner.into(),
                app: app.into(),
                fields: fields.clone(),
            });
            Ok(())
        }

        fn update_permissions(
            &self,
            owner: &str,
            app: &str,
            name: &str,
            acl: &AclScope,
            _kind: CollectionKind,
        ) -> Result<()> {
            self.calls.borrow_mut().push(Call::Perms {
                owner: owner.into(),
                app: app.into(),
                name: name.into(),
                acl: acl.clone(),
            });
            if self.fail_perms {
                return Err(ReconcileError::Remote("permission denied".into()));
            }
            Ok(())
        }

        fn delete(&self, name: &str, owner: &str, app: &str) -> Result<RemoteResponse> {
            self.calls.borrow_mut().push(Call::Delete {
                name: name.into(),
                owner: owner.into(),
                app: app.into(),
            });
            Ok(self
                .deletes
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| RemoteResponse::new(200, "")))
        }
    }

    fn entry_body(name: &str, sharing: &str, owner: &str) -> String {
        serde_json::json!({
            "entry": [{
                "name": name,
                "content": {
                    "search": "index=main error",
                    "actions": "webhook, email",
                    "action.webhook": true,
                    "action.webhook.param.priority": "4",
                    "action.jira_service_desk.param.jira_summary": "Splunk Alert: $name$",
                    "action.jira_service_desk.param.jira_description":
                        "The alert condition for '$name$' was triggered.",
                    "alert.track": "auto",
                    "is_visible": "1"
                },
                "acl": {"owner": owner, "app": "search", "sharing": sharing,
                        "perms": {"read": ["*"], "write": ["admin"]}}
            }]
        })
        .to_string()
    }

    fn desired() -> DesiredSearch {
        DesiredSearch::new("errors")
            .with("search", "index=main error")
            .with("actions", "email,webhook")
    }

    // -- create --------------------------------------------------------------

    #[test]
    fn create_without_acl_skips_permission_call() {
        let body = entry_body("errors", "app", "nobody");
        let client = FakeClient::with_reads(&[&body]);
        let reconciler = Reconciler::new(&client);

        let state = reconciler.create(&desired()).unwrap();

        let calls = client.calls();
        assert!(matches!(
            &calls[0],
            Call::Create { owner, app, .. } if owner == "nobody" && app == "search"
        ));
        assert!(client.perms_calls().is_empty());
        assert!(matches!(
            &calls[1],
            Call::Read { owner, app, .. } if owner == "nobody" && app == "search"
        ));
        assert_eq!(calls.len(), 2);
        assert_eq!(state.status, EntityStatus::Synced);
        assert!(state.synced_at.is_some());
    }

    #[test]
    fn create_with_acl_assigns_requested_scope() {
        let body = entry_body("errors", "user", "bob");
        let client = FakeClient::with_reads(&[&body]);
        let reconciler = Reconciler::new(&client);
        let acl = AclScope::new("bob", "myapp", Some(Sharing::User));

        reconciler.create(&desired().with_acl(acl.clone())).unwrap();

        let calls = client.calls();
        assert!(matches!(
            &calls[0],
            Call::Create { owner, app, .. } if owner == "bob" && app == "myapp"
        ));
        assert_eq!(
            calls[1],
            Call::Perms {
                owner: "bob".into(),
                app: "myapp".into(),
                name: "errors".into(),
                acl,
            }
        );
        assert_eq!(client.perms_calls().len(), 1);
    }

    #[test]
    fn create_payload_carries_derived_values() {
        let body = entry_body("errors", "app", "nobody");
        let client = FakeClient::with_reads(&[&body]);
        let reconciler = Reconciler::new(&client);
        let desired = desired().with("severity", "Medium").with("precision", "Low");

        reconciler.create(&desired).unwrap();

        let calls = client.calls();
        let Call::Create { fields, .. } = &calls[0] else {
            panic!("expected create first");
        };
        assert_eq!(fields[WEBHOOK_PRIORITY], FieldValue::Int(1));
        assert_eq!(fields["action_webhook"], FieldValue::Bool(true));
        assert_eq!(fields["actions"], FieldValue::from("email,webhook"));
    }

    #[test]
    fn create_validates_before_any_remote_call() {
        let client = FakeClient::default();
        let reconciler = Reconciler::new(&client);
        let bad = desired().with("action_webhook_param_url", "not a url");

        assert!(matches!(
            reconciler.create(&bad),
            Err(ReconcileError::Validation { .. })
        ));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn create_surfaces_missing_entity_on_confirmatory_read() {
        let client = FakeClient::with_reads(&[r#"{"entry":[{"name":"errors-copy"}]}"#]);
        let reconciler = Reconciler::new(&client);

        assert!(matches!(
            reconciler.create(&desired()),
            Err(ReconcileError::NotFound(n)) if n == "errors"
        ));
        // The entity was still created remotely.
        assert!(matches!(client.calls()[0], Call::Create { .. }));
    }

    // -- read ----------------------------------------------------------------

    #[test]
    fn read_suppresses_sentinels_and_normalizes_actions() {
        let body = entry_body("errors", "global", "admin");
        let client = FakeClient::with_reads(&[&body]);
        let reconciler = Reconciler::new(&client);
        let mut view = ResourceState::new("errors");

        reconciler
            .read("errors", &AclScope::default(), &mut view)
            .unwrap();

        assert_eq!(view.get("actions"), Some(&FieldValue::from("email,webhook")));
        assert!(!view.is_set("action_jira_service_desk_param_jira_summary"));
        assert!(!view.is_set("action_jira_service_desk_param_jira_description"));
        assert_eq!(view.get(WEBHOOK_PRIORITY), Some(&FieldValue::Int(4)));
        assert_eq!(view.get("is_visible"), Some(&FieldValue::Bool(true)));
        let acl = view.acl.unwrap();
        assert_eq!(acl.owner, "admin");
        assert_eq!(acl.sharing, Some(Sharing::Global));
        assert_eq!(acl.write, vec!["admin".to_string()]);
    }

    #[test]
    fn read_non_success_is_remote_error() {
        let client = FakeClient::default();
        client.reads.borrow_mut().push_back(RemoteResponse::new(
            403,
            r#"{"messages":[{"type":"ERROR","text":"forbidden"}]}"#,
        ));
        let reconciler = Reconciler::new(&client);
        let mut view = ResourceState::new("errors");

        assert!(matches!(
            reconciler.read("errors", &AclScope::default(), &mut view),
            Err(ReconcileError::Remote(m)) if m == "forbidden"
        ));
    }

    #[test]
    fn refresh_of_deleted_entity_is_rejected() {
        let client = FakeClient::default();
        let reconciler = Reconciler::new(&client);
        let mut state = ResourceState::new("errors");
        state.status = EntityStatus::Deleted;

        assert!(matches!(
            reconciler.refresh(&mut state),
            Err(ReconcileError::InvalidTransition { .. })
        ));
        assert!(client.calls().is_empty());
    }

    // -- update --------------------------------------------------------------

    fn synced_state(sharing: Sharing, owner: &str) -> ResourceState {
        let mut state = ResourceState::new("errors");
        state.status = EntityStatus::Synced;
        state.acl = Some(AclScope::new(owner, "search", Some(sharing)));
        state.set("search", "index=main error".into());
        state.set("actions", "email,webhook".into());
        state.set("is_visible", true.into());
        state.set("action_slack_param_attachment", "none".into());
        state.set(WEBHOOK_PRIORITY, 1i64.into());
        state
    }

    #[test]
    fn update_of_shared_entity_acts_as_nobody() {
        let body = entry_body("errors", "global", "nobody");
        let client = FakeClient::with_reads(&[&body]);
        let reconciler = Reconciler::new(&client);
        let mut state = synced_state(Sharing::Global, "carol");
        let acl = AclScope::new("carol", "search", Some(Sharing::Global));

        reconciler
            .update(&desired().with_acl(acl), &mut state)
            .unwrap();

        let calls = client.calls();
        let Call::Update { owner, .. } = &calls[0] else {
            panic!("expected update first");
        };
        assert_eq!(owner, "nobody");
        let Call::Perms { owner, acl, .. } = &calls[1] else {
            panic!("expected permissions second");
        };
        assert_eq!(owner, "nobody");
        assert_eq!(acl.owner, "carol");
        assert!(matches!(calls[2], Call::Read { .. }));
        assert_eq!(state.status, EntityStatus::Synced);
    }

    #[test]
    fn update_of_private_entity_keeps_owner() {
        let body = entry_body("errors", "user", "alice");
        let client = FakeClient::with_reads(&[&body]);
        let reconciler = Reconciler::new(&client);
        let mut state = synced_state(Sharing::User, "alice");

        reconciler.update(&desired(), &mut state).unwrap();

        let calls = client.calls();
        assert!(matches!(&calls[0], Call::Update { owner, .. } if owner == "alice"));
        assert!(matches!(&calls[1], Call::Perms { owner, .. } if owner == "alice"));
    }

    #[test]
    fn update_payload_holds_only_significant_settable_fields() {
        let body = entry_body("errors", "app", "nobody");
        let client = FakeClient::with_reads(&[&body]);
        let reconciler = Reconciler::new(&client);
        let mut state = synced_state(Sharing::App, "nobody");
        let desired = desired()
            .with("actions", " webhook ,email")
            .with("description", "Errors in the last hour");

        reconciler.update(&desired, &mut state).unwrap();

        let calls = client.calls();
        let Call::Update { fields, .. } = &calls[0] else {
            panic!("expected update first");
        };
        assert_eq!(fields.len(), 1, "unexpected payload: {fields:?}");
        assert_eq!(fields["description"], FieldValue::from("Errors in the last hour"));
        assert!(!fields.contains_key("action_webhook"));
    }

    #[test]
    fn permission_failure_after_content_update_is_not_rolled_back() {
        let client = FakeClient {
            fail_perms: true,
            ..Default::default()
        };
        let reconciler = Reconciler::new(&client);
        let mut state = synced_state(Sharing::App, "nobody");

        let err = reconciler
            .update(&desired().with("description", "new"), &mut state)
            .unwrap_err();

        assert!(matches!(err, ReconcileError::Remote(m) if m == "permission denied"));
        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], Call::Update { .. }));
        assert_eq!(state.status, EntityStatus::Synced);
    }

    #[test]
    fn update_rejects_rename() {
        let client = FakeClient::default();
        let reconciler = Reconciler::new(&client);
        let mut state = synced_state(Sharing::App, "nobody");
        let renamed = DesiredSearch::new("errors-v2").with("search", "index=main");

        assert!(matches!(
            reconciler.update(&renamed, &mut state),
            Err(ReconcileError::Validation { field, .. }) if field == "name"
        ));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn plan_marks_drift() {
        let mut state = synced_state(Sharing::App, "nobody");

        let changes = plan(&desired().with("cron_schedule", "0 * * * *"), &mut state).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(state.status, EntityStatus::Drifted);

        let changes = plan(&desired(), &mut state).unwrap();
        assert!(changes.is_empty());
        assert_eq!(state.status, EntityStatus::Synced);
    }

    #[test]
    fn plan_of_untracked_entity_lists_everything() {
        let mut state = ResourceState::new("errors");
        let changes = plan(&desired(), &mut state).unwrap();
        assert!(changes.contains_key("search"));
        assert!(changes.contains_key("is_visible"));
        assert_eq!(state.status, EntityStatus::Absent);
    }

    // -- delete --------------------------------------------------------------

    #[test]
    fn delete_success_ignores_body() {
        let client = FakeClient::default();
        client
            .deletes
            .borrow_mut()
            .push_back(RemoteResponse::new(200, "not json at all"));
        let reconciler = Reconciler::new(&client);

        reconciler.delete("errors", &AclScope::default()).unwrap();
    }

    #[test]
    fn delete_failure_surfaces_first_message() {
        let client = FakeClient::default();
        client.deletes.borrow_mut().push_back(RemoteResponse::new(
            404,
            r#"{"messages":[{"text":"no such entity"}]}"#,
        ));
        let reconciler = Reconciler::new(&client);

        assert!(matches!(
            reconciler.delete("errors", &AclScope::default()),
            Err(ReconcileError::Remote(m)) if m == "no such entity"
        ));
    }

    #[test]
    fn delete_state_uses_recorded_scope_and_marks_deleted() {
        let client = FakeClient::default();
        let reconciler = Reconciler::new(&client);
        let mut state = synced_state(Sharing::User, "alice");

        reconciler.delete_state(&mut state).unwrap();

        assert_eq!(
            client.calls(),
            vec![Call::Delete {
                name: "errors".into(),
                owner: "alice".into(),
                app: "search".into(),
            }]
        );
        assert_eq!(state.status, EntityStatus::Deleted);
        assert!(reconciler.delete_state(&mut state).is_err());
    }
}
