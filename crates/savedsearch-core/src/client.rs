use crate::error::Result;
use crate::fields::FieldMap;
use crate::permissions::AclScope;
use crate::types::CollectionKind;

/// Raw response of a remote call whose body the caller decodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RemoteResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
    }
}

/// Blocking access to the remote entity collection.
///
/// `fields` maps operator-facing attribute names to values; implementations
/// translate them to wire keys. Every call either completes or fails within
/// the implementation's own deadline.
pub trait RemoteResourceClient {
    fn create(&self, name: &str, owner: &str, app: &str, fields: &FieldMap) -> Result<()>;

    fn read(&self, name: &str, owner: &str, app: &str) -> Result<RemoteResponse>;

    fn update(&self, name: &str, owner: &str, app: &str, fields: &FieldMap) -> Result<()>;

    fn update_permissions(
        &self,
        owner: &str,
        app: &str,
        name: &str,
        acl: &AclScope,
        kind: CollectionKind,
    ) -> Result<()>;

    fn delete(&self, name: &str, owner: &str, app: &str) -> Result<RemoteResponse>;
}

impl<C: RemoteResourceClient + ?Sized> RemoteResourceClient for &C {
    fn create(&self, name: &str, owner: &str, app: &str, fields: &FieldMap) -> Result<()> {
        (**self).create(name, owner, app, fields)
    }

    fn read(&self, name: &str, owner: &str, app: &str) -> Result<RemoteResponse> {
        (**self).read(name, owner, app)
    }

    fn update(&self, name: &str, owner: &str, app: &str, fields: &FieldMap) -> Result<()> {
        (**self).update(name, owner, app, fields)
    }

    fn update_permissions(
        &self,
        owner: &str,
        app: &str,
        name: &str,
        acl: &AclScope,
        kind: CollectionKind,
    ) -> Result<()> {
        (**self).update_permissions(owner, app, name, acl, kind)
    }

    fn delete(&self, name: &str, owner: &str, app: &str) -> Result<RemoteResponse> {
        (**self).delete(name, owner, app)
    }
}
