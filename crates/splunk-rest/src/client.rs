use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, Url};
use tracing::debug;

use savedsearch_core::client::{RemoteResourceClient, RemoteResponse};
use savedsearch_core::config::ProviderConfig;
use savedsearch_core::fields::{self, FieldMap};
use savedsearch_core::permissions::AclScope;
use savedsearch_core::types::CollectionKind;
use savedsearch_core::wire;

use crate::error::{Result, SplunkError};

/// Blocking client for one Splunk management endpoint.
pub struct SplunkClient {
    http: Client,
    base_url: Url,
    credentials: Option<(String, String)>,
}

impl SplunkClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(SplunkError::Config("url is not set".into()));
        }
        let invalid = |reason: String| SplunkError::InvalidUrl {
            url: config.url.clone(),
            reason,
        };
        let base_url = Url::parse(&config.url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(invalid("expected an http:// or https:// URL".into()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()?;

        let credentials = config
            .username
            .as_ref()
            .map(|user| (user.clone(), config.password.clone().unwrap_or_default()));

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// `/servicesNS/{owner}/{app}/{collection}/{tail...}?output_mode=json`,
    /// with every segment percent-encoded.
    fn endpoint(&self, owner: &str, app: &str, kind: CollectionKind, tail: &[&str]) -> Result<Url> {
        let (group, collection) = kind.segments();
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SplunkError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry a path".into(),
            })?
            .pop_if_empty()
            .extend(["servicesNS", owner, app, group, collection])
            .extend(tail);
        url.query_pairs_mut().append_pair("output_mode", "json");
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url);
        match &self.credentials {
            Some((username, password)) => req.basic_auth(username, Some(password)),
            None => req,
        }
    }

    fn send(&self, req: RequestBuilder) -> Result<RemoteResponse> {
        let resp = req.send()?;
        let status = resp.status().as_u16();
        let body = resp.bytes()?.to_vec();
        debug!(status, bytes = body.len(), "management API response");
        Ok(RemoteResponse::new(status, body))
    }

    fn post_form(&self, url: Url, form: &[(String, String)]) -> savedsearch_core::Result<()> {
        debug!(url = %url, fields = form.len(), "POST");
        let response = self.send(self.request(Method::POST, url).form(form))?;
        if response.is_success() {
            Ok(())
        } else {
            Err(wire::decode_error(&response))
        }
    }
}

/// Form body keyed by wire name.
fn form_fields(fields: &FieldMap) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|(name, value)| {
            let key = fields::lookup(name).map_or(name.as_str(), |spec| spec.wire);
            (key.to_string(), value.to_form())
        })
        .collect()
}

fn acl_form(acl: &AclScope) -> Vec<(String, String)> {
    let mut form = vec![("owner".to_string(), acl.owner.clone())];
    if let Some(sharing) = acl.sharing {
        form.push(("sharing".into(), sharing.to_string()));
    }
    if !acl.read.is_empty() {
        form.push(("perms.read".into(), acl.read.join(",")));
    }
    if !acl.write.is_empty() {
        form.push(("perms.write".into(), acl.write.join(",")));
    }
    form
}

impl RemoteResourceClient for SplunkClient {
    fn create(&self, name: &str, owner: &str, app: &str, fields: &FieldMap) -> savedsearch_core::Result<()> {
        let url = self.endpoint(owner, app, CollectionKind::SavedSearches, &[])?;
        let mut form = vec![("name".to_string(), name.to_string())];
        form.extend(form_fields(fields));
        self.post_form(url, &form)
    }

    fn read(&self, name: &str, owner: &str, app: &str) -> savedsearch_core::Result<RemoteResponse> {
        let url = self.endpoint(owner, app, CollectionKind::SavedSearches, &[name])?;
        debug!(url = %url, "GET");
        Ok(self.send(self.request(Method::GET, url))?)
    }

    fn update(&self, name: &str, owner: &str, app: &str, fields: &FieldMap) -> savedsearch_core::Result<()> {
        let url = self.endpoint(owner, app, CollectionKind::SavedSearches, &[name])?;
        self.post_form(url, &form_fields(fields))
    }

    fn update_permissions(
        &self,
        owner: &str,
        app: &str,
        name: &str,
        acl: &AclScope,
        kind: CollectionKind,
    ) -> savedsearch_core::Result<()> {
        let url = self.endpoint(owner, app, kind, &[name, "acl"])?;
        self.post_form(url, &acl_form(acl))
    }

    fn delete(&self, name: &str, owner: &str, app: &str) -> savedsearch_core::Result<RemoteResponse> {
        let url = self.endpoint(owner, app, CollectionKind::SavedSearches, &[name])?;
        debug!(url = %url, "DELETE");
        Ok(self.send(self.request(Method::DELETE, url))?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
