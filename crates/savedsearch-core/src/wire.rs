//! JSON envelope returned by the management API.

use serde::Deserialize;

use crate::client::RemoteResponse;
use crate::error::{ReconcileError, Result};
use crate::permissions::AclScope;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub entry: Vec<Entry>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(default)]
    pub content: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub acl: Option<WireAcl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireAcl {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub app: String,
    #[serde(default)]
    pub sharing: String,
    #[serde(default)]
    pub perms: Option<Perms>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Perms {
    #[serde(default)]
    pub read: Option<Vec<String>>,
    #[serde(default)]
    pub write: Option<Vec<String>>,
}

impl From<&WireAcl> for AclScope {
    fn from(acl: &WireAcl) -> Self {
        let perms = acl.perms.clone().unwrap_or_default();
        AclScope {
            owner: acl.owner.clone(),
            app: acl.app.clone(),
            sharing: acl.sharing.parse().ok(),
            read: perms.read.unwrap_or_default(),
            write: perms.write.unwrap_or_default(),
        }
    }
}

/// Error carried by a non-success response: the first message text, or a
/// generic decode failure.
pub fn decode_error(response: &RemoteResponse) -> ReconcileError {
    match serde_json::from_slice::<Envelope>(&response.body) {
        Ok(envelope) => match envelope.messages.into_iter().next() {
            Some(message) => ReconcileError::Remote(message.text),
            None => ReconcileError::Remote(format!(
                "remote returned status {} without an error message",
                response.status
            )),
        },
        Err(err) => ReconcileError::Remote(format!(
            "unable to decode error response (status {}): {err}",
            response.status
        )),
    }
}

/// Select the entry whose name equals `name` exactly.
pub fn find_entry(name: &str, response: &RemoteResponse) -> Result<Entry> {
    if !response.is_success() {
        return Err(decode_error(response));
    }
    let envelope: Envelope = serde_json::from_slice(&response.body).map_err(|err| {
        ReconcileError::Remote(format!("unable to decode response for '{name}': {err}"))
    })?;
    envelope
        .entry
        .into_iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| ReconcileError::NotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sharing;

    #[test]
    fn error_message_is_first_text() {
        let response = RemoteResponse::new(
            404,
            r#"{"messages":[{"type":"ERROR","text":"no such entity"},{"text":"second"}]}"#,
        );
        assert!(matches!(decode_error(&response), ReconcileError::Remote(m) if m == "no such entity"));
    }

    #[test]
    fn undecodable_error_body_is_generic() {
        let response = RemoteResponse::new(500, "<html>oops</html>");
        let ReconcileError::Remote(message) = decode_error(&response) else {
            panic!("expected Remote");
        };
        assert!(message.contains("status 500"));
    }

    #[test]
    fn exact_name_match_only() {
        let body = r#"{"entry":[
            {"name":"errors-1h-copy","content":{}},
            {"name":"errors-1h","content":{"search":"index=main"},
             "acl":{"owner":"admin","app":"search","sharing":"app","perms":{"read":["*"],"write":null}}}
        ]}"#;
        let response = RemoteResponse::new(200, body);
        let entry = find_entry("errors-1h", &response).unwrap();
        assert_eq!(entry.content["search"], "index=main");

        let acl = AclScope::from(entry.acl.as_ref().unwrap());
        assert_eq!(acl.sharing, Some(Sharing::App));
        assert_eq!(acl.read, vec!["*".to_string()]);
        assert!(acl.write.is_empty());

        assert!(matches!(
            find_entry("errors", &response),
            Err(ReconcileError::NotFound(n)) if n == "errors"
        ));
        assert!(matches!(
            find_entry("errors-1h.*", &response),
            Err(ReconcileError::NotFound(_))
        ));
    }
}
