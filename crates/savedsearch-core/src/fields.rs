//! Declarative table of saved-search attributes and the generic routines that
//! move values between operator config, the wire and the reconciled view.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ReconcileError, Result};
use crate::types::AlertTrack;

pub const ACTIONS: &str = "actions";
pub const SEARCH: &str = "search";
pub const SEVERITY: &str = "severity";
pub const PRECISION: &str = "precision";
pub const WEBHOOK_PRIORITY: &str = "action_webhook_param_priority";
pub const ALERT_TRACK: &str = "alert_track";

const JIRA_SUMMARY_DEFAULT: &str = "Splunk Alert: $name$";
const JIRA_DESCRIPTION_DEFAULT: &str = "The alert condition for '$name$' was triggered.";

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    #[serde(skip_deserializing)]
    Track(AlertTrack),
}

pub type FieldMap = BTreeMap<String, FieldValue>;

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Text sent in a form-encoded request body.
    pub fn to_form(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Track(t) => f.write_str(t.as_str()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Float,
    Bool,
    Track,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    None,
    Url,
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Operator-facing attribute name.
    pub name: &'static str,
    /// Key in the remote `content` object and in request bodies.
    pub wire: &'static str,
    pub kind: FieldKind,
    /// Server-reported default that counts as unset.
    pub sentinel: Option<&'static str>,
    pub default: Option<&'static str>,
    /// Action identifier this read-only flag mirrors.
    pub mirrors_action: Option<&'static str>,
    pub check: Check,
}

impl FieldSpec {
    const fn new(name: &'static str, wire: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire,
            kind,
            sentinel: None,
            default: None,
            mirrors_action: None,
            check: Check::None,
        }
    }

    const fn sentinel(mut self, text: &'static str) -> Self {
        self.sentinel = Some(text);
        self
    }

    const fn default_to(mut self, text: &'static str) -> Self {
        self.default = Some(text);
        self
    }

    const fn mirrors(mut self, action: &'static str) -> Self {
        self.mirrors_action = Some(action);
        self
    }

    const fn check(mut self, check: Check) -> Self {
        self.check = check;
        self
    }

    pub fn is_computed_only(&self) -> bool {
        self.mirrors_action.is_some()
    }

    pub fn default_value(&self) -> Option<FieldValue> {
        self.default.and_then(|d| coerce(self, FieldValue::Str(d.to_string())).ok())
    }
}

const fn s(name: &'static str, wire: &'static str) -> FieldSpec {
    FieldSpec::new(name, wire, FieldKind::Str)
}

const fn i(name: &'static str, wire: &'static str) -> FieldSpec {
    FieldSpec::new(name, wire, FieldKind::Int)
}

const fn b(name: &'static str, wire: &'static str) -> FieldSpec {
    FieldSpec::new(name, wire, FieldKind::Bool)
}

const fn f(name: &'static str, wire: &'static str) -> FieldSpec {
    FieldSpec::new(name, wire, FieldKind::Float)
}

pub static FIELDS: &[FieldSpec] = &[
    s("actions", "actions"),
    // ServiceNow event
    s("action_snow_event_param_account", "action.snow_event.param.account"),
    s("action_snow_event_param_node", "action.snow_event.param.node"),
    s("action_snow_event_param_type", "action.snow_event.param.type"),
    s("action_snow_event_param_resource", "action.snow_event.param.resource"),
    i("action_snow_event_param_severity", "action.snow_event.param.severity"),
    s("action_snow_event_param_description", "action.snow_event.param.description"),
    s("action_snow_event_param_ci_identifier", "action.snow_event.param.ci_identifier"),
    s("action_snow_event_param_custom_fields", "action.snow_event.param.custom_fields"),
    s("action_snow_event_param_additional_info", "action.snow_event.param.additional_info"),
    // Email
    b("action_email", "action.email").mirrors("email"),
    s("action_email_auth_password", "action.email.auth_password"),
    s("action_email_auth_username", "action.email.auth_username"),
    s("action_email_bcc", "action.email.bcc"),
    s("action_email_cc", "action.email.cc"),
    s("action_email_command", "action.email.command"),
    s("action_email_format", "action.email.format"),
    s("action_email_from", "action.email.from"),
    s("action_email_hostname", "action.email.hostname"),
    i("action_email_include_results_link", "action.email.include.results_link"),
    i("action_email_include_search", "action.email.include.search"),
    i("action_email_include_trigger", "action.email.include.trigger"),
    i("action_email_include_trigger_time", "action.email.include.trigger_time"),
    i("action_email_include_view_link", "action.email.include.view_link"),
    b("action_email_inline", "action.email.inline"),
    s("action_email_mailserver", "action.email.mailserver"),
    i("action_email_max_results", "action.email.maxresults"),
    s("action_email_max_time", "action.email.maxtime"),
    s("action_email_message_alert", "action.email.message.alert"),
    s("action_email_message_report", "action.email.message.report"),
    s("action_email_pdfview", "action.email.pdfview"),
    s("action_email_preprocess_results", "action.email.preprocess_results"),
    s("action_email_report_cid_font_list", "action.email.reportCIDFontList"),
    b("action_email_report_include_splunk_logo", "action.email.reportIncludeSplunkLogo"),
    s("action_email_report_paper_orientation", "action.email.reportPaperOrientation"),
    s("action_email_report_paper_size", "action.email.reportPaperSize"),
    b("action_email_report_server_enabled", "action.email.reportServerEnabled"),
    s("action_email_report_server_url", "action.email.reportServerURL"),
    i("action_email_send_csv", "action.email.sendcsv"),
    b("action_email_send_pdf", "action.email.sendpdf"),
    b("action_email_send_results", "action.email.sendresults"),
    i("action_email_allow_empty_attachment", "action.email.allow_empty_attachment"),
    s("action_email_subject", "action.email.subject"),
    s("action_email_to", "action.email.to"),
    b("action_email_track_alert", "action.email.track_alert"),
    s("action_email_ttl", "action.email.ttl"),
    b("action_email_use_ssl", "action.email.use_ssl"),
    b("action_email_use_tls", "action.email.use_tls"),
    b("action_email_width_sort_columns", "action.email.width_sort_columns"),
    // PagerDuty
    s("action_pagerduty_custom_details", "action.pagerduty.param.custom_details"),
    s("action_pagerduty_integration_key", "action.pagerduty.param.integration_key"),
    s("action_pagerduty_integration_key_override", "action.pagerduty.param.integration_key_override"),
    s("action_pagerduty_integration_url", "action.pagerduty.param.integration_url"),
    s("action_pagerduty_integration_url_override", "action.pagerduty.param.integration_url_override"),
    // Script
    b("action_script", "action.script").mirrors("script"),
    s("action_script_filename", "action.script.filename"),
    // XSOAR
    s("action_create_xsoar_incident", "action.create_xsoar_incident"),
    s("action_create_xsoar_incident_param_send_all_servers", "action.create_xsoar_incident.param.send_all_servers"),
    s("action_create_xsoar_incident_param_server_url", "action.create_xsoar_incident.param.server_url"),
    s("action_create_xsoar_incident_param_incident_name", "action.create_xsoar_incident.param.incident_name"),
    s("action_create_xsoar_incident_param_details", "action.create_xsoar_incident.param.details"),
    s("action_create_xsoar_incident_param_custom_fields", "action.create_xsoar_incident.param.custom_fields"),
    s("action_create_xsoar_incident_param_severity", "action.create_xsoar_incident.param.severity"),
    s("action_create_xsoar_incident_param_occurred", "action.create_xsoar_incident.param.occurred"),
    s("action_create_xsoar_incident_param_type", "action.create_xsoar_incident.param.type"),
    // Slack
    s("action_slack_param_channel", "action.slack.param.channel"),
    s("action_slack_param_fields", "action.slack.param.fields"),
    s("action_slack_param_attachment", "action.slack.param.attachment").default_to("none"),
    s("action_slack_param_message", "action.slack.param.message"),
    s("action_slack_param_webhook_url_override", "action.slack.param.webhook_url_override"),
    // Jira Service Desk
    s("action_jira_service_desk_param_account", "action.jira_service_desk.param.account"),
    s("action_jira_service_desk_param_jira_project", "action.jira_service_desk.param.jira_project"),
    s("action_jira_service_desk_param_jira_issue_type", "action.jira_service_desk.param.jira_issue_type"),
    s("action_jira_service_desk_param_jira_summary", "action.jira_service_desk.param.jira_summary")
        .sentinel(JIRA_SUMMARY_DEFAULT),
    s("action_jira_service_desk_param_jira_priority", "action.jira_service_desk.param.jira_priority"),
    s("action_jira_service_desk_param_jira_description", "action.jira_service_desk.param.jira_description")
        .sentinel(JIRA_DESCRIPTION_DEFAULT),
    s("action_jira_service_desk_param_jira_customfields", "action.jira_service_desk.param.jira_customfields"),
    // Webhook
    s("action_webhook_param_url", "action.webhook.param.url").check(Check::Url),
    b("action_webhook", "action.webhook").mirrors("webhook"),
    i("action_webhook_enable_allowlist", "action.webhook.enable_allowlist"),
    i("action_webhook_param_priority", "action.webhook.param.priority"),
    s("severity", "action.webhook.param.severity").check(Check::OneOf(&["Critical", "High", "Medium", "Low"])),
    s("precision", "action.webhook.param.precision").check(Check::OneOf(&["High", "Medium", "Low"])),
    s("action_webhook_param_mitre_attack_id", "action.webhook.param.mitre_attack_id"),
    s("action_webhook_param_description", "action.webhook.param.description"),
    s("action_webhook_param_fields", "action.webhook.param.fields"),
    s("action_webhook_param_tags", "action.webhook.param.tags"),
    s("action_webhook_param_author", "action.webhook.param.author"),
    // Alerting
    b("alert_digest_mode", "alert.digest_mode"),
    s("alert_expires", "alert.expires"),
    i("alert_severity", "alert.severity"),
    b("alert_suppress", "alert.suppress"),
    s("alert_suppress_fields", "alert.suppress.fields"),
    s("alert_suppress_period", "alert.suppress.period"),
    FieldSpec::new("alert_track", "alert.track", FieldKind::Track),
    s("alert_comparator", "alert_comparator"),
    s("alert_condition", "alert_condition"),
    s("alert_threshold", "alert_threshold"),
    s("alert_type", "alert_type"),
    s("allow_skew", "allow_skew"),
    // Auto-summarization
    b("auto_summarize", "auto_summarize"),
    s("auto_summarize_command", "auto_summarize.command"),
    s("auto_summarize_cron_schedule", "auto_summarize.cron_schedule"),
    s("auto_summarize_dispatch_earliest_time", "auto_summarize.dispatch.earliest_time"),
    s("auto_summarize_dispatch_latest_time", "auto_summarize.dispatch.latest_time"),
    s("auto_summarize_dispatch_time_format", "auto_summarize.dispatch.time_format"),
    s("auto_summarize_dispatch_ttl", "auto_summarize.dispatch.ttl"),
    i("auto_summarize_max_disabled_buckets", "auto_summarize.max_disabled_buckets"),
    f("auto_summarize_max_summary_ratio", "auto_summarize.max_summary_ratio"),
    i("auto_summarize_max_summary_size", "auto_summarize.max_summary_size"),
    i("auto_summarize_max_time", "auto_summarize.max_time"),
    s("auto_summarize_suspend_period", "auto_summarize.suspend_period"),
    s("auto_summarize_timespan", "auto_summarize.timespan"),
    // Scheduling and dispatch
    s("cron_schedule", "cron_schedule"),
    s("description", "description"),
    b("disabled", "disabled"),
    i("dispatch_buckets", "dispatch.buckets"),
    s("dispatch_earliest_time", "dispatch.earliest_time"),
    s("dispatch_index_earliest", "dispatch.index_earliest"),
    s("dispatch_index_latest", "dispatch.index_latest"),
    b("dispatch_indexed_realtime", "dispatch.indexedRealtime"),
    i("dispatch_indexed_realtime_offset", "dispatch.indexedRealtimeOffset"),
    i("dispatch_indexed_realtime_minspan", "dispatch.indexedRealtimeMinSpan"),
    s("dispatch_latest_time", "dispatch.latest_time"),
    b("dispatch_lookups", "dispatch.lookups"),
    i("dispatch_max_count", "dispatch.max_count"),
    i("dispatch_max_time", "dispatch.max_time"),
    i("dispatch_reduce_freq", "dispatch.reduce_freq"),
    b("dispatch_rt_backfill", "dispatch.rt_backfill"),
    i("dispatch_rt_maximum_span", "dispatch.rt_maximum_span"),
    b("dispatch_spawn_process", "dispatch.spawn_process"),
    s("dispatch_time_format", "dispatch.time_format"),
    s("dispatch_ttl", "dispatch.ttl"),
    s("display_view", "displayview"),
    b("is_scheduled", "is_scheduled"),
    b("is_visible", "is_visible").default_to("true"),
    i("max_concurrent", "max_concurrent"),
    b("realtime_schedule", "realtime_schedule"),
    s("request_ui_dispatch_app", "request.ui_dispatch_app"),
    s("request_ui_dispatch_view", "request.ui_dispatch_view"),
    b("restart_on_searchpeer_add", "restart_on_searchpeer_add"),
    b("run_on_startup", "run_on_startup"),
    s("schedule_window", "schedule_window"),
    s("schedule_priority", "schedule_priority"),
    s("search", "search"),
    s("vsid", "vsid"),
    s("workload_pool", "workload_pool"),
];

pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.name == name)
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "1" | "True" => Some(true),
        "false" | "0" | "False" => Some(false),
        _ => None,
    }
}

/// Convert a loosely typed value into the kind declared by `spec`.
pub fn coerce(spec: &FieldSpec, value: FieldValue) -> Result<FieldValue> {
    let mismatch = |v: &FieldValue| {
        ReconcileError::validation(spec.name, format!("'{v}' is not a valid {:?}", spec.kind))
    };

    let coerced = match (spec.kind, value) {
        (FieldKind::Str, FieldValue::Str(s)) => FieldValue::Str(s),
        (FieldKind::Str, other) => FieldValue::Str(other.to_string()),

        (FieldKind::Int, FieldValue::Int(i)) => FieldValue::Int(i),
        (FieldKind::Int, FieldValue::Float(x)) if x.fract() == 0.0 => FieldValue::Int(x as i64),
        (FieldKind::Int, FieldValue::Str(s)) => {
            FieldValue::Int(s.trim().parse().map_err(|_| mismatch(&FieldValue::Str(s)))?)
        }
        (FieldKind::Int, FieldValue::Bool(b)) => FieldValue::Int(i64::from(b)),

        (FieldKind::Float, FieldValue::Float(x)) => FieldValue::Float(x),
        (FieldKind::Float, FieldValue::Int(i)) => FieldValue::Float(i as f64),
        (FieldKind::Float, FieldValue::Str(s)) => {
            FieldValue::Float(s.trim().parse().map_err(|_| mismatch(&FieldValue::Str(s)))?)
        }

        (FieldKind::Bool, FieldValue::Bool(b)) => FieldValue::Bool(b),
        (FieldKind::Bool, FieldValue::Int(0)) => FieldValue::Bool(false),
        (FieldKind::Bool, FieldValue::Int(1)) => FieldValue::Bool(true),
        (FieldKind::Bool, FieldValue::Str(s)) => {
            FieldValue::Bool(parse_bool(&s).ok_or_else(|| mismatch(&FieldValue::Str(s)))?)
        }

        (FieldKind::Track, FieldValue::Track(t)) => FieldValue::Track(t),
        (FieldKind::Track, FieldValue::Bool(b)) => FieldValue::Track(b.into()),
        (FieldKind::Track, FieldValue::Int(0)) => FieldValue::Track(AlertTrack::False),
        (FieldKind::Track, FieldValue::Int(1)) => FieldValue::Track(AlertTrack::True),
        (FieldKind::Track, FieldValue::Str(s)) => {
            FieldValue::Track(AlertTrack::parse(&s).ok_or_else(|| mismatch(&FieldValue::Str(s)))?)
        }

        (_, other) => return Err(mismatch(&other)),
    };
    Ok(coerced)
}

/// Decode a value from the remote `content` object. Values that cannot be
/// read as the declared kind are dropped.
pub fn decode_wire(spec: &FieldSpec, raw: &serde_json::Value) -> Option<FieldValue> {
    let loose = match raw {
        serde_json::Value::Null => return None,
        serde_json::Value::Bool(b) => FieldValue::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => FieldValue::Float(n.as_f64()?),
        },
        serde_json::Value::String(s) => FieldValue::Str(s.clone()),
        _ => return None,
    };
    coerce(spec, loose).ok()
}

/// Enforce the format constraint declared for a field.
pub fn check(spec: &FieldSpec, value: &FieldValue) -> Result<()> {
    match spec.check {
        Check::None => Ok(()),
        Check::Url => {
            let text = value.to_string();
            if crate::validate::is_http_url(&text) {
                Ok(())
            } else {
                Err(ReconcileError::validation(spec.name, "URL is invalid"))
            }
        }
        Check::OneOf(allowed) => {
            let text = value.to_string();
            if allowed.contains(&text.as_str()) {
                Ok(())
            } else {
                Err(ReconcileError::validation(
                    spec.name,
                    format!("expected one of {}, got '{text}'", allowed.join(", ")),
                ))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
