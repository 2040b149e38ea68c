use crate::output::print_json;
use savedsearch_core::priority::{self, PriorityInputs};

pub fn run(severity: &str, precision: &str, explicit: Option<i64>, json: bool) -> anyhow::Result<()> {
    let inputs = PriorityInputs::from_text(severity, precision, explicit);
    if explicit.is_none() && (inputs.severity.is_none() || inputs.precision.is_none()) {
        tracing::warn!(severity, precision, "unrecognized severity or precision; using priority 1");
    }
    let effective = priority::effective_priority(&inputs);

    if json {
        print_json(&serde_json::json!({
            "severity": inputs.severity.map(|s| s.to_string()),
            "precision": inputs.precision.map(|p| p.to_string()),
            "override": explicit,
            "priority": effective,
        }))
    } else {
        println!("{effective}");
        Ok(())
    }
}
