use crate::types::{Precision, Severity};

/// Inputs to the webhook priority rule.
///
/// Unrecognized categorical text is carried as `None` so that derivation can
/// fail soft instead of erroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityInputs {
    pub severity: Option<Severity>,
    pub precision: Option<Precision>,
    pub explicit_override: Option<i64>,
}

impl PriorityInputs {
    pub fn from_text(severity: &str, precision: &str, explicit_override: Option<i64>) -> Self {
        Self {
            severity: severity.parse().ok(),
            precision: precision.parse().ok(),
            explicit_override,
        }
    }
}

/// Severity × precision → priority in `[1, 4]`. Anything missing or unknown
/// falls back to 1.
pub fn derive(inputs: &PriorityInputs) -> i64 {
    use Precision as P;
    use Severity as S;

    let (Some(severity), Some(precision)) = (inputs.severity, inputs.precision) else {
        return 1;
    };

    match (severity, precision) {
        (S::Critical, P::High) => 4,
        (S::Critical, P::Medium) => 3,
        (S::Critical, P::Low) => 2,
        (S::High, P::High | P::Medium) => 3,
        (S::High, P::Low) => 2,
        (S::Medium, P::High | P::Medium) => 2,
        (S::Medium, P::Low) => 1,
        (S::Low, _) => 1,
    }
}

/// The operator's override wins whenever present, including zero.
pub fn effective_priority(inputs: &PriorityInputs) -> i64 {
    match inputs.explicit_override {
        Some(p) => p,
        None => derive(inputs),
    }
}
