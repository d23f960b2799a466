// self
use crate::{
	obs::{OperationKind, OperationOutcome},
	session::LogoutReason,
};

/// Counter incremented for every operation attempt and outcome.
pub const OPERATION_COUNTER: &str = "mental_math_client_operation_total";
/// Counter incremented for every logout event handed to the host.
pub const LOGOUT_COUNTER: &str = "mental_math_client_logout_total";

/// Counts an operation outcome, labeled by `operation` + `outcome`.
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	increment(OPERATION_COUNTER, [("operation", kind.as_str()), ("outcome", outcome.as_str())]);
}

/// Counts a logout emitted to the host, labeled by `reason`.
pub fn record_logout(reason: LogoutReason) {
	increment(LOGOUT_COUNTER, [("reason", reason.as_str())]);
}

#[cfg(feature = "metrics")]
fn increment<const N: usize>(name: &'static str, labels: [(&'static str, &'static str); N]) {
	let labels = labels
		.into_iter()
		.map(|(key, value)| metrics::Label::new(key, value))
		.collect::<Vec<_>>();

	metrics::counter!(name, labels).increment(1);
}
#[cfg(not(feature = "metrics"))]
fn increment<const N: usize>(name: &'static str, labels: [(&'static str, &'static str); N]) {
	let _ = (name, labels);
}
