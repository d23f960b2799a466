//! Logout notifications emitted to the hosting application when a refresh fails.

// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::{_prelude::*, error::ResponseError};

/// Why the session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
	/// Refresh endpoint could not be reached.
	Transport,
	/// Refresh endpoint answered with a non-success status.
	Rejected {
		/// HTTP status code.
		status: u16,
	},
	/// Refresh endpoint answered with an unreadable body.
	MalformedResponse,
	/// Refreshed token carried no readable expiry.
	TokenDecode,
	/// Refreshed token could not be persisted.
	Storage,
	/// Any other failure.
	Other,
}
impl LogoutReason {
	/// Returns a stable label suitable for log or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Transport => "transport",
			Self::Rejected { .. } => "rejected",
			Self::MalformedResponse => "malformed_response",
			Self::TokenDecode => "token_decode",
			Self::Storage => "storage",
			Self::Other => "other",
		}
	}

	/// Classifies a refresh failure.
	pub fn from_error(err: &Error) -> Self {
		match err {
			Error::Transport(_) => Self::Transport,
			Error::Response(ResponseError::Status { status, .. }) =>
				Self::Rejected { status: *status },
			Error::Response(_) => Self::MalformedResponse,
			Error::TokenDecode(_) => Self::TokenDecode,
			Error::Storage(_) => Self::Storage,
			_ => Self::Other,
		}
	}
}

/// Notification handed to the [`LogoutHook`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoutEvent {
	/// Failure that ended the session.
	pub reason: LogoutReason,
	/// Navigation target the host should move to, unless it is already there.
	pub redirect_to: String,
	/// Instant the session ended.
	pub at: OffsetDateTime,
}

/// Host callback invoked when the session ends because a refresh failed.
///
/// The client has already cleared the stored token when the hook runs. Navigation is the host's
/// decision; the event only carries the suggested target.
pub trait LogoutHook
where
	Self: Send + Sync,
{
	/// Handles the end of the session.
	fn on_logout(&self, event: &LogoutEvent);
}
impl<F> LogoutHook for F
where
	F: Fn(&LogoutEvent) + Send + Sync,
{
	fn on_logout(&self, event: &LogoutEvent) {
		self(event)
	}
}

/// Default hook that only logs the event.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogOnlyLogout;
impl LogoutHook for LogOnlyLogout {
	fn on_logout(&self, event: &LogoutEvent) {
		#[cfg(feature = "tracing")]
		tracing::warn!(reason = ?event.reason, redirect_to = %event.redirect_to, "session ended");
		#[cfg(not(feature = "tracing"))]
		let _ = event;
	}
}

/// One-shot gate so a session emits at most one logout event.
///
/// Starts armed; the first logout disarms it and storing a new token re-arms it.
#[derive(Debug)]
pub(crate) struct LogoutLatch(AtomicBool);
impl LogoutLatch {
	pub(crate) fn arm(&self) {
		self.0.store(true, Ordering::Release);
	}

	/// Returns `true` if this call disarmed the latch.
	pub(crate) fn disarm(&self) -> bool {
		self.0.swap(false, Ordering::AcqRel)
	}
}
impl Default for LogoutLatch {
	fn default() -> Self {
		Self(AtomicBool::new(true))
	}
}
