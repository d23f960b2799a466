//! Client-level error types shared across the session core, transports, and quiz operations.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Maximum number of body bytes kept in status error previews.
const MAX_BODY_PREVIEW_LEN: usize = 500;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Server answered with a non-success status or an unreadable body.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// Session token could not be decoded.
	#[error(transparent)]
	TokenDecode(#[from] crate::auth::TokenDecodeError),
	/// Quiz round was driven out of order.
	#[error(transparent)]
	Round(#[from] crate::quiz::RoundError),
}
impl Error {
	/// Returns the HTTP status attached to the failure, if the server answered at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Response(err) => Some(err.status()),
			_ => None,
		}
	}

	/// Returns `true` when the server rejected the request as unauthenticated.
	pub fn is_unauthorized(&self) -> bool {
		self.status() == Some(401)
	}
}

/// Configuration and request-construction failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint configuration failed validation.
	#[error(transparent)]
	Api(#[from] crate::config::ApiConfigError),
	/// Request body could not be serialized.
	#[error("Request body for {operation} could not be serialized.")]
	RequestEncode {
		/// Operation label.
		operation: &'static str,
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the quiz API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the quiz API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures derived from an HTTP response the server did send.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Server answered with a non-success status.
	#[error("{operation} failed with HTTP {status}: {body}.")]
	Status {
		/// Operation label.
		operation: &'static str,
		/// HTTP status code.
		status: u16,
		/// Truncated response body preview.
		body: String,
	},
	/// Server answered with JSON that does not match the expected shape.
	#[error("{operation} returned malformed JSON.")]
	Malformed {
		/// Operation label.
		operation: &'static str,
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Server answered with an empty body where a payload was required.
	#[error("{operation} returned an empty body.")]
	Empty {
		/// Operation label.
		operation: &'static str,
		/// HTTP status code.
		status: u16,
	},
}
impl ResponseError {
	/// Builds a status error, truncating the body preview.
	pub fn from_status(operation: &'static str, status: u16, body: &[u8]) -> Self {
		let text = String::from_utf8_lossy(body);
		let body = if text.len() <= MAX_BODY_PREVIEW_LEN {
			text.into_owned()
		} else {
			let mut end = MAX_BODY_PREVIEW_LEN;

			while !text.is_char_boundary(end) {
				end -= 1;
			}

			format!("{}... (truncated, {} total bytes)", &text[..end], text.len())
		};

		Self::Status { operation, status, body }
	}

	/// Returns the HTTP status code of the offending response.
	pub fn status(&self) -> u16 {
		match self {
			Self::Status { status, .. }
			| Self::Malformed { status, .. }
			| Self::Empty { status, .. } => *status,
		}
	}
}
