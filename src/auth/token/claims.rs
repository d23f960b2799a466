//! Read-only JWT claim decoding; the client never verifies signatures, it only reads `exp`.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::_prelude::*;

/// Errors raised while reading the expiry embedded in a session token.
#[derive(Debug, ThisError)]
pub enum TokenDecodeError {
	/// Token does not have the `header.payload.signature` shape.
	#[error("Session token is not a JWT (expected 3 segments, found {segments}).")]
	Malformed {
		/// Number of dot-separated segments found.
		segments: usize,
	},
	/// Payload segment is not valid URL-safe base64.
	#[error("Session token payload is not valid base64.")]
	Base64(#[from] base64::DecodeError),
	/// Payload segment is not a JSON claims object.
	#[error("Session token payload is not a JSON claims object.")]
	Claims(#[from] serde_json::Error),
	/// Claims object has no `exp` entry.
	#[error("Session token has no exp claim.")]
	MissingExpiry,
	/// `exp` cannot be represented as an instant.
	#[error("Session token exp claim is out of range.")]
	ExpiryOutOfRange,
}

#[derive(Deserialize)]
struct ExpiryClaims {
	exp: Option<f64>,
}

/// Reads the `exp` claim of a JWT-shaped token.
pub fn decode_expiry(raw: &str) -> Result<OffsetDateTime, TokenDecodeError> {
	let segments: Vec<&str> = raw.split('.').collect();

	if segments.len() != 3 {
		return Err(TokenDecodeError::Malformed { segments: segments.len() });
	}

	let payload = URL_SAFE_NO_PAD.decode(segments[1].trim_end_matches('='))?;
	let claims: ExpiryClaims = serde_json::from_slice(&payload)?;
	let exp = claims.exp.ok_or(TokenDecodeError::MissingExpiry)?;

	if !exp.is_finite() {
		return Err(TokenDecodeError::ExpiryOutOfRange);
	}

	OffsetDateTime::from_unix_timestamp(exp.floor() as i64)
		.map_err(|_| TokenDecodeError::ExpiryOutOfRange)
}
