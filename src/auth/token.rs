//! Session token values and their absent/valid/expired lifecycle.

pub mod claims;
pub mod secret;

// self
use crate::{
	_prelude::*,
	auth::token::{
		claims::{TokenDecodeError, decode_expiry},
		secret::TokenSecret,
	},
};

/// Lifecycle status of the session slot at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// No token is stored.
	Absent,
	/// Token expiry lies in the future.
	Valid,
	/// Token expiry has passed, or the expiry could not be decoded.
	Expired,
}
impl TokenStatus {
	/// Classifies an optional token at `instant`, treating the token as expired `leeway` early.
	pub fn of(token: Option<&SessionToken>, instant: OffsetDateTime, leeway: Duration) -> Self {
		match token {
			None => Self::Absent,
			Some(token) => token.status_at(instant, leeway),
		}
	}
}

/// Bearer credential issued by the quiz API plus its decoded expiry.
///
/// Construction never fails: a token whose expiry cannot be decoded is kept with no expiry and
/// reports [`TokenStatus::Expired`], so it is never attached without a refresh first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionToken {
	secret: TokenSecret,
	expires_at: Option<OffsetDateTime>,
}
impl SessionToken {
	/// Wraps a raw token, decoding its expiry when possible.
	pub fn new(raw: impl Into<String>) -> Self {
		let raw = raw.into();
		let expires_at = decode_expiry(&raw).ok();

		Self { secret: TokenSecret::new(raw), expires_at }
	}

	/// Wraps a raw token, failing when its expiry cannot be decoded.
	pub fn decode(raw: impl Into<String>) -> Result<Self, TokenDecodeError> {
		let raw = raw.into();
		let expires_at = decode_expiry(&raw)?;

		Ok(Self { secret: TokenSecret::new(raw), expires_at: Some(expires_at) })
	}

	/// Returns the bearer secret.
	pub fn secret(&self) -> &TokenSecret {
		&self.secret
	}

	/// Returns the decoded expiry instant, if the token carried a readable one.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Computes the status at `instant`, treating the token as expired `leeway` early.
	pub fn status_at(&self, instant: OffsetDateTime, leeway: Duration) -> TokenStatus {
		match self.expires_at {
			// A leeway reaching past the representable range expires everything.
			Some(expires_at)
				if instant.checked_add(leeway).is_some_and(|cutoff| cutoff < expires_at) =>
				TokenStatus::Valid,
			_ => TokenStatus::Expired,
		}
	}

	/// Returns `true` if the token can be attached at `instant` without a refresh.
	pub fn is_valid_at(&self, instant: OffsetDateTime, leeway: Duration) -> bool {
		matches!(self.status_at(instant, leeway), TokenStatus::Valid)
	}

	/// Returns `true` if the token is valid relative to the current clock.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc(), Duration::ZERO)
	}

	/// Returns `true` if both tokens carry the same secret.
	pub fn same_secret(&self, other: &Self) -> bool {
		self.secret == other.secret
	}
}
