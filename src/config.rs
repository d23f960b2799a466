//! Endpoint configuration for the quiz API.
//!
//! [`ApiConfig`] holds validated absolute URLs for every endpoint the client calls, derived from a
//! single base URL, plus the session knobs (logout redirect target, expiry leeway). Build one with
//! [`ApiConfig::builder`] or load the base URL from the environment with [`ApiConfig::from_env`].

/// Builder API for assembling endpoint configurations.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, quiz::Difficulty};

/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "MENTAL_MATH_API_URL";
/// Base URL used when [`ENV_API_URL`] is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";

/// Endpoints exposed by the quiz API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiEndpoint {
	/// `POST init-session`.
	InitSession,
	/// `POST refresh-token`.
	RefreshToken,
	/// `GET question?difficulty=..`.
	Question,
	/// `POST answer`.
	Answer,
	/// `GET score`.
	Score,
	/// `POST reset-score`.
	ResetScore,
}
impl ApiEndpoint {
	/// Path relative to the base URL used when no override is configured.
	pub const fn default_path(self) -> &'static str {
		match self {
			Self::InitSession => "init-session",
			Self::RefreshToken => "refresh-token",
			Self::Question => "question",
			Self::Answer => "answer",
			Self::Score => "score",
			Self::ResetScore => "reset-score",
		}
	}

	/// Returns a stable label suitable for errors and logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::InitSession => "init_session",
			Self::RefreshToken => "refresh_token",
			Self::Question => "question",
			Self::Answer => "answer",
			Self::Score => "score",
			Self::ResetScore => "reset_score",
		}
	}
}
impl Display for ApiEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Absolute URLs for every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoints {
	/// Session bootstrap endpoint.
	pub init_session: Url,
	/// Token refresh endpoint.
	pub refresh_token: Url,
	/// Question endpoint (without the difficulty query).
	pub question: Url,
	/// Answer grading endpoint.
	pub answer: Url,
	/// Score endpoint.
	pub score: Url,
	/// Score reset endpoint.
	pub reset_score: Url,
}
impl ApiEndpoints {
	/// Returns the URL configured for `endpoint`.
	pub fn url(&self, endpoint: ApiEndpoint) -> &Url {
		match endpoint {
			ApiEndpoint::InitSession => &self.init_session,
			ApiEndpoint::RefreshToken => &self.refresh_token,
			ApiEndpoint::Question => &self.question,
			ApiEndpoint::Answer => &self.answer,
			ApiEndpoint::Score => &self.score,
			ApiEndpoint::ResetScore => &self.reset_score,
		}
	}
}

/// Immutable client configuration consumed by [`crate::client::ApiClient`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
	/// Normalized base URL (always ends with `/`).
	pub base_url: Url,
	/// Endpoint URLs derived from the base URL.
	pub endpoints: ApiEndpoints,
	/// Navigation target reported in logout events.
	pub logout_redirect: String,
	/// Tokens are treated as expired this long before their `exp` claim.
	pub expiry_leeway: Duration,
}
impl ApiConfig {
	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> ApiConfigBuilder {
		ApiConfigBuilder::new(base_url)
	}

	/// Parses `base_url` and builds a configuration with default endpoint paths.
	pub fn from_base_url(base_url: &str) -> Result<Self, ApiConfigError> {
		let base_url =
			Url::parse(base_url).map_err(|source| ApiConfigError::InvalidBaseUrl { source })?;

		Self::builder(base_url).build()
	}

	/// Reads the base URL from [`ENV_API_URL`], falling back to [`DEFAULT_API_URL`].
	pub fn from_env() -> Result<Self, ApiConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	fn from_lookup(lookup: impl FnOnce(&str) -> Option<String>) -> Result<Self, ApiConfigError> {
		let base_url = lookup(ENV_API_URL)
			.map(|value| value.trim().to_owned())
			.filter(|value| !value.is_empty())
			.unwrap_or_else(|| DEFAULT_API_URL.to_owned());

		Self::from_base_url(&base_url)
	}

	/// Returns the question URL carrying the `difficulty` query parameter.
	pub fn question_url(&self, difficulty: Difficulty) -> Url {
		let mut url = self.endpoints.question.clone();

		url.query_pairs_mut().append_pair("difficulty", difficulty.as_str());

		url
	}
}
