// self
use crate::{
	_prelude::*,
	config::{ApiConfig, ApiEndpoint, ApiEndpoints},
};

/// Errors raised while constructing or validating configurations.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ApiConfigError {
	/// Base URL could not be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than HTTP(S).
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Offending URL.
		url: String,
	},
	/// Base URL cannot carry a path (e.g. `mailto:`).
	#[error("Base URL cannot carry endpoint paths: {url}.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Base URL carries a query string or fragment.
	#[error("Base URL must not carry a query or fragment: {url}.")]
	BaseUrlHasQuery {
		/// Offending URL.
		url: String,
	},
	/// Endpoint path override is empty.
	#[error("The {endpoint} endpoint path is empty.")]
	EmptyEndpointPath {
		/// Endpoint whose path failed validation.
		endpoint: ApiEndpoint,
	},
	/// Endpoint path could not be joined onto the base URL.
	#[error("The {endpoint} endpoint path is invalid.")]
	InvalidEndpointPath {
		/// Endpoint whose path failed validation.
		endpoint: ApiEndpoint,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Logout redirect target is empty.
	#[error("Logout redirect target must not be empty.")]
	EmptyLogoutRedirect,
}

/// Builder for [`ApiConfig`] values.
#[derive(Debug)]
pub struct ApiConfigBuilder {
	/// Base URL every endpoint path is joined onto.
	pub base_url: Url,
	/// Per-endpoint path overrides.
	pub paths: BTreeMap<ApiEndpoint, String>,
	/// Navigation target reported in logout events.
	pub logout_redirect: String,
	/// Early-expiry window applied to stored tokens.
	pub expiry_leeway: Duration,
}
impl ApiConfigBuilder {
	/// Creates a new builder seeded with the provided base URL.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			paths: BTreeMap::new(),
			logout_redirect: "/".into(),
			expiry_leeway: Duration::ZERO,
		}
	}

	/// Overrides the path (relative to the base URL) of one endpoint.
	pub fn endpoint_path(mut self, endpoint: ApiEndpoint, path: impl Into<String>) -> Self {
		self.paths.insert(endpoint, path.into());

		self
	}

	/// Overrides the logout redirect target (defaults to `/`).
	pub fn logout_redirect(mut self, target: impl Into<String>) -> Self {
		self.logout_redirect = target.into();

		self
	}

	/// Overrides the early-expiry window (defaults to zero; negative values clamp to zero).
	pub fn expiry_leeway(mut self, leeway: Duration) -> Self {
		self.expiry_leeway = if leeway.is_negative() { Duration::ZERO } else { leeway };

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ApiConfig, ApiConfigError> {
		let base_url = normalize_base_url(self.base_url)?;
		let join = |endpoint: ApiEndpoint| -> Result<Url, ApiConfigError> {
			let path = self
				.paths
				.get(&endpoint)
				.map(|path| path.trim().trim_start_matches('/'))
				.unwrap_or(endpoint.default_path());

			if path.is_empty() {
				return Err(ApiConfigError::EmptyEndpointPath { endpoint });
			}

			base_url
				.join(path)
				.map_err(|source| ApiConfigError::InvalidEndpointPath { endpoint, source })
		};
		let endpoints = ApiEndpoints {
			init_session: join(ApiEndpoint::InitSession)?,
			refresh_token: join(ApiEndpoint::RefreshToken)?,
			question: join(ApiEndpoint::Question)?,
			answer: join(ApiEndpoint::Answer)?,
			score: join(ApiEndpoint::Score)?,
			reset_score: join(ApiEndpoint::ResetScore)?,
		};

		if self.logout_redirect.trim().is_empty() {
			return Err(ApiConfigError::EmptyLogoutRedirect);
		}

		Ok(ApiConfig {
			base_url,
			endpoints,
			logout_redirect: self.logout_redirect,
			expiry_leeway: self.expiry_leeway,
		})
	}
}

fn normalize_base_url(mut url: Url) -> Result<Url, ApiConfigError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ApiConfigError::UnsupportedScheme { url: url.to_string() });
	}
	if url.cannot_be_a_base() {
		return Err(ApiConfigError::CannotBeABase { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ApiConfigError::BaseUrlHasQuery { url: url.to_string() });
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}
