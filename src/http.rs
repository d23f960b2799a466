//! Transport primitives for quiz API calls.
//!
//! The module exposes [`ApiTransport`] alongside the transport-neutral [`ApiRequest`] and
//! [`ApiResponse`] so downstream crates can plug in their own HTTP stack (or an in-process fake
//! for tests) without touching the session core. The authenticator decides which credential a
//! request carries; transports only translate it onto the wire.

// crates.io
#[cfg(feature = "reqwest")]
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ResponseError, TransportError},
};

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing quiz API requests.
///
/// Implementations must forward ambient transport credentials (cookies) on every request: the
/// session and refresh endpoints rely on them instead of the bearer token. Non-success statuses
/// are not errors at this layer; they come back as an [`ApiResponse`] so the client can map them
/// into its own taxonomy.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the raw response.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used by the quiz API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
}
impl HttpMethod {
	/// Returns the canonical method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Transport-neutral request description.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Absolute endpoint URL, query string included.
	pub url: Url,
	/// Serialized JSON body, if any.
	pub body: Option<Vec<u8>>,
	/// Bearer credential to attach as `Authorization: Bearer <token>`.
	pub bearer: Option<TokenSecret>,
}
impl ApiRequest {
	/// Creates a `GET` request without a body or credential.
	pub fn get(url: Url) -> Self {
		Self { method: HttpMethod::Get, url, body: None, bearer: None }
	}

	/// Creates a `POST` request without a body or credential.
	pub fn post(url: Url) -> Self {
		Self { method: HttpMethod::Post, url, body: None, bearer: None }
	}

	/// Attaches a JSON body.
	pub fn with_json_body(mut self, body: Vec<u8>) -> Self {
		self.body = Some(body);

		self
	}

	/// Attaches (or removes) the bearer credential.
	pub fn with_bearer(mut self, bearer: Option<TokenSecret>) -> Self {
		self.bearer = bearer;

		self
	}
}

/// Raw response handed back by an [`ApiTransport`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` when the body holds nothing but whitespace.
	pub fn is_blank(&self) -> bool {
		self.body.iter().all(u8::is_ascii_whitespace)
	}

	/// Checks the status and parses the body as JSON, tagging failures with `operation`.
	pub fn into_json<T>(self, operation: &'static str) -> Result<T, ResponseError>
	where
		T: DeserializeOwned,
	{
		if !self.is_success() {
			return Err(ResponseError::from_status(operation, self.status, &self.body));
		}
		if self.is_blank() {
			return Err(ResponseError::Empty { operation, status: self.status });
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			ResponseError::Malformed { operation, status: self.status, source }
		})
	}
}

/// Reqwest-backed [`ApiTransport`].
///
/// [`ReqwestTransport::with_cookies`] enables reqwest's cookie store so the session cookie set by
/// `init-session` flows into `refresh-token`. Bring a custom [`ReqwestClient`] through
/// [`ReqwestTransport::with_client`] when a proxy, timeout, or TLS override is needed; it must
/// keep a cookie store enabled for refreshes to work.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with an in-memory cookie jar.
	pub fn with_cookies() -> Result<Self, crate::error::ConfigError> {
		Ok(Self(ReqwestClient::builder().cookie_store(true).build()?))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
			};
			let mut builder = client.request(method, request.url);

			if let Some(bearer) = request.bearer.as_ref() {
				builder = builder.header(AUTHORIZATION, bearer.bearer_header());
			}
			if let Some(body) = request.body {
				builder = builder.header(CONTENT_TYPE, "application/json").body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}
