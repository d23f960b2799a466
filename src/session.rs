//! Session core: credential resolution, token refresh, and logout notification.
//!
//! Every authenticated call runs the same two-step protocol. [`RequestAuthenticator::resolve_credential`]
//! inspects the stored token and, when it has expired, suspends on [`TokenRefresher`];
//! [`RequestAuthenticator::dispatch`] then sends the request with whatever credential came out.
//! A failed refresh never prevents dispatch: the request goes out anonymously and the server's
//! verdict reaches the caller as an ordinary response error.

pub mod logout;
pub mod refresh;

pub use logout::*;
pub use refresh::*;

// self
use crate::{
	_prelude::*,
	auth::{SessionToken, TokenSecret, TokenStatus},
	config::ApiConfig,
	http::{ApiRequest, ApiResponse, ApiTransport},
	obs::{self, OperationKind},
	store::SessionTokenStore,
};

/// `{ "token": .. }` body returned by the session and refresh endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenPayload {
	pub(crate) token: String,
}

/// Credential chosen for one outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credential {
	/// Attach `Authorization: Bearer <token>`.
	Bearer(TokenSecret),
	/// Send without an `Authorization` header.
	Anonymous,
}
impl Credential {
	/// Returns the bearer secret, if any.
	pub fn bearer(&self) -> Option<&TokenSecret> {
		match self {
			Self::Bearer(secret) => Some(secret),
			Self::Anonymous => None,
		}
	}

	fn into_bearer(self) -> Option<TokenSecret> {
		match self {
			Self::Bearer(secret) => Some(secret),
			Self::Anonymous => None,
		}
	}
}

/// Interception hook that gates every outbound API call on a fresh credential.
pub struct RequestAuthenticator<T>
where
	T: ?Sized + ApiTransport,
{
	transport: Arc<T>,
	store: Arc<dyn SessionTokenStore>,
	refresher: TokenRefresher<T>,
	leeway: Duration,
}
impl<T> RequestAuthenticator<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates an authenticator sharing `transport` and `store` with its refresher.
	pub fn new(
		transport: impl Into<Arc<T>>,
		store: Arc<dyn SessionTokenStore>,
		config: &ApiConfig,
	) -> Self {
		let transport = transport.into();
		let refresher = TokenRefresher::new(transport.clone(), store.clone(), config);

		Self { transport, store, refresher, leeway: config.expiry_leeway }
	}

	/// Replaces the refresher's logout hook.
	pub fn with_logout_hook(mut self, hook: Arc<dyn LogoutHook>) -> Self {
		self.refresher = self.refresher.with_logout_hook(hook);

		self
	}

	/// Returns the token store shared with the refresher.
	pub fn store(&self) -> &Arc<dyn SessionTokenStore> {
		&self.store
	}

	/// Returns the refresher.
	pub fn refresher(&self) -> &TokenRefresher<T> {
		&self.refresher
	}

	/// Picks the credential for the next request, refreshing an expired token first.
	///
	/// An expired or undecodable token is never returned as-is. Refresh failures resolve to
	/// [`Credential::Anonymous`]; only a failing store read surfaces as an error.
	pub async fn resolve_credential(&self) -> Result<Credential> {
		const KIND: OperationKind = OperationKind::RefreshToken;

		let stored = self.store.get().await?;

		match TokenStatus::of(stored.as_ref(), OffsetDateTime::now_utc(), self.leeway) {
			TokenStatus::Absent => Ok(Credential::Anonymous),
			TokenStatus::Valid => Ok(bearer_of(stored)),
			TokenStatus::Expired => {
				let Some(stale) = stored else { return Ok(Credential::Anonymous) };

				obs::log_session(KIND, "stored token expired; refreshing before dispatch");

				Ok(self
					.refresher
					.refresh_stale(&stale)
					.await
					.map(|token| Credential::Bearer(token.secret().clone()))
					.unwrap_or(Credential::Anonymous))
			},
		}
	}

	/// Sends `request` carrying `credential` (any bearer already on the request is replaced).
	pub async fn dispatch(&self, request: ApiRequest, credential: Credential) -> Result<ApiResponse> {
		let request = request.with_bearer(credential.into_bearer());

		Ok(self.transport.execute(request).await?)
	}

	/// Resolves a credential and dispatches `request` with it.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		let credential = self.resolve_credential().await?;

		self.dispatch(request, credential).await
	}
}
impl<T> Debug for RequestAuthenticator<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestAuthenticator")
			.field("refresher", &self.refresher)
			.field("leeway", &self.leeway)
			.finish()
	}
}

fn bearer_of(token: Option<SessionToken>) -> Credential {
	token.map(|token| Credential::Bearer(token.secret().clone())).unwrap_or(Credential::Anonymous)
}
