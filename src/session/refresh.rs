//! Token refresh with a singleflight guard, logout latch, and metrics.
//!
//! [`TokenRefresher::refresh`] exchanges the session cookie for a new bearer token at the refresh
//! endpoint. Every failure class (transport, status, malformed body, undecodable token, storage)
//! is handled the same way: the stored token is cleared, the host receives a single
//! [`LogoutEvent`], and the caller gets `None` so it can proceed unauthenticated.
//!
//! Refreshes are serialized. A waiter that queued behind another refresh re-reads the store
//! once it acquires the guard and reuses that outcome instead of calling the endpoint again.

mod metrics;

pub use metrics::{RefreshCounts, RefreshMetrics};

// self
use crate::{
	_prelude::*,
	auth::SessionToken,
	config::ApiConfig,
	http::{ApiRequest, ApiTransport},
	obs::{self, OperationKind},
	session::{
		TokenPayload,
		logout::{LogOnlyLogout, LogoutEvent, LogoutHook, LogoutLatch, LogoutReason},
	},
	store::SessionTokenStore,
};

const KIND: OperationKind = OperationKind::RefreshToken;

/// Exchanges expired session tokens for fresh ones.
pub struct TokenRefresher<T>
where
	T: ?Sized + ApiTransport,
{
	transport: Arc<T>,
	store: Arc<dyn SessionTokenStore>,
	endpoint: Url,
	redirect_to: String,
	leeway: Duration,
	logout: Arc<dyn LogoutHook>,
	latch: Arc<LogoutLatch>,
	singleflight: Arc<AsyncMutex<()>>,
	metrics: Arc<RefreshMetrics>,
}
impl<T> TokenRefresher<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a refresher for the endpoint and logout target declared in `config`.
	///
	/// Logout events only reach the log until [`TokenRefresher::with_logout_hook`] installs a
	/// host callback.
	pub fn new(
		transport: impl Into<Arc<T>>,
		store: Arc<dyn SessionTokenStore>,
		config: &ApiConfig,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			endpoint: config.endpoints.refresh_token.clone(),
			redirect_to: config.logout_redirect.clone(),
			leeway: config.expiry_leeway,
			logout: Arc::new(LogOnlyLogout),
			latch: Default::default(),
			singleflight: Default::default(),
			metrics: Default::default(),
		}
	}

	/// Replaces the host callback invoked when a refresh ends the session.
	pub fn with_logout_hook(mut self, hook: Arc<dyn LogoutHook>) -> Self {
		self.logout = hook;

		self
	}

	/// Returns the refresh counters.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	/// Calls the refresh endpoint unconditionally.
	///
	/// Returns the persisted token, or `None` after clearing the store and notifying the
	/// logout hook.
	pub async fn refresh(&self) -> Option<SessionToken> {
		let _singleflight = self.singleflight.lock().await;

		self.refresh_locked().await
	}

	/// Refreshes `stale` unless a concurrent refresh already settled it.
	pub(crate) async fn refresh_stale(&self, stale: &SessionToken) -> Option<SessionToken> {
		let _singleflight = self.singleflight.lock().await;

		match self.store.get().await {
			Ok(None) => {
				self.metrics.record_coalesced();
				obs::log_session(KIND, "session cleared while waiting; proceeding unauthenticated");

				return None;
			},
			Ok(Some(current))
				if !current.same_secret(stale)
					&& current.is_valid_at(OffsetDateTime::now_utc(), self.leeway) =>
			{
				self.metrics.record_coalesced();
				obs::log_session(KIND, "reusing token from a concurrent refresh");

				return Some(current);
			},
			_ => {},
		}

		self.refresh_locked().await
	}

	/// Re-arms the logout latch after a new session was established elsewhere.
	pub(crate) fn rearm(&self) {
		self.latch.arm();
	}

	async fn refresh_locked(&self) -> Option<SessionToken> {
		self.metrics.record_attempt();

		match obs::observe(KIND, "refresh", self.exchange()).await {
			Ok(token) => {
				self.metrics.record_success();
				self.latch.arm();

				Some(token)
			},
			Err(err) => {
				self.metrics.record_failure();

				if let Err(clear_err) = self.store.clear().await {
					obs::log_failure(KIND, &clear_err.into());
				}

				self.emit_logout(&err);

				None
			},
		}
	}

	async fn exchange(&self) -> Result<SessionToken> {
		let request = ApiRequest::post(self.endpoint.clone());
		let response = self.transport.execute(request).await?;
		let payload: TokenPayload = response.into_json(KIND.as_str())?;
		let token = SessionToken::decode(payload.token)?;

		self.store.set(token.clone()).await?;

		Ok(token)
	}

	fn emit_logout(&self, err: &Error) {
		if !self.latch.disarm() {
			obs::log_session(KIND, "logout already emitted for this session");

			return;
		}

		let event = LogoutEvent {
			reason: LogoutReason::from_error(err),
			redirect_to: self.redirect_to.clone(),
			at: OffsetDateTime::now_utc(),
		};

		obs::record_logout(event.reason);
		self.logout.on_logout(&event);
	}
}
impl<T> Debug for TokenRefresher<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRefresher")
			.field("endpoint", &self.endpoint.as_str())
			.field("redirect_to", &self.redirect_to)
			.field("metrics", &self.metrics.snapshot())
			.finish()
	}
}
