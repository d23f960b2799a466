//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::{HashMap, VecDeque},
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
// self
use mental_math_client::{
	auth::SessionToken,
	client::ApiClient,
	config::ApiConfig,
	http::{ApiRequest, ApiResponse, ApiTransport, HttpMethod, TransportFuture},
	session::{LogoutEvent, LogoutHook},
	store::{MemoryStore, SessionTokenStore},
};

/// Base URL used with the in-process fake transport.
pub const FAKE_BASE_URL: &str = "http://quiz.test/api";

/// Builds an unsigned JWT whose payload carries `exp`.
pub fn jwt_expiring_at(exp: OffsetDateTime) -> String {
	let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
	let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp.unix_timestamp()));

	format!("{header}.{payload}.signature")
}

/// JWT valid for the next hour.
pub fn fresh_jwt() -> String {
	jwt_expiring_at(OffsetDateTime::now_utc() + Duration::hours(1))
}

/// JWT that expired a minute ago.
pub fn expired_jwt() -> String {
	jwt_expiring_at(OffsetDateTime::now_utc() - Duration::minutes(1))
}

/// `{"token": ..}` body.
pub fn token_body(token: &str) -> String {
	format!(r#"{{"token":"{token}"}}"#)
}

/// Request as observed by [`FakeTransport`].
#[derive(Clone, Debug)]
pub struct Recorded {
	pub method: HttpMethod,
	pub path: String,
	pub query: Option<String>,
	pub bearer: Option<String>,
	pub body: Option<String>,
}

/// In-process transport answering from per-path scripts.
///
/// Each path holds a queue of responses; the last one repeats once the queue drains. Paths with
/// no script answer `404`.
#[derive(Default)]
pub struct FakeTransport {
	routes: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
	delays: Mutex<HashMap<String, std::time::Duration>>,
	requests: Mutex<Vec<Recorded>>,
}
impl FakeTransport {
	/// Queues `body` with `status` for requests whose path ends with `/{endpoint}`.
	pub fn respond(&self, endpoint: &str, status: u16, body: impl Into<Vec<u8>>) -> &Self {
		self.routes
			.lock()
			.entry(endpoint.to_owned())
			.or_default()
			.push_back(ApiResponse::new(status, body));

		self
	}

	/// Delays every response for `endpoint`.
	pub fn delay(&self, endpoint: &str, delay: std::time::Duration) -> &Self {
		self.delays.lock().insert(endpoint.to_owned(), delay);

		self
	}

	/// Returns every request seen so far.
	pub fn requests(&self) -> Vec<Recorded> {
		self.requests.lock().clone()
	}

	/// Returns the requests sent to `endpoint`.
	pub fn requests_to(&self, endpoint: &str) -> Vec<Recorded> {
		self.requests().into_iter().filter(|request| request.path == endpoint).collect()
	}

	/// Returns how many requests hit `endpoint`.
	pub fn calls_to(&self, endpoint: &str) -> usize {
		self.requests_to(endpoint).len()
	}
}
impl ApiTransport for FakeTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let endpoint =
			request.url.path_segments().and_then(|mut segments| segments.next_back()).unwrap_or("");
		let endpoint = endpoint.to_owned();

		self.requests.lock().push(Recorded {
			method: request.method,
			path: endpoint.clone(),
			query: request.url.query().map(ToOwned::to_owned),
			bearer: request.bearer.as_ref().map(|secret| secret.expose().to_owned()),
			body: request.body.as_ref().map(|body| String::from_utf8_lossy(body).into_owned()),
		});

		let response = {
			let mut routes = self.routes.lock();

			let scripted = match routes.get_mut(&endpoint) {
				Some(queue) if queue.len() > 1 => queue.pop_front(),
				Some(queue) => queue.front().cloned(),
				None => None,
			};

			scripted.unwrap_or_else(|| ApiResponse::new(404, b"not found".to_vec()))
		};
		let delay = self.delays.lock().get(&endpoint).copied();

		Box::pin(async move {
			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}

			Ok(response)
		})
	}
}

/// Counts logout events and keeps the last one.
#[derive(Default)]
pub struct LogoutRecorder {
	count: AtomicUsize,
	last: Mutex<Option<LogoutEvent>>,
}
impl LogoutRecorder {
	pub fn count(&self) -> usize {
		self.count.load(Ordering::SeqCst)
	}

	pub fn last(&self) -> Option<LogoutEvent> {
		self.last.lock().clone()
	}
}
impl LogoutHook for LogoutRecorder {
	fn on_logout(&self, event: &LogoutEvent) {
		self.count.fetch_add(1, Ordering::SeqCst);
		*self.last.lock() = Some(event.clone());
	}
}

/// Client wired to a [`FakeTransport`] and an optional seeded token.
pub struct FakeHarness {
	pub client: ApiClient<FakeTransport>,
	pub transport: Arc<FakeTransport>,
	pub store: MemoryStore,
	pub logouts: Arc<LogoutRecorder>,
}

/// Builds a [`FakeHarness`], seeding the store with `token` when provided.
pub fn fake_harness(token: Option<&str>) -> FakeHarness {
	let config =
		ApiConfig::from_base_url(FAKE_BASE_URL).expect("Fake base URL should build a config.");

	fake_harness_with(config, token)
}

/// Builds a [`FakeHarness`] on top of a caller-provided configuration.
pub fn fake_harness_with(config: ApiConfig, token: Option<&str>) -> FakeHarness {
	let store = token.map(|raw| MemoryStore::with_token(SessionToken::new(raw))).unwrap_or_default();
	let transport = Arc::new(FakeTransport::default());
	let logouts = Arc::new(LogoutRecorder::default());
	let shared_store: Arc<dyn SessionTokenStore> = Arc::new(store.clone());
	let client: ApiClient<FakeTransport> =
		ApiClient::with_transport(config, shared_store, transport.clone())
			.with_logout_hook(logouts.clone());

	FakeHarness { client, transport, store, logouts }
}
