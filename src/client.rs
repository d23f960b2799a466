//! Typed quiz API operations routed through the session core.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::SessionToken,
	config::ApiConfig,
	error::{ConfigError, ResponseError},
	http::{ApiRequest, ApiTransport},
	obs::{self, OperationKind},
	quiz::{AnswerResult, AnswerSubmission, Difficulty, Question, ScoreState},
	session::{Credential, LogoutHook, RefreshMetrics, RequestAuthenticator, TokenPayload},
	store::SessionTokenStore,
};
#[cfg(feature = "reqwest")] use crate::{http::ReqwestTransport, store::MemoryStore};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

#[derive(Serialize)]
struct ResetScoreBody {
	difficulty: Difficulty,
}

/// Quiz API client.
///
/// Each operation is a single HTTP call gated by the [`RequestAuthenticator`]; errors propagate
/// to the caller unchanged and nothing is retried apart from the implicit pre-dispatch refresh.
pub struct ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	config: ApiConfig,
	authenticator: RequestAuthenticator<T>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided store + transport pair.
	pub fn with_transport(
		config: ApiConfig,
		store: Arc<dyn SessionTokenStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		let authenticator = RequestAuthenticator::new(transport, store, &config);

		Self { config, authenticator }
	}

	/// Installs the host callback invoked when a failed refresh ends the session.
	pub fn with_logout_hook(mut self, hook: Arc<dyn LogoutHook>) -> Self {
		self.authenticator = self.authenticator.with_logout_hook(hook);

		self
	}

	/// Returns the endpoint configuration.
	pub fn config(&self) -> &ApiConfig {
		&self.config
	}

	/// Returns the authenticator gating every call.
	pub fn authenticator(&self) -> &RequestAuthenticator<T> {
		&self.authenticator
	}

	/// Returns the refresh counters.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		self.authenticator.refresher().metrics()
	}

	/// Starts a session and stores the issued token.
	///
	/// The call is sent without a bearer credential; the server identifies the session through
	/// cookies. An empty success body means the server already knows this session, in which case
	/// the stored token is returned.
	pub async fn init_session(&self) -> Result<SessionToken> {
		obs::observe(OperationKind::InitSession, "init_session", self.start_session()).await
	}

	/// Fetches a question for `difficulty`.
	pub async fn get_question(&self, difficulty: Difficulty) -> Result<Question> {
		const KIND: OperationKind = OperationKind::GetQuestion;

		let request = ApiRequest::get(self.config.question_url(difficulty));

		obs::observe(KIND, difficulty.as_str(), self.fetch_json(KIND, request)).await
	}

	/// Submits an answer for grading.
	pub async fn submit_answer(&self, submission: &AnswerSubmission) -> Result<AnswerResult> {
		const KIND: OperationKind = OperationKind::SubmitAnswer;

		let body = encode_body(KIND, submission)?;
		let request = ApiRequest::post(self.config.endpoints.answer.clone()).with_json_body(body);

		obs::observe(KIND, "submit_answer", self.fetch_json(KIND, request)).await
	}

	/// Fetches the running score and per-tier best scores.
	pub async fn get_score(&self) -> Result<ScoreState> {
		const KIND: OperationKind = OperationKind::GetScore;

		let request = ApiRequest::get(self.config.endpoints.score.clone());

		obs::observe(KIND, "get_score", self.fetch_json(KIND, request)).await
	}

	/// Ends the running round for `difficulty` and returns the resulting score state.
	///
	/// The server folds the finished round into the tier's best score before zeroing the running
	/// score, so `is_new_record` in the response refers to the round that just ended.
	pub async fn reset_score(&self, difficulty: Difficulty) -> Result<ScoreState> {
		const KIND: OperationKind = OperationKind::ResetScore;

		let body = encode_body(KIND, &ResetScoreBody { difficulty })?;
		let request =
			ApiRequest::post(self.config.endpoints.reset_score.clone()).with_json_body(body);

		obs::observe(KIND, difficulty.as_str(), self.fetch_json(KIND, request)).await
	}

	/// Drops the stored token; later calls go out unauthenticated until a new session starts.
	pub async fn clear_session(&self) -> Result<()> {
		Ok(self.authenticator.store().clear().await?)
	}

	async fn start_session(&self) -> Result<SessionToken> {
		const KIND: OperationKind = OperationKind::InitSession;

		let request = ApiRequest::post(self.config.endpoints.init_session.clone());
		let response = self.authenticator.dispatch(request, Credential::Anonymous).await?;
		let store = self.authenticator.store();

		if response.is_success() && response.is_blank() {
			let Some(current) = store.get().await? else {
				return Err(
					ResponseError::Empty { operation: KIND.as_str(), status: response.status }.into()
				);
			};

			obs::log_session(KIND, "server kept the existing session; reusing stored token");

			return Ok(current);
		}

		let payload: TokenPayload = response.into_json(KIND.as_str())?;
		let token = SessionToken::new(payload.token);

		store.set(token.clone()).await?;
		self.authenticator.refresher().rearm();

		Ok(token)
	}

	async fn fetch_json<R>(&self, kind: OperationKind, request: ApiRequest) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let response = self.authenticator.send(request).await?;

		Ok(response.into_json(kind.as_str())?)
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client with a cookie-enabled reqwest transport and an in-memory token store.
	pub fn new(config: ApiConfig) -> Result<Self> {
		let transport = ReqwestTransport::with_cookies()?;

		Ok(Self::with_transport(config, Arc::new(MemoryStore::default()), transport))
	}

	/// Creates a client whose base URL comes from the environment.
	pub fn from_env() -> Result<Self> {
		let config = ApiConfig::from_env().map_err(ConfigError::from)?;

		Self::new(config)
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("authenticator", &self.authenticator)
			.finish()
	}
}

fn encode_body<B>(kind: OperationKind, body: &B) -> Result<Vec<u8>>
where
	B: ?Sized + Serialize,
{
	serde_json::to_vec(body)
		.map_err(|source| ConfigError::RequestEncode { operation: kind.as_str(), source }.into())
}
