//! Plays one quiz round against a mocked API with the default reqwest transport and in-memory
//! token store.

// std
use std::sync::Arc;
// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use color_eyre::Result;
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use mental_math_client::{
	client::ApiClient,
	config::ApiConfig,
	quiz::{Difficulty, QuizRound},
	session::{LogoutEvent, LogoutHook},
};

fn demo_token() -> String {
	let exp = (OffsetDateTime::now_utc() + Duration::minutes(15)).unix_timestamp();
	let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
	let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));

	format!("{header}.{payload}.demo")
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token = demo_token();

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/init-session");
			then.status(200)
				.header("content-type", "application/json")
				.body(format!(r#"{{"token":"{token}"}}"#));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/question").query_param("difficulty", "easy");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"operand1":7,"operand2":5,"operator":"+","id":"demo-q1"}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/answer");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"correct":true,"correctAnswer":12}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/score");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"currentScore":1,"highScores":{"easy":1},"isNewRecord":true}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/reset-score");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"currentScore":0,"highScores":{"easy":1},"isNewRecord":false}"#);
		})
		.await;

	let hook: Arc<dyn LogoutHook> = Arc::new(|event: &LogoutEvent| {
		println!("Session ended ({:?}); navigate to {}.", event.reason, event.redirect_to);
	});
	let client = ApiClient::new(ApiConfig::from_base_url(&server.url("/api"))?)?
		.with_logout_hook(hook);

	client.init_session().await?;

	let mut round = QuizRound::new(&client, Difficulty::Easy);
	let question = round.next_question().await?;

	println!("Question: {question}");

	let feedback = round.submit(12).await?;

	println!(
		"Correct: {}. Score: {}. New record: {}.",
		feedback.result.correct, feedback.score.current_score, feedback.score.is_new_record
	);

	let state = round.finish().await?;

	println!("Best easy score: {}.", state.high_score(Difficulty::Easy));

	Ok(())
}
