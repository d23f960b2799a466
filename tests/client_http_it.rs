#![cfg(feature = "reqwest")]

mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use mental_math_client::{
	auth::SessionToken,
	client::{ApiClient, ReqwestApiClient},
	config::ApiConfig,
	error::{Error, ResponseError},
	http::ReqwestTransport,
	quiz::{Difficulty, Operator},
	store::{MemoryStore, SessionTokenStore},
};
// self
use common::*;

fn build_client(server: &MockServer, token: Option<&str>) -> (ReqwestApiClient, MemoryStore) {
	let config = ApiConfig::from_base_url(&server.url("/api"))
		.expect("Mock server URL should build a config.");
	let store = token.map(|raw| MemoryStore::with_token(SessionToken::new(raw))).unwrap_or_default();
	let shared_store: Arc<dyn SessionTokenStore> = Arc::new(store.clone());
	let transport =
		ReqwestTransport::with_cookies().expect("Cookie-enabled reqwest client should build.");
	let client: ReqwestApiClient = ApiClient::with_transport(config, shared_store, transport);

	(client, store)
}

#[tokio::test]
async fn init_session_then_answer_a_question() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server, None);
	let token = fresh_jwt();
	let bearer = format!("Bearer {token}");
	let init = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/init-session").header_missing("authorization");
			then.status(200).header("content-type", "application/json").body(token_body(&token));
		})
		.await;
	let question = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/question")
				.query_param("difficulty", "easy")
				.header("authorization", bearer.as_str());
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"operand1":7,"operand2":5,"operator":"+","id":"q-7-5"}"#);
		})
		.await;
	let answer = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/answer")
				.header("authorization", bearer.as_str())
				.header("content-type", "application/json")
				.json_body(serde_json::json!({ "userAnswer": 12, "questionId": "q-7-5" }));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"correct":true,"correctAnswer":12}"#);
		})
		.await;

	let issued = client.init_session().await.expect("Session init should succeed.");

	assert_eq!(issued.secret().expose(), token);
	assert!(store.snapshot().is_some_and(|stored| stored.same_secret(&issued)));

	let fetched = client.get_question(Difficulty::Easy).await.expect("Question should load.");

	assert_eq!(fetched.operator, Operator::Add);
	assert_eq!(fetched.to_string(), "7 + 5 = ?");

	let verdict =
		client.submit_answer(&fetched.answer(12)).await.expect("Answer should be graded.");

	assert!(verdict.correct);
	assert_eq!(verdict.correct_answer, 12);

	init.assert_async().await;
	question.assert_async().await;
	answer.assert_async().await;
}

#[tokio::test]
async fn init_session_with_blank_body_keeps_the_stored_token() {
	let server = MockServer::start_async().await;
	let existing = fresh_jwt();
	let (client, _) = build_client(&server, Some(existing.as_str()));
	let init = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/init-session");
			then.status(200);
		})
		.await;

	let token = client.init_session().await.expect("Blank init body should reuse the token.");

	assert_eq!(token.secret().expose(), existing);

	init.assert_async().await;
}

#[tokio::test]
async fn init_session_with_blank_body_and_no_token_is_empty() {
	let server = MockServer::start_async().await;
	let (client, _) = build_client(&server, None);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/init-session");
			then.status(200);
		})
		.await;

	let err = client.init_session().await.expect_err("Nothing to reuse should be an error.");

	assert!(matches!(err, Error::Response(ResponseError::Empty { status: 200, .. })));
}

#[tokio::test]
async fn refresh_carries_the_session_cookie() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server, None);
	let renewed = fresh_jwt();
	let init = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/init-session");
			then.status(200)
				.header("set-cookie", "session_id=abc123; Path=/; HttpOnly")
				.header("content-type", "application/json")
				.body(token_body(&expired_jwt()));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/refresh-token")
				.header("cookie", "session_id=abc123")
				.header_missing("authorization");
			then.status(200).header("content-type", "application/json").body(token_body(&renewed));
		})
		.await;
	let score = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/score")
				.header("authorization", format!("Bearer {renewed}").as_str());
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"currentScore":0,"highScores":null,"isNewRecord":false}"#);
		})
		.await;

	client.init_session().await.expect("Session init should succeed.");

	let state = client.get_score().await.expect("Score should load after refresh.");

	assert_eq!(state.current_score, 0);
	assert!(state.high_scores.is_empty());
	assert!(store.snapshot().is_some_and(|token| token.secret().expose() == renewed));

	init.assert_async().await;
	refresh.assert_calls_async(1).await;
	score.assert_async().await;
}

#[tokio::test]
async fn failed_refresh_sends_the_call_without_authorization() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server, Some(expired_jwt().as_str()));
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/refresh-token");
			then.status(401).body("Session not found");
		})
		.await;
	let score = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/score").header_missing("authorization");
			then.status(401).body("Unauthorized");
		})
		.await;

	let err = client.get_score().await.expect_err("The server's rejection should surface.");

	match err {
		Error::Response(ResponseError::Status { status, body, .. }) => {
			assert_eq!(status, 401);
			assert_eq!(body, "Unauthorized");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
	assert!(store.snapshot().is_none());

	refresh.assert_async().await;
	score.assert_async().await;
}

#[tokio::test]
async fn reset_score_posts_the_tier() {
	let server = MockServer::start_async().await;
	let (client, _) = build_client(&server, Some(fresh_jwt().as_str()));
	let reset = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/reset-score")
				.json_body(serde_json::json!({ "difficulty": "hard" }));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"currentScore":0,"highScores":{"hard":9,"easy":4},"isNewRecord":true}"#);
		})
		.await;
	let score = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/score");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"currentScore":0,"highScores":{"hard":9,"easy":4},"isNewRecord":false}"#);
		})
		.await;

	let state = client.reset_score(Difficulty::Hard).await.expect("Reset should succeed.");

	assert_eq!(state.current_score, 0);
	assert_eq!(state.high_score(Difficulty::Hard), 9);
	assert_eq!(state.high_score(Difficulty::Normal), 0);
	assert_eq!(state.best_overall(), 9);
	assert!(state.is_new_record);

	let after = client.get_score().await.expect("Score should load after the reset.");

	assert_eq!(after.current_score, 0);
	assert_eq!(after.high_score(Difficulty::Easy), 4);
	assert_eq!(after.high_scores, state.high_scores);

	reset.assert_async().await;
	score.assert_async().await;
}

#[tokio::test]
async fn malformed_payloads_report_the_failing_field() {
	let server = MockServer::start_async().await;
	let (client, _) = build_client(&server, Some(fresh_jwt().as_str()));

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/question");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"operand1":7,"operand2":5,"operator":"%","id":"q1"}"#);
		})
		.await;

	let err = client.get_question(Difficulty::Normal).await.expect_err("Unknown operator.");

	match err {
		Error::Response(ResponseError::Malformed { source, status, .. }) => {
			assert_eq!(status, 200);
			assert_eq!(source.path().to_string(), "operator");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
