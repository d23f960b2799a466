mod common;

// crates.io
use mental_math_client::{
	error::Error,
	quiz::{Difficulty, QuizRound, RoundError},
};
use time::{Duration, OffsetDateTime};
// self
use common::*;

const QUESTION_BODY: &str = r#"{"operand1":7,"operand2":5,"operator":"+","id":"q-7-5","difficulty":"easy"}"#;

#[tokio::test]
async fn round_answers_once_and_reloads_the_score() {
	let harness = fake_harness(Some(fresh_jwt().as_str()));

	harness
		.transport
		.respond("question", 200, QUESTION_BODY)
		.respond("answer", 200, r#"{"correct":true,"correctAnswer":12}"#)
		.respond("score", 200, r#"{"currentScore":1,"highScores":{"easy":1},"isNewRecord":true}"#);

	let mut round = QuizRound::new(&harness.client, Difficulty::Easy);
	let question = round.next_question().await.expect("Question should load.").clone();

	assert_eq!(question.to_string(), "7 + 5 = ?");
	assert!(!round.is_time_up_at(OffsetDateTime::now_utc()));

	let feedback = round.submit(12).await.expect("First answer should be graded.");

	assert!(feedback.result.correct);
	assert_eq!(feedback.score.current_score, 1);
	assert_eq!(round.score().map(|score| score.current_score), Some(1));
	assert_eq!(
		harness.transport.requests_to("answer")[0].body.as_deref(),
		Some(r#"{"userAnswer":12,"questionId":"q-7-5"}"#)
	);

	let err = round.submit(13).await.expect_err("Second answer must be rejected locally.");

	assert!(matches!(err, Error::Round(RoundError::AlreadyAnswered { .. })));
	assert_eq!(harness.transport.calls_to("answer"), 1);
	assert_eq!(harness.transport.calls_to("score"), 1);
}

#[tokio::test]
async fn round_accepts_questions_without_an_id() {
	let harness = fake_harness(Some(fresh_jwt().as_str()));

	harness
		.transport
		.respond("question", 200, r#"{"operand1":7,"operand2":5,"operator":"+","difficulty":"easy"}"#)
		.respond("answer", 200, r#"{"correct":true,"correctAnswer":12}"#)
		.respond("score", 200, r#"{"currentScore":1,"highScores":{"easy":1},"isNewRecord":true}"#);

	let mut round = QuizRound::new(&harness.client, Difficulty::Easy);
	let question = round.next_question().await.expect("Id-less question should load.");

	assert_eq!(question.id, None);
	assert_eq!(question.to_string(), "7 + 5 = ?");

	let feedback = round.submit(12).await.expect("Answer should be graded.");

	assert!(feedback.result.correct);
	assert_eq!(
		harness.transport.requests_to("answer")[0].body.as_deref(),
		Some(r#"{"userAnswer":12}"#)
	);

	let err = round.submit(12).await.expect_err("Second answer must be rejected locally.");

	assert!(matches!(err, Error::Round(RoundError::AlreadyAnswered { .. })));
}

#[tokio::test]
async fn round_rejects_submissions_without_a_question() {
	let harness = fake_harness(Some(fresh_jwt().as_str()));
	let mut round = QuizRound::new(&harness.client, Difficulty::Normal);

	let err = round.submit(1).await.expect_err("No question was fetched.");

	assert!(matches!(err, Error::Round(RoundError::NoActiveQuestion)));
	assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn round_rejects_late_answers() {
	let harness = fake_harness(Some(fresh_jwt().as_str()));

	harness.transport.respond("question", 200, QUESTION_BODY);

	let mut round =
		QuizRound::new(&harness.client, Difficulty::Easy).with_time_limit(Duration::ZERO);

	round.next_question().await.expect("Question should load.");

	assert!(round.is_time_up_at(OffsetDateTime::now_utc()));
	assert_eq!(round.remaining_at(OffsetDateTime::now_utc()), Duration::ZERO);

	let err = round.submit(12).await.expect_err("Time limit already elapsed.");

	assert!(matches!(err, Error::Round(RoundError::TimeUp { .. })));
	assert_eq!(harness.transport.calls_to("answer"), 0);
}

#[tokio::test]
async fn next_question_restarts_the_countdown() {
	let harness = fake_harness(Some(fresh_jwt().as_str()));

	harness
		.transport
		.respond("question", 200, QUESTION_BODY)
		.respond("question", 200, r#"{"operand1":9,"operand2":3,"operator":"/","id":"q-9-3"}"#);

	let mut round = QuizRound::new(&harness.client, Difficulty::Easy);

	assert_eq!(round.remaining_at(OffsetDateTime::now_utc()), Duration::ZERO);

	round.next_question().await.expect("First question should load.");

	let later = OffsetDateTime::now_utc() + Duration::seconds(10);

	assert!(round.remaining_at(later) <= Duration::seconds(20));

	let second = round.next_question().await.expect("Second question should load.");

	assert_eq!(second.to_string(), "9 / 3 = ?");
	assert!(round.remaining_at(OffsetDateTime::now_utc()) > Duration::seconds(25));
	assert_eq!(
		harness.transport.requests_to("question")[0].query.as_deref(),
		Some("difficulty=easy")
	);
}

#[tokio::test]
async fn finish_resets_the_rounds_tier() {
	let harness = fake_harness(Some(fresh_jwt().as_str()));

	harness.transport.respond(
		"reset-score",
		200,
		r#"{"currentScore":0,"highScores":{"hard":4},"isNewRecord":false}"#,
	);

	let round = QuizRound::new(&harness.client, Difficulty::Hard);
	let state = round.finish().await.expect("Reset should succeed.");

	assert_eq!(state.high_score(Difficulty::Hard), 4);
	assert_eq!(
		harness.transport.requests_to("reset-score")[0].body.as_deref(),
		Some(r#"{"difficulty":"hard"}"#)
	);
}
