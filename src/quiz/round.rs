//! Headless quiz-round controller.

// self
use crate::{
	_prelude::*,
	client::ApiClient,
	http::ApiTransport,
	quiz::{AnswerResult, Difficulty, Question, ScoreState},
};

/// Time allowed per question unless overridden.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::seconds(30);

/// Local rejections raised by [`QuizRound`] before any request is sent.
#[derive(Debug, ThisError)]
pub enum RoundError {
	/// No question has been fetched yet.
	#[error("No question is active.")]
	NoActiveQuestion,
	/// The active question already received an answer.
	#[error("Question `{question}` was already answered.")]
	AlreadyAnswered {
		/// Rendered prompt of the answered question.
		question: String,
	},
	/// The time limit of the active question elapsed.
	#[error("Time is up for question `{question}`.")]
	TimeUp {
		/// Rendered prompt of the expired question.
		question: String,
	},
}

/// Grading verdict paired with the score reloaded right after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundFeedback {
	/// Server verdict for the submission.
	pub result: AnswerResult,
	/// Score state fetched after grading.
	pub score: ScoreState,
}

#[derive(Clone, Debug)]
struct ActiveQuestion {
	question: Question,
	issued_at: OffsetDateTime,
	answered: bool,
}

/// One round of questions at a fixed difficulty.
///
/// Each question accepts exactly one answer within its time limit. The answer slot is consumed
/// before the submission is sent, so a failed request still counts as the question's answer.
pub struct QuizRound<'a, T>
where
	T: ?Sized + ApiTransport,
{
	client: &'a ApiClient<T>,
	difficulty: Difficulty,
	time_limit: Duration,
	active: Option<ActiveQuestion>,
	score: Option<ScoreState>,
}
impl<'a, T> QuizRound<'a, T>
where
	T: ?Sized + ApiTransport,
{
	/// Starts a round on `client` at `difficulty`.
	pub fn new(client: &'a ApiClient<T>, difficulty: Difficulty) -> Self {
		Self { client, difficulty, time_limit: DEFAULT_TIME_LIMIT, active: None, score: None }
	}

	/// Overrides the per-question time limit. Negative limits clamp to zero.
	pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
		self.time_limit = time_limit.max(Duration::ZERO);

		self
	}

	/// Returns the round's difficulty.
	pub fn difficulty(&self) -> Difficulty {
		self.difficulty
	}

	/// Returns the per-question time limit.
	pub fn time_limit(&self) -> Duration {
		self.time_limit
	}

	/// Returns the active question, if any.
	pub fn question(&self) -> Option<&Question> {
		self.active.as_ref().map(|active| &active.question)
	}

	/// Returns the last score state observed by the round.
	pub fn score(&self) -> Option<&ScoreState> {
		self.score.as_ref()
	}

	/// Fetches the next question and restarts the countdown.
	pub async fn next_question(&mut self) -> Result<&Question> {
		let question = self.client.get_question(self.difficulty).await?;
		let active = self.active.insert(ActiveQuestion {
			question,
			issued_at: OffsetDateTime::now_utc(),
			answered: false,
		});

		Ok(&active.question)
	}

	/// Submits `answer` for the active question and reloads the score.
	pub async fn submit(&mut self, answer: i64) -> Result<RoundFeedback> {
		let now = OffsetDateTime::now_utc();
		let time_limit = self.time_limit;
		let active = self.active.as_mut().ok_or(RoundError::NoActiveQuestion)?;

		if active.answered {
			return Err(RoundError::AlreadyAnswered { question: active.question.to_string() }.into());
		}
		if remaining(active.issued_at, time_limit, now) <= Duration::ZERO {
			return Err(RoundError::TimeUp { question: active.question.to_string() }.into());
		}

		active.answered = true;

		let submission = active.question.answer(answer);
		let result = self.client.submit_answer(&submission).await?;
		let score = self.client.get_score().await?;

		self.score = Some(score.clone());

		Ok(RoundFeedback { result, score })
	}

	/// Returns the time left on the active question at `now`, zero when none is active.
	pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
		self.active
			.as_ref()
			.map(|active| remaining(active.issued_at, self.time_limit, now))
			.unwrap_or(Duration::ZERO)
	}

	/// Returns `true` once the active question's time limit elapsed (or none is active).
	pub fn is_time_up_at(&self, now: OffsetDateTime) -> bool {
		self.remaining_at(now) <= Duration::ZERO
	}

	/// Ends the round by resetting the score for its tier.
	pub async fn finish(self) -> Result<ScoreState> {
		self.client.reset_score(self.difficulty).await
	}
}
impl<T> Debug for QuizRound<'_, T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("QuizRound")
			.field("difficulty", &self.difficulty)
			.field("time_limit", &self.time_limit)
			.field("active", &self.active)
			.field("score", &self.score)
			.finish()
	}
}

fn remaining(issued_at: OffsetDateTime, time_limit: Duration, now: OffsetDateTime) -> Duration {
	// A deadline past the representable range never elapses.
	match issued_at.checked_add(time_limit) {
		Some(deadline) => (deadline - now).max(Duration::ZERO),
		None => Duration::MAX,
	}
}
