//! Quiz-domain payloads exchanged with the API and the headless round controller.

pub mod round;

pub use round::*;

// crates.io
use serde::Deserializer;
// self
use crate::_prelude::*;

const QUESTION_ID_MAX_LEN: usize = 128;

/// Question-generation profile selected by the player.
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
	/// Small operands, additive operators.
	Easy,
	#[default]
	/// Medium operands.
	Normal,
	/// Large operands, multiplicative operators.
	Hard,
}
impl Difficulty {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Easy => "easy",
			Self::Normal => "normal",
			Self::Hard => "hard",
		}
	}
}
impl Display for Difficulty {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Difficulty {
	type Err = QuizValueError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"easy" => Ok(Self::Easy),
			"normal" => Ok(Self::Normal),
			"hard" => Ok(Self::Hard),
			_ => Err(QuizValueError::UnknownDifficulty { value: s.to_owned() }),
		}
	}
}

/// Arithmetic operator of a [`Question`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
	/// `+`.
	#[serde(rename = "+")]
	Add,
	/// `-`.
	#[serde(rename = "-")]
	Subtract,
	/// `*`.
	#[serde(rename = "*")]
	Multiply,
	/// `/` (integer division).
	#[serde(rename = "/")]
	Divide,
}
impl Operator {
	/// Returns the wire symbol.
	pub const fn symbol(self) -> &'static str {
		match self {
			Self::Add => "+",
			Self::Subtract => "-",
			Self::Multiply => "*",
			Self::Divide => "/",
		}
	}
}
impl Display for Operator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.symbol())
	}
}

/// Errors raised while parsing quiz values.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum QuizValueError {
	/// Difficulty label is not one of `easy`, `normal`, `hard`.
	#[error("Unknown difficulty `{value}`.")]
	UnknownDifficulty {
		/// Rejected label.
		value: String,
	},
	/// Question identifier is empty.
	#[error("Question identifier cannot be empty.")]
	EmptyQuestionId,
	/// Question identifier exceeds the allowed length.
	#[error("Question identifier exceeds {max} characters.")]
	QuestionIdTooLong {
		/// Maximum permitted length.
		max: usize,
	},
}

/// Server-issued identifier correlating an answer with its question.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);
impl QuestionId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, QuizValueError> {
		let view = value.as_ref();

		validate_question_id(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl AsRef<str> for QuestionId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<QuestionId> for String {
	fn from(value: QuestionId) -> Self {
		value.0
	}
}
impl TryFrom<String> for QuestionId {
	type Error = QuizValueError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_question_id(&value)?;

		Ok(Self(value))
	}
}
impl Debug for QuestionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "QuestionId({})", self.0)
	}
}
impl Display for QuestionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate_question_id(view: &str) -> Result<(), QuizValueError> {
	if view.trim().is_empty() {
		return Err(QuizValueError::EmptyQuestionId);
	}
	if view.len() > QUESTION_ID_MAX_LEN {
		return Err(QuizValueError::QuestionIdTooLong { max: QUESTION_ID_MAX_LEN });
	}

	Ok(())
}

/// Arithmetic question issued by the server. Immutable once received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
	/// Left operand.
	pub operand1: i64,
	/// Right operand.
	pub operand2: i64,
	/// Operator applied to the operands.
	pub operator: Operator,
	/// Identifier echoed back with the answer. Servers that grade against the session's pending
	/// question omit it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<QuestionId>,
	/// Tier the question was generated for, when the server reports it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub difficulty: Option<Difficulty>,
}
impl Question {
	/// Builds the submission for `user_answer`.
	pub fn answer(&self, user_answer: i64) -> AnswerSubmission {
		AnswerSubmission { user_answer, question_id: self.id.clone() }
	}
}
impl Display for Question {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} {} {} = ?", self.operand1, self.operator, self.operand2)
	}
}

/// User answer sent once per question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
	/// Integer entered by the user.
	pub user_answer: i64,
	/// Question being answered, when the server issued an identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub question_id: Option<QuestionId>,
}

/// Grading verdict for a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
	/// Whether the submission was correct.
	pub correct: bool,
	/// Expected answer; only meaningful for display when `correct` is false.
	pub correct_answer: i64,
}

/// Running score plus per-tier best scores.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
	/// Score of the round in progress.
	pub current_score: i64,
	/// Best score per tier label, as reported by the server.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub high_scores: BTreeMap<String, i64>,
	/// Whether the just-reported score set a new record.
	#[serde(default)]
	pub is_new_record: bool,
}
impl ScoreState {
	/// Returns the best score for `difficulty`, 0 if the server has not reported one.
	pub fn high_score(&self, difficulty: Difficulty) -> i64 {
		self.high_scores.get(difficulty.as_str()).copied().unwrap_or(0)
	}

	/// Returns the best score across every tier, 0 if none was reported.
	pub fn best_overall(&self) -> i64 {
		self.high_scores.values().copied().max().unwrap_or(0)
	}
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<BTreeMap<String, i64>>::deserialize(deserializer)?.unwrap_or_default())
}
