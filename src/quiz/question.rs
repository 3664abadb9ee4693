//! Typed question records and the validity check applied to raw model output.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A validated multiple-choice question.
///
/// Options keep the order the model produced them in (serde_json is built
/// with `preserve_order`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<QuizOption>,
    #[serde(rename = "answer")]
    pub correct_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub key: String,
    pub text: String,
}

/// Why a raw record was dropped before entering quiz state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    NotAnObject,
    MissingPrompt,
    MissingOptions,
    InvalidOption { key: String },
    MissingAnswer,
    AnswerNotAnOption { answer: String },
}

impl fmt::Display for RecordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRejection::NotAnObject => write!(f, "record is not an object"),
            RecordRejection::MissingPrompt => write!(f, "missing or empty question text"),
            RecordRejection::MissingOptions => write!(f, "missing or empty options"),
            RecordRejection::InvalidOption { key } => {
                write!(f, "option '{}' has no usable text", key)
            }
            RecordRejection::MissingAnswer => write!(f, "missing answer key"),
            RecordRejection::AnswerNotAnOption { answer } => {
                write!(f, "answer '{}' is not one of the options", answer)
            }
        }
    }
}

impl Question {
    /// Convert a generic JSON value into a question, rejecting mismatched
    /// shapes instead of failing the whole batch.
    pub fn from_value(value: &Value) -> Result<Self, RecordRejection> {
        let obj = value.as_object().ok_or(RecordRejection::NotAnObject)?;

        let prompt = obj
            .get("question")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(RecordRejection::MissingPrompt)?;

        let raw_options = obj
            .get("options")
            .and_then(Value::as_object)
            .filter(|o| !o.is_empty())
            .ok_or(RecordRejection::MissingOptions)?;

        let mut options = Vec::with_capacity(raw_options.len());
        for (key, text) in raw_options {
            let text = match text {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return Err(RecordRejection::InvalidOption { key: key.clone() }),
            };
            options.push(QuizOption {
                key: key.clone(),
                text,
            });
        }

        let answer = obj
            .get("answer")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(RecordRejection::MissingAnswer)?;

        if !options.iter().any(|o| o.key == answer) {
            return Err(RecordRejection::AnswerNotAnOption {
                answer: answer.to_string(),
            });
        }

        Ok(Self {
            prompt: prompt.to_string(),
            options,
            correct_key: answer.to_string(),
        })
    }

    pub fn is_valid(&self) -> bool {
        !self.prompt.is_empty() && !self.options.is_empty() && self.has_option(&self.correct_key)
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.options.iter().any(|o| o.key == key)
    }

    pub fn is_correct(&self, key: &str) -> bool {
        self.correct_key == key
    }
}

/// Split raw records into valid questions, logging every record that is
/// dropped. Output order follows input order.
pub fn validate_records(raw: &[Value]) -> Vec<Question> {
    raw.iter()
        .enumerate()
        .filter_map(|(i, value)| match Question::from_value(value) {
            Ok(q) => Some(q),
            Err(reason) => {
                tracing::warn!(index = i, %reason, "Skipped invalid MCQ");
                None
            }
        })
        .collect()
}
