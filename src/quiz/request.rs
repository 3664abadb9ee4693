use serde::{Deserialize, Serialize};

use crate::errors::{QuizError, Result};

pub const MAX_QUESTION_COUNT: i64 = 100;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(QuizError::InvalidRequest(format!(
                "Unknown difficulty '{}'. Use Easy, Medium or Hard.",
                other
            ))),
        }
    }
}

/// A checked generation request. Constructing one is the gate that keeps
/// bad input from ever reaching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    topic: String,
    count: u32,
    difficulty: Difficulty,
}

impl GenerationRequest {
    pub fn new(topic: &str, count: i64, difficulty: Difficulty) -> Result<Self> {
        if count > MAX_QUESTION_COUNT {
            return Err(QuizError::InvalidRequest(
                "You can generate a maximum of 100 questions at a time.".to_string(),
            ));
        }
        if count < 1 {
            return Err(QuizError::InvalidRequest(
                "Question count must be at least 1.".to_string(),
            ));
        }
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(QuizError::InvalidRequest(
                "Please enter a topic.".to_string(),
            ));
        }
        Ok(Self {
            topic: topic.to_string(),
            count: count as u32,
            difficulty,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}
