//! Form state owned by the presentation layer.
//!
//! The topic/count/difficulty inputs live here instead of in the quiz
//! controller; a request is only built from them on submission.

use crate::config::QuizSettings;
use crate::errors::Result;
use crate::quiz::{Difficulty, GenerationRequest, MAX_QUESTION_COUNT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionForm {
    pub topic: String,
    pub count: i64,
    pub difficulty: Difficulty,
}

impl Default for SessionForm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            count: 5,
            difficulty: Difficulty::Medium,
        }
    }
}

impl SessionForm {
    pub fn from_settings(settings: &QuizSettings) -> Self {
        Self {
            count: settings.default_count,
            difficulty: settings.default_difficulty,
            ..Self::default()
        }
    }

    pub fn set_topic(&mut self, topic: &str) {
        self.topic = topic.trim().to_string();
    }

    /// Store a typed count. Non-numeric input falls back to 1; the value is
    /// kept even when out of range so the error stays visible until fixed.
    pub fn set_count(&mut self, input: &str) -> Option<String> {
        self.count = input.trim().parse::<i64>().unwrap_or(1);
        if self.count > MAX_QUESTION_COUNT {
            Some("Cannot generate more than 100 questions.".to_string())
        } else {
            None
        }
    }

    pub fn set_difficulty(&mut self, input: &str) -> Result<()> {
        self.difficulty = input.parse()?;
        Ok(())
    }

    /// Whether the submit action should be offered at all.
    pub fn can_submit(&self) -> bool {
        !self.topic.trim().is_empty() && (1..=MAX_QUESTION_COUNT).contains(&self.count)
    }

    pub fn request(&self) -> Result<GenerationRequest> {
        GenerationRequest::new(&self.topic, self.count, self.difficulty)
    }
}
