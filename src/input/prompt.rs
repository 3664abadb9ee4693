//! REPL prompt showing the current topic and mode.

use nu_ansi_term::{Color, Style};
use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};
use std::borrow::Cow;

const MAX_TOPIC_CHARS: usize = 24;

pub struct QuizPrompt {
    topic: String,
    practice_mode: bool,
    color: bool,
}

impl QuizPrompt {
    pub fn new() -> Self {
        Self {
            topic: String::new(),
            practice_mode: true,
            color: true,
        }
    }

    pub fn with_context(topic: &str, practice_mode: bool, color: bool) -> Self {
        Self {
            topic: topic.to_string(),
            practice_mode,
            color,
        }
    }

    fn paint(&self, style: Style, text: String) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text
        }
    }

    fn short_topic(&self) -> String {
        if self.topic.chars().count() > MAX_TOPIC_CHARS {
            let head: String = self.topic.chars().take(MAX_TOPIC_CHARS - 3).collect();
            format!("{}...", head)
        } else {
            self.topic.clone()
        }
    }
}

impl Default for QuizPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(mismatched_lifetime_syntaxes)]
impl Prompt for QuizPrompt {
    fn render_prompt_left(&self) -> Cow<str> {
        let name = self.paint(Style::new().fg(Color::Rgb(212, 163, 115)).bold(), "quiz".into());
        if self.topic.is_empty() {
            Cow::Owned(name)
        } else {
            Cow::Owned(format!("{} ({})", name, self.short_topic()))
        }
    }

    fn render_prompt_right(&self) -> Cow<str> {
        let mode = if self.practice_mode { "practice" } else { "study" };
        Cow::Owned(self.paint(
            Style::new().fg(Color::Rgb(128, 128, 128)).dimmed(),
            format!("[{}]", mode),
        ))
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<str> {
        match edit_mode {
            PromptEditMode::Custom(s) => Cow::Owned(format!(" {} ", s)),
            _ => Cow::Borrowed(" > "),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        Cow::Borrowed("  : ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "search",
            PromptHistorySearchStatus::Failing => "failing search",
        };
        Cow::Owned(format!("({}) [{}]: ", prefix, history_search.term))
    }
}
