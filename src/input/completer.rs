//! Tab completion for REPL commands and difficulty levels.

use reedline::{Completer, Span, Suggestion};

use super::command_registry::COMMANDS;

const DIFFICULTIES: [&str; 3] = ["easy", "medium", "hard"];

#[derive(Debug, Default)]
pub struct QuizCompleter;

impl QuizCompleter {
    pub fn new() -> Self {
        Self
    }

    fn complete_commands(&self, prefix: &str, pos: usize) -> Vec<Suggestion> {
        COMMANDS
            .iter()
            .filter(|c| c.name.starts_with(prefix))
            .map(|c| Suggestion {
                value: c.name.to_string(),
                description: Some(c.description.to_string()),
                span: Span::new(0, pos),
                append_whitespace: !c.usage.is_empty(),
                ..Suggestion::default()
            })
            .collect()
    }

    fn complete_difficulty(&self, prefix: &str, start: usize, pos: usize) -> Vec<Suggestion> {
        DIFFICULTIES
            .iter()
            .filter(|d| d.starts_with(&prefix.to_ascii_lowercase()))
            .map(|d| Suggestion {
                value: d.to_string(),
                span: Span::new(start, pos),
                ..Suggestion::default()
            })
            .collect()
    }
}

impl Completer for QuizCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let pos = pos.min(line.len());
        let before_cursor = &line[..pos];

        match before_cursor.split_once(' ') {
            None => self.complete_commands(before_cursor, pos),
            Some(("difficulty", arg)) => {
                let arg = arg.trim_start();
                self.complete_difficulty(arg, pos - arg.len(), pos)
            }
            Some(_) => Vec::new(),
        }
    }
}
