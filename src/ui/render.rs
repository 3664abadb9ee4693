//! Text rendering of quiz state for the terminal.
//!
//! Functions here return strings so the REPL and the headless command can
//! print them, and tests can inspect them with colors disabled.

use colored::Colorize;

use super::style::{Glyphs, QuizStyle};
use crate::quiz::{Question, QuizState, Score};
use crate::session::SessionForm;

/// How an option line is decorated on a question card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Plain,
    Correct,
    WrongPick,
}

/// Decide the mark for one option.
///
/// The correct option is revealed when practice mode is off or once the
/// question has been answered. A wrong pick is only ever marked in practice
/// mode, since answers are not recorded otherwise.
pub fn option_mark(
    question: &Question,
    key: &str,
    picked: Option<&str>,
    practice_mode: bool,
) -> OptionMark {
    let revealed = !practice_mode || picked.is_some();
    if revealed && question.is_correct(key) {
        return OptionMark::Correct;
    }
    if practice_mode && picked == Some(key) {
        return OptionMark::WrongPick;
    }
    OptionMark::Plain
}

pub fn question_card(
    index: usize,
    question: &Question,
    picked: Option<&str>,
    practice_mode: bool,
) -> String {
    let mut out = format!(
        "{} {}\n",
        format!("Q{}:", index + 1).title(),
        question.prompt.as_str().bold()
    );

    for option in &question.options {
        let label = format!("{})", option.key);
        let line = match option_mark(question, &option.key, picked, practice_mode) {
            OptionMark::Correct => format!(
                "  {} {} {}",
                Glyphs::check().correct(),
                label.correct(),
                option.text.as_str().correct()
            ),
            OptionMark::WrongPick => format!(
                "  {} {} {}",
                Glyphs::cross().incorrect(),
                label.incorrect(),
                option.text.as_str().incorrect()
            ),
            OptionMark::Plain => format!("    {} {}", label.option_key(), option.text),
        };
        out.push_str(&line);
        out.push('\n');
    }

    if practice_mode {
        if let Some(key) = picked {
            let verdict = if question.is_correct(key) {
                "Correct".correct()
            } else {
                "Incorrect".incorrect()
            };
            out.push_str(&format!("  {} {} ({})\n", "Your Answer:".muted(), key, verdict));
        }
    }
    out
}

pub fn score_line(score: Score) -> String {
    format!("{} {}", "Score:".title(), score)
}

pub fn error_line(message: &str) -> String {
    format!("{} {}", Glyphs::cross().incorrect(), message.incorrect())
}

pub fn notice_line(message: &str) -> String {
    format!("{} {}", Glyphs::warning().notice(), message.notice())
}

/// The form fields on one line, with a hint when the form can be submitted.
pub fn form_line(form: &SessionForm) -> String {
    let topic = if form.topic.is_empty() {
        "(none)"
    } else {
        form.topic.as_str()
    };
    let line = format!(
        "Topic: {}  Count: {}  Difficulty: {}",
        topic, form.count, form.difficulty
    );
    if form.can_submit() {
        format!("{}  {}", line, "ready, type 'generate'".muted())
    } else {
        line
    }
}

/// Render every visible question plus the trailing status lines.
pub fn quiz_view(state: &QuizState) -> String {
    let mut out = String::new();
    if let Some(error) = &state.error {
        out.push_str(&error_line(error));
        out.push('\n');
    }
    if let Some(notice) = &state.notice {
        out.push_str(&notice_line(notice));
        out.push('\n');
    }
    for (i, question) in state.questions.iter().enumerate() {
        out.push_str(&question_card(
            i,
            question,
            state.answer_for(i),
            state.practice_mode,
        ));
        out.push('\n');
    }
    if state.practice_mode && !state.questions.is_empty() {
        out.push_str(&score_line(state.score()));
        out.push('\n');
    }
    out
}
