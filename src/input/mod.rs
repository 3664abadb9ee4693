//! Line editing for the practice REPL.
//!
//! Built on reedline: persistent history, history hints, and a completion
//! menu over the command registry.

pub mod command_registry;
mod completer;
mod prompt;

pub use command_registry::{parse, ReplCommand};
pub use completer::QuizCompleter;
pub use prompt::QuizPrompt;

use anyhow::Result;
use reedline::{
    default_emacs_keybindings, ColumnarMenu, DefaultHinter, EditCommand, Emacs,
    FileBackedHistory, KeyCode, KeyModifiers, Keybindings, MenuBuilder, Reedline, ReedlineEvent,
    ReedlineMenu, Signal,
};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct InputConfig {
    pub history_path: Option<PathBuf>,
    pub max_history: usize,
    pub show_hints: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            history_path: dirs_history_path(),
            max_history: 1000,
            show_hints: true,
        }
    }
}

fn dirs_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("quizforge").join("history.txt"))
}

pub struct QuizEditor {
    editor: Reedline,
    prompt: QuizPrompt,
}

impl QuizEditor {
    pub fn new(config: InputConfig) -> Result<Self> {
        let history = if let Some(path) = &config.history_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Box::new(FileBackedHistory::with_file(
                config.max_history,
                path.clone(),
            )?)
        } else {
            Box::new(FileBackedHistory::new(config.max_history)?)
        };

        let completion_menu = Box::new(
            ColumnarMenu::default()
                .with_name("completion_menu")
                .with_columns(1)
                .with_column_padding(2)
                .with_marker(" > "),
        );

        let mut editor = Reedline::create()
            .with_history(history)
            .with_completer(Box::new(QuizCompleter::new()))
            .with_quick_completions(true)
            .with_partial_completions(true)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(Box::new(Emacs::new(Self::build_keybindings())))
            .with_history_exclusion_prefix(Some(" ".into()));

        if config.show_hints {
            editor = editor.with_hinter(Box::new(DefaultHinter::default()));
        }

        Ok(Self {
            editor,
            prompt: QuizPrompt::new(),
        })
    }

    fn build_keybindings() -> Keybindings {
        let mut keybindings = default_emacs_keybindings();

        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::HistoryHintComplete,
                ReedlineEvent::Edit(vec![EditCommand::Complete]),
                ReedlineEvent::Menu("completion_menu".to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        keybindings.add_binding(KeyModifiers::NONE, KeyCode::Esc, ReedlineEvent::Esc);

        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Right,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::HistoryHintComplete,
                ReedlineEvent::Edit(vec![EditCommand::MoveRight { select: false }]),
            ]),
        );

        keybindings
    }

    /// Read one line. Blocks the calling thread until the user submits.
    pub fn read_line(&mut self) -> Result<ReadlineResult> {
        match self.editor.read_line(&self.prompt) {
            Ok(Signal::Success(line)) => Ok(ReadlineResult::Line(line)),
            Ok(Signal::CtrlC) => Ok(ReadlineResult::Interrupt),
            Ok(Signal::CtrlD) => Ok(ReadlineResult::Eof),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set_prompt_context(&mut self, topic: &str, practice_mode: bool, color: bool) {
        self.prompt = QuizPrompt::with_context(topic, practice_mode, color);
    }
}

#[derive(Debug)]
pub enum ReadlineResult {
    Line(String),
    /// Ctrl+C
    Interrupt,
    /// Ctrl+D
    Eof,
}
