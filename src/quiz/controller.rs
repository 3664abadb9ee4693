//! Quiz State Controller
//!
//! Owns the current quiz: validated questions, submitted answers, the
//! practice-mode flag and the single user-facing error. Validated questions
//! are revealed one at a time on a spawned tokio task so the presentation
//! layer can show them appearing progressively.
//!
//! Each generation gets a new epoch. Starting a generation cancels the
//! running reveal through its token, aborts the task, and bumps the epoch;
//! a reveal step only appends while its epoch is still current, so a
//! superseded reveal can never leak questions into the next quiz.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::question::{validate_records, Question};

/// Default pause between two revealed questions.
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(100);

/// Shown when a response parsed but every record was invalid.
pub const NO_VALID_QUESTIONS_NOTICE: &str = "No valid questions were returned.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    pub questions: Vec<Question>,
    /// Question index -> submitted option key.
    pub answers: BTreeMap<usize, String>,
    pub practice_mode: bool,
    pub loading: bool,
    pub error: Option<String>,
    /// Informational, non-error message (e.g. nothing survived validation).
    pub notice: Option<String>,
    epoch: u64,
}

impl Default for QuizState {
    fn default() -> Self {
        Self {
            questions: Vec::new(),
            answers: BTreeMap::new(),
            practice_mode: true,
            loading: false,
            error: None,
            notice: None,
            epoch: 0,
        }
    }
}

impl QuizState {
    pub fn score(&self) -> Score {
        let correct = self
            .answers
            .iter()
            .filter(|(index, key)| {
                self.questions
                    .get(**index)
                    .is_some_and(|q| q.is_correct(key))
            })
            .count();
        Score {
            correct,
            total: self.questions.len(),
        }
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    /// Number of valid questions, never the raw record count.
    pub total: usize,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealProgress {
    pub revealed: usize,
    pub total: usize,
}

impl RevealProgress {
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total
    }
}

/// Cancellation handle for one progressive reveal.
///
/// Clones share the same cancellation flag; each clone observes progress
/// independently.
#[derive(Debug, Clone)]
pub struct RevealToken {
    cancelled: Arc<AtomicBool>,
    progress: watch::Receiver<RevealProgress>,
}

impl RevealToken {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn progress(&self) -> RevealProgress {
        *self.progress.borrow()
    }

    /// Wait for the next reveal step. Returns `None` once the reveal has
    /// finished or was cancelled.
    pub async fn next(&mut self) -> Option<RevealProgress> {
        match self.progress.changed().await {
            Ok(()) => Some(*self.progress.borrow_and_update()),
            Err(_) => None,
        }
    }

    /// Wait until the reveal finishes or is cancelled.
    pub async fn finished(mut self) -> RevealProgress {
        while self.next().await.is_some() {}
        self.progress()
    }
}

struct RevealTask {
    token: RevealToken,
    handle: JoinHandle<()>,
}

impl RevealTask {
    fn cancel(self) {
        self.token.cancel();
        self.handle.abort();
    }
}

pub struct QuizController {
    state: Arc<Mutex<QuizState>>,
    reveal_interval: Duration,
    reveal: Option<RevealTask>,
}

impl Default for QuizController {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_INTERVAL)
    }
}

impl QuizController {
    pub fn new(reveal_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(QuizState::default())),
            reveal_interval,
            reveal: None,
        }
    }

    /// Start a fresh quiz: cancel any in-flight reveal and replace the state.
    pub fn begin_generation(&mut self) {
        self.cancel_reveal();
        let mut state = self.state.lock();
        let practice_mode = state.practice_mode;
        let epoch = state.epoch + 1;
        *state = QuizState {
            practice_mode,
            loading: true,
            epoch,
            ..QuizState::default()
        };
        debug!(epoch = state.epoch, "Began generation");
    }

    /// Validate raw records and reveal the survivors one per interval.
    ///
    /// Must be called from within a tokio runtime. The returned token is
    /// the only handle on this reveal besides the controller itself.
    pub fn ingest(&mut self, raw: &[Value]) -> RevealToken {
        let questions = validate_records(raw);
        let total = questions.len();
        info!(
            received = raw.len(),
            valid = total,
            skipped = raw.len() - total,
            "Ingesting generated questions"
        );

        let epoch = {
            let mut state = self.state.lock();
            state.loading = false;
            if total == 0 {
                state.notice = Some(NO_VALID_QUESTIONS_NOTICE.to_string());
            }
            state.epoch
        };

        let (tx, rx) = watch::channel(RevealProgress { revealed: 0, total });
        let cancelled = Arc::new(AtomicBool::new(false));
        let token = RevealToken {
            cancelled: Arc::clone(&cancelled),
            progress: rx,
        };

        let state = Arc::clone(&self.state);
        let interval = self.reveal_interval;
        let handle = tokio::spawn(async move {
            for (i, question) in questions.into_iter().enumerate() {
                tokio::time::sleep(interval).await;
                if cancelled.load(Ordering::Acquire) {
                    debug!(epoch, revealed = i, "Reveal cancelled");
                    return;
                }
                {
                    let mut state = state.lock();
                    if state.epoch != epoch {
                        return;
                    }
                    state.questions.push(question);
                }
                let _ = tx.send(RevealProgress {
                    revealed: i + 1,
                    total,
                });
            }
        });

        // Only the latest reveal is tracked; an older one from the same
        // epoch keeps running and is still stopped by the epoch check.
        self.reveal = Some(RevealTask {
            token: token.clone(),
            handle,
        });
        token
    }

    /// Record an answer in practice mode. Returns whether it was stored.
    pub fn record_answer(&mut self, index: usize, key: &str) -> bool {
        let mut state = self.state.lock();
        if !state.practice_mode {
            return false;
        }
        let Some(question) = state.questions.get(index) else {
            return false;
        };
        if !question.has_option(key) {
            return false;
        }
        state.answers.insert(index, key.to_string());
        true
    }

    pub fn score(&self) -> Score {
        self.state.lock().score()
    }

    /// Flip practice mode; previously recorded answers are kept.
    pub fn toggle_practice_mode(&mut self) -> bool {
        let mut state = self.state.lock();
        state.practice_mode = !state.practice_mode;
        state.practice_mode
    }

    /// Replace any previous error with `message` and stop loading.
    pub fn fail(&mut self, message: impl Into<String>) {
        let mut state = self.state.lock();
        state.error = Some(message.into());
        state.loading = false;
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    pub fn snapshot(&self) -> QuizState {
        self.state.lock().clone()
    }

    fn cancel_reveal(&mut self) {
        if let Some(task) = self.reveal.take() {
            task.cancel();
        }
    }
}

impl Drop for QuizController {
    fn drop(&mut self) {
        self.cancel_reveal();
    }
}
