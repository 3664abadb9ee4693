//! Generation Spinner
//!
//! Animates on the current terminal line while a generation request is in
//! flight. Respects `TERM=dumb`, unset `TERM`, `NO_COLOR` and non-terminal
//! stdout; in those cases nothing is drawn.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::style::{is_ascii_mode, Glyphs};

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const ASCII_FRAMES: &[&str] = &["|", "/", "-", "\\"];
const TICK: Duration = Duration::from_millis(80);

/// Check if the terminal supports ANSI escape sequences.
pub fn supports_ansi() -> bool {
    if !io::stdout().is_terminal() {
        return false;
    }
    match std::env::var("TERM") {
        Ok(term) => !term.is_empty() && term != "dumb",
        Err(_) => false,
    }
}

/// Check if color output is allowed (see <https://no-color.org/>).
pub fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    supports_ansi()
}

pub struct Spinner {
    stop_signal: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
    start_time: Instant,
    drawing: bool,
}

impl Spinner {
    /// Start a spinner with the given message. Must be called inside a tokio
    /// runtime when the terminal supports drawing.
    pub fn start(message: &str) -> Self {
        if !supports_ansi() {
            return Self::inert();
        }

        let stop_signal = Arc::new(AtomicBool::new(false));
        let message = message.to_string();
        let stop = stop_signal.clone();
        let start = Instant::now();
        let frames = if is_ascii_mode() { ASCII_FRAMES } else { FRAMES };

        let handle = tokio::spawn(async move {
            let mut tick: usize = 0;
            while !stop.load(Ordering::Relaxed) {
                let frame = frames[tick % frames.len()];
                print!(
                    "\r\x1b[2K  {} {} ({:.1}s)",
                    frame,
                    message,
                    start.elapsed().as_secs_f64()
                );
                io::stdout().flush().ok();
                tick += 1;
                tokio::time::sleep(TICK).await;
            }
        });

        Self {
            stop_signal,
            handle: Some(handle),
            start_time: start,
            drawing: true,
        }
    }

    fn inert() -> Self {
        Self {
            stop_signal: Arc::new(AtomicBool::new(true)),
            handle: None,
            start_time: Instant::now(),
            drawing: false,
        }
    }

    pub fn stop_success(self, message: &str) {
        let icon = if supports_color() {
            format!("\x1b[32m{}\x1b[0m", Glyphs::check())
        } else {
            Glyphs::check().to_string()
        };
        self.stop_with_icon(&icon, message);
    }

    pub fn stop_error(self, message: &str) {
        let icon = if supports_color() {
            format!("\x1b[31m{}\x1b[0m", Glyphs::cross())
        } else {
            Glyphs::cross().to_string()
        };
        self.stop_with_icon(&icon, message);
    }

    fn stop_with_icon(mut self, icon: &str, message: &str) {
        let drawing = self.drawing;
        self.halt();
        if drawing {
            println!(
                "  {} {} ({:.1}s)",
                icon,
                message,
                self.start_time.elapsed().as_secs_f64()
            );
            io::stdout().flush().ok();
        }
    }

    fn halt(&mut self) {
        self.stop_signal.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        if self.drawing {
            print!("\r\x1b[2K");
            io::stdout().flush().ok();
            self.drawing = false;
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.halt();
    }
}
