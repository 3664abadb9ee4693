//! quizforge - multiple-choice quiz generation and practice
//!
//! Asks a hosted generative-language model for questions on a topic,
//! validates whatever comes back, and reveals the surviving questions one
//! at a time.
//!
//! - **Client**: request building, bounded retry with exponential backoff
//! - **Quiz**: response extraction, record validation, progressive reveal,
//!   practice-mode answers and scoring
//! - **Export**: paginated A4 PDF of the current quiz
//!
//! # Quick Start
//!
//! ```ignore
//! use quizforge::{api::GenerationClient, config::Config, quiz::*};
//!
//! let config = Config::load(None)?;
//! let client = GenerationClient::new(&config)?;
//! let request = GenerationRequest::new("Photosynthesis", 5, Difficulty::Easy)?;
//!
//! let mut controller = QuizController::default();
//! controller.begin_generation();
//! let records = client.generate(&request).await?;
//! controller.ingest(&records).finished().await;
//! ```

// ─── Core ──────────────────────────────────────────────────────────
pub mod api;
pub mod config;
pub mod errors;
pub mod quiz;
pub mod redact;
pub mod telemetry;

// ─── Presentation ──────────────────────────────────────────────────
pub mod cli;
pub mod export;
pub mod input;
pub mod session;
pub mod ui;

pub use errors::{QuizError, Result};
