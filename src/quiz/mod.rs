//! Quiz domain: question records, response extraction, and quiz state.

pub mod controller;
pub mod extract;
pub mod question;
pub mod request;

pub use controller::{QuizController, QuizState, RevealProgress, RevealToken, Score};
pub use extract::extract;
pub use question::{Question, QuizOption, RecordRejection};
pub use request::{Difficulty, GenerationRequest, MAX_QUESTION_COUNT};
