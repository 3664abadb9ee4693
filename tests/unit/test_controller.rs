//! Unit tests for the quiz controller and session form
//!
//! Tests cover:
//! - Observing reveal progress step by step
//! - Superseding a reveal with a new generation
//! - Form validation gating generation
//! - Rendering decisions driven by practice mode

use quizforge::quiz::{Difficulty, QuizController, RevealProgress};
use quizforge::session::SessionForm;
use quizforge::ui::render::{option_mark, quiz_view, OptionMark};
use serde_json::{json, Value};
use std::time::Duration;

fn records(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "question": format!("Question {}", i + 1),
                "options": {"A": "right", "B": "wrong"},
                "answer": "A"
            })
        })
        .collect()
}

// ============================================================================
// Reveal Tests
// ============================================================================

mod reveal_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_progress_steps_are_observable() {
        let mut controller = QuizController::new(Duration::from_millis(50));
        controller.begin_generation();
        let mut token = controller.ingest(&records(3));

        let mut seen = Vec::new();
        while let Some(step) = token.next().await {
            assert_eq!(controller.snapshot().questions.len(), step.revealed);
            seen.push(step.revealed);
        }
        assert_eq!(*seen.last().unwrap(), 3);
        assert_eq!(token.progress(), RevealProgress { revealed: 3, total: 3 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_is_paced_by_interval() {
        let mut controller = QuizController::new(Duration::from_millis(100));
        controller.begin_generation();
        let start = tokio::time::Instant::now();
        controller.ingest(&records(4)).finished().await;
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_reveal_token_finishes() {
        let mut controller = QuizController::default();
        controller.begin_generation();
        let old = controller.ingest(&records(10));

        tokio::time::sleep(Duration::from_millis(350)).await;
        controller.begin_generation();

        let last = old.finished().await;
        assert!(last.revealed < 10);
        assert!(controller.snapshot().questions.is_empty());
        assert!(controller.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_finishes_immediately() {
        let mut controller = QuizController::default();
        controller.begin_generation();
        let last = controller.ingest(&[]).finished().await;
        assert_eq!(last, RevealProgress { revealed: 0, total: 0 });
        assert!(last.is_complete());
        assert!(controller.snapshot().notice.is_some());
    }
}

// ============================================================================
// Session Form Tests
// ============================================================================

mod session_form_tests {
    use super::*;

    #[test]
    fn test_over_limit_count_blocks_submit() {
        let mut form = SessionForm::default();
        form.set_topic("Rivers of Europe");
        let warning = form.set_count("150");
        assert_eq!(
            warning.as_deref(),
            Some("Cannot generate more than 100 questions.")
        );
        assert!(!form.can_submit());
        let err = form.request().unwrap_err();
        assert_eq!(
            err.to_string(),
            "You can generate a maximum of 100 questions at a time."
        );
    }

    #[test]
    fn test_blank_topic_blocks_submit() {
        let mut form = SessionForm::default();
        form.set_topic("   ");
        assert!(!form.can_submit());
        assert_eq!(form.request().unwrap_err().to_string(), "Please enter a topic.");
    }

    #[test]
    fn test_valid_form_builds_request() {
        let mut form = SessionForm::default();
        form.set_topic("Baroque music");
        form.set_count("12");
        form.set_difficulty("HARD").unwrap();
        let request = form.request().unwrap();
        assert_eq!(request.topic(), "Baroque music");
        assert_eq!(request.count(), 12);
        assert_eq!(request.difficulty(), Difficulty::Hard);
    }
}

// ============================================================================
// Presentation Tests
// ============================================================================

mod presentation_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_answered_question_reveals_correct_option() {
        colored::control::set_override(false);
        let mut controller = QuizController::default();
        controller.begin_generation();
        controller.ingest(&records(2)).finished().await;
        controller.record_answer(0, "B");

        let state = controller.snapshot();
        let q0 = &state.questions[0];
        let q1 = &state.questions[1];
        assert_eq!(option_mark(q0, "A", state.answer_for(0), true), OptionMark::Correct);
        assert_eq!(option_mark(q0, "B", state.answer_for(0), true), OptionMark::WrongPick);
        assert_eq!(option_mark(q1, "A", state.answer_for(1), true), OptionMark::Plain);

        let view = quiz_view(&state);
        assert!(view.contains("Your Answer: B (Incorrect)"));
        assert!(view.contains("Score: 0 / 2"));
    }
}
