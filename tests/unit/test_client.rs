//! Unit tests for the generation client against the mock backend
//!
//! Tests cover:
//! - End-to-end generate -> ingest -> score flow
//! - Backoff timing on the paused clock
//! - Which failures are retried and which are not
//! - API key redaction in recorded request URLs
//! - The request body actually sent to the backend

use quizforge::api::mock::{ok_reply, status_reply, MockBackend};
use quizforge::api::{GenerationClient, HttpReply};
use quizforge::config::Config;
use quizforge::errors::{ParseError, QuizError};
use quizforge::quiz::{Difficulty, GenerationRequest, QuizController};
use quizforge::redact::redact_url;
use std::sync::Arc;
use std::time::Duration;

const TWO_GOOD_ONE_BAD: &str = r#"Here you go:
```json
[
  {"question": "Largest planet?", "options": {"A": "Mars", "B": "Jupiter"}, "answer": "B"},
  {"question": "Closest star?", "options": {"A": "Sun", "B": "Sirius"}, "answer": "C"},
  {"question": "Red planet?", "options": {"A": "Mars", "B": "Venus"}, "answer": "A"}
]
```"#;

fn client_with(replies: Vec<HttpReply>) -> (GenerationClient, Arc<MockBackend>) {
    let config = Config {
        api_key: Some("AIzaSyTestKey1234".to_string()),
        ..Config::default()
    };
    let backend = Arc::new(MockBackend::with_replies(replies));
    let client = GenerationClient::with_backend(&config, backend.clone());
    (client, backend)
}

fn request(count: i64) -> GenerationRequest {
    GenerationRequest::new("Solar system", count, Difficulty::Easy).unwrap()
}

// ============================================================================
// Full Flow Tests
// ============================================================================

mod flow_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_generate_ingest_and_score() {
        let (client, _) = client_with(vec![ok_reply(TWO_GOOD_ONE_BAD)]);
        let mut controller = QuizController::new(Duration::from_millis(100));

        controller.begin_generation();
        assert!(controller.snapshot().loading);

        let records = client.generate(&request(3)).await.unwrap();
        assert_eq!(records.len(), 3);

        let progress = controller.ingest(&records).finished().await;
        assert_eq!(progress.revealed, 2);
        assert_eq!(progress.total, 2);

        let state = controller.snapshot();
        assert!(!state.loading);
        assert_eq!(state.questions[0].prompt, "Largest planet?");
        assert_eq!(state.questions[1].prompt, "Red planet?");

        assert!(controller.record_answer(0, "B"));
        assert!(controller.record_answer(1, "B"));
        let score = controller.score();
        assert_eq!((score.correct, score.total), (1, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_leaves_error_and_no_questions() {
        let (client, _) = client_with(vec![status_reply(
            403,
            "Forbidden",
            r#"{"error":{"message":"Permission denied"}}"#,
        )]);
        let mut controller = QuizController::default();
        controller.begin_generation();

        let err = client.generate(&request(3)).await.unwrap_err();
        controller.fail(err.user_message());

        let state = controller.snapshot();
        assert_eq!(state.error.as_deref(), Some("API Error: Permission denied"));
        assert!(!state.loading);
        assert!(state.questions.is_empty());
    }
}

// ============================================================================
// Retry Tests
// ============================================================================

mod retry_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_429_then_success_waits_one_second() {
        let (client, backend) = client_with(vec![
            status_reply(429, "Too Many Requests", ""),
            ok_reply(TWO_GOOD_ONE_BAD),
        ]);
        client.generate(&request(3)).await.unwrap();

        let times = backend.call_times();
        assert_eq!(times.len(), 2);
        assert_eq!(times[1] - times[0], Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_server_errors_exhaust_budget() {
        let (client, backend) = client_with(vec![
            status_reply(500, "Internal Server Error", ""),
            status_reply(500, "Internal Server Error", ""),
            status_reply(500, "Internal Server Error", ""),
        ]);
        let err = client.generate(&request(3)).await.unwrap_err();
        assert!(matches!(
            err,
            QuizError::ExhaustedRetries {
                attempts: 3,
                last_status: 500
            }
        ));
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_bad_request_is_not_retried() {
        let (client, backend) = client_with(vec![
            status_reply(400, "Bad Request", "{}"),
            ok_reply(TWO_GOOD_ONE_BAD),
        ]);
        let err = client.generate(&request(3)).await.unwrap_err();
        assert!(matches!(err, QuizError::PermanentServer { status: 400, .. }));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_network_error_is_not_retried() {
        // An empty queue makes the mock fail like a transport error.
        let (client, backend) = client_with(vec![]);
        let err = client.generate(&request(3)).await.unwrap_err();
        assert!(matches!(err, QuizError::Network(_)));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_array_is_a_parse_error() {
        let (client, backend) = client_with(vec![ok_reply("[{\"question\": ]")]);
        let err = client.generate(&request(3)).await.unwrap_err();
        assert!(matches!(err, QuizError::Parse(ParseError::MalformedJson(_))));
        assert_eq!(backend.call_count(), 1);
    }
}

// ============================================================================
// Redaction Tests
// ============================================================================

mod redaction_tests {
    use super::*;

    #[tokio::test]
    async fn test_request_url_key_is_redactable() {
        let (client, backend) = client_with(vec![ok_reply("[]")]);
        let records = client.generate(&request(1)).await.unwrap();
        assert!(records.is_empty());

        let url = &backend.urls()[0];
        assert!(url.contains("AIzaSyTestKey1234"));
        let redacted = redact_url(url);
        assert!(!redacted.contains("AIzaSyTestKey1234"));
        assert!(redacted.contains(":generateContent?key=[REDACTED]"));
    }
}

// ============================================================================
// Payload Tests
// ============================================================================

mod payload_tests {
    use super::*;

    #[tokio::test]
    async fn test_sent_body_carries_prompt_and_json_mime_type() {
        let (client, backend) = client_with(vec![ok_reply("[]")]);
        client.generate(&request(7)).await.unwrap();

        let bodies = backend.bodies();
        assert_eq!(bodies.len(), 1);
        let sent = serde_json::to_value(&bodies[0]).unwrap();
        assert_eq!(sent["generationConfig"]["responseMimeType"], "application/json");

        let text = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("exactly 7 multiple-choice questions"));
        assert!(text.contains("\"Solar system\""));
        assert!(text.contains("\"Easy\""));
    }
}
