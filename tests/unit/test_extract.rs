//! Unit tests for response extraction and record validation
//!
//! Tests cover:
//! - Locating the array inside prose and code fences
//! - Error kinds for empty, bracket-less and malformed output
//! - Per-record validation without failing the batch

use quizforge::errors::ParseError;
use quizforge::quiz::question::validate_records;
use quizforge::quiz::{extract, Question, RecordRejection};
use serde_json::json;

// ============================================================================
// Extraction Tests
// ============================================================================

mod extraction_tests {
    use super::*;

    #[test]
    fn test_plain_array() {
        let records = extract(r#"[{"question":"Q","options":{"A":"1"},"answer":"A"}]"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_uppercase_fence_tag() {
        let raw = "```JSON\n[1, 2, 3]\n```";
        assert_eq!(extract(raw).unwrap().len(), 3);
    }

    #[test]
    fn test_untagged_fence() {
        let raw = "```\n[{\"a\": 1}]\n```";
        assert_eq!(extract(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_prose_around_array() {
        let raw = "Sure! Here are your questions: [{\"x\": 1}, {\"y\": 2}] Good luck!";
        assert_eq!(extract(raw).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(extract(""), Err(ParseError::EmptyResponse));
        assert_eq!(extract(" \n\t "), Err(ParseError::EmptyResponse));
    }

    #[test]
    fn test_no_brackets() {
        assert_eq!(extract("I cannot help with that."), Err(ParseError::NoArrayFound));
        assert_eq!(extract("] backwards ["), Err(ParseError::NoArrayFound));
    }

    #[test]
    fn test_malformed_between_brackets() {
        assert!(matches!(
            extract("[{\"question\": \"Q\",}]"),
            Err(ParseError::MalformedJson(_))
        ));
    }

    #[test]
    fn test_empty_array_is_ok() {
        assert!(extract("[]").unwrap().is_empty());
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_mixed_batch_keeps_valid_in_order() {
        let raw = vec![
            json!({"question": "First", "options": {"A": "a", "B": "b"}, "answer": "B"}),
            json!({"question": "", "options": {"A": "a"}, "answer": "A"}),
            json!({"question": "Third", "options": {}, "answer": "A"}),
            json!("not an object"),
            json!({"question": "Fifth", "options": {"A": "a"}, "answer": "Z"}),
            json!({"question": "Sixth", "options": {"C": "c", "A": "a"}, "answer": "C"}),
        ];
        let questions = validate_records(&raw);
        let prompts: Vec<&str> = questions.iter().map(|q| q.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["First", "Sixth"]);
    }

    #[test]
    fn test_option_order_is_preserved() {
        let value = json!({
            "question": "Order?",
            "options": {"D": "four", "B": "two", "A": "one", "C": "three"},
            "answer": "A"
        });
        let question = Question::from_value(&value).unwrap();
        let keys: Vec<&str> = question.options.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["D", "B", "A", "C"]);
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(
            Question::from_value(&json!(42)),
            Err(RecordRejection::NotAnObject)
        );
        assert_eq!(
            Question::from_value(&json!({"options": {"A": "a"}, "answer": "A"})),
            Err(RecordRejection::MissingPrompt)
        );
        assert_eq!(
            Question::from_value(&json!({"question": "Q", "answer": "A"})),
            Err(RecordRejection::MissingOptions)
        );
        assert_eq!(
            Question::from_value(&json!({"question": "Q", "options": {"A": "a"}})),
            Err(RecordRejection::MissingAnswer)
        );
        assert_eq!(
            Question::from_value(&json!({"question": "Q", "options": {"A": "a"}, "answer": "B"})),
            Err(RecordRejection::AnswerNotAnOption {
                answer: "B".to_string()
            })
        );
    }

    #[test]
    fn test_valid_question_helpers() {
        let question = Question::from_value(&json!({
            "question": "Capital of France?",
            "options": {"A": "Paris", "B": "Lyon"},
            "answer": "A"
        }))
        .unwrap();
        assert!(question.is_valid());
        assert!(question.has_option("B"));
        assert!(!question.has_option("C"));
        assert!(question.is_correct("A"));
        assert!(!question.is_correct("B"));
    }
}
