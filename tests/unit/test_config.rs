//! Unit tests for configuration loading
//!
//! Tests cover:
//! - Partial TOML files layered over defaults
//! - Environment overrides on top of file values
//! - Settings flowing into the client retry policy and session form

use quizforge::api::RetryConfig;
use quizforge::config::{Config, API_KEY_VARS};
use quizforge::quiz::Difficulty;
use quizforge::session::SessionForm;
use std::path::PathBuf;
use std::time::Duration;

mod loading_tests {
    use super::*;

    #[test]
    fn test_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
endpoint = "http://127.0.0.1:9000/v1beta"
model = "local-model"
api_key = "file-key"

[request]
timeout_secs = 5
connect_timeout_secs = 2

[retry]
max_retries = 4
base_delay_ms = 200
max_delay_ms = 1000

[quiz]
default_count = 20
default_difficulty = "Easy"
reveal_interval_ms = 0
practice_mode = false

[export]
output_dir = "pdfs"
"#,
        )
        .unwrap();

        let config = Config::load(path.to_str()).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:9000/v1beta");
        assert_eq!(config.request.timeout_secs, 5);
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.quiz.default_difficulty, Difficulty::Easy);
        assert!(!config.quiz.practice_mode);
        assert_eq!(config.reveal_interval(), Duration::ZERO);
        assert_eq!(config.export.output_dir, PathBuf::from("pdfs"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[quiz\ndefault_count = ").unwrap();
        assert!(Config::load(path.to_str()).is_err());
    }

    #[test]
    fn test_key_var_order() {
        assert_eq!(API_KEY_VARS, ["QUIZFORGE_API_KEY", "GEMINI_API_KEY"]);
    }

    #[test]
    fn test_env_beats_file() {
        let mut config: Config = toml::from_str("model = \"from-file\"").unwrap();
        config.apply_env(|name| match name {
            "QUIZFORGE_MODEL" => Some("from-env".to_string()),
            _ => None,
        });
        assert_eq!(config.model, "from-env");
    }
}

mod wiring_tests {
    use super::*;

    #[test]
    fn test_retry_settings_reach_client_policy() {
        let config: Config = toml::from_str("[retry]\nmax_retries = 1\nbase_delay_ms = 500").unwrap();
        let retry = RetryConfig::from_settings(&config.retry);
        assert_eq!(retry.total_attempts(), 2);
        assert_eq!(retry.delay_for_retry(1), Duration::from_millis(500));
    }

    #[test]
    fn test_quiz_settings_seed_form() {
        let config: Config =
            toml::from_str("[quiz]\ndefault_count = 8\ndefault_difficulty = \"Hard\"").unwrap();
        let form = SessionForm::from_settings(&config.quiz);
        assert_eq!(form.count, 8);
        assert_eq!(form.difficulty, Difficulty::Hard);
        assert!(form.topic.is_empty());
    }
}
