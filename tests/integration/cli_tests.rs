use assert_cmd::Command;
use predicates::prelude::*;

/// A command isolated from the user's config and credentials.
#[allow(deprecated)]
fn quizforge(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("quizforge").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("XDG_DATA_HOME", home)
        .env_remove("GEMINI_API_KEY")
        .env_remove("QUIZFORGE_API_KEY")
        .env_remove("RUST_LOG")
        .env("QUIZFORGE_ENDPOINT", "http://127.0.0.1:9");
    cmd
}

#[test]
fn test_cli_version() {
    let home = tempfile::tempdir().unwrap();
    quizforge(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizforge"));
}

#[test]
fn test_cli_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    quizforge(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("practice"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_count_over_limit_rejected_before_network() {
    let home = tempfile::tempdir().unwrap();
    quizforge(home.path())
        .env("GEMINI_API_KEY", "test-key")
        .args(["generate", "--topic", "Volcanoes", "--count", "101"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "You can generate a maximum of 100 questions at a time.",
        ));
}

#[test]
fn test_zero_count_rejected() {
    let home = tempfile::tempdir().unwrap();
    quizforge(home.path())
        .env("GEMINI_API_KEY", "test-key")
        .args(["generate", "--topic", "Volcanoes", "--count", "0"])
        .assert()
        .code(3);
}

#[test]
fn test_blank_topic_rejected() {
    let home = tempfile::tempdir().unwrap();
    quizforge(home.path())
        .args(["generate", "--topic", "   "])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Please enter a topic."));
}

#[test]
fn test_missing_key_is_config_error() {
    let home = tempfile::tempdir().unwrap();
    quizforge(home.path())
        .args(["generate", "--topic", "Volcanoes", "--count", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("API key missing"));
}

#[test]
fn test_bad_config_file_is_config_error() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("quizforge.toml"), "model = [").unwrap();
    quizforge(home.path()).arg("status").assert().code(2);
}

#[test]
fn test_status_json_redacts_key() {
    let home = tempfile::tempdir().unwrap();
    quizforge(home.path())
        .env("GEMINI_API_KEY", "AIzaSySuperSecret9876")
        .args(["status", "--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****9876"))
        .stdout(predicate::str::contains("AIzaSySuperSecret").not());
}

#[test]
fn test_status_text_without_key() {
    let home = tempfile::tempdir().unwrap();
    quizforge(home.path())
        .args(["--no-color", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API key: not set"));
}
