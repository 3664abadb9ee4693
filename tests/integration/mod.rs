//! Integration tests for the quizforge binary
//!
//! Each test runs the built binary in a temporary home directory with the
//! API key variables removed and the endpoint pointed at a closed local
//! port, so nothing reaches the network.

mod cli_tests;
