//! Unit tests for quizforge modules
//!
//! These tests cover individual components without network I/O; the
//! generation client runs against the scripted mock backend.

mod test_client;
mod test_config;
mod test_controller;
mod test_extract;
