//! Telemetry & Logging
//!
//! Structured logging for generation requests, retries and reveal progress.
//! - Configurable log levels via RUST_LOG
//! - `--verbose` turns on `info` level without RUST_LOG
//! - Output goes to stderr so quiz output on stdout stays clean

use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::QuizError;

/// Sanitize a string for safe log output by escaping control characters.
/// Topics and model output are user/model controlled and may embed newlines.
pub fn sanitize_for_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x1b' => out.push_str("\\e"),
            '\x00' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

/// Initialize global tracing subscriber.
/// Only enables tracing if RUST_LOG is explicitly set.
pub fn init_tracing() {
    if let Ok(filter) = std::env::var("RUST_LOG") {
        init_tracing_with_filter(&filter);
    }
}

/// Initialize tracing for verbose mode
pub fn init_tracing_verbose() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "quizforge=info".to_string());
    init_tracing_with_filter(&filter)
}

/// Initialize with custom filter string
pub fn init_tracing_with_filter(filter: &str) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .with_level(true)
            .compact()
            .with_writer(std::io::stderr);

        let filter_layer = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
    });
}

/// Run one generation inside a span, logging duration and outcome.
pub async fn track_generation<F, T>(topic: &str, fut: F) -> Result<T, QuizError>
where
    F: std::future::Future<Output = Result<T, QuizError>>,
{
    let start = Instant::now();
    let safe_topic = sanitize_for_log(topic);
    let span = info_span!("quiz.generate", topic = safe_topic.as_str());

    async move {
        let result = fut.await;
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(duration_ms, "Generation completed"),
            Err(e) => warn!(duration_ms, error = %e, "Generation failed"),
        }
        result
    }
    .instrument(span)
    .await
}
