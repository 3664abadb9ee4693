//! Credential redaction to keep the API key out of logs and error messages

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Placeholder for redacted content
const REDACTED: &str = "[REDACTED]";

static KEY_PARAM: OnceLock<Regex> = OnceLock::new();
static API_KEY_ASSIGN: OnceLock<Regex> = OnceLock::new();

fn key_param() -> &'static Regex {
    KEY_PARAM.get_or_init(|| Regex::new(r"([?&]key=)[^&#\s)]+").expect("valid regex"))
}

fn api_key_assign() -> &'static Regex {
    API_KEY_ASSIGN.get_or_init(|| {
        Regex::new(r#"(?i)(api[_-]?key\s*[=:]\s*["']?)[a-zA-Z0-9_\-]{8,}"#).expect("valid regex")
    })
}

/// Redact the `key=` query parameter of a request URL.
pub fn redact_url(url: &str) -> Cow<'_, str> {
    key_param().replace_all(url, format!("${{1}}{}", REDACTED))
}

/// Redact anything that looks like a credential in free text.
pub fn redact_secrets(text: &str) -> String {
    let text = key_param().replace_all(text, format!("${{1}}{}", REDACTED));
    api_key_assign()
        .replace_all(&text, format!("${{1}}{}", REDACTED))
        .into_owned()
}

/// Show only the last four characters of a configured key.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
