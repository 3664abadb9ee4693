use thiserror::Error;

/// The central error type for quiz generation and export.
///
/// Transient server statuses (429/500/503) never escape as a variant of their
/// own: the client retries them and escalates to [`QuizError::ExhaustedRetries`]
/// once the retry budget is spent.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("API Error: {message}")]
    PermanentServer { status: u16, message: String },

    #[error("Generation API failed after {attempts} attempts (last status {last_status})")]
    ExhaustedRetries { attempts: u32, last_status: u16 },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while pulling the question array out of raw model output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty response")]
    EmptyResponse,

    #[error("no array found")]
    NoArrayFound,

    /// Carries the decoder detail for logs; never shown.
    #[error("malformed JSON")]
    MalformedJson(String),
}

impl ParseError {
    /// Short, user-facing description without decoder detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            ParseError::EmptyResponse => "Empty response from the generation API.",
            ParseError::NoArrayFound => "The API response did not contain a valid JSON array.",
            ParseError::MalformedJson(_) => "Could not parse the generated questions. Try again.",
        }
    }
}

impl QuizError {
    pub fn missing_api_key() -> Self {
        QuizError::Configuration(
            "API key missing. Set GEMINI_API_KEY or api_key in quizforge.toml.".to_string(),
        )
    }

    /// Single-line message shown to the user in place of any previous error.
    pub fn user_message(&self) -> String {
        match self {
            QuizError::Parse(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_INVALID_REQUEST: u8 = 3;
pub const EXIT_API_ERROR: u8 = 4;

/// Determine the appropriate process exit code for an error.
pub fn get_exit_code(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<QuizError>() {
        Some(QuizError::Configuration(_)) => EXIT_CONFIG_ERROR,
        Some(QuizError::InvalidRequest(_)) => EXIT_INVALID_REQUEST,
        Some(
            QuizError::PermanentServer { .. }
            | QuizError::ExhaustedRetries { .. }
            | QuizError::Parse(_)
            | QuizError::Network(_),
        ) => EXIT_API_ERROR,
        Some(_) | None => EXIT_ERROR,
    }
}
