use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    AsyncDatabase(#[from] tokio_rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing credential: {0} is not configured")]
    MissingCredential(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Search API error: HTTP {status}: {body}")]
    SearchApi { status: u16, body: String },

    #[error("Completion API error: HTTP {status}: {body}")]
    CompletionApi { status: u16, body: String },

    #[error("Completion API returned an empty reply")]
    EmptyReply,

    #[error("Completion reply is not valid JSON: {source}")]
    MalformedReply {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("Completion reply does not match reply schema v{version}: {problem}")]
    ReplySchema {
        version: u32,
        problem: String,
        raw: String,
    },

    #[error("No blog posts found for '{0}'")]
    NoResults(String),

    #[error("No data available: {0}")]
    NoData(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Warnings abort the action like errors but are not failures of an upstream.
    pub fn is_warning(&self) -> bool {
        matches!(self, AppError::NoData(_) | AppError::NoResults(_))
    }

    /// The untouched completion text for replies that could not be used.
    pub fn raw_reply(&self) -> Option<&str> {
        match self {
            AppError::MalformedReply { raw, .. } | AppError::ReplySchema { raw, .. } => {
                Some(raw.as_str())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_is_a_warning() {
        assert!(AppError::NoData("run a search first".into()).is_warning());
        assert!(AppError::NoResults("widget".into()).is_warning());
        assert!(!AppError::EmptyReply.is_warning());
        assert!(!AppError::MissingCredential("OpenAI API key").is_warning());
    }

    #[test]
    fn raw_reply_is_kept_for_bad_replies() {
        let source = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err = AppError::MalformedReply {
            source,
            raw: "{nope".to_string(),
        };
        assert_eq!(err.raw_reply(), Some("{nope"));
        assert_eq!(AppError::EmptyReply.raw_reply(), None);
    }
}
