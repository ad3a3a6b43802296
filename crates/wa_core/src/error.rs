use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Inference error: {0}")]
    Inference(String),

    /// A required setting (usually the model credential) is missing or invalid.
    #[error("{0}")]
    Configuration(String),

    /// Style analysis was requested over an empty corpus.
    #[error("no articles available for analysis")]
    NoArticles,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let config = Error::Configuration("ANTHROPIC_API_KEY non configurée".to_string());
        assert_eq!(config.to_string(), "ANTHROPIC_API_KEY non configurée");
        assert_eq!(Error::Inference("timeout".to_string()).to_string(), "Inference error: timeout");
        assert_eq!(Error::NoArticles.to_string(), "no articles available for analysis");

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(Error::from(json), Error::Serialization(_)));
    }
}
