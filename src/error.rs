//! Error types for ocrfix.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrfixError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Dictionary errors
    #[error("No dictionary available for language '{language}'")]
    UnsupportedLanguage { language: String },

    #[error(
        "Dictionary for '{language}' is not installed at {path}. Run `ocrfix dictionaries install {language}`"
    )]
    DictionaryNotInstalled { language: String, path: String },

    #[error("Failed to load dictionary '{path}': {message}")]
    DictionaryLoad { path: String, message: String },

    #[error("Dictionary download failed: {message}")]
    Download { message: String },

    // Correction history errors
    #[error("Correction history error: {0}")]
    Storage(#[from] rusqlite::Error),

    // Operator interaction errors
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, OcrfixError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_invalid_value_display() {
        let error = OcrfixError::ConfigInvalidValue {
            key: "suggestions.limit".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for suggestions.limit: must be positive"
        );
    }

    #[test]
    fn test_unsupported_language_display() {
        let error = OcrfixError::UnsupportedLanguage {
            language: "tlh".to_string(),
        };
        assert_eq!(error.to_string(), "No dictionary available for language 'tlh'");
    }

    #[test]
    fn test_dictionary_not_installed_mentions_install_command() {
        let error = OcrfixError::DictionaryNotInstalled {
            language: "de".to_string(),
            path: "/data/de-100k.txt".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("/data/de-100k.txt"));
        assert!(msg.contains("ocrfix dictionaries install de"));
    }

    #[test]
    fn test_dictionary_load_display() {
        let error = OcrfixError::DictionaryLoad {
            path: "words.txt".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to load dictionary 'words.txt': permission denied"
        );
    }

    #[test]
    fn test_prompt_display() {
        let error = OcrfixError::Prompt {
            message: "stdin closed".to_string(),
        };
        assert_eq!(error.to_string(), "Prompt failed: stdin closed");
    }

    #[test]
    fn test_other_display() {
        let error = OcrfixError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: OcrfixError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_error = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let error: OcrfixError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_from_storage_error() {
        let error: OcrfixError = rusqlite::Error::InvalidQuery.into();
        assert!(error.to_string().starts_with("Correction history error"));
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: OcrfixError = io_error.into();
        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<OcrfixError>();
    }
}
