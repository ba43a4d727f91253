use crate::defaults;
use crate::error::{OcrfixError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub history: HistoryConfig,
    pub suggestions: SuggestionConfig,
    pub detection: DetectionConfig,
    pub train: TrainConfig,
    pub prepare: PrepareConfig,
}

/// Dictionary oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DictionaryConfig {
    pub language: String,
    /// Custom word list (`word [frequency]` per line) used instead of the
    /// installed catalog dictionary.
    pub path: Option<PathBuf>,
    pub max_edit_distance: i64,
    pub promotion_threshold: u32,
}

/// Correction history configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub db_file: PathBuf,
}

/// Suggestion ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SuggestionConfig {
    pub limit: usize,
}

/// Error-candidate detection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DetectionConfig {
    /// Don't flag hyphenated compounds whose parts are all valid words.
    pub skip_hyphenated: bool,
}

/// Interactive training configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainConfig {
    /// Offer join/explode/whitelist/autocorrect/desquish in the menu.
    pub extended_menu: bool,
    pub context_radius: usize,
}

/// Text preparation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrepareConfig {
    pub ascii_only: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            path: None,
            max_edit_distance: defaults::MAX_EDIT_DISTANCE,
            promotion_threshold: defaults::PROMOTION_THRESHOLD,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            db_file: PathBuf::from(defaults::DEFAULT_DB_FILE),
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            limit: defaults::SUGGESTION_LIMIT,
        }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            extended_menu: true,
            context_radius: defaults::CONTEXT_RADIUS,
        }
    }
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self { ascii_only: true }
    }
}

/// Dotted keys accepted by `config get` / `config set`.
const KNOWN_KEYS: &[&str] = &[
    "dictionary.language",
    "dictionary.path",
    "dictionary.max_edit_distance",
    "dictionary.promotion_threshold",
    "history.db_file",
    "suggestions.limit",
    "detection.skip_hyphenated",
    "train.extended_menu",
    "train.context_radius",
    "prepare.ascii_only",
];

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OcrfixError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                OcrfixError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist.
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(OcrfixError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(OcrfixError::ConfigParse {
                message: format!("{}: {}", path.display(), e),
            }),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - OCRFIX_LANGUAGE → dictionary.language
    /// - OCRFIX_DICTIONARY → dictionary.path
    /// - OCRFIX_DB_FILE → history.db_file
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(language) = std::env::var("OCRFIX_LANGUAGE")
            && !language.is_empty()
        {
            self.dictionary.language = language;
        }

        if let Ok(path) = std::env::var("OCRFIX_DICTIONARY")
            && !path.is_empty()
        {
            self.dictionary.path = Some(PathBuf::from(path));
        }

        if let Ok(db_file) = std::env::var("OCRFIX_DB_FILE")
            && !db_file.is_empty()
        {
            self.history.db_file = PathBuf::from(db_file);
        }

        self
    }

    /// Reject values the components can't work with.
    pub fn validate(&self) -> Result<()> {
        if self.dictionary.language.trim().is_empty() {
            return Err(invalid("dictionary.language", "must not be empty"));
        }
        if !(1..=defaults::MAX_EDIT_DISTANCE).contains(&self.dictionary.max_edit_distance) {
            return Err(invalid(
                "dictionary.max_edit_distance",
                &format!("must be between 1 and {}", defaults::MAX_EDIT_DISTANCE),
            ));
        }
        if self.dictionary.promotion_threshold == 0 {
            return Err(invalid("dictionary.promotion_threshold", "must be at least 1"));
        }
        if self.suggestions.limit == 0 {
            return Err(invalid("suggestions.limit", "must be at least 1"));
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/ocrfix/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("ocrfix")
            .join("config.toml")
    }

    /// Read a single value by dotted key (e.g. `suggestions.limit`).
    pub fn get_value_by_path(&self, key: &str) -> Result<String> {
        let value = toml::Value::try_from(self).map_err(|e| OcrfixError::ConfigParse {
            message: e.to_string(),
        })?;
        let (section, field) = split_key(key)?;
        match value.get(section).and_then(|s| s.get(field)) {
            Some(toml::Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
            // Optional fields serialize to nothing when unset
            None => Ok(String::new()),
        }
    }

    /// Write a single value by dotted key into the config file at `path`,
    /// creating the file if it doesn't exist.
    pub fn set_value_by_path(path: &Path, key: &str, raw: &str) -> Result<()> {
        let (section, field) = split_key(key)?;

        let mut doc: toml::Table = match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
            Err(e) => return Err(e.into()),
        };

        let table = doc
            .entry(section.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()));
        let toml::Value::Table(table) = table else {
            return Err(invalid(key, "section is not a table"));
        };
        table.insert(field.to_string(), parse_scalar(raw));

        let rendered = toml::to_string_pretty(&doc).map_err(|e| OcrfixError::ConfigParse {
            message: e.to_string(),
        })?;

        // Round-trip through Config so type errors surface before writing
        let candidate: Config =
            toml::from_str(&rendered).map_err(|e| invalid(key, &e.to_string()))?;
        candidate.validate()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_display_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| OcrfixError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Commented configuration template with every default spelled out.
    pub fn dump_template() -> String {
        format!(
            r#"# ocrfix configuration

[dictionary]
# Dictionary language code (see `ocrfix dictionaries list`)
language = "{language}"
# Custom word list, one `word [frequency]` per line, used instead of the catalog
# path = "/path/to/words.txt"
# Maximum edit distance for dictionary suggestions (1-2)
max_edit_distance = {distance}
# Corrections recorded at least this many times are trusted as real words
promotion_threshold = {threshold}

[history]
# SQLite file holding every recorded correction
db_file = "{db_file}"

[suggestions]
# Maximum number of ranked suggestions per token
limit = {limit}

[detection]
# Don't flag hyphenated compounds whose parts are all valid words
skip_hyphenated = false

[train]
# Offer join/explode/whitelist/autocorrect/desquish in the menu
extended_menu = true
# Words of context shown on each side of an error
context_radius = {radius}

[prepare]
# Drop non-ASCII characters while preparing text
ascii_only = true
"#,
            language = defaults::DEFAULT_LANGUAGE,
            distance = defaults::MAX_EDIT_DISTANCE,
            threshold = defaults::PROMOTION_THRESHOLD,
            db_file = defaults::DEFAULT_DB_FILE,
            limit = defaults::SUGGESTION_LIMIT,
            radius = defaults::CONTEXT_RADIUS,
        )
    }
}

fn invalid(key: &str, message: &str) -> OcrfixError {
    OcrfixError::ConfigInvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    if !KNOWN_KEYS.contains(&key) {
        return Err(invalid(key, "unknown configuration key"));
    }
    key.split_once('.')
        .ok_or_else(|| invalid(key, "expected section.field"))
}

/// Interpret a CLI string as the most specific TOML scalar it can be.
fn parse_scalar(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        return toml::Value::Boolean(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    toml::Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_ocrfix_env() {
        remove_env("OCRFIX_LANGUAGE");
        remove_env("OCRFIX_DICTIONARY");
        remove_env("OCRFIX_DB_FILE");
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.dictionary.language, "en");
        assert_eq!(config.dictionary.path, None);
        assert_eq!(config.dictionary.max_edit_distance, 2);
        assert_eq!(config.dictionary.promotion_threshold, 2);
        assert_eq!(config.history.db_file, PathBuf::from("./corrections.db"));
        assert_eq!(config.suggestions.limit, 10);
        assert!(!config.detection.skip_hyphenated);
        assert!(config.train.extended_menu);
        assert_eq!(config.train.context_radius, 5);
        assert!(config.prepare.ascii_only);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [dictionary]
            language = "de"
            path = "/tmp/words.txt"
            max_edit_distance = 1
            promotion_threshold = 3

            [history]
            db_file = "/var/lib/ocrfix/history.db"

            [suggestions]
            limit = 5

            [detection]
            skip_hyphenated = true

            [train]
            extended_menu = false
            context_radius = 8
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.dictionary.language, "de");
        assert_eq!(config.dictionary.path, Some(PathBuf::from("/tmp/words.txt")));
        assert_eq!(config.dictionary.max_edit_distance, 1);
        assert_eq!(config.dictionary.promotion_threshold, 3);
        assert_eq!(
            config.history.db_file,
            PathBuf::from("/var/lib/ocrfix/history.db")
        );
        assert_eq!(config.suggestions.limit, 5);
        assert!(config.detection.skip_hyphenated);
        assert!(!config.train.extended_menu);
        assert_eq!(config.train.context_radius, 8);
        // Section not present keeps its defaults
        assert!(config.prepare.ascii_only);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[suggestions]\nlimit = 3\n")
            .unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.suggestions.limit, 3);
        assert_eq!(config.dictionary, DictionaryConfig::default());
        assert_eq!(config.history, HistoryConfig::default());
    }

    #[test]
    fn test_env_override_language_and_db() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_ocrfix_env();

        set_env("OCRFIX_LANGUAGE", "fr");
        set_env("OCRFIX_DB_FILE", "/tmp/fr.db");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.dictionary.language, "fr");
        assert_eq!(config.history.db_file, PathBuf::from("/tmp/fr.db"));
        assert_eq!(config.dictionary.path, None);

        clear_ocrfix_env();
    }

    #[test]
    fn test_env_override_dictionary_path() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_ocrfix_env();

        set_env("OCRFIX_DICTIONARY", "/usr/share/dict/words");
        let config = Config::default().with_env_overrides();

        assert_eq!(
            config.dictionary.path,
            Some(PathBuf::from("/usr/share/dict/words"))
        );

        clear_ocrfix_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_ocrfix_env();

        set_env("OCRFIX_LANGUAGE", "");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.dictionary.language, "en");

        clear_ocrfix_env();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[dictionary\nlanguage = \"broken\n").unwrap();

        assert!(Config::load(temp_file.path()).is_err());
        assert!(matches!(
            Config::load_or_default(temp_file.path()),
            Err(OcrfixError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_ocrfix_config_12345.toml");
        let config = Config::load_or_default(missing_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = Config::default_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("ocrfix"));
        assert!(path_str.ends_with("config.toml"));
    }

    #[test]
    fn test_validate_rejects_zero_limit_and_threshold() {
        let mut config = Config::default();
        config.suggestions.limit = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dictionary.promotion_threshold = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dictionary.max_edit_distance = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_get_value_by_path() {
        let config = Config::default();
        assert_eq!(config.get_value_by_path("suggestions.limit").unwrap(), "10");
        assert_eq!(config.get_value_by_path("dictionary.language").unwrap(), "en");
        assert_eq!(config.get_value_by_path("dictionary.path").unwrap(), "");
        assert!(config.get_value_by_path("audio.device").is_err());
    }

    #[test]
    fn test_set_value_by_path_creates_and_updates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::set_value_by_path(&path, "suggestions.limit", "4").unwrap();
        Config::set_value_by_path(&path, "dictionary.language", "it").unwrap();
        Config::set_value_by_path(&path, "detection.skip_hyphenated", "true").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.suggestions.limit, 4);
        assert_eq!(config.dictionary.language, "it");
        assert!(config.detection.skip_hyphenated);
    }

    #[test]
    fn test_set_value_by_path_rejects_invalid_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(Config::set_value_by_path(&path, "suggestions.limit", "0").is_err());
        assert!(Config::set_value_by_path(&path, "suggestions.limit", "many").is_err());
        assert!(!path.exists(), "rejected values must not be written");
    }

    #[test]
    fn test_dump_template_parses_to_defaults() {
        let config: Config = toml::from_str(&Config::dump_template()).unwrap();
        assert_eq!(config, Config::default());
    }
}
