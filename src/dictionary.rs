//! Catalog of installable word-frequency dictionaries.
//!
//! Static metadata only, always compiled in. The oracle uses it to decide
//! whether a language is supported at all and where its file lives; the
//! downloader (`download`, behind the `dictionary-download` feature) uses the
//! URL and checksum.

use std::path::PathBuf;

/// Metadata for a SymSpell frequency dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryInfo {
    /// Language code (e.g., "en", "de").
    pub language: &'static str,
    /// Human-readable display name.
    pub display_name: &'static str,
    /// Dictionary filename.
    pub filename: &'static str,
    /// Raw GitHub URL for download.
    pub url: &'static str,
    /// Approximate download size in KB.
    pub size_kb: u32,
    /// SHA-256 checksum of the dictionary file.
    pub sha256: &'static str,
}

/// Available dictionaries, ordered by language code.
pub const DICTIONARIES: &[DictionaryInfo] = &[
    DictionaryInfo {
        language: "de",
        display_name: "German",
        filename: "de-100k.txt",
        url: "https://raw.githubusercontent.com/wolfgarbe/SymSpell/master/SymSpell.FrequencyDictionary/de-100k.txt",
        size_kb: 1200,
        sha256: "a98c27cbe0921cb3a9927eb28639efb45fc3493f72466cca0622c64dff4e74a9",
    },
    DictionaryInfo {
        language: "en",
        display_name: "English",
        filename: "en-80k.txt",
        url: "https://raw.githubusercontent.com/wolfgarbe/SymSpell/master/SymSpell.FrequencyDictionary/en-80k.txt",
        size_kb: 900,
        sha256: "f84bfae717ff3a4a3b90c824ed06ea08e4b2ed2746f7bba63d4e52f2c8bf85c3",
    },
    DictionaryInfo {
        language: "es",
        display_name: "Spanish",
        filename: "es-100l.txt",
        url: "https://raw.githubusercontent.com/wolfgarbe/SymSpell/master/SymSpell.FrequencyDictionary/es-100l.txt",
        size_kb: 1000,
        sha256: "fd538cb220cd00d0a9f20d2190ba6f033b76f91ee08c6c0df8fadbf46bbdf319",
    },
    DictionaryInfo {
        language: "fr",
        display_name: "French",
        filename: "fr-100k.txt",
        url: "https://raw.githubusercontent.com/wolfgarbe/SymSpell/master/SymSpell.FrequencyDictionary/fr-100k.txt",
        size_kb: 1100,
        sha256: "b7dca46c0002daa0c6d70e1078bef4110815f65b0c90c35be1ae900ba2f5e9fc",
    },
    DictionaryInfo {
        language: "he",
        display_name: "Hebrew",
        filename: "he-100k.txt",
        url: "https://raw.githubusercontent.com/wolfgarbe/SymSpell/master/SymSpell.FrequencyDictionary/he-100k.txt",
        size_kb: 800,
        sha256: "b1305dc929be951e20d50440585a627b4c9d95e2044122a73b33a0ba25b713d9",
    },
    DictionaryInfo {
        language: "it",
        display_name: "Italian",
        filename: "it-100k.txt",
        url: "https://raw.githubusercontent.com/wolfgarbe/SymSpell/master/SymSpell.FrequencyDictionary/it-100k.txt",
        size_kb: 1100,
        sha256: "5f746afb7e6ae802872061ef025ce883cfa2a8779780968fa285dfd0907e9cfc",
    },
    DictionaryInfo {
        language: "ru",
        display_name: "Russian",
        filename: "ru-100k.txt",
        url: "https://raw.githubusercontent.com/wolfgarbe/SymSpell/master/SymSpell.FrequencyDictionary/ru-100k.txt",
        size_kb: 1300,
        sha256: "2028262759546fdc346386369a59541d0464f48634c3103ff3f36d01518efcc6",
    },
];

/// Look up a dictionary by language code.
pub fn get_dictionary(lang: &str) -> Option<&'static DictionaryInfo> {
    DICTIONARIES.iter().find(|d| d.language == lang)
}

/// List all available dictionaries.
pub fn list_dictionaries() -> &'static [DictionaryInfo] {
    DICTIONARIES
}

/// Directory where installed dictionaries are stored.
///
/// Uses `~/.local/share/ocrfix/dictionaries/` on Linux.
pub fn dictionaries_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join("ocrfix")
        .join("dictionaries")
}

/// Install location of the catalog dictionary for `lang`, if the catalog has one.
pub fn dictionary_path(lang: &str) -> Option<PathBuf> {
    get_dictionary(lang).map(|info| dictionaries_dir().join(info.filename))
}

/// Whether the catalog dictionary for `lang` is present on disk.
pub fn is_dictionary_installed(lang: &str) -> bool {
    dictionary_path(lang).is_some_and(|p| p.is_file())
}

/// One-line listing entry: code, name, size and install status.
pub fn format_dictionary_info(info: &DictionaryInfo) -> String {
    let status = if is_dictionary_installed(info.language) {
        "[installed]"
    } else {
        "[not installed]"
    };
    format!(
        "{:4} {:10} {:6} KB   {}",
        info.language, info.display_name, info.size_kb, status
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_dictionary_english() {
        let dict = get_dictionary("en").expect("en dictionary should exist");
        assert_eq!(dict.display_name, "English");
        assert_eq!(dict.filename, "en-80k.txt");
        assert!(dict.url.ends_with(dict.filename));
    }

    #[test]
    fn test_get_dictionary_nonexistent() {
        assert!(get_dictionary("").is_none());
        assert!(get_dictionary("xx").is_none());
        assert!(get_dictionary("EN").is_none(), "codes are case-sensitive");
    }

    #[test]
    fn test_list_dictionaries_ordered_and_unique() {
        let dicts = list_dictionaries();
        assert_eq!(dicts.len(), 7);
        for window in dicts.windows(2) {
            assert!(
                window[0].language < window[1].language,
                "{} should come before {}",
                window[0].language,
                window[1].language,
            );
        }
    }

    #[test]
    fn test_dictionary_path_uses_catalog_filename() {
        let path = dictionary_path("fr").expect("fr is in the catalog");
        assert!(path.ends_with("fr-100k.txt"));
        assert!(path.to_string_lossy().contains("ocrfix"));
        assert!(dictionary_path("tlh").is_none());
    }

    #[test]
    fn test_unknown_language_is_never_installed() {
        assert!(!is_dictionary_installed("tlh"));
    }

    #[test]
    fn test_format_dictionary_info_shows_code_and_status() {
        let info = get_dictionary("de").expect("de should exist");
        let line = format_dictionary_info(info);
        assert!(line.starts_with("de"));
        assert!(line.contains("German"));
        assert!(line.contains("installed"));
    }

    #[test]
    fn test_all_sha256_hashes_are_64_hex_chars() {
        for dict in DICTIONARIES {
            assert_eq!(dict.sha256.len(), 64, "{} hash length", dict.language);
            assert!(
                dict.sha256.chars().all(|c| c.is_ascii_hexdigit()),
                "{} hash contains non-hex characters",
                dict.language
            );
        }
    }
}
