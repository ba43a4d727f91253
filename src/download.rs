//! Dictionary download and installation.
//!
//! Streams a catalog dictionary to the data directory, verifying its SHA-256
//! checksum before it is ever handed to the oracle.

use crate::dictionary::{dictionary_path, get_dictionary};
use crate::error::{OcrfixError, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn download_error(message: impl Into<String>) -> OcrfixError {
    OcrfixError::Download {
        message: message.into(),
    }
}

/// Core download: fetch `url` into `output_path`, verify sha256 if non-empty.
///
/// Writes to a `.part` file first so an interrupted download never leaves a
/// truncated dictionary where the oracle would load it.
async fn download_to_path(
    name: &str,
    url: &str,
    sha256: &str,
    size_kb: u32,
    output_path: &Path,
    progress: bool,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| download_error(format!("Failed to create dictionaries directory: {e}")))?;
    }

    if progress {
        eprintln!("Downloading {name} dictionary ({size_kb} KB)...");
    }

    let response = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|e| download_error(format!("Failed to start download: {e}")))?;

    if !response.status().is_success() {
        return Err(download_error(format!(
            "Download failed with status: {}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);
    let pb = if progress {
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            // SAFETY: hardcoded template string, always valid
            #[allow(clippy::expect_used)]
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .expect("hardcoded progress bar template")
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let partial_path = output_path.with_extension("part");
    let mut hasher = Sha256::new();
    let mut stream = response.bytes_stream();
    let mut file = fs::File::create(&partial_path)
        .map_err(|e| download_error(format!("Failed to create output file: {e}")))?;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| download_error(format!("Failed to read download chunk: {e}")))?;
        file.write_all(&chunk)
            .map_err(|e| download_error(format!("Failed to write to file: {e}")))?;
        hasher.update(&chunk);
        if let Some(ref pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Downloaded");
    }

    if !sha256.is_empty() {
        let calculated = format!("{:x}", hasher.finalize());
        if calculated != sha256 {
            if let Err(e) = fs::remove_file(&partial_path) {
                tracing::warn!("failed to remove corrupted download: {e}");
            }
            return Err(download_error(format!(
                "SHA-256 checksum mismatch. Expected: {sha256}, got: {calculated}"
            )));
        }
        if progress {
            eprintln!("Checksum verified");
        }
    }

    fs::rename(&partial_path, output_path)?;

    if progress {
        eprintln!("Dictionary installed to: {}", output_path.display());
    }
    Ok(())
}

/// Download and install the catalog dictionary for `lang`.
///
/// Returns the installed path; an already-installed dictionary is not
/// downloaded again.
pub async fn download_dictionary(lang: &str, progress: bool) -> Result<PathBuf> {
    let info = get_dictionary(lang).ok_or_else(|| OcrfixError::UnsupportedLanguage {
        language: lang.to_string(),
    })?;
    let path = dictionary_path(lang).ok_or_else(|| OcrfixError::UnsupportedLanguage {
        language: lang.to_string(),
    })?;

    if path.is_file() {
        tracing::info!(language = lang, path = %path.display(), "dictionary already installed");
        return Ok(path);
    }

    download_to_path(
        info.display_name,
        info.url,
        info.sha256,
        info.size_kb,
        &path,
        progress,
    )
    .await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_download_unknown_language_is_unsupported() {
        let result = download_dictionary("tlh", false).await;
        assert!(matches!(
            result,
            Err(OcrfixError::UnsupportedLanguage { ref language }) if language == "tlh"
        ));
    }

    #[test]
    fn test_download_error_message() {
        let err = download_error("boom");
        assert_eq!(err.to_string(), "Dictionary download failed: boom");
    }
}
