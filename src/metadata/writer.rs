use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    config::model::{AppConfig, LocalizationEntry},
    foundation::error::AppshotsResult,
};

/// Subdirectory of the output base that receives store metadata.
pub const METADATA_DIR: &str = "metadata";

/// Files written for one language, in write order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LanguageMetadata {
    pub language: String,
    pub files: Vec<PathBuf>,
}

/// Metadata written for one app.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataReport {
    pub app_title: String,
    pub output_dir: PathBuf,
    pub languages: Vec<LanguageMetadata>,
}

impl MetadataReport {
    pub fn total_files(&self) -> usize {
        self.languages.iter().map(|l| l.files.len()).sum()
    }
}

/// `str.title()`-style casing: a cased letter after another cased letter is
/// lowercased, every other cased letter is uppercased.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = c.is_lowercase() || c.is_uppercase();
    }
    out
}

/// `(file name, content)` pairs for one language; empty values are dropped.
///
/// URLs come from the language entry first, then the app-wide value.
pub fn metadata_files(config: &AppConfig, entry: &LocalizationEntry) -> Vec<(&'static str, String)> {
    let mut files = vec![
        ("name.txt", entry.name.clone()),
        ("subtitle.txt", entry.subtitle.clone()),
        ("description.txt", entry.description.clone()),
        ("keywords.txt", entry.keywords.clone()),
        ("release_notes.txt", entry.release_notes.clone()),
    ];
    let urls = [
        ("marketing_url.txt", &entry.marketing_url, &config.marketing_url),
        ("support_url.txt", &entry.support_url, &config.support_url),
        ("privacy_url.txt", &entry.privacy_url, &config.privacy_url),
    ];
    for (file, local, global) in urls {
        let value = local
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(global.as_deref())
            .unwrap_or_default();
        files.push((file, value.to_string()));
    }
    files.retain(|(_, content)| !content.is_empty());
    files
}

/// Writes per-language store metadata text files.
#[derive(Clone, Debug)]
pub struct MetadataWriter {
    output_base: PathBuf,
}

impl MetadataWriter {
    /// Writer rooted at `{output_base}/metadata/`.
    pub fn new(output_base: impl Into<PathBuf>) -> Self {
        Self {
            output_base: output_base.into(),
        }
    }

    /// `{output_base}/metadata/{AppTitle}`.
    pub fn app_dir(&self, config: &AppConfig) -> PathBuf {
        self.output_base
            .join(METADATA_DIR)
            .join(title_case(&config.app_name))
    }

    /// Write one language's files, falling back to the base language entry.
    pub fn write_language(&self, config: &AppConfig, language: &str) -> AppshotsResult<Vec<PathBuf>> {
        let entry = config.localization_for(language)?;
        let lang_dir = self.app_dir(config).join(language);
        let mut written = Vec::new();
        for (file, content) in metadata_files(config, entry) {
            let path = lang_dir.join(file);
            match write_text(&path, &content) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "metadata written");
                    written.push(path);
                }
                Err(e) => {
                    let reason = format!("{e:#}");
                    tracing::warn!(path = %path.display(), error = %reason, "metadata write failed");
                }
            }
        }
        Ok(written)
    }

    /// Write every configured language.
    #[tracing::instrument(skip(self, config), fields(app = %config.app_name))]
    pub fn write_all(&self, config: &AppConfig) -> AppshotsResult<MetadataReport> {
        let mut report = MetadataReport {
            app_title: title_case(&config.app_name),
            output_dir: self.app_dir(config),
            languages: Vec::new(),
        };
        for language in config.localization.keys() {
            let files = self.write_language(config, language)?;
            tracing::debug!(language = %language, files = files.len(), "language metadata done");
            report.languages.push(LanguageMetadata {
                language: language.clone(),
                files,
            });
        }
        tracing::info!(total = report.total_files(), "metadata generation complete");
        Ok(report)
    }
}

fn write_text(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir '{}'", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("write '{}'", path.display()))
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/writer.rs"]
mod tests;
