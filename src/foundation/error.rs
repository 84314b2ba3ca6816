use std::path::PathBuf;

/// Convenience result type used across appshots.
pub type AppshotsResult<T> = Result<T, AppshotsError>;

/// Top-level error taxonomy used by generation APIs.
///
/// Config-level variants abort the current app. Asset and write variants are
/// scoped to a single screenshot slot and are logged by the orchestrator.
#[derive(thiserror::Error, Debug)]
pub enum AppshotsError {
    /// The per-app JSON config does not exist.
    #[error("config not found: '{}'", path.display())]
    ConfigMissing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The per-app JSON config exists but could not be parsed.
    #[error("malformed config '{}': {source}", path.display())]
    ConfigMalformed {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// Neither the requested language nor the base language has localization data.
    #[error("no localization data for '{language}' or base language '{base_language}'")]
    NoLocalizationData {
        /// Requested language code.
        language: String,
        /// Configured base language code.
        base_language: String,
    },

    /// Every designed font strategy failed; only the library default remains.
    #[error("font resolution exhausted for language '{language}'")]
    FontResolutionExhausted {
        /// Language whose mapping was being resolved.
        language: String,
    },

    /// A font file exists but could not be read or parsed.
    #[error("font load error '{}': {reason}", path.display())]
    FontLoad {
        /// Font file path.
        path: PathBuf,
        /// Human-readable failure reason.
        reason: String,
    },

    /// A referenced image file is absent on disk.
    #[error("image asset not found: '{}'", path.display())]
    ImageAssetMissing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// An image file exists but could not be decoded.
    #[error("decode image '{}': {source}", path.display())]
    ImageDecode {
        /// Path of the image.
        path: PathBuf,
        /// Underlying decode failure.
        #[source]
        source: image::ImageError,
    },

    /// Writing an output file failed.
    #[error("write '{}': {source}", path.display())]
    ImageWriteError {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO/encode failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppshotsError {
    /// Build a [`AppshotsError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AppshotsError::FontLoad`] value.
    pub fn font_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FontLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`AppshotsError::ImageWriteError`] value.
    pub fn image_write(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ImageWriteError {
            path: path.into(),
            source: source.into(),
        }
    }

    /// True for errors that abort the whole app (as opposed to one slot).
    pub fn is_config_level(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing { .. } | Self::ConfigMalformed { .. } | Self::NoLocalizationData { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
