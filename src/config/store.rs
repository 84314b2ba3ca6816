use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    config::model::{AppConfig, DeviceConfig, LocalizationEntry},
    foundation::error::{AppshotsError, AppshotsResult},
};

const CONFIG_SUFFIX: &str = "_config.json";

/// Filesystem layout used by a generation run.
///
/// Everything is derived from a project root unless overridden:
/// configs in `resources/config/`, fonts in `resources/fonts/`, per-app image
/// assets in `resources/{app_lower}/`, outputs under `{root}/{output_base_dir}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Project root; output directories are resolved against it.
    pub root: PathBuf,
    /// Parent of per-app image asset directories.
    pub resources_dir: PathBuf,
    /// Directory holding `{app}_config.json` documents.
    pub config_dir: PathBuf,
    /// Root of the font tree.
    pub fonts_dir: PathBuf,
}

impl GeneratorSettings {
    /// Conventional layout under `root`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let resources_dir = root.join("resources");
        Self {
            config_dir: resources_dir.join("config"),
            fonts_dir: resources_dir.join("fonts"),
            resources_dir,
            root,
        }
    }

    /// Directory holding background and phone images for `app_name`.
    pub fn images_dir(&self, app_name: &str) -> PathBuf {
        self.resources_dir.join(app_name.to_lowercase())
    }

    /// Output base directory for a loaded app config.
    pub fn output_base(&self, config: &AppConfig) -> PathBuf {
        self.root.join(&config.output_base_dir)
    }
}

/// Read-only access to per-app JSON configuration.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    config_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Conventional config path for `app_name` (`{app_lower}_config.json`).
    pub fn path_for(&self, app_name: &str) -> PathBuf {
        self.config_dir
            .join(format!("{}{CONFIG_SUFFIX}", app_name.to_lowercase()))
    }

    /// App names (file stems without `_config`) found in the config dir, sorted.
    pub fn available_apps(&self) -> AppshotsResult<Vec<String>> {
        let rd = std::fs::read_dir(&self.config_dir).with_context(|| {
            format!("list config dir '{}'", self.config_dir.display())
        })?;
        let mut apps = Vec::new();
        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(stem) = name.strip_suffix(CONFIG_SUFFIX)
                && !stem.is_empty()
            {
                apps.push(stem.to_string());
            }
        }
        apps.sort();
        Ok(apps)
    }

    /// Resolve a user selector: case-insensitive app name or 1-based index.
    pub fn resolve_app(&self, selector: &str) -> AppshotsResult<String> {
        let apps = self.available_apps()?;
        if let Some(found) = apps.iter().find(|a| a.eq_ignore_ascii_case(selector)) {
            return Ok(found.clone());
        }
        if let Ok(idx) = selector.trim().parse::<usize>()
            && idx >= 1
            && let Some(found) = apps.get(idx - 1)
        {
            return Ok(found.clone());
        }
        Err(AppshotsError::validation(format!(
            "app '{selector}' not found; available: [{}]",
            apps.join(", ")
        )))
    }

    /// Load and validate the config for `app_name`.
    #[tracing::instrument(skip(self))]
    pub fn load(&self, app_name: &str) -> AppshotsResult<AppConfig> {
        let path = self.path_for(app_name);
        load_config_file(&path)
    }
}

/// Load and validate a config document from an explicit path.
pub fn load_config_file(path: &Path) -> AppshotsResult<AppConfig> {
    if !path.is_file() {
        return Err(AppshotsError::ConfigMissing {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let config: AppConfig =
        serde_json::from_str(&text).map_err(|source| AppshotsError::ConfigMalformed {
            path: path.to_path_buf(),
            source,
        })?;
    validate(&config)?;
    tracing::debug!(
        app = %config.app_name,
        devices = config.devices.len(),
        languages = config.localization.len(),
        "config loaded"
    );
    Ok(config)
}

fn validate(config: &AppConfig) -> AppshotsResult<()> {
    if config.app_name.trim().is_empty() {
        return Err(AppshotsError::validation("app_name must be non-empty"));
    }
    for (device_id, device) in &config.devices {
        let s = device.scale_factor;
        if !s.is_finite() || s <= 0.0 || s > 1.0 {
            return Err(AppshotsError::validation(format!(
                "device '{device_id}' scale_factor must be in (0, 1], got {s}"
            )));
        }
        if device.font_size_title == 0 || device.font_size_body == 0 {
            return Err(AppshotsError::validation(format!(
                "device '{device_id}' font sizes must be > 0"
            )));
        }
    }
    Ok(())
}

impl AppConfig {
    /// Exact-language entry, else the base-language entry (logged), else an error.
    pub fn localization_for(&self, language: &str) -> AppshotsResult<&LocalizationEntry> {
        localization_for(self, language, &self.base_language)
    }

    /// Screenshot slots for one (device, language) pair.
    pub fn device_configs(&self, device_id: &str, language: &str) -> AppshotsResult<Vec<DeviceConfig>> {
        let device = self.devices.get(device_id).ok_or_else(|| {
            AppshotsError::validation(format!("unknown device '{device_id}'"))
        })?;
        let entry = self.localization_for(language)?;
        let configs = DeviceConfig::build_all(device, entry);
        tracing::info!(
            count = configs.len(),
            language,
            device = device_id,
            "screenshot config loaded"
        );
        Ok(configs)
    }
}

/// Look up `language`, falling back to `base_language`.
pub fn localization_for<'a>(
    config: &'a AppConfig,
    language: &str,
    base_language: &str,
) -> AppshotsResult<&'a LocalizationEntry> {
    if let Some(entry) = config.localization.get(language) {
        return Ok(entry);
    }
    if let Some(entry) = config.localization.get(base_language) {
        tracing::warn!(
            language,
            base_language,
            "no localization data for language, using base language"
        );
        return Ok(entry);
    }
    Err(AppshotsError::NoLocalizationData {
        language: language.to_string(),
        base_language: base_language.to_string(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/config/store.rs"]
mod tests;
