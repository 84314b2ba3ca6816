use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    config::{
        model::AppConfig,
        store::{ConfigStore, GeneratorSettings},
    },
    fonts::{
        resolver::{FontRequest, FontResolver},
        system::SystemFontCatalog,
    },
    foundation::error::{AppshotsError, AppshotsResult},
    render::compositor::{self, Compositor},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated slot counters.
pub struct GenerationStats {
    /// Screenshot slots visited.
    pub slots_total: u64,
    /// Slots that produced a JPEG.
    pub slots_written: u64,
    /// Slots skipped because of an asset, render or write failure.
    pub slots_skipped: u64,
}

impl GenerationStats {
    fn absorb(&mut self, other: GenerationStats) {
        self.slots_total += other.slots_total;
        self.slots_written += other.slots_written;
        self.slots_skipped += other.slots_skipped;
    }
}

/// Result of one (device, language) pass.
#[derive(Clone, Debug, Default)]
pub struct PairReport {
    pub device: String,
    pub language: String,
    /// Written files in slot order.
    pub written: Vec<PathBuf>,
    pub stats: GenerationStats,
}

/// Result of generating every pair for one app.
#[derive(Clone, Debug, Default)]
pub struct AppReport {
    pub app: String,
    /// Directory that received this app's previews.
    pub output_dir: PathBuf,
    pub pairs: Vec<PairReport>,
    pub stats: GenerationStats,
}

impl AppReport {
    /// All written files, devices outer and languages inner.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.pairs
            .iter()
            .flat_map(|p| p.written.iter().map(PathBuf::as_path))
    }
}

/// Outcome per app of a batch run. One app's failure never affects another.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub apps: Vec<(String, AppshotsResult<AppReport>)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &AppReport> {
        self.apps.iter().filter_map(|(_, r)| r.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &AppshotsError)> {
        self.apps
            .iter()
            .filter_map(|(name, r)| r.as_ref().err().map(|e| (name.as_str(), e)))
    }

    /// Apps whose configuration was rejected before any slot was attempted.
    pub fn config_failures(&self) -> impl Iterator<Item = &str> {
        self.failed()
            .filter(|(_, e)| e.is_config_level())
            .map(|(name, _)| name)
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Drives config loading, font resolution, layout and compositing for apps.
#[derive(Debug)]
pub struct Orchestrator {
    settings: GeneratorSettings,
    store: ConfigStore,
    fonts: FontResolver,
}

impl Orchestrator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self::with_system_fonts(settings, Arc::new(SystemFontCatalog::default()))
    }

    /// Use an explicit system-font catalog (tests pin this to a fixed set).
    pub fn with_system_fonts(settings: GeneratorSettings, system: Arc<SystemFontCatalog>) -> Self {
        let store = ConfigStore::new(&settings.config_dir);
        let fonts = FontResolver::new(&settings.fonts_dir, system);
        Self {
            settings,
            store,
            fonts,
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Generate every device x language pair for `app`.
    ///
    /// Config errors abort the app before anything is written. Otherwise the
    /// app's output directory is wiped and regenerated; slot failures are
    /// logged and counted, never returned.
    #[tracing::instrument(skip(self))]
    pub fn generate_app(&self, app: &str) -> AppshotsResult<AppReport> {
        let config = self.store.load(app)?;
        if config.devices.is_empty() {
            return Err(AppshotsError::validation(format!(
                "app '{app}' declares no devices"
            )));
        }
        if config.localization.is_empty() {
            return Err(AppshotsError::validation(format!(
                "app '{app}' declares no languages"
            )));
        }

        let output_dir = self.settings.output_base(&config).join(&config.app_name);
        wipe_dir(&output_dir)?;

        let mut report = AppReport {
            app: config.app_name.clone(),
            output_dir: output_dir.clone(),
            ..AppReport::default()
        };
        for device in config.devices.keys() {
            for language in config.localization.keys() {
                tracing::info!(
                    app = %config.app_name,
                    device = %device,
                    language = %language,
                    "generating previews"
                );
                let pair = self.generate_pair(app, &config, device, language, &output_dir)?;
                report.stats.absorb(pair.stats);
                report.pairs.push(pair);
            }
        }
        tracing::info!(
            app = %config.app_name,
            written = report.stats.slots_written,
            skipped = report.stats.slots_skipped,
            "app previews complete"
        );
        Ok(report)
    }

    /// Generate all slots of one (device, language) pair into
    /// `{output_dir}/{device}/{language}/`.
    #[tracing::instrument(skip(self, config, output_dir))]
    pub fn generate_pair(
        &self,
        app: &str,
        config: &AppConfig,
        device: &str,
        language: &str,
        output_dir: &Path,
    ) -> AppshotsResult<PairReport> {
        let slots = config.device_configs(device, language)?;
        let entry = config.localization_for(language)?;
        let device_settings = config.devices.get(device).ok_or_else(|| {
            AppshotsError::validation(format!("unknown device '{device}'"))
        })?;

        let mut report = PairReport {
            device: device.to_string(),
            language: language.to_string(),
            ..PairReport::default()
        };
        if slots.is_empty() {
            return Ok(report);
        }

        let fonts = self.fonts.resolve(&FontRequest {
            language,
            mapping: &entry.font_mapping,
            title_size: device_settings.font_size_title as f32,
            body_size: device_settings.font_size_body as f32,
            device_fallback: device_settings.fallback_font_path.as_deref(),
        });
        tracing::debug!(origin = ?fonts.origin, "fonts resolved");

        let images_dir = self.settings.images_dir(app);
        let background = match compositor::load_background(
            &images_dir.join(&device_settings.background_image),
        ) {
            Ok(bg) => bg,
            Err(e) => {
                tracing::warn!(error = %e, "background unusable, skipping pair");
                report.stats.slots_total = slots.len() as u64;
                report.stats.slots_skipped = slots.len() as u64;
                return Ok(report);
            }
        };

        let pair_dir = output_dir.join(device).join(language);
        let mut compositor = Compositor::new();
        for (idx, slot) in slots.iter().enumerate() {
            report.stats.slots_total += 1;
            let out_path = pair_dir.join(compositor::output_filename(slot, idx + 1));
            let written = compositor::load_phone(&images_dir.join(&slot.filename))
                .and_then(|phone| compositor.render(slot, &fonts, &background, &phone))
                .and_then(|image| compositor.save(&image, &out_path));
            match written {
                Ok(path) => {
                    report.stats.slots_written += 1;
                    report.written.push(path);
                }
                Err(e) => {
                    tracing::warn!(slot = idx + 1, file = %slot.filename, error = %e, "slot skipped");
                    report.stats.slots_skipped += 1;
                }
            }
        }
        Ok(report)
    }

    /// Generate every app found in the config directory, isolating failures.
    pub fn generate_all(&self) -> AppshotsResult<BatchReport> {
        let apps = self.store.available_apps()?;
        Ok(self.generate_apps(&apps))
    }

    /// Generate the named apps in order, isolating failures.
    pub fn generate_apps(&self, apps: &[String]) -> BatchReport {
        let mut batch = BatchReport::default();
        for app in apps {
            let result = self.generate_app(app);
            match &result {
                Err(e) if e.is_config_level() => {
                    tracing::error!(app = %app, error = %e, "app configuration rejected");
                }
                Err(e) => tracing::error!(app = %app, error = %e, "app generation failed"),
                Ok(_) => {}
            }
            batch.apps.push((app.clone(), result));
        }
        batch
    }
}

fn wipe_dir(dir: &Path) -> AppshotsResult<()> {
    if dir.is_dir() {
        tracing::info!(path = %dir.display(), "removing existing output directory");
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("remove output dir '{}'", dir.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
