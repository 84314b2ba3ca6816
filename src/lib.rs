//! appshots batch-generates localized App Store preview images and store
//! metadata from per-app JSON configuration.
//!
//! For every app, device and language it:
//!
//! - loads the [`AppConfig`] and derives one [`DeviceConfig`] per screenshot slot
//! - resolves title/body fonts through the [`FontResolver`] chain
//! - wraps and centers the caption, composites the phone image over the
//!   background with the [`Compositor`], and writes a JPEG
//!
//! The [`Orchestrator`] drives this per app and isolates failures between apps.
#![forbid(unsafe_code)]

pub mod config;
pub mod fonts;
mod foundation;
pub mod layout;
pub mod metadata;
pub mod pipeline;
pub mod render;
pub mod text;

pub use crate::config::model::{
    AppConfig, DeviceConfig, DeviceSettings, FontMapping, LocalizationEntry, ScreenshotRef,
};
pub use crate::config::store::{ConfigStore, GeneratorSettings, load_config_file};
pub use crate::fonts::face::{FontFace, FontOrigin, ResolvedFont, ResolvedFonts};
pub use crate::fonts::resolver::{FontRequest, FontResolver, FontStrategy};
pub use crate::fonts::system::{Platform, SystemFontCatalog};
pub use crate::foundation::error::{AppshotsError, AppshotsResult};
pub use crate::metadata::limits::{LimitViolation, check_limits};
pub use crate::metadata::writer::{MetadataReport, MetadataWriter};
pub use crate::pipeline::orchestrator::{
    AppReport, BatchReport, GenerationStats, Orchestrator, PairReport,
};
pub use crate::render::compositor::Compositor;
