use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::model::FontMapping,
    fonts::face::{FontFace, FontOrigin, ResolvedFont, ResolvedFonts},
    fonts::system::SystemFontCatalog,
    foundation::error::{AppshotsError, AppshotsResult},
};

/// Title weights tried on a variable font, heaviest first.
pub const TITLE_WEIGHTS: [f32; 5] = [1000.0, 950.0, 900.0, 800.0, 700.0];
/// Fixed body weight on a variable font.
pub const BODY_WEIGHT: f32 = 500.0;
/// Family subdirectory searched for static fonts when `font_path` is omitted.
pub const DEFAULT_STATIC_FAMILY_DIR: &str = "NotoSans";

const STATIC_SUBDIRS_PRIMARY: &[&str] = &["unhinted/ttf"];
const STATIC_SUBDIRS_SECONDARY: &[&str] = &["hinted/ttf", "googlefonts/ttf", "full/ttf"];

/// Inputs for resolving one language's fonts.
#[derive(Clone, Copy, Debug)]
pub struct FontRequest<'a> {
    pub language: &'a str,
    pub mapping: &'a FontMapping,
    pub title_size: f32,
    pub body_size: f32,
    /// Device-level fallback, used when the mapping has none.
    pub device_fallback: Option<&'a str>,
}

impl FontRequest<'_> {
    fn fallback_font_path(&self) -> Option<&str> {
        self.mapping
            .fallback_font_path
            .as_deref()
            .or(self.device_fallback)
            .filter(|p| !p.trim().is_empty())
    }
}

/// Shared state handed to each strategy.
pub struct StrategyCtx<'a> {
    pub fonts_root: &'a Path,
    pub system: &'a SystemFontCatalog,
}

/// One step of the resolution chain. Strategies never fail loudly: they
/// either produce both fonts or return `None`.
pub trait FontStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this step participates for `req` at all.
    fn applies(&self, _req: &FontRequest<'_>) -> bool {
        true
    }

    fn attempt(&self, req: &FontRequest<'_>, ctx: &StrategyCtx<'_>) -> Option<ResolvedFonts>;
}

/// Variable font instantiated by probing the `wght` axis.
pub struct VariableFontStrategy;

impl FontStrategy for VariableFontStrategy {
    fn name(&self) -> &'static str {
        "variable"
    }

    fn applies(&self, req: &FontRequest<'_>) -> bool {
        !req.mapping.use_system_font && req.mapping.variable_font.is_some()
    }

    fn attempt(&self, req: &FontRequest<'_>, ctx: &StrategyCtx<'_>) -> Option<ResolvedFonts> {
        let file = req.mapping.variable_font.as_deref()?;
        let path = match req.mapping.font_path.as_deref() {
            Some(dir) if !dir.is_empty() => ctx.fonts_root.join(dir).join(file),
            _ => ctx.fonts_root.join(file),
        };
        if !path.is_file() {
            tracing::info!(path = %path.display(), "variable font not found");
            return None;
        }
        tracing::info!(language = req.language, path = %path.display(), "loading variable font");

        match FontFace::load(&path) {
            Ok(face) => Some(instantiate_variable(face, req)),
            Err(e) => {
                tracing::warn!(error = %e, "variable font unusable");
                if req.mapping.use_system_font_fallback {
                    tracing::info!("trying system font fallback");
                    return SystemFontStrategy.attempt(req, ctx);
                }
                None
            }
        }
    }
}

fn instantiate_variable(face: FontFace, req: &FontRequest<'_>) -> ResolvedFonts {
    for weight in TITLE_WEIGHTS {
        if face.supports_weight(weight) && face.supports_weight(BODY_WEIGHT) {
            tracing::info!(weight, "variable font instantiated");
            return ResolvedFonts {
                title: ResolvedFont::with_weight(face.clone(), req.title_size, weight),
                body: ResolvedFont::with_weight(face, req.body_size, BODY_WEIGHT),
                origin: FontOrigin::Variable {
                    title_weight: Some(weight),
                },
            };
        }
        tracing::debug!(weight, axis = ?face.weight_axis(), "weight not available");
    }
    tracing::info!("all weight values failed, using variable font without axis control");
    ResolvedFonts::shared(
        face,
        req.title_size,
        req.body_size,
        FontOrigin::Variable { title_weight: None },
    )
}

/// Separate regular (body) and bold (title) files.
pub struct StaticFontStrategy;

impl FontStrategy for StaticFontStrategy {
    fn name(&self) -> &'static str {
        "static"
    }

    fn applies(&self, req: &FontRequest<'_>) -> bool {
        !req.mapping.use_system_font
    }

    fn attempt(&self, req: &FontRequest<'_>, ctx: &StrategyCtx<'_>) -> Option<ResolvedFonts> {
        let family_dir = req
            .mapping
            .font_path
            .as_deref()
            .unwrap_or(DEFAULT_STATIC_FAMILY_DIR);
        let regular_path = find_static_font(ctx.fonts_root, family_dir, &req.mapping.regular);
        let bold_path = find_static_font(ctx.fonts_root, family_dir, &req.mapping.bold);
        let (Some(regular_path), Some(bold_path)) = (regular_path, bold_path) else {
            tracing::info!(
                language = req.language,
                regular = %req.mapping.regular,
                bold = %req.mapping.bold,
                "static font files not found"
            );
            return None;
        };

        let loaded = FontFace::load(&regular_path).and_then(|r| Ok((r, FontFace::load(&bold_path)?)));
        match loaded {
            Ok((regular, bold)) => {
                tracing::info!(
                    language = req.language,
                    regular = %regular_path.display(),
                    bold = %bold_path.display(),
                    "static fonts loaded"
                );
                Some(ResolvedFonts {
                    title: ResolvedFont::new(bold, req.title_size),
                    body: ResolvedFont::new(regular, req.body_size),
                    origin: FontOrigin::Static,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "static fonts unusable");
                None
            }
        }
    }
}

/// Search `family_dir/`, `family_dir/unhinted/ttf/`, the fonts root, then the
/// remaining hinted/googlefonts/full `ttf` subdirectories.
pub fn find_static_font(fonts_root: &Path, family_dir: &str, file_name: &str) -> Option<PathBuf> {
    let family = fonts_root.join(family_dir);
    let mut candidates = vec![family.join(file_name)];
    candidates.extend(
        STATIC_SUBDIRS_PRIMARY
            .iter()
            .map(|sub| family.join(sub).join(file_name)),
    );
    candidates.push(fonts_root.join(file_name));
    candidates.extend(
        STATIC_SUBDIRS_SECONDARY
            .iter()
            .map(|sub| family.join(sub).join(file_name)),
    );
    candidates.into_iter().find(|p| p.is_file())
}

/// Single configured fallback file used for both roles.
pub struct FallbackFontStrategy;

impl FontStrategy for FallbackFontStrategy {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn applies(&self, req: &FontRequest<'_>) -> bool {
        req.fallback_font_path().is_some()
    }

    fn attempt(&self, req: &FontRequest<'_>, ctx: &StrategyCtx<'_>) -> Option<ResolvedFonts> {
        let rel = req.fallback_font_path()?;
        let path = ctx.fonts_root.join(rel);
        if !path.is_file() {
            tracing::info!(path = %path.display(), "fallback font file not found");
            return None;
        }
        match FontFace::load(&path) {
            Ok(face) => {
                tracing::info!(path = %path.display(), "fallback font loaded");
                Some(ResolvedFonts::shared(
                    face,
                    req.title_size,
                    req.body_size,
                    FontOrigin::Fallback,
                ))
            }
            Err(e) => {
                tracing::warn!(error = %e, "fallback font unusable");
                None
            }
        }
    }
}

/// Platform system fonts.
pub struct SystemFontStrategy;

impl FontStrategy for SystemFontStrategy {
    fn name(&self) -> &'static str {
        "system"
    }

    fn attempt(&self, req: &FontRequest<'_>, ctx: &StrategyCtx<'_>) -> Option<ResolvedFonts> {
        let face = ctx.system.first_loadable(req.language)?;
        Some(ResolvedFonts::shared(
            face,
            req.title_size,
            req.body_size,
            FontOrigin::System,
        ))
    }
}

/// Resolves title/body fonts through an ordered strategy chain ending in the
/// library default.
pub struct FontResolver {
    fonts_root: PathBuf,
    system: Arc<SystemFontCatalog>,
    strategies: Vec<Box<dyn FontStrategy>>,
}

impl std::fmt::Debug for FontResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResolver")
            .field("fonts_root", &self.fonts_root)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FontResolver {
    /// Standard chain: variable, static, fallback, system.
    pub fn new(fonts_root: impl Into<PathBuf>, system: Arc<SystemFontCatalog>) -> Self {
        Self::with_strategies(
            fonts_root,
            system,
            vec![
                Box::new(VariableFontStrategy),
                Box::new(StaticFontStrategy),
                Box::new(FallbackFontStrategy),
                Box::new(SystemFontStrategy),
            ],
        )
    }

    pub fn with_strategies(
        fonts_root: impl Into<PathBuf>,
        system: Arc<SystemFontCatalog>,
        strategies: Vec<Box<dyn FontStrategy>>,
    ) -> Self {
        Self {
            fonts_root: fonts_root.into(),
            system,
            strategies,
        }
    }

    pub fn fonts_root(&self) -> &Path {
        &self.fonts_root
    }

    /// Run the designed strategies only.
    pub fn try_resolve_designed(&self, req: &FontRequest<'_>) -> AppshotsResult<ResolvedFonts> {
        let ctx = StrategyCtx {
            fonts_root: &self.fonts_root,
            system: &self.system,
        };
        if req.mapping.use_system_font {
            tracing::info!(language = req.language, "using system font by configuration");
        }
        for strategy in &self.strategies {
            if !strategy.applies(req) {
                continue;
            }
            if let Some(fonts) = strategy.attempt(req, &ctx) {
                tracing::debug!(strategy = strategy.name(), "font strategy succeeded");
                return Ok(fonts);
            }
            tracing::debug!(strategy = strategy.name(), "font strategy fell through");
        }
        Err(AppshotsError::FontResolutionExhausted {
            language: req.language.to_string(),
        })
    }

    /// Resolve fonts for one language. Never fails; the library default is terminal.
    #[tracing::instrument(skip(self, req), fields(language = req.language))]
    pub fn resolve(&self, req: &FontRequest<'_>) -> ResolvedFonts {
        match self.try_resolve_designed(req) {
            Ok(fonts) => fonts,
            Err(e) => {
                tracing::info!(reason = %e, "loading default fonts");
                self.default_fonts(req)
            }
        }
    }

    fn default_fonts(&self, req: &FontRequest<'_>) -> ResolvedFonts {
        ResolvedFonts {
            title: ResolvedFont::library_default(req.title_size),
            body: ResolvedFont::library_default(req.body_size),
            origin: FontOrigin::Default,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/resolver.rs"]
mod tests;
