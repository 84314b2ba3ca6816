use std::{
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
};

use anyhow::Context;

use crate::foundation::error::{AppshotsError, AppshotsResult};

const WGHT: [u8; 4] = *b"wght";

/// Face shipped inside the binary and used when no other font resolves.
pub const BUILTIN_FONT: &[u8] = include_bytes!("../../assets/fonts/Tuffy.ttf");
const BUILTIN_FAMILY: &str = "Tuffy";
const BUILTIN_WEIGHT: f32 = 500.0;

/// A parsed font face: raw bytes plus the metadata the resolver needs.
#[derive(Clone)]
pub struct FontFace {
    source: Option<PathBuf>,
    bytes: Arc<Vec<u8>>,
    index: u32,
    family: String,
    weight: f32,
    weight_axis: Option<(f32, f32)>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("source", &self.source)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("weight_axis", &self.weight_axis)
            .finish()
    }
}

impl FontFace {
    /// Read and parse a font file (first face of a collection).
    pub fn load(path: &Path) -> AppshotsResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font '{}'", path.display()))
            .map_err(|e| AppshotsError::font_load(path, format!("{e:#}")))?;
        Self::inspect(bytes, 0, Some(path.to_path_buf()))
    }

    /// Parse font bytes and select face `index`.
    pub fn from_bytes(bytes: Vec<u8>, index: u32) -> AppshotsResult<Self> {
        Self::inspect(bytes, index, None)
    }

    /// The embedded library default face.
    pub fn builtin() -> Self {
        static BUILTIN: OnceLock<FontFace> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                Self::from_bytes(BUILTIN_FONT.to_vec(), 0).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "embedded font metadata unreadable");
                    Self {
                        source: None,
                        bytes: Arc::new(BUILTIN_FONT.to_vec()),
                        index: 0,
                        family: BUILTIN_FAMILY.to_string(),
                        weight: BUILTIN_WEIGHT,
                        weight_axis: None,
                    }
                })
            })
            .clone()
    }

    fn inspect(bytes: Vec<u8>, index: u32, source: Option<PathBuf>) -> AppshotsResult<Self> {
        let label = source
            .clone()
            .unwrap_or_else(|| PathBuf::from("<memory>"));
        let mut collection =
            parley::fontique::Collection::new(parley::fontique::CollectionOptions {
                shared: false,
                system_fonts: false,
            });
        let families =
            collection.register_fonts(parley::fontique::Blob::from(bytes.clone()), None);

        let mut selected = None;
        for (family_id, infos) in &families {
            if let Some(info) = infos.iter().find(|i| i.index() == index) {
                selected = Some((*family_id, info.clone()));
                break;
            }
        }
        let Some((family_id, info)) = selected else {
            return Err(AppshotsError::font_load(
                label,
                format!("no parsable face at index {index}"),
            ));
        };
        let family = collection
            .family_name(family_id)
            .map(str::to_string)
            .ok_or_else(|| AppshotsError::font_load(&label, "registered face has no family name"))?;

        let weight_axis = info
            .axes()
            .iter()
            .find(|axis| axis.tag.to_be_bytes() == WGHT)
            .map(|axis| (axis.min, axis.max));

        Ok(Self {
            source,
            bytes: Arc::new(bytes),
            index,
            family,
            weight: info.weight().value(),
            weight_axis,
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Primary family name as reported by the font's name table.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Weight of the face's default instance.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// `(min, max)` of the `wght` variation axis, if the face is variable.
    pub fn weight_axis(&self) -> Option<(f32, f32)> {
        self.weight_axis
    }

    /// Whether the face can be instantiated at `weight` via its `wght` axis.
    pub fn supports_weight(&self, weight: f32) -> bool {
        self.weight_axis
            .is_some_and(|(min, max)| weight >= min && weight <= max)
    }
}

/// Which step of the resolution chain produced a [`ResolvedFonts`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FontOrigin {
    /// Variable font; `title_weight` is `None` when instantiated without axis control.
    Variable { title_weight: Option<f32> },
    /// Separate regular/bold files.
    Static,
    /// Single configured fallback file.
    Fallback,
    /// Platform system font.
    System,
    /// Embedded library default face.
    Default,
}

/// One font role (title or body) at a fixed pixel size.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    face: FontFace,
    size_px: f32,
    weight: Option<f32>,
}

impl ResolvedFont {
    pub fn new(face: FontFace, size_px: f32) -> Self {
        Self {
            face,
            size_px,
            weight: None,
        }
    }

    /// Instantiate a variable face at `weight` on its `wght` axis.
    pub fn with_weight(face: FontFace, size_px: f32, weight: f32) -> Self {
        Self {
            face,
            size_px,
            weight: Some(weight),
        }
    }

    /// The embedded default face at `size_px`.
    pub fn library_default(size_px: f32) -> Self {
        Self::new(FontFace::builtin(), size_px)
    }

    pub fn face(&self) -> &FontFace {
        &self.face
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Weight requested for layout: the axis value, else the face's own weight.
    pub fn layout_weight(&self) -> f32 {
        self.weight.unwrap_or(self.face.weight)
    }

    /// Requested `wght` axis value, `None` for the face's default instance.
    pub fn axis_weight(&self) -> Option<f32> {
        self.weight
    }
}

/// Title and body fonts for one language pass.
#[derive(Clone, Debug)]
pub struct ResolvedFonts {
    pub title: ResolvedFont,
    pub body: ResolvedFont,
    pub origin: FontOrigin,
}

impl ResolvedFonts {
    /// Same face for both roles at their respective sizes.
    pub fn shared(face: FontFace, title_size: f32, body_size: f32, origin: FontOrigin) -> Self {
        Self {
            title: ResolvedFont::new(face.clone(), title_size),
            body: ResolvedFont::new(face, body_size),
            origin,
        }
    }

    /// True when a designed (non-default) font was resolved.
    pub fn is_designed(&self) -> bool {
        self.origin != FontOrigin::Default
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/face.rs"]
mod tests;
