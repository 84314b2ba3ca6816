use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use crate::fonts::face::FontFace;

/// Languages that try the CJK system font list first on macOS.
pub const CJK_LANGUAGES: [&str; 4] = ["ko", "ja", "zh-Hans", "zh-Hant"];

/// Known CJK-capable macOS font files, in lookup order.
pub const MACOS_CJK_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "/System/Library/Fonts/Supplemental/AppleSDGothicNeo.ttc",
    "/Library/Fonts/AppleSDGothicNeo.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/Supplemental/PingFang.ttc",
    "/System/Library/Fonts/PingFangSC-Regular.otf",
    "/System/Library/Fonts/PingFangTC-Regular.otf",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "/System/Library/Fonts/HiraginoSans-W3.otf",
    "/System/Library/Fonts/HiraginoSans-W6.otf",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
];

/// General macOS font files (CJK-capable first, then generic sans).
pub const MACOS_GENERAL_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "/System/Library/Fonts/Supplemental/AppleSDGothicNeo.ttc",
    "/Library/Fonts/AppleSDGothicNeo.ttc",
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Arial.ttf",
];

/// Font file names looked up in the system font directories elsewhere.
pub const COMMON_FONT_NAMES: &[&str] = &[
    "NotoSansCJK-Regular.ttf",
    "NotoSansCJK-Bold.ttf",
    "DejaVuSans.ttf",
    "Arial.ttf",
];

/// Host OS family as far as system-font probing is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }
}

/// One entry of a system font candidate list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SystemCandidate {
    /// Absolute file path.
    Path(PathBuf),
    /// File name searched for among discovered system fonts.
    Name(String),
}

/// Platform font catalog backed by a lazily built `fontdb` database.
///
/// The database is the only process-level cache; it holds face metadata, not
/// per-language resolution state.
pub struct SystemFontCatalog {
    platform: Platform,
    font_dirs: Option<Vec<PathBuf>>,
    db: OnceLock<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SystemFontCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemFontCatalog")
            .field("platform", &self.platform)
            .field("font_dirs", &self.font_dirs)
            .field("loaded", &self.db.get().is_some())
            .finish()
    }
}

impl Default for SystemFontCatalog {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl SystemFontCatalog {
    /// Catalog over the host's installed fonts.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            font_dirs: None,
            db: OnceLock::new(),
        }
    }

    /// Catalog restricted to explicit directories instead of the host fonts.
    pub fn with_font_dirs(platform: Platform, dirs: Vec<PathBuf>) -> Self {
        Self {
            platform,
            font_dirs: Some(dirs),
            db: OnceLock::new(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn db(&self) -> &usvg::fontdb::Database {
        self.db.get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            match &self.font_dirs {
                None => db.load_system_fonts(),
                Some(dirs) => {
                    for dir in dirs {
                        db.load_fonts_dir(dir);
                    }
                }
            }
            tracing::debug!(faces = db.len(), "system font database ready");
            db
        })
    }

    /// Ordered candidate list for `language` on this platform.
    pub fn candidates(&self, language: &str) -> Vec<SystemCandidate> {
        let as_paths = |list: &[&str]| {
            list.iter()
                .map(|p| SystemCandidate::Path(PathBuf::from(p)))
                .collect::<Vec<_>>()
        };
        match self.platform {
            Platform::MacOs => {
                let mut out = Vec::new();
                if CJK_LANGUAGES.contains(&language) {
                    out.extend(as_paths(MACOS_CJK_FONT_PATHS));
                }
                out.extend(as_paths(MACOS_GENERAL_FONT_PATHS));
                out
            }
            Platform::Other => COMMON_FONT_NAMES
                .iter()
                .map(|n| SystemCandidate::Name((*n).to_string()))
                .collect(),
        }
    }

    /// Load the first candidate that exists and parses.
    pub fn first_loadable(&self, language: &str) -> Option<FontFace> {
        for candidate in self.candidates(language) {
            match self.locate(&candidate) {
                Some(face) => {
                    tracing::info!(?candidate, family = face.family(), "loading system font");
                    return Some(face);
                }
                None => continue,
            }
        }
        None
    }

    /// Resolve a single candidate to a parsed face.
    pub fn locate(&self, candidate: &SystemCandidate) -> Option<FontFace> {
        match candidate {
            SystemCandidate::Path(path) => {
                if !path.is_file() {
                    return None;
                }
                load_logged(path, 0)
            }
            SystemCandidate::Name(name) => {
                let (path, index) = self.find_by_file_name(name)?;
                load_logged(&path, index)
            }
        }
    }

    fn find_by_file_name(&self, name: &str) -> Option<(PathBuf, u32)> {
        self.db().faces().find_map(|face| {
            let path = match &face.source {
                usvg::fontdb::Source::File(p) => p,
                usvg::fontdb::Source::SharedFile(p, _) => p,
                usvg::fontdb::Source::Binary(_) => return None,
            };
            let file_name = path.file_name()?.to_str()?;
            file_name
                .eq_ignore_ascii_case(name)
                .then(|| (path.clone(), face.index))
        })
    }
}

fn load_logged(path: &Path, index: u32) -> Option<FontFace> {
    let loaded = if index == 0 {
        FontFace::load(path)
    } else {
        std::fs::read(path)
            .map_err(|e| crate::AppshotsError::font_load(path, e.to_string()))
            .and_then(|bytes| FontFace::from_bytes(bytes, index))
    };
    match loaded {
        Ok(face) => Some(face),
        Err(e) => {
            tracing::debug!(error = %e, "system font candidate rejected");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/system.rs"]
mod tests;
