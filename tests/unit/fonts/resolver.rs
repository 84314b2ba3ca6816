use std::sync::Mutex;

use super::*;
use crate::fonts::{face::BUILTIN_FONT, system::Platform};

const STEM_VF: &str = "tests/data/fonts/StemTest-VF.ttf";

fn empty_catalog() -> Arc<SystemFontCatalog> {
    Arc::new(SystemFontCatalog::with_font_dirs(Platform::Other, vec![]))
}

/// Catalog whose only font is the embedded face saved as `DejaVuSans.ttf`.
fn single_font_catalog(dir: &Path) -> Arc<SystemFontCatalog> {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("DejaVuSans.ttf"), BUILTIN_FONT).unwrap();
    Arc::new(SystemFontCatalog::with_font_dirs(
        Platform::Other,
        vec![dir.to_path_buf()],
    ))
}

fn request<'a>(mapping: &'a FontMapping) -> FontRequest<'a> {
    FontRequest {
        language: "en-US",
        mapping,
        title_size: 100.0,
        body_size: 32.0,
        device_fallback: None,
    }
}

struct Recorder {
    label: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
    inner: Box<dyn FontStrategy>,
}

impl FontStrategy for Recorder {
    fn name(&self) -> &'static str {
        self.label
    }

    fn applies(&self, req: &FontRequest<'_>) -> bool {
        self.inner.applies(req)
    }

    fn attempt(&self, req: &FontRequest<'_>, ctx: &StrategyCtx<'_>) -> Option<ResolvedFonts> {
        self.log.lock().unwrap().push(self.label);
        self.inner.attempt(req, ctx)
    }
}

fn recording_resolver(
    root: &Path,
    catalog: Arc<SystemFontCatalog>,
    log: &Arc<Mutex<Vec<&'static str>>>,
) -> FontResolver {
    let wrap = |label, inner: Box<dyn FontStrategy>| -> Box<dyn FontStrategy> {
        Box::new(Recorder {
            label,
            log: Arc::clone(log),
            inner,
        })
    };
    FontResolver::with_strategies(
        root,
        catalog,
        vec![
            wrap("variable", Box::new(VariableFontStrategy)),
            wrap("static", Box::new(StaticFontStrategy)),
            wrap("fallback", Box::new(FallbackFontStrategy)),
            wrap("system", Box::new(SystemFontStrategy)),
        ],
    )
}

#[test]
fn missing_variable_font_falls_through_to_static() {
    let tmp = tempfile::tempdir().unwrap();
    let mapping = FontMapping {
        variable_font: Some("Missing-VF.ttf".into()),
        font_path: Some("Missing".into()),
        ..FontMapping::default()
    };
    let log = Arc::new(Mutex::new(Vec::new()));
    let resolver = recording_resolver(tmp.path(), empty_catalog(), &log);

    let fonts = resolver.resolve(&request(&mapping));
    assert_eq!(fonts.origin, FontOrigin::Default);
    assert!(!fonts.is_designed());
    assert_eq!(*log.lock().unwrap(), ["variable", "static", "system"]);
}

#[test]
fn unusable_variable_font_with_system_fallback_skips_static() {
    let tmp = tempfile::tempdir().unwrap();
    let family = tmp.path().join("NotoSans");
    std::fs::create_dir_all(&family).unwrap();
    std::fs::write(family.join("Broken-VF.ttf"), b"not a font").unwrap();
    std::fs::write(family.join("NotoSans-Regular.ttf"), BUILTIN_FONT).unwrap();
    std::fs::write(family.join("NotoSans-Bold.ttf"), BUILTIN_FONT).unwrap();

    let mapping = FontMapping {
        variable_font: Some("Broken-VF.ttf".into()),
        use_system_font_fallback: true,
        ..FontMapping::default()
    };
    let log = Arc::new(Mutex::new(Vec::new()));
    let catalog = single_font_catalog(&tmp.path().join("system"));
    let resolver = recording_resolver(tmp.path(), catalog, &log);

    let fonts = resolver.resolve(&request(&mapping));
    assert_eq!(fonts.origin, FontOrigin::System);
    assert_eq!(
        fonts.title.face().source().and_then(|p| p.file_name()),
        Some(std::ffi::OsStr::new("DejaVuSans.ttf"))
    );
    assert_eq!(*log.lock().unwrap(), ["variable"]);
}

#[test]
fn unusable_variable_font_without_system_fallback_uses_static() {
    let tmp = tempfile::tempdir().unwrap();
    let family = tmp.path().join("NotoSans");
    std::fs::create_dir_all(&family).unwrap();
    std::fs::write(family.join("Broken-VF.ttf"), b"not a font").unwrap();
    std::fs::write(family.join("NotoSans-Regular.ttf"), BUILTIN_FONT).unwrap();
    std::fs::write(family.join("NotoSans-Bold.ttf"), BUILTIN_FONT).unwrap();

    let mapping = FontMapping {
        variable_font: Some("Broken-VF.ttf".into()),
        ..FontMapping::default()
    };
    let log = Arc::new(Mutex::new(Vec::new()));
    let catalog = single_font_catalog(&tmp.path().join("system"));
    let resolver = recording_resolver(tmp.path(), catalog, &log);

    let fonts = resolver.resolve(&request(&mapping));
    assert_eq!(fonts.origin, FontOrigin::Static);
    assert_eq!(*log.lock().unwrap(), ["variable", "static"]);
}

#[test]
fn system_flag_skips_designed_fonts() {
    let tmp = tempfile::tempdir().unwrap();
    let mapping = FontMapping {
        variable_font: Some("VF.ttf".into()),
        use_system_font: true,
        fallback_font_path: Some("fallback/Any.ttf".into()),
        ..FontMapping::default()
    };
    let log = Arc::new(Mutex::new(Vec::new()));
    let resolver = recording_resolver(tmp.path(), empty_catalog(), &log);

    let _ = resolver.resolve(&request(&mapping));
    assert_eq!(*log.lock().unwrap(), ["fallback", "system"]);
}

#[test]
fn resolution_always_yields_both_roles_at_configured_sizes() {
    let tmp = tempfile::tempdir().unwrap();
    let resolver = FontResolver::new(tmp.path(), empty_catalog());
    let mapping = FontMapping::default();
    let fonts = resolver.resolve(&request(&mapping));
    assert_eq!(fonts.title.size_px(), 100.0);
    assert_eq!(fonts.body.size_px(), 32.0);
    assert!(matches!(
        resolver.try_resolve_designed(&request(&mapping)),
        Err(AppshotsError::FontResolutionExhausted { .. })
    ));
}

#[test]
fn unparsable_static_files_fall_through() {
    let tmp = tempfile::tempdir().unwrap();
    let family = tmp.path().join("NotoSans");
    std::fs::create_dir_all(&family).unwrap();
    std::fs::write(family.join("NotoSans-Regular.ttf"), b"not a font").unwrap();
    std::fs::write(family.join("NotoSans-Bold.ttf"), b"not a font").unwrap();

    let resolver = FontResolver::new(tmp.path(), empty_catalog());
    let fonts = resolver.resolve(&request(&FontMapping::default()));
    assert_eq!(fonts.origin, FontOrigin::Default);
}

#[test]
fn static_lookup_order() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let touch = |rel: &str| {
        let p = root.join(rel);
        std::fs::create_dir_all(p.parent().unwrap()).unwrap();
        std::fs::write(&p, b"").unwrap();
        p
    };

    let googlefonts = touch("Fam/googlefonts/ttf/A.ttf");
    assert_eq!(find_static_font(root, "Fam", "A.ttf"), Some(googlefonts));

    let at_root = touch("A.ttf");
    assert_eq!(find_static_font(root, "Fam", "A.ttf"), Some(at_root));

    let unhinted = touch("Fam/unhinted/ttf/A.ttf");
    assert_eq!(find_static_font(root, "Fam", "A.ttf"), Some(unhinted));

    let direct = touch("Fam/A.ttf");
    assert_eq!(find_static_font(root, "Fam", "A.ttf"), Some(direct));

    assert_eq!(find_static_font(root, "Fam", "B.ttf"), None);
}

#[test]
fn fallback_path_prefers_mapping_over_device() {
    let mapping = FontMapping {
        fallback_font_path: Some("m.ttf".into()),
        ..FontMapping::default()
    };
    let req = FontRequest {
        device_fallback: Some("d.ttf"),
        ..request(&mapping)
    };
    assert_eq!(req.fallback_font_path(), Some("m.ttf"));

    let plain = FontMapping::default();
    let req = FontRequest {
        device_fallback: Some("d.ttf"),
        ..request(&plain)
    };
    assert_eq!(req.fallback_font_path(), Some("d.ttf"));

    let req = FontRequest {
        device_fallback: Some("  "),
        ..request(&plain)
    };
    assert_eq!(req.fallback_font_path(), None);
}

#[test]
fn missing_fallback_file_fails_silently() {
    let tmp = tempfile::tempdir().unwrap();
    let mapping = FontMapping {
        fallback_font_path: Some("nowhere/X.ttf".into()),
        ..FontMapping::default()
    };
    let ctx = StrategyCtx {
        fonts_root: tmp.path(),
        system: &SystemFontCatalog::with_font_dirs(Platform::Other, vec![]),
    };
    assert!(FallbackFontStrategy.attempt(&request(&mapping), &ctx).is_none());
}

#[test]
fn static_and_fallback_resolve_with_a_real_font() {
    let tmp = tempfile::tempdir().unwrap();
    let family = tmp.path().join("NotoSans");
    std::fs::create_dir_all(family.join("unhinted/ttf")).unwrap();
    std::fs::write(family.join("NotoSans-Regular.ttf"), BUILTIN_FONT).unwrap();
    std::fs::write(family.join("unhinted/ttf/NotoSans-Bold.ttf"), BUILTIN_FONT).unwrap();
    std::fs::write(tmp.path().join("Fallback.ttf"), BUILTIN_FONT).unwrap();

    let resolver = FontResolver::new(tmp.path(), empty_catalog());
    let fonts = resolver.resolve(&request(&FontMapping::default()));
    assert_eq!(fonts.origin, FontOrigin::Static);
    assert_eq!(
        fonts.title.face().source(),
        Some(family.join("unhinted/ttf/NotoSans-Bold.ttf").as_path())
    );

    let fallback_only = FontMapping {
        font_path: Some("Elsewhere".into()),
        fallback_font_path: Some("Fallback.ttf".into()),
        ..FontMapping::default()
    };
    let fonts = resolver.resolve(&request(&fallback_only));
    assert_eq!(fonts.origin, FontOrigin::Fallback);
}

#[test]
fn omitted_font_path_searches_noto_sans_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let family = tmp.path().join(DEFAULT_STATIC_FAMILY_DIR);
    std::fs::create_dir_all(&family).unwrap();
    std::fs::write(family.join("Brand-Regular.ttf"), BUILTIN_FONT).unwrap();
    std::fs::write(family.join("Brand-Bold.ttf"), BUILTIN_FONT).unwrap();

    let mapping: FontMapping =
        serde_json::from_str(r#"{"regular": "Brand-Regular.ttf", "bold": "Brand-Bold.ttf"}"#)
            .unwrap();
    assert_eq!(mapping.font_path, None);

    let resolver = FontResolver::new(tmp.path(), empty_catalog());
    let fonts = resolver.resolve(&request(&mapping));
    assert_eq!(fonts.origin, FontOrigin::Static);
    assert_eq!(
        fonts.body.face().source(),
        Some(family.join("Brand-Regular.ttf").as_path())
    );
}

#[test]
fn variable_font_takes_heaviest_title_weight_on_its_axis() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::copy(STEM_VF, tmp.path().join("Stem-VF.ttf")).unwrap();

    let mapping = FontMapping {
        variable_font: Some("Stem-VF.ttf".into()),
        font_path: None,
        ..FontMapping::default()
    };
    let resolver = FontResolver::new(tmp.path(), empty_catalog());
    let fonts = resolver.resolve(&request(&mapping));
    assert_eq!(
        fonts.origin,
        FontOrigin::Variable {
            title_weight: Some(900.0)
        }
    );
    assert_eq!(fonts.title.axis_weight(), Some(900.0));
    assert_eq!(fonts.body.axis_weight(), Some(BODY_WEIGHT));
}

#[test]
fn variable_font_without_weight_axis_loads_without_weights() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("VF.ttf"), BUILTIN_FONT).unwrap();

    let mapping = FontMapping {
        variable_font: Some("VF.ttf".into()),
        font_path: None,
        ..FontMapping::default()
    };
    let resolver = FontResolver::new(tmp.path(), empty_catalog());
    let fonts = resolver.resolve(&request(&mapping));
    assert_eq!(fonts.origin, FontOrigin::Variable { title_weight: None });
    assert_eq!(fonts.title.axis_weight(), None);
    assert_eq!(fonts.title.size_px(), 100.0);
    assert_eq!(fonts.body.size_px(), 32.0);
}
