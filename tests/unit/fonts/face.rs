use super::*;

const STEM_VF: &str = "tests/data/fonts/StemTest-VF.ttf";

#[test]
fn load_rejects_missing_and_garbage_files() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = FontFace::load(&tmp.path().join("none.ttf")).unwrap_err();
    assert!(matches!(missing, AppshotsError::FontLoad { .. }));

    let garbage = tmp.path().join("garbage.ttf");
    std::fs::write(&garbage, b"definitely not sfnt data").unwrap();
    let err = FontFace::load(&garbage).unwrap_err();
    assert!(err.to_string().contains("garbage.ttf"));
}

#[test]
fn builtin_face_parses_embedded_bytes() {
    let face = FontFace::builtin();
    assert_eq!(face.family(), BUILTIN_FAMILY);
    assert_eq!(face.weight(), BUILTIN_WEIGHT);
    assert_eq!(face.weight_axis(), None);
    assert_eq!(face.bytes().len(), BUILTIN_FONT.len());
    assert!(face.source().is_none());

    // Repeated calls share one buffer.
    assert!(Arc::ptr_eq(face.bytes(), FontFace::builtin().bytes()));
}

#[test]
fn variable_face_reports_weight_axis() {
    let face = FontFace::load(Path::new(STEM_VF)).unwrap();
    assert_eq!(face.family(), "Stem Test");
    assert_eq!(face.weight_axis(), Some((100.0, 900.0)));
    assert!(face.supports_weight(900.0));
    assert!(face.supports_weight(100.0));
    assert!(!face.supports_weight(950.0));
}

#[test]
fn weight_support_follows_axis_range() {
    let mut face = FontFace::builtin();
    assert!(!face.supports_weight(400.0));

    face.weight_axis = Some((100.0, 900.0));
    assert!(face.supports_weight(900.0));
    assert!(face.supports_weight(500.0));
    assert!(!face.supports_weight(950.0));
}

#[test]
fn resolved_font_layout_weight_prefers_axis_value() {
    let face = FontFace::builtin();
    let own = face.weight();
    let plain = ResolvedFont::new(face.clone(), 40.0);
    assert_eq!(plain.layout_weight(), own);
    assert_eq!(plain.axis_weight(), None);

    let weighted = ResolvedFont::with_weight(face, 40.0, 900.0);
    assert_eq!(weighted.layout_weight(), 900.0);
    assert_eq!(weighted.axis_weight(), Some(900.0));
}

#[test]
fn library_default_uses_builtin_face() {
    let font = ResolvedFont::library_default(20.0);
    assert_eq!(font.face().family(), BUILTIN_FAMILY);
    assert_eq!(font.layout_weight(), BUILTIN_WEIGHT);
    assert_eq!(font.size_px(), 20.0);
}
