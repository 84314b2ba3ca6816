use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AppshotsError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        AppshotsError::ConfigMissing {
            path: PathBuf::from("cfg/plots_config.json")
        }
        .to_string()
        .contains("config not found: 'cfg/plots_config.json'")
    );
    assert!(
        AppshotsError::font_load("a.ttf", "bad table")
            .to_string()
            .contains("bad table")
    );
}

#[test]
fn config_level_classification() {
    let missing = AppshotsError::ConfigMissing {
        path: PathBuf::from("x"),
    };
    assert!(missing.is_config_level());
    let no_loc = AppshotsError::NoLocalizationData {
        language: "fr".into(),
        base_language: "ko".into(),
    };
    assert!(no_loc.is_config_level());
    let asset = AppshotsError::ImageAssetMissing {
        path: PathBuf::from("s1.png"),
    };
    assert!(!asset.is_config_level());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AppshotsError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn image_write_keeps_path_and_cause() {
    let err = AppshotsError::image_write("out/a.jpg", std::io::Error::other("disk full"));
    let msg = err.to_string();
    assert!(msg.contains("out/a.jpg"));
    assert!(msg.contains("disk full"));
}
