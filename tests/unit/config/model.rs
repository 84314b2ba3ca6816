use super::*;

fn minimal_doc() -> &'static str {
    r#"{
        "app_name": "Plots",
        "devices": {
            "iphone": {
                "fastlane_device_identifier": "APP_IPHONE_67",
                "screenshots": [{"filename": "s1.png"}, {"filename": "s2.png"}]
            }
        },
        "localization": {
            "en-US": {"screenshot_texts": ["Hello"]}
        }
    }"#
}

#[test]
fn missing_device_fields_take_documented_defaults() {
    let cfg: AppConfig = serde_json::from_str(minimal_doc()).unwrap();
    let dev = &cfg.devices["iphone"];
    assert_eq!(dev.phone_y_offset, 180);
    assert_eq!(dev.text_y_offset, -120);
    assert_eq!(dev.background_image, "iphone_background.jpg");
    assert!((dev.scale_factor - 0.8).abs() < f64::EPSILON);
    assert_eq!(dev.font_size_title, 100);
    assert_eq!(dev.font_size_body, 32);
    assert_eq!(dev.fallback_font_path, None);
    assert_eq!(cfg.base_language, "ko");
    assert_eq!(cfg.output_base_dir, "output");
}

#[test]
fn absent_font_mapping_defaults_to_noto_sans() {
    let cfg: AppConfig = serde_json::from_str(minimal_doc()).unwrap();
    let fm = &cfg.localization["en-US"].font_mapping;
    assert_eq!(fm.regular, "NotoSans-Regular.ttf");
    assert_eq!(fm.bold, "NotoSans-Bold.ttf");
    assert_eq!(fm.font_path.as_deref(), Some("NotoSans"));
    assert!(!fm.use_system_font);
}

#[test]
fn partial_font_mapping_keeps_other_defaults() {
    let fm: FontMapping =
        serde_json::from_str(r#"{"variable_font": "Pretendard.ttf", "use_system_font_fallback": true}"#)
            .unwrap();
    assert_eq!(fm.variable_font.as_deref(), Some("Pretendard.ttf"));
    assert!(fm.use_system_font_fallback);
    assert_eq!(fm.font_path, None);
    assert_eq!(fm.regular, "NotoSans-Regular.ttf");
}

#[test]
fn device_and_language_order_follows_declaration() {
    let cfg: AppConfig = serde_json::from_str(
        r#"{
            "app_name": "x",
            "devices": {"ipad": {}, "iphone": {}},
            "localization": {"zh-Hant": {}, "en-US": {}, "ko": {}}
        }"#,
    )
    .unwrap();
    let devices: Vec<_> = cfg.devices.keys().cloned().collect();
    let langs: Vec<_> = cfg.localization.keys().cloned().collect();
    assert_eq!(devices, ["ipad", "iphone"]);
    assert_eq!(langs, ["zh-Hant", "en-US", "ko"]);
}

#[test]
fn missing_texts_become_empty_slots() {
    let cfg: AppConfig = serde_json::from_str(minimal_doc()).unwrap();
    let configs = DeviceConfig::build_all(&cfg.devices["iphone"], &cfg.localization["en-US"]);
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0].filename, "s1.png");
    assert_eq!(configs[0].text, "Hello");
    assert_eq!(configs[1].filename, "s2.png");
    assert_eq!(configs[1].text, "");
    assert_eq!(configs[1].fastlane_device_identifier, "APP_IPHONE_67");
}

#[test]
fn extra_texts_are_ignored() {
    let device = DeviceSettings {
        screenshots: vec![ScreenshotRef {
            filename: "only.png".into(),
        }],
        ..DeviceSettings::default()
    };
    let entry = LocalizationEntry {
        screenshot_texts: vec!["a".into(), "b".into(), "c".into()],
        ..LocalizationEntry::default()
    };
    let configs = DeviceConfig::build_all(&device, &entry);
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].text, "a");
}
