use super::*;

#[test]
fn phone_is_centered_and_bottom_anchored() {
    let p = position_phone((1242, 2688), (1000, 2000), 0.8, 180);
    assert_eq!((p.width, p.height), (800, 1600));
    assert_eq!(p.x, 221);
    assert_eq!(p.y, 2688 - 1600 + 180);
    assert_eq!(p.center_x(), 621);
}

#[test]
fn negative_offset_pulls_phone_up() {
    let p = position_phone((100, 100), (50, 50), 1.0, -30);
    assert_eq!(p.y, 20);
}

#[test]
fn oversized_phone_gets_negative_x() {
    let p = position_phone((100, 100), (301, 10), 1.0, 0);
    assert_eq!(p.width, 301);
    assert_eq!(p.x, -101);
}

#[test]
fn scaled_size_truncates_and_clamps() {
    let p = position_phone((10, 10), (3, 3), 0.5, 0);
    assert_eq!((p.width, p.height), (1, 1));
    let p = position_phone((10, 10), (999, 7), 0.1, 0);
    assert_eq!((p.width, p.height), (99, 1));
}

#[test]
fn configured_scale_keeps_double_precision() {
    let device: crate::config::model::DeviceSettings =
        serde_json::from_str(r#"{"scale_factor": 0.9}"#).unwrap();
    let p = position_phone((2000, 3000), (1290, 2796), device.scale_factor, 0);
    assert_eq!((p.width, p.height), (1161, 2516));
    assert_eq!(p.x, 419);
}

#[test]
fn text_constants() {
    assert_eq!(max_text_width(1242), 1042.0);
    assert_eq!(max_text_width(150), 0.0);
    assert_eq!(line_height(100), 120);
}

#[test]
fn block_is_vertically_centered_on_anchor() {
    // Two lines at pitch 120: height 220, top = 1000 - 110.
    let pos = center_text_block(&[400, 200], 600, 120, 1000);
    assert_eq!(pos, [(400, 890), (500, 1010)]);
}

#[test]
fn each_line_is_centered_independently() {
    let pos = center_text_block(&[101, 11, 0], 50, 60, 0);
    let xs: Vec<i64> = pos.iter().map(|(x, _)| *x).collect();
    assert_eq!(xs, [0, 45, 50]);
}

#[test]
fn empty_block_has_no_positions() {
    assert!(center_text_block(&[], 0, 120, 0).is_empty());
}
