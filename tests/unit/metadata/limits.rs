use super::*;

fn config(name: &str, keywords: &str) -> AppConfig {
    serde_json::from_value(serde_json::json!({
        "app_name": "x",
        "localization": {
            "ko": {"name": name, "keywords": keywords},
            "en-US": {"name": "ok"}
        }
    }))
    .unwrap()
}

#[test]
fn within_limits_has_no_violations() {
    assert!(check_limits(&config("짧은 이름", "a,b,c")).is_empty());
}

#[test]
fn counts_scalar_values_not_bytes() {
    // 30 Hangul syllables are 90 bytes but exactly at the limit.
    let name = "가".repeat(30);
    assert!(check_limits(&config(&name, "")).is_empty());
}

#[test]
fn reports_each_overflowing_field() {
    let v = check_limits(&config(&"n".repeat(31), &"k".repeat(105)));
    assert_eq!(v.len(), 2);
    assert_eq!(v[0].language, "ko");
    assert_eq!(v[0].field, LimitedField::Name);
    assert_eq!(v[0].excess(), 1);
    assert_eq!(v[1].field, LimitedField::Keywords);
    assert_eq!((v[1].current, v[1].limit), (105, 100));
    assert_eq!(v[1].field.to_string(), "keywords");
}
