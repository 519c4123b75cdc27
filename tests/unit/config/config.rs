use super::*;

#[test]
fn defaults_give_ninety_frames_per_round() {
    let cfg = RenderConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.frames_per_round().unwrap(), 90);
    assert_eq!(cfg.title_frames().unwrap(), 90);
    assert_eq!(cfg.style.canvas.width, 1080);
    assert_eq!(cfg.style.canvas.height, 1920);
    assert_eq!(cfg.ink_threshold, 80);
}

#[test]
fn validate_rejects_unusable_values() {
    let cfg = RenderConfig {
        duration_per_round_secs: 0.0,
        ..RenderConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ReelError::Config(_))));

    let cfg = RenderConfig {
        fps: 0,
        ..RenderConfig::default()
    };
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.threading.threads = Some(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn json_fields_are_optional_and_strict() {
    let cfg: RenderConfig =
        serde_json::from_str(r#"{ "fps": 24, "font": "builtin", "part_number": 3 }"#).unwrap();
    assert_eq!(cfg.fps, 24);
    assert_eq!(cfg.font, FontSpec::Builtin);
    assert_eq!(cfg.part_number, Some(3));
    assert_eq!(cfg.duration_per_round_secs, 3.0);

    let bad = serde_json::from_str::<RenderConfig>(r#"{ "fps": 24, "speed": 2 }"#);
    assert!(bad.is_err());

    let with_path: RenderConfig =
        serde_json::from_str(r#"{ "font": { "path": "/fonts/a.ttf" } }"#).unwrap();
    assert_eq!(with_path.font, FontSpec::Path("/fonts/a.ttf".into()));
}

#[test]
fn short_rounds_still_get_one_frame() {
    let cfg = RenderConfig {
        duration_per_round_secs: 0.001,
        ..RenderConfig::default()
    };
    assert_eq!(cfg.frames_per_round().unwrap(), 1);
}
