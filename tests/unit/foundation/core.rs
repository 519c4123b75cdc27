use super::*;

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(FrameRange::first(0).is_empty());
    assert!(!FrameRange::new(FrameIndex(2), FrameIndex(3)).unwrap().is_empty());
}

#[test]
fn ntsc_rate_is_fractional() {
    let fps = Fps::new(30000, 1001).unwrap();
    assert!((fps.as_f64() - 29.970_029_97).abs() < 1e-6);
    assert_eq!(fps.secs_to_frames_round(10.0), 300);
}

#[test]
fn fps_rounding_matches_round_budget() {
    let fps = Fps::integer(30).unwrap();
    assert_eq!(fps.secs_to_frames_round(3.0), 90);
    assert_eq!(fps.secs_to_frames_round(0.99), 30);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn premultiply_scales_channels() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.b, 0);
    assert_eq!(Rgba8Premul::from_straight([9, 9, 9, 255]).to_array(), [9, 9, 9, 255]);
}
