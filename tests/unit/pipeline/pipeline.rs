use super::*;
use crate::assets::fonts::FontSpec;
use crate::foundation::core::Canvas;
use crate::session::Round;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "sketchreel_pipeline_{name}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn small_config() -> RenderConfig {
    let mut cfg = RenderConfig {
        duration_per_round_secs: 1.0,
        fps: 10,
        title_secs: 0.5,
        font: FontSpec::Builtin,
        ..RenderConfig::default()
    };
    cfg.style.canvas = Canvas {
        width: 120,
        height: 200,
    };
    cfg.style.text_size_px = 8.0;
    cfg.style.loading_size_px = 8.0;
    cfg.style.title_size_px = 8.0;
    cfg.style.text_max_width_px = 100;
    cfg.style.text_padding_px = 2;
    cfg.style.image_width_px = 40;
    cfg.style.top_margin_px = 10;
    cfg.style.bottom_margin_px = 10;
    cfg.style.element_gap_px = 4;
    cfg.style.loading_extra_gap_px = 2;
    cfg.style.title_bottom_margin_px = 10;
    cfg
}

#[test]
fn thumbnail_sits_next_to_the_video() {
    assert_eq!(
        thumbnail_path(Path::new("/out/reel.mp4")),
        PathBuf::from("/out/reel_thumbnail.png")
    );
    assert_eq!(
        thumbnail_path(Path::new("reel")),
        PathBuf::from("reel_thumbnail.png")
    );
}

#[test]
fn timeline_report_lists_round_phases() {
    let session = Session::from_rounds(vec![
        Round {
            index: 1,
            prompt: "cat".into(),
            image_path: None,
            guess: None,
        },
        Round {
            index: 2,
            prompt: "dog".into(),
            image_path: None,
            guess: None,
        },
    ])
    .unwrap();
    let report = describe_timeline(&small_config(), &session).unwrap();

    assert_eq!(report.frames_per_round, 10);
    assert_eq!(report.total_frames, 20);
    assert_eq!(report.title_frames, 5);
    assert_eq!(report.rounds.len(), 2);
    assert_eq!(report.rounds[1].start_frame, 10);
    assert_eq!(report.rounds[1].prompt, "dog");
    assert_eq!(report.rounds[0].phases, phase_spans(0, 10).into_vec());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rounds"][1]["phases"][0]["phase"], "analyzing");
}

#[test]
fn single_frame_is_written_as_png() {
    let dir = scratch_dir("single");
    std::fs::write(dir.join("round_1_summary.txt"), "Round 1\nActual Word: cat\n").unwrap();
    let out = dir.join("out/frame.png");

    render_single_frame(&small_config(), &dir, FrameIndex(3), &out).unwrap();
    let img = image::open(&out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (120, 200));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn out_of_range_frame_is_rejected_in_frame_generation() {
    let dir = scratch_dir("range");
    std::fs::write(dir.join("round_1_summary.txt"), "Actual Word: cat\n").unwrap();

    let err =
        render_single_frame(&small_config(), &dir, FrameIndex(10), &dir.join("x.png")).unwrap_err();
    assert_eq!(err.stage(), Some(RenderStage::FrameGeneration));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_session_fails_in_preprocessing() {
    let cfg = RenderConfig {
        output_path: std::env::temp_dir().join("sketchreel_never_written.mp4"),
        ..small_config()
    };
    let err = render_to_video(&cfg, Path::new("/definitely/not/a/session")).unwrap_err();
    assert_eq!(err.stage(), Some(RenderStage::Preprocess));
    assert!(err.is_fatal());
    assert!(err.to_string().starts_with("preprocessing stage failed"));
}
