use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(ReelError::data("x").to_string().contains("round data error:"));
    assert!(ReelError::render("x").to_string().contains("render error:"));
    assert!(ReelError::encode("x").to_string().contains("encode error:"));
    assert!(
        ReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn stage_tag_names_the_stage_and_keeps_first_tag() {
    let err = ReelError::encode("ffmpeg exited").in_stage(RenderStage::Encoding);
    assert_eq!(err.stage(), Some(RenderStage::Encoding));
    assert!(err.to_string().starts_with("encoding stage failed"));

    let retagged = err.in_stage(RenderStage::Preprocess);
    assert_eq!(retagged.stage(), Some(RenderStage::Encoding));
}

#[test]
fn fatality_follows_taxonomy() {
    assert!(ReelError::config("no font").is_fatal());
    assert!(ReelError::output("disk full").is_fatal());
    assert!(!ReelError::data("bad image").is_fatal());
    assert!(!ReelError::render("one frame").is_fatal());
    assert!(
        ReelError::config("x")
            .in_stage(RenderStage::FrameGeneration)
            .is_fatal()
    );
}

#[test]
fn partial_frames_reports_counts() {
    let err = ReelError::PartialFrames {
        succeeded: 7,
        total: 10,
    };
    assert_eq!(err.to_string(), "only 7 of 10 frames rendered successfully");
}
