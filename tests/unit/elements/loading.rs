use super::*;

#[test]
fn pattern_holds_for_six_frames_then_changes() {
    let first = loading_pattern(FrameIndex(0));
    for f in 1..PATTERN_PERIOD_FRAMES {
        assert_eq!(loading_pattern(FrameIndex(f)), first);
    }
    assert_eq!(loading_pattern(FrameIndex(13)), loading_pattern(FrameIndex(17)));

    let periods = (0..10)
        .map(|p| loading_pattern(FrameIndex(p * PATTERN_PERIOD_FRAMES)))
        .collect::<Vec<_>>();
    assert!(periods.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn pattern_levels_stay_in_range() {
    for f in 0..60 {
        assert!(loading_pattern(FrameIndex(f)).iter().all(|&l| l < 4));
    }
}

#[test]
fn sprite_size_is_stable_across_frames() {
    let mut painter = TextPainter::builtin();
    let sprites = LoadingSprites::prepare(&mut painter, 16.0, [255, 255, 0, 255]).unwrap();

    for kind in [LoadingKind::Analyzing, LoadingKind::Generating] {
        let a = sprites.render(kind, FrameIndex(0));
        let b = sprites.render(kind, FrameIndex(600));
        assert_eq!((a.width, a.height), (b.width, b.height));
        assert_eq!(a.width, sprites.width(kind));
        assert_eq!(a.height, sprites.height());
    }
    assert!(sprites.width(LoadingKind::Generating) > sprites.width(LoadingKind::Analyzing));
}

#[test]
fn prefix_pixels_do_not_move_between_frames() {
    let mut painter = TextPainter::builtin();
    let sprites = LoadingSprites::prepare(&mut painter, 16.0, [255, 255, 255, 255]).unwrap();
    let prefix_w = painter.measure("Analyzing: [", 16.0);

    let a = sprites.render(LoadingKind::Analyzing, FrameIndex(0));
    let b = sprites.render(LoadingKind::Analyzing, FrameIndex(6 * 37));
    for y in 0..a.height {
        for x in 0..prefix_w {
            assert_eq!(a.pixel(x, y), b.pixel(x, y));
        }
    }
}

#[test]
fn same_frame_renders_identically() {
    let mut painter = TextPainter::builtin();
    let sprites = LoadingSprites::prepare(&mut painter, 24.0, [255, 255, 0, 255]).unwrap();
    assert_eq!(
        sprites.render(LoadingKind::Analyzing, FrameIndex(77)),
        sprites.render(LoadingKind::Analyzing, FrameIndex(77))
    );
}

#[test]
fn cells_follow_the_pattern_period() {
    let mut painter = TextPainter::builtin();
    let sprites = LoadingSprites::prepare(&mut painter, 16.0, [255, 255, 255, 255]).unwrap();

    let first = FrameIndex(0);
    let changed = (1..64u64)
        .map(|p| FrameIndex(p * PATTERN_PERIOD_FRAMES))
        .find(|&f| loading_pattern(f) != loading_pattern(first))
        .unwrap();
    assert_eq!(
        sprites.render(LoadingKind::Generating, first),
        sprites.render(LoadingKind::Generating, FrameIndex(PATTERN_PERIOD_FRAMES - 1))
    );
    assert_ne!(
        sprites.render(LoadingKind::Generating, first),
        sprites.render(LoadingKind::Generating, changed)
    );
}
