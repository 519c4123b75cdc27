use super::*;
use crate::schedule::phase::{LoadingKind, Phase};

#[test]
fn locate_splits_global_frames_into_rounds() {
    let t = Timeline::new(90, 2, 90).unwrap();
    assert_eq!(t.total_frames(), 180);
    assert_eq!(
        t.locate(FrameIndex(89)),
        RoundFrame {
            round_index: 0,
            frame_in_round: 89
        }
    );
    assert_eq!(
        t.locate(FrameIndex(90)),
        RoundFrame {
            round_index: 1,
            frame_in_round: 0
        }
    );
    assert_eq!(t.locate(FrameIndex(200)).round_index, 1);
    assert_eq!(t.locate(FrameIndex(200)).frame_in_round, 110);
}

#[test]
fn visible_stack_keeps_completed_rounds() {
    let t = Timeline::new(90, 3, 0).unwrap();
    assert_eq!(t.visible_stack(FrameIndex(0)), vec![(0, ElementKind::Text)]);
    assert_eq!(
        t.visible_stack(FrameIndex(90)),
        vec![
            (0, ElementKind::Text),
            (0, ElementKind::Image),
            (1, ElementKind::Loading(LoadingKind::Analyzing)),
        ]
    );
    let (_, pp) = t.point(FrameIndex(185));
    assert_eq!(pp.phase, Phase::Analyzing);
    assert_eq!(t.visible_stack(FrameIndex(185)).len(), 5);
}

#[test]
fn title_window_and_thumbnail() {
    let t = Timeline::new(90, 2, 90).unwrap();
    assert!(t.title_visible(FrameIndex(89)));
    assert!(!t.title_visible(FrameIndex(90)));
    assert_eq!(t.thumbnail_frame(), Some(FrameIndex(89)));

    let short = Timeline::new(10, 1, 90).unwrap();
    assert_eq!(short.thumbnail_frame(), Some(FrameIndex(9)));
    let untitled = Timeline::new(10, 1, 0).unwrap();
    assert_eq!(untitled.thumbnail_frame(), None);
}

#[test]
fn rejects_empty_budgets() {
    assert!(Timeline::new(0, 2, 0).is_err());
    assert!(Timeline::new(90, 0, 0).is_err());
}
