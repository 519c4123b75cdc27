use super::*;
use crate::schedule::phase::LoadingKind;

fn metrics() -> StackMetrics {
    StackMetrics {
        top: 100,
        bottom: 50,
        gap: 10,
        loading_extra_gap: 5,
    }
}

fn heights() -> ElementHeights {
    ElementHeights {
        text: vec![40, 60],
        image: vec![300, 200],
        loading: 20,
    }
}

#[test]
fn elements_stack_with_gaps() {
    let visible = [(0, ElementKind::Text), (0, ElementKind::Image), (1, ElementKind::Text)];
    let l = layout_stack(&visible, &heights(), &metrics());
    let ys = l.slots.iter().map(|s| (s.y, s.height)).collect::<Vec<_>>();
    assert_eq!(ys, vec![(100, 40), (150, 300), (460, 60)]);
    assert_eq!(l.content_height, 520 + 50);
}

#[test]
fn loading_after_another_element_gets_extra_gap() {
    let generating = ElementKind::Loading(LoadingKind::Generating);
    let l = layout_stack(
        &[(0, ElementKind::Text), (0, generating)],
        &heights(),
        &metrics(),
    );
    assert_eq!(l.slots[1].y, 100 + 40 + 10 + 5);

    let first = layout_stack(
        &[(1, ElementKind::Loading(LoadingKind::Analyzing))],
        &heights(),
        &metrics(),
    );
    assert_eq!(first.slots[0].y, 100);
    assert_eq!(first.content_height, 100 + 20 + 50);
}

#[test]
fn drawing_and_image_share_height() {
    let h = heights();
    assert_eq!(h.height(1, ElementKind::Drawing), h.height(1, ElementKind::Image));
    assert_eq!(h.height(9, ElementKind::Text), 0);
}
