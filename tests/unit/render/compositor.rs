use std::path::{Path, PathBuf};

use super::*;
use crate::assets::fonts::ResolvedFont;
use crate::config::RenderConfig;
use crate::foundation::core::Canvas;
use crate::schedule::phase::LoadingKind;
use crate::session::{Round, Session};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "sketchreel_compositor_{name}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn small_config(height: u32) -> RenderConfig {
    let mut cfg = RenderConfig {
        duration_per_round_secs: 1.0,
        fps: 30,
        title_secs: 0.5,
        ..RenderConfig::default()
    };
    cfg.style.canvas = Canvas { width: 240, height };
    cfg.style.text_size_px = 16.0;
    cfg.style.loading_size_px = 16.0;
    cfg.style.title_size_px = 16.0;
    cfg.style.text_max_width_px = 200;
    cfg.style.text_padding_px = 4;
    cfg.style.image_width_px = 40;
    cfg.style.top_margin_px = 10;
    cfg.style.bottom_margin_px = 10;
    cfg.style.element_gap_px = 4;
    cfg.style.loading_extra_gap_px = 2;
    cfg.style.title_bottom_margin_px = 10;
    cfg
}

fn write_drawing(path: &Path) {
    let mut img = image::RgbaImage::from_pixel(40, 30, image::Rgba([255, 255, 255, 255]));
    for x in 10..30 {
        img.put_pixel(x, 15, image::Rgba([0, 0, 0, 255]));
        img.put_pixel(x, 16, image::Rgba([0, 0, 0, 255]));
    }
    img.save(path).unwrap();
}

fn reel_with_rounds(name: &str, rounds: u32, height: u32) -> (PreparedReel, PathBuf) {
    let dir = scratch_dir(name);
    let rounds = (1..=rounds)
        .map(|i| {
            let path = dir.join(format!("round_{i}.png"));
            write_drawing(&path);
            Round {
                index: i,
                prompt: format!("prompt {i}"),
                image_path: Some(path),
                guess: None,
            }
        })
        .collect();
    let session = Session::from_rounds(rounds).unwrap();
    let reel =
        PreparedReel::prepare_with_font(&session, &small_config(height), &ResolvedFont::Builtin)
            .unwrap();
    (reel, dir)
}

fn kinds(layers: &[RenderedElement<'_>]) -> Vec<LayerKind> {
    layers.iter().map(|l| l.kind).collect()
}

#[test]
fn prompt_fades_in_over_fifteen_frames() {
    assert_eq!(fade_in_opacity(0), 17);
    assert_eq!(fade_in_opacity(7), 136);
    assert_eq!(fade_in_opacity(14), 255);
    assert_eq!(fade_in_opacity(400), 255);
    assert!((0..20).all(|f| fade_in_opacity(f) <= fade_in_opacity(f + 1)));
}

#[test]
fn title_is_shown_only_in_its_window() {
    let (reel, dir) = reel_with_rounds("title", 1, 320);
    let scroll = reel.scroll_plan();
    let comp = FrameCompositor::new(&reel, &scroll);

    let first = comp.layers(FrameIndex(0)).unwrap();
    assert_eq!(
        kinds(&first),
        vec![LayerKind::Title, LayerKind::Element(ElementKind::Text)]
    );
    let title = &first[0];
    assert_eq!(
        title.y,
        320 - 10 - i64::from(title.raster.height),
        "title sits above the bottom margin"
    );
    assert_eq!(title.x, (240 - i64::from(title.raster.width)) / 2);
    assert_eq!(first[1].opacity, 17);

    assert!(comp.layers(FrameIndex(14)).unwrap()[0].kind == LayerKind::Title);
    assert!(
        comp.layers(FrameIndex(15))
            .unwrap()
            .iter()
            .all(|l| l.kind != LayerKind::Title)
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn drawing_sits_on_paper_and_is_replaced_by_the_cached_image() {
    let (reel, dir) = reel_with_rounds("paper", 1, 320);
    let scroll = reel.scroll_plan();
    let comp = FrameCompositor::new(&reel, &scroll);

    // F = 30: drawing runs over [18, 27), the image is held over [27, 30).
    let drawing = comp.layers(FrameIndex(20)).unwrap();
    assert_eq!(
        kinds(&drawing),
        vec![
            LayerKind::Element(ElementKind::Text),
            LayerKind::Paper,
            LayerKind::Element(ElementKind::Drawing),
        ]
    );
    assert_eq!((drawing[1].x, drawing[1].y), (drawing[2].x, drawing[2].y));
    assert_eq!(drawing[1].x, 100);
    assert_eq!(drawing[0].opacity, 255);

    let revealed = comp.layers(FrameIndex(28)).unwrap();
    assert_eq!(
        kinds(&revealed),
        vec![
            LayerKind::Element(ElementKind::Text),
            LayerKind::Element(ElementKind::Image),
        ]
    );
    assert!(matches!(revealed[0].raster, Cow::Borrowed(_)));
    assert!(matches!(revealed[1].raster, Cow::Borrowed(_)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn later_round_starts_with_its_loading_indicator() {
    let (reel, dir) = reel_with_rounds("loading", 2, 320);
    let scroll = reel.scroll_plan();
    let comp = FrameCompositor::new(&reel, &scroll);

    let layers = comp.layers(FrameIndex(30)).unwrap();
    assert_eq!(
        kinds(&layers),
        vec![
            LayerKind::Element(ElementKind::Text),
            LayerKind::Element(ElementKind::Image),
            LayerKind::Element(ElementKind::Loading(LoadingKind::Analyzing)),
        ]
    );
    assert_eq!(layers[2].round_index, Some(1));
    assert!(matches!(layers[2].raster, Cow::Owned(_)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn elements_outside_the_viewport_are_culled() {
    let (reel, dir) = reel_with_rounds("cull", 8, 200);
    let scroll = reel.scroll_plan();
    let comp = FrameCompositor::new(&reel, &scroll);

    let last = FrameIndex(reel.timeline().total_frames() - 1);
    let layers = comp.layers(last).unwrap();
    let visible = reel.timeline().visible_stack(last);

    assert!(!layers.is_empty());
    assert!(layers.len() < visible.len());
    for l in &layers {
        assert!(l.y + i64::from(l.raster.height) > 0, "{:?} is above", l.kind);
        assert!(l.y < 200, "{:?} is below", l.kind);
    }
    // The newest round stays on screen.
    assert_eq!(layers.last().unwrap().round_index, Some(7));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn frames_are_painted_over_the_background() {
    let (reel, dir) = reel_with_rounds("paint", 1, 320);
    let scroll = reel.scroll_plan();
    let comp = FrameCompositor::new(&reel, &scroll);

    let frame = comp.render_frame(FrameIndex(18)).unwrap();
    assert_eq!((frame.width, frame.height), (240, 320));
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));

    // Drawing starts at progress 0: only the paper shows.
    let image_top = 10 + reel.heights().text[0] + 4;
    assert_eq!(frame.pixel(120, image_top + 2), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(120, image_top + 15), Some([255, 255, 255, 255]));

    assert_eq!(frame, comp.render_frame(FrameIndex(18)).unwrap());

    let _ = std::fs::remove_dir_all(&dir);
}
