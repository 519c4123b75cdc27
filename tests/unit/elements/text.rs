use super::*;

fn style(max_width_px: u32) -> TextStyle {
    TextStyle {
        size_px: 16.0,
        color: [255, 255, 255, 255],
        max_width_px,
        padding_px: 4,
        bold: false,
    }
}

#[test]
fn long_prompt_wraps_within_max_width() {
    let mut p = TextPainter::builtin();
    let max = 200;
    let prompt = "a very long prompt about a giraffe riding a bicycle through town at night";
    assert!(p.measure(prompt, 16.0) > 3 * max);

    let block = p.render_block(prompt, &style(max)).unwrap();
    assert!(block.lines.len() > 1);
    for (line, w) in block.lines.iter().zip(&block.line_widths) {
        assert!(*w <= max, "line {line:?} is {w}px");
    }
    assert_eq!(block.lines.join(" "), prompt);
}

#[test]
fn overlong_word_is_split_between_characters() {
    let mut p = TextPainter::builtin();
    let word = "supercalifragilisticexpialidocious";
    let lines = p.wrap(word, 16.0, 60);
    assert!(lines.len() > 1);
    assert_eq!(lines.concat(), word);
    assert!(lines.iter().all(|l| p.measure(l, 16.0) <= 60));
}

#[test]
fn block_is_sized_to_text_plus_padding() {
    let mut p = TextPainter::builtin();
    let block = p.render_block("CAT", &style(500)).unwrap();
    let w = p.measure("CAT", 16.0);
    let h = p.line_height(16.0);
    assert_eq!(block.raster.width, w + 8);
    assert_eq!(block.raster.height, h + 8);
    assert!(!block.raster.is_fully_transparent());
}

#[test]
fn lines_are_centered() {
    let mut p = TextPainter::builtin();
    let block = p.render_block("WIDE LINE HERE I", &style(120)).unwrap();
    assert_eq!(block.lines.len(), 2);
    let narrow = block.line_widths[1];
    let wide = block.line_widths[0];
    assert!(narrow < wide);
    // The narrow line has no ink in its left margin.
    let line_h = p.line_height(16.0);
    let margin = 4 + (wide - narrow) / 2;
    for y in (4 + line_h)..(4 + 2 * line_h) {
        for x in 0..margin {
            assert_eq!(block.raster.pixel(x, y).map(|px| px[3]), Some(0));
        }
    }
}

#[test]
fn bold_widens_the_stamp() {
    let mut p = TextPainter::builtin();
    let plain = p.render_block("I", &style(500)).unwrap();
    let bold = p
        .render_block(
            "I",
            &TextStyle {
                bold: true,
                ..style(500)
            },
        )
        .unwrap();
    assert_eq!(bold.raster.width, plain.raster.width + 4);
    let ink = |f: &FrameRGBA| f.data.chunks_exact(4).filter(|px| px[3] > 0).count();
    assert!(ink(&bold.raster) > ink(&plain.raster));
}
