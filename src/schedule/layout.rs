use crate::config::Style;
use crate::schedule::phase::ElementKind;

/// Pre-measured element heights, indexed by round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementHeights {
    /// Text block height per round.
    pub text: Vec<u32>,
    /// Image height per round (drawing animation and final image share it).
    pub image: Vec<u32>,
    /// Loading indicator height.
    pub loading: u32,
}

impl ElementHeights {
    /// Height of `kind` for `round_index`; unknown rounds measure zero.
    pub fn height(&self, round_index: usize, kind: ElementKind) -> u32 {
        match kind {
            ElementKind::Loading(_) => self.loading,
            ElementKind::Text => self.text.get(round_index).copied().unwrap_or(0),
            ElementKind::Drawing | ElementKind::Image => {
                self.image.get(round_index).copied().unwrap_or(0)
            }
        }
    }
}

/// Vertical spacing of the element stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackMetrics {
    /// Y of the first element.
    pub top: u32,
    /// Space kept below the last element.
    pub bottom: u32,
    /// Gap between consecutive elements.
    pub gap: u32,
    /// Extra gap above a loading indicator that is not first.
    pub loading_extra_gap: u32,
}

impl StackMetrics {
    /// Stack metrics from a style.
    pub fn from_style(style: &Style) -> Self {
        Self {
            top: style.top_margin_px,
            bottom: style.bottom_margin_px,
            gap: style.element_gap_px,
            loading_extra_gap: style.loading_extra_gap_px,
        }
    }
}

/// A positioned element in unscrolled content coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackSlot {
    /// Round the element belongs to.
    pub round_index: usize,
    /// Element kind.
    pub kind: ElementKind,
    /// Top edge.
    pub y: u32,
    /// Height.
    pub height: u32,
}

/// Top-to-bottom placement of every visible element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackLayout {
    /// Slots in stacking order.
    pub slots: Vec<StackSlot>,
    /// Total content height including the bottom margin.
    pub content_height: u32,
}

/// Place `visible` elements top to bottom.
pub fn layout_stack(
    visible: &[(usize, ElementKind)],
    heights: &ElementHeights,
    metrics: &StackMetrics,
) -> StackLayout {
    let mut slots = Vec::with_capacity(visible.len());
    let mut y = metrics.top;
    for (n, &(round_index, kind)) in visible.iter().enumerate() {
        if n > 0 {
            y += metrics.gap;
            if matches!(kind, ElementKind::Loading(_)) {
                y += metrics.loading_extra_gap;
            }
        }
        let height = heights.height(round_index, kind);
        slots.push(StackSlot {
            round_index,
            kind,
            y,
            height,
        });
        y += height;
    }
    StackLayout {
        slots,
        content_height: y + metrics.bottom,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/layout.rs"]
mod tests;
