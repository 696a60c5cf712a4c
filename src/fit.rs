use crate::{font::FontMetrics, Pt};
use tracing::trace;

/// Find the largest whole font size at which `text` fits inside a `box_width` ×
/// `box_height` box.
///
/// Candidates run from `min_size` up to `max_size`, where `max_size` is first capped
/// at the box height so that boxes with a collapsed width can't produce giant glyphs.
/// Text width and height grow with the size, so the candidates are binary searched.
///
/// When not even `min_size` fits, `min_size` is returned anyway; the text will then
/// overflow its box, which is preferable to dropping it.
pub fn fit_size<F: FontMetrics + ?Sized>(
    text: &str,
    box_width: Pt,
    box_height: Pt,
    font: &F,
    max_size: Pt,
    min_size: Pt,
) -> Pt {
    let fits = |size: u32| {
        let size = Pt(size as f32);
        font.measure_width(text, size) <= box_width && font.measure_height(size) <= box_height
    };

    let low = min_size.ceil().max(Pt(1.0));
    let high = max_size.min(box_height).floor();
    if high < low {
        trace!(%min_size, %box_height, "box is shorter than the minimum size");
        return min_size;
    }

    let (mut low, mut high) = (*low as u32, *high as u32);
    if !fits(low) {
        trace!(text, %min_size, "text overflows its box at the minimum size");
        return min_size;
    }

    // invariant: `low` fits, everything above `high` does not
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if fits(mid) {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Pt(low as f32)
}
