//! Page planning and fragment placement.
//!
//! OCR boxes are measured from the top-left corner of the source image, while PDF
//! page space has its origin in the bottom-left corner and positions text by its
//! baseline. [place] converts between the two.

use crate::{
    font::FontMetrics, BuildOptions, Canvas, LayoutInput, Pt, TextFragment, DEFAULT_ASCENT_RATIO,
};

/// The fragments that go on one output page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlan<'a> {
    /// 0-based position of the page in the document
    pub index: usize,
    pub canvas: &'a Canvas,
    /// In the order they were recognised; never reordered
    pub fragments: &'a [TextFragment],
}

/// Split the input into pages: one page per canvas, in input order
pub fn plan(input: &LayoutInput) -> Vec<PagePlan<'_>> {
    input
        .iter()
        .enumerate()
        .map(|(index, page)| PagePlan {
            index,
            canvas: &page.canvas,
            fragments: page.fragments.as_slice(),
        })
        .collect()
}

/// Where a fragment's text starts on its page, in PDF page space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedFragment {
    pub x: Pt,
    pub y_baseline: Pt,
}

/// Position `fragment` on a page made from `canvas`, for text set at `font_size`.
///
/// The box is flipped into bottom-left page space and the baseline is then raised so
/// that the top of the glyphs (`font_size * ascent_ratio` above the baseline) lines up
/// with the top of the OCR box. `x` is unchanged.
pub fn place(
    canvas: &Canvas,
    fragment: &TextFragment,
    font_size: Pt,
    ascent_ratio: f32,
) -> PlacedFragment {
    let box_bottom = canvas.height() - (fragment.y() + fragment.height());
    let y_baseline = box_bottom + (fragment.height() - font_size * ascent_ratio);

    PlacedFragment {
        x: fragment.x(),
        y_baseline,
    }
}

/// The ascent ratio to place text with: the configured one, else the font's own, else
/// [DEFAULT_ASCENT_RATIO]
pub fn ascent_ratio<F: FontMetrics + ?Sized>(options: &BuildOptions, font: &F) -> f32 {
    options
        .ascent_ratio()
        .or_else(|| font.ascent_ratio())
        .unwrap_or(DEFAULT_ASCENT_RATIO)
}
