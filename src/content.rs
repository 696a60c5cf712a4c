//! Content stream generation for pages.

use crate::page::{SpanFont, SpanLayout};
use std::io::Write;

/// Renders text spans to a PDF content stream, one text object per span, in order.
///
/// The font is only re-selected when it changes between consecutive spans; glyph ids
/// are written as 2-byte hex strings to match the Identity-H encoding of the fonts.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_spans(spans: &[SpanLayout]) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();
    let Some(first) = spans.first() else {
        return Ok(content);
    };

    write!(content, "q\n")?;

    let mut current_font: SpanFont = first.font;
    write_font(&mut content, current_font)?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write_font(&mut content, current_font)?;
        }

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
        write!(content, "<")?;
        for gid in span.glyphs.iter() {
            write!(content, "{gid:04x}")?;
        }
        write!(content, "> Tj\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn write_font<W: Write>(content: &mut W, font: SpanFont) -> Result<(), std::io::Error> {
    write!(content, "/F{} {} Tf\n", font.id.index(), font.size)
}
