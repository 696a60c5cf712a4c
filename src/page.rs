use crate::content::render_spans;
use crate::document::EmbeddedFont;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::{BuildError, Canvas, Pt};
use id_arena::Id;
use pdf_writer::{Finish, Name, Pdf, Ref};
use std::collections::BTreeSet;

/// The font a span is set in: the embedded font and its size in points
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<EmbeddedFont>,
    pub size: Pt,
}

/// One positioned run of text, already mapped to glyph ids of its font
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    /// The text as it was given, kept for diagnostics
    pub text: String,
    pub glyphs: Vec<u16>,
    pub font: SpanFont,
    /// Start of the baseline, in page space
    pub coords: (Pt, Pt),
}

/// A page under construction. Spans are drawn in the order they were added
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    pub spans: Vec<SpanLayout>,
}

impl Page {
    /// An empty page sized exactly to the canvas
    pub fn new(canvas: &Canvas) -> Page {
        Page {
            media_box: canvas.media_box(),
            spans: Vec::new(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.spans.push(span);
    }

    /// Arena indices of the fonts used on this page
    pub fn font_indices(&self) -> BTreeSet<usize> {
        self.spans.iter().map(|span| span.font.id.index()).collect()
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        writer: &mut Pdf,
    ) -> Result<(), BuildError> {
        let id = refs.get(RefType::Page(page_index))?;
        let parent = refs.get(RefType::PageTree)?;
        let fonts: Vec<(usize, Ref)> = self
            .font_indices()
            .into_iter()
            .map(|index| refs.get(RefType::Font(index)).map(|font| (index, font)))
            .collect::<Result<_, _>>()?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (index, font) in fonts {
            resource_fonts.pair(Name(format!("F{index}").as_bytes()), font);
        }
        resource_fonts.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = render_spans(&self.spans)?;
        writer.stream(content_id, rendered.as_slice());

        Ok(())
    }
}
