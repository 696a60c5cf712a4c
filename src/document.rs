use crate::{
    font::Font,
    info::Info,
    page::{Page, SpanFont, SpanLayout},
    refs::{ObjectReferences, RefType},
    resolver::ResolvedFont,
    BuildError, Pt,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::{
    collections::{BTreeMap, HashMap},
    io::Write,
    rc::Rc,
};
use tracing::debug;

/// A font that has been used at least once in the document, along with every glyph
/// that was drawn with it
#[derive(Debug)]
pub struct EmbeddedFont {
    pub font: Rc<Font>,
    /// Glyph id => the character it was drawn for, used for text extraction
    pub glyphs: BTreeMap<u16, char>,
    /// Number of spans set in this font
    pub uses: usize,
}

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Vec<Page>,
    pub fonts: Arena<EmbeddedFont>,
    /// Font key => embedded font
    font_ids: HashMap<String, Id<EmbeddedFont>>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its 0-based index
    pub fn add_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Register `resolved` with the document. Each font program is embedded at most
    /// once, keyed by the font it was loaded as, no matter how many registry slots,
    /// spans or pages use it.
    pub fn embed(&mut self, resolved: &ResolvedFont) -> Id<EmbeddedFont> {
        let key = resolved.font().key();
        if let Some(id) = self.font_ids.get(key) {
            return *id;
        }

        debug!(font = key, "embedding font");
        let id = self.fonts.alloc(EmbeddedFont {
            font: Rc::clone(resolved.font()),
            glyphs: BTreeMap::new(),
            uses: 0,
        });
        self.font_ids.insert(key.to_string(), id);
        id
    }

    /// Set `text` on `page` at `coords` (the start of the baseline) in the given font.
    ///
    /// Characters the font has no glyph for are drawn with its replacement glyph and
    /// extract as U+FFFD. Text with nothing to draw adds no span and embeds nothing.
    pub fn add_text(
        &mut self,
        page: &mut Page,
        text: &str,
        resolved: &ResolvedFont,
        size: Pt,
        coords: (Pt, Pt),
    ) {
        let font = resolved.font();
        let drawn: Vec<(u16, char)> = text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| match font.glyph_id(ch) {
                Some(gid) => (gid, ch),
                None => (font.replacement_glyph_id(), char::REPLACEMENT_CHARACTER),
            })
            .collect();
        if drawn.is_empty() {
            return;
        }

        let id = self.embed(resolved);
        let embedded = &mut self.fonts[id];
        for &(gid, ch) in drawn.iter() {
            embedded.glyphs.entry(gid).or_insert(ch);
        }
        embedded.uses += 1;

        page.add_span(SpanLayout {
            text: text.to_string(),
            glyphs: drawn.into_iter().map(|(gid, _)| gid).collect(),
            font: SpanFont { id, size },
            coords,
        });
    }

    /// Write the entire document to the writer, returning the number of bytes written.
    /// The document is rendered in memory first and can't be used afterwards.
    pub fn write<W: Write>(self, mut w: W) -> Result<usize, BuildError> {
        let bytes = self.finish()?;
        w.write_all(bytes.as_slice())?;
        Ok(bytes.len())
    }

    /// Render the entire document to bytes
    pub fn finish(self) -> Result<Vec<u8>, BuildError> {
        let Document {
            info,
            pages,
            fonts,
            font_ids: _,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, embedded) in fonts.iter() {
            debug!(
                font = embedded.font.key(),
                uses = embedded.uses,
                glyphs = embedded.glyphs.len(),
                "writing font"
            );
            embedded
                .font
                .write(&mut refs, id.index(), &embedded.glyphs, &mut writer);
        }

        for (page_index, page) in pages.iter().enumerate() {
            page.write(&mut refs, page_index, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        Ok(writer.finish())
    }
}
