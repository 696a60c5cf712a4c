use crate::{
    fit::fit_size,
    layout::{ascent_ratio, place, plan},
    BuildError, BuildOptions, Document, FontRegistry, FontResolver, FontSource, LayoutInput,
    Page, TextFragment,
};
use std::io::Write;
use tracing::{debug, instrument};

/// A finished PDF along with the number of pages in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    bytes: Vec<u8>,
    page_count: usize,
}

impl BuildResult {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

/// Turns OCR layouts into searchable PDFs. One page is produced per canvas, and every
/// fragment's text is set on it at the largest size that fits the fragment's box.
///
/// The encoder itself holds no state between builds: fonts are loaded and cached by
/// each call to [Encoder::build].
pub struct Encoder<'a> {
    registry: &'a FontRegistry,
    source: &'a dyn FontSource,
    options: BuildOptions,
}

impl<'a> Encoder<'a> {
    pub fn new(
        registry: &'a FontRegistry,
        source: &'a dyn FontSource,
        options: BuildOptions,
    ) -> Encoder<'a> {
        Encoder {
            registry,
            source,
            options,
        }
    }

    /// Build a complete PDF in memory
    #[instrument(skip_all, fields(pages = input.len()))]
    pub fn build(&self, input: &LayoutInput) -> Result<BuildResult, BuildError> {
        let document = self.layout(input)?;
        let page_count = document.page_count();
        let bytes = document.finish()?;
        debug!(page_count, bytes = bytes.len(), "built document");

        Ok(BuildResult { bytes, page_count })
    }

    /// Build a complete PDF and write it to `w`, returning the number of pages written
    #[instrument(skip_all, fields(pages = input.len()))]
    pub fn build_to<W: Write>(&self, input: &LayoutInput, w: W) -> Result<usize, BuildError> {
        let document = self.layout(input)?;
        let page_count = document.page_count();
        let written = document.write(w)?;
        debug!(page_count, bytes = written, "wrote document");

        Ok(page_count)
    }

    fn layout(&self, input: &LayoutInput) -> Result<Document, BuildError> {
        let mut resolver = FontResolver::new(self.registry, self.source);
        // a document can't be produced without its fallback, so fail before any work
        resolver.fallback()?;

        let mut document = Document::default();
        if let Some(info) = self.options.info() {
            document.set_info(info.clone());
        }

        for planned in plan(input) {
            let mut page = Page::new(planned.canvas);
            for (index, fragment) in planned.fragments.iter().enumerate() {
                let text = normalize(fragment);
                if fragment.is_degenerate() || text.is_empty() {
                    debug!(page = planned.index, fragment = index, "skipping empty fragment");
                    continue;
                }

                let font = resolver.resolve(&text)?;
                let max_size = self
                    .options
                    .max_font_size()
                    .unwrap_or_else(|| fragment.height());
                let size = fit_size(
                    &text,
                    fragment.width(),
                    fragment.height(),
                    &font,
                    max_size,
                    self.options.min_font_size(),
                );
                let placed = place(
                    planned.canvas,
                    fragment,
                    size,
                    ascent_ratio(&self.options, &font),
                );

                document.add_text(&mut page, &text, &font, size, (placed.x, placed.y_baseline));
            }
            document.add_page(page);
        }

        Ok(document)
    }
}

/// Line breaks and tabs become spaces and surrounding whitespace is dropped, since
/// every fragment is set on a single line
fn normalize(fragment: &TextFragment) -> String {
    fragment
        .text()
        .trim()
        .chars()
        .map(|ch| if ch.is_whitespace() { ' ' } else { ch })
        .filter(|ch| !ch.is_control())
        .collect()
}
