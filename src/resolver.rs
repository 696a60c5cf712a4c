//! Choosing a font that can render each fragment.
//!
//! A [FontRegistry] is an ordered list of candidate fonts plus one fallback. The
//! first candidate whose [Coverage] accepts a fragment's text is used; when none
//! does, the fallback is. A [FontResolver] evaluates that policy for a single
//! build, loading font programs lazily and caching them until the build ends.

use crate::{font::FontMetrics, BuildError, Font, FontSource, Pt};
use std::{collections::HashMap, ops::RangeInclusive, rc::Rc};
use tracing::{debug, warn};

/// When a registry entry may be used for a piece of text
#[derive(Debug, Clone, PartialEq)]
pub enum Coverage {
    /// The font has a glyph for every visible character
    Glyphs,
    /// Every visible character lies in one of the ranges *and* the font has a glyph
    /// for it. Text outside the ranges is rejected without loading the font.
    Ranges(Vec<RangeInclusive<char>>),
}

impl Coverage {
    pub fn cyrillic() -> Coverage {
        Coverage::Ranges(vec![
            '\u{0020}'..='\u{007E}',
            '\u{00A0}'..='\u{00BF}',
            '\u{0400}'..='\u{052F}',
            '\u{2000}'..='\u{206F}',
        ])
    }

    pub fn greek() -> Coverage {
        Coverage::Ranges(vec![
            '\u{0020}'..='\u{007E}',
            '\u{0370}'..='\u{03FF}',
            '\u{1F00}'..='\u{1FFF}',
        ])
    }

    pub fn devanagari() -> Coverage {
        Coverage::Ranges(vec![
            '\u{0020}'..='\u{007E}',
            '\u{0900}'..='\u{097F}',
            '\u{A8E0}'..='\u{A8FF}',
        ])
    }

    pub fn cjk() -> Coverage {
        Coverage::Ranges(vec![
            '\u{0020}'..='\u{007E}',
            '\u{3000}'..='\u{30FF}',
            '\u{4E00}'..='\u{9FFF}',
            '\u{FF00}'..='\u{FFEF}',
        ])
    }

    /// Whether `text` could be rendered by a font with this coverage, using `load` to
    /// obtain the font only once the cheap checks pass
    fn accepts<F>(&self, text: &str, load: F) -> bool
    where
        F: FnOnce() -> Option<Rc<Font>>,
    {
        if let Coverage::Ranges(ranges) = self {
            let within = visible_chars(text).all(|ch| ranges.iter().any(|r| r.contains(&ch)));
            if !within {
                return false;
            }
        }

        load().is_some_and(|font| font.covers(text))
    }
}

fn visible_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars()
        .filter(|ch| !ch.is_whitespace() && !ch.is_control())
}

/// A candidate font in a [FontRegistry]
#[derive(Debug, Clone, PartialEq)]
pub struct FontEntry {
    /// Key of the font program in the [FontSource]
    pub key: String,
    pub coverage: Coverage,
}

/// Identifies a font within a registry: either one of its entries, by position, or
/// the fallback
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontSlot {
    Entry(usize),
    Fallback,
}

/// The ordered font fallback policy
#[derive(Debug, Clone, PartialEq)]
pub struct FontRegistry {
    entries: Vec<FontEntry>,
    fallback: String,
}

impl FontRegistry {
    /// Create a registry with only a fallback font. The fallback must at least cover
    /// basic Latin; it is used for any text no other entry accepts.
    pub fn new<K: ToString>(fallback: K) -> FontRegistry {
        FontRegistry {
            entries: Vec::new(),
            fallback: fallback.to_string(),
        }
    }

    /// Append a candidate font. Entries are tried in the order they were added.
    pub fn add<K: ToString>(&mut self, key: K, coverage: Coverage) -> FontSlot {
        self.entries.push(FontEntry {
            key: key.to_string(),
            coverage,
        });
        FontSlot::Entry(self.entries.len() - 1)
    }

    pub fn key(&self, slot: FontSlot) -> Option<&str> {
        match slot {
            FontSlot::Entry(index) => self.entries.get(index).map(|e| e.key.as_str()),
            FontSlot::Fallback => Some(self.fallback.as_str()),
        }
    }
}

/// A font chosen for a piece of text, shared by every fragment that resolves to it
#[derive(Clone)]
pub struct ResolvedFont {
    slot: FontSlot,
    font: Rc<Font>,
}

impl ResolvedFont {
    pub fn slot(&self) -> FontSlot {
        self.slot
    }

    pub fn font(&self) -> &Rc<Font> {
        &self.font
    }
}

impl FontMetrics for ResolvedFont {
    fn covers(&self, text: &str) -> bool {
        self.font.covers(text)
    }

    fn measure_width(&self, text: &str, size: Pt) -> Pt {
        self.font.measure_width(text, size)
    }

    fn measure_height(&self, size: Pt) -> Pt {
        self.font.measure_height(size)
    }

    fn ascent_ratio(&self) -> Option<f32> {
        self.font.ascent_ratio()
    }
}

enum LoadState {
    Loaded(Rc<Font>),
    Failed,
}

/// Evaluates a [FontRegistry] for one build. Loaded fonts are cached here by key and
/// dropped with the resolver, so separate builds never share font state while every
/// slot naming the same key shares one [Font].
pub struct FontResolver<'a> {
    registry: &'a FontRegistry,
    source: &'a dyn FontSource,
    fonts: HashMap<String, LoadState>,
}

impl<'a> FontResolver<'a> {
    pub fn new(registry: &'a FontRegistry, source: &'a dyn FontSource) -> FontResolver<'a> {
        FontResolver {
            registry,
            source,
            fonts: HashMap::new(),
        }
    }

    /// Pick the font for `text`. Only fails if the fallback font cannot be loaded
    pub fn resolve(&mut self, text: &str) -> Result<ResolvedFont, BuildError> {
        let registry = self.registry;
        for (index, entry) in registry.entries.iter().enumerate() {
            let slot = FontSlot::Entry(index);
            let mut loaded = None;
            let accepted = entry.coverage.accepts(text, || {
                loaded = self.load_entry(slot);
                loaded.clone()
            });
            if let (true, Some(font)) = (accepted, loaded) {
                return Ok(ResolvedFont { slot, font });
            }
        }

        Ok(ResolvedFont {
            slot: FontSlot::Fallback,
            font: self.fallback()?,
        })
    }

    /// The fallback font, loading it on first use
    pub fn fallback(&mut self) -> Result<Rc<Font>, BuildError> {
        let registry = self.registry;
        self.load(&registry.fallback)
    }

    /// A registry entry's font, or [None] if it can't be loaded. Failures are logged
    /// once and the entry is skipped for the rest of the build
    fn load_entry(&mut self, slot: FontSlot) -> Option<Rc<Font>> {
        let registry = self.registry;
        let key = registry.key(slot)?;
        if let Some(LoadState::Failed) = self.fonts.get(key) {
            return None;
        }

        match self.load(key) {
            Ok(font) => Some(font),
            Err(err) => {
                warn!(key, error = %err, "skipping font that could not be loaded");
                None
            }
        }
    }

    fn load(&mut self, key: &str) -> Result<Rc<Font>, BuildError> {
        match self.fonts.get(key) {
            Some(LoadState::Loaded(font)) => return Ok(font.clone()),
            Some(LoadState::Failed) => {
                return Err(BuildError::font_unavailable(key, "failed to load earlier"))
            }
            None => {}
        }

        let loaded = self
            .source
            .load(key)
            .and_then(|bytes| Font::load(key, bytes));
        match loaded {
            Ok(font) => {
                debug!(key, name = %font.name(), "loaded font");
                let font = Rc::new(font);
                self.fonts
                    .insert(key.to_string(), LoadState::Loaded(font.clone()));
                Ok(font)
            }
            Err(err) => {
                self.fonts.insert(key.to_string(), LoadState::Failed);
                Err(match err {
                    BuildError::FontUnavailable { .. } => err,
                    other => BuildError::font_unavailable(key, other),
                })
            }
        }
    }
}
