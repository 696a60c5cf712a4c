use crate::{
    refs::{ObjectReferences, RefType},
    BuildError, Pt,
};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use owned_ttf_parser::{name_id, AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::{BTreeMap, HashMap};

/// Measurements the fit calculator and the layout planner need from a font. Implemented
/// by [Font]; tests use simpler fixed-advance implementations.
pub trait FontMetrics {
    /// Whether every visible code point in `text` has a glyph in this font
    fn covers(&self, text: &str) -> bool;

    /// Horizontal advance of `text` set at `size`
    fn measure_width(&self, text: &str, size: Pt) -> Pt;

    /// Distance from the lowest descender to the highest ascender at `size`
    fn measure_height(&self, size: Pt) -> Pt;

    /// Ascender as a fraction of the font size, if the font reports a usable one
    fn ascent_ratio(&self) -> Option<f32>;
}

/// A parsed TrueType or OpenType font program. The whole program is embedded in the
/// generated PDF; only the glyphs actually drawn receive width and ToUnicode entries.
pub struct Font {
    key: String,
    face: OwnedFace,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("key", &self.key)
            .field("name", &self.name())
            .finish()
    }
}

impl Font {
    /// Parse a font program loaded under `key`, returning an error if the font
    /// could not be parsed
    pub fn load<K: ToString>(key: K, bytes: Vec<u8>) -> Result<Font, BuildError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font {
            key: key.to_string(),
            face,
        })
    }

    /// The key this font was loaded under in its [FontSource](crate::FontSource)
    pub fn key(&self) -> &str {
        &self.key
    }

    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / Pt(self.face().units_per_em() as f32)
    }

    fn find_name(&self, id: u16) -> Option<String> {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Obtain the full name of the font, or its key if the font carries no name
    pub fn name(&self) -> String {
        self.find_name(name_id::FULL_NAME)
            .unwrap_or_else(|| self.key.clone())
    }

    /// Obtain the family name of the font, or its key if the font carries no family
    pub fn family(&self) -> String {
        self.find_name(name_id::FAMILY)
            .unwrap_or_else(|| self.key.clone())
    }

    /// Name used for the `/BaseFont` entries: the PostScript name, without spaces
    fn base_font_name(&self, font_index: usize) -> String {
        self.find_name(name_id::POST_SCRIPT_NAME)
            .map(|name| name.replace(' ', ""))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("F{font_index}"))
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face().ascender() as f32
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face().descender() as f32
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face()
            .glyph_index(ch)
            .map(|gid| gid.0)
            .filter(|&gid| gid > 0)
    }

    /// The glyph drawn for characters this font has no glyph of their own for: the
    /// replacement character U+FFFD, else `.notdef`. Neither stands for any real
    /// character, so text extraction can't confuse them with actual text
    pub fn replacement_glyph_id(&self) -> u16 {
        self.glyph_id(char::REPLACEMENT_CHARACTER).unwrap_or(0)
    }

    /// The glyph drawn for `ch`: its own glyph, else [Font::replacement_glyph_id]
    pub fn renderable_glyph_id(&self, ch: char) -> u16 {
        self.glyph_id(ch)
            .unwrap_or_else(|| self.replacement_glyph_id())
    }

    fn advance(&self, gid: u16) -> u16 {
        self.face()
            .glyph_hor_advance(GlyphId(gid))
            .unwrap_or_default()
    }

    fn write_font_data(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::FontData(font_index));

        let data = self.face.as_slice();
        let compressed = compress_to_vec_zlib(data, CompressionLevel::DefaultCompression as u8);
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode)
            .pair(Name(b"Length1"), data.len() as i32);

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &BTreeMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_id = self.write_font_data(refs, font_index, writer);
        let id = refs.gen(RefType::FontDescriptor(font_index));
        let face = self.face();
        let scaling = 1000.0 / face.units_per_em() as f32;

        let widths: Vec<u16> = glyphs.keys().map(|&gid| self.advance(gid)).collect();
        let max_width = widths.iter().copied().max().unwrap_or_default();
        let avg_width = if widths.is_empty() {
            0.0
        } else {
            widths.iter().map(|&w| w as f32).sum::<f32>() / widths.len() as f32
        };

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(self.base_font_name(font_index).as_bytes()));
        descriptor.family(Str(self.family().as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags = FontFlags::SYMBOLIC;
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let bbox = face.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(0.0);
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        let cap_height = face
            .capital_height()
            .map(|h| h as f32 * scaling)
            .unwrap_or(700.0);
        descriptor.cap_height(cap_height);
        descriptor.x_height(
            face.x_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(cap_height),
        );
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.font_file2(font_data_id);

        id
    }

    fn write_cid(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &BTreeMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let descriptor_id = self.write_descriptor(refs, font_index, glyphs, writer);
        let id = refs.gen(RefType::CidFont(font_index));

        let base_font = self.base_font_name(font_index);
        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(base_font.as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);

        let scaling = 1000.0 / self.face().units_per_em() as f32;

        // find the most popular width to use as the default
        // <width, count>
        let mut widths_counts: HashMap<u16, usize> = HashMap::new();
        for &gid in glyphs.keys() {
            *widths_counts.entry(self.advance(gid)).or_insert(0) += 1;
        }
        let most_common_width = widths_counts
            .iter()
            .max_by_key(|&(&width, &count)| (count, width))
            .map(|(&width, _)| width as f32 * scaling)
            .unwrap_or(1000.0);

        // glyph ids are sorted (BTreeMap), so runs of consecutive ids share one array
        let mut runs: Vec<(u16, Vec<f32>)> = Vec::new();
        for &gid in glyphs.keys() {
            let width = self.advance(gid) as f32 * scaling;
            if let Some((start, widths)) = runs.last_mut() {
                if *start as usize + widths.len() == gid as usize {
                    widths.push(width);
                    continue;
                }
            }
            runs.push((gid, vec![width]));
        }

        let mut widths = cid_font.widths();
        for (start, run) in runs.into_iter() {
            widths.consecutive(start, run);
        }
        widths.finish();

        cid_font.default_width(most_common_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &BTreeMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let map = to_unicode_cmap(glyphs);
        let compressed = compress_to_vec_zlib(
            map.as_bytes(),
            CompressionLevel::DefaultCompression as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(Filter::FlateDecode);

        id
    }

    /// Write the Type0 font dictionary and all of its dependent objects. `glyphs` maps
    /// every glyph drawn with this font to the character it was drawn for
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &BTreeMap<u16, char>,
        writer: &mut Pdf,
    ) {
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, glyphs, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, glyphs, writer);

        let base_font = self.base_font_name(font_index);
        let mut font = writer.type0_font(font_id);
        font.base_font(Name(base_font.as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}

impl FontMetrics for Font {
    fn covers(&self, text: &str) -> bool {
        text.chars()
            .filter(|ch| !ch.is_whitespace() && !ch.is_control())
            .all(|ch| self.glyph_id(ch).is_some())
    }

    fn measure_width(&self, text: &str, size: Pt) -> Pt {
        let units: u32 = text
            .chars()
            .map(|ch| self.advance(self.renderable_glyph_id(ch)) as u32)
            .sum();
        self.scaling(size) * units as f32
    }

    fn measure_height(&self, size: Pt) -> Pt {
        self.ascent(size) - self.descent(size)
    }

    fn ascent_ratio(&self) -> Option<f32> {
        let ratio = self.face().ascender() as f32 / self.face().units_per_em() as f32;
        (ratio > 0.0 && ratio <= 1.5).then_some(ratio)
    }
}

/// Build the ToUnicode CMap for the given glyph → character mapping
fn to_unicode_cmap(glyphs: &BTreeMap<u16, char>) -> String {
    let mut map: String = r#"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
"#
    .replace("\r\n", "\n");

    // each bfchar block holds at most 100 entries
    let entries: Vec<(u16, char)> = glyphs.iter().map(|(&gid, &ch)| (gid, ch)).collect();
    for block in entries.chunks(100) {
        map.push_str(&format!("{} beginbfchar\n", block.len()));
        for &(gid, ch) in block {
            let mut utf16 = [0u16; 2];
            let encoded: String = ch
                .encode_utf16(&mut utf16)
                .iter()
                .map(|unit| format!("{unit:04X}"))
                .collect();
            map.push_str(&format!("<{gid:04X}> <{encoded}>\n"));
        }
        map.push_str("endbfchar\n");
    }

    map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");
    map
}
