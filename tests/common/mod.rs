#![allow(dead_code)]

use lopdf::{content::Content, Dictionary, Object, ObjectId};
use ocr_pdf::{Canvas, Coverage, FontRegistry, MemoryFontSource, PageInput, TextFragment};
use std::collections::HashMap;

pub const LATIN: &str = "DejaVuMathTeXGyre.ttf";
pub const SANS: &str = "DejaVuSans.ttf";

/// Both bundled fonts. The math font only covers Latin, DejaVu Sans also covers Cyrillic
pub fn source() -> MemoryFontSource {
    let mut source = MemoryFontSource::new();
    source.insert(
        LATIN,
        include_bytes!("../../assets/DejaVuMathTeXGyre.ttf").to_vec(),
    );
    source.insert(SANS, include_bytes!("../../assets/DejaVuSans.ttf").to_vec());
    source
}

/// Latin text is set in the math font, Cyrillic in DejaVu Sans
pub fn registry() -> FontRegistry {
    let mut registry = FontRegistry::new(LATIN);
    registry.add(
        SANS,
        Coverage::Ranges(vec!['\u{0020}'..='\u{0020}', '\u{0400}'..='\u{04FF}']),
    );
    registry
}

pub fn canvas(width: f32, height: f32) -> Canvas {
    Canvas::new(width, height).expect("valid canvas")
}

pub fn fragment(text: &str, x: f32, y: f32, width: f32, height: f32) -> TextFragment {
    TextFragment::new(text, x, y, width, height).expect("valid fragment")
}

pub fn page(canvas: Canvas, fragments: Vec<TextFragment>) -> PageInput {
    PageInput::new(canvas, fragments)
}

pub fn load(bytes: &[u8]) -> lopdf::Document {
    lopdf::Document::load_mem(bytes).expect("output parses as a PDF")
}

/// Page object ids in page order
pub fn pages(doc: &lopdf::Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

fn resolve<'a>(doc: &'a lopdf::Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).expect("reference resolves"),
        other => other,
    }
}

fn dict<'a>(doc: &'a lopdf::Document, object: &'a Object) -> &'a Dictionary {
    resolve(doc, object).as_dict().expect("object is a dictionary")
}

fn page_dict(doc: &lopdf::Document, page: ObjectId) -> &Dictionary {
    doc.get_object(page)
        .and_then(Object::as_dict)
        .expect("page is a dictionary")
}

fn number(object: &Object) -> f64 {
    match object {
        Object::Integer(value) => *value as f64,
        Object::Real(value) => *value as f64,
        other => panic!("{other:?} is not a number"),
    }
}

pub fn media_box(doc: &lopdf::Document, page: ObjectId) -> [f64; 4] {
    let media_box = page_dict(doc, page)
        .get(b"MediaBox")
        .and_then(Object::as_array)
        .expect("page has a MediaBox");
    assert_eq!(media_box.len(), 4);
    [
        number(&media_box[0]),
        number(&media_box[1]),
        number(&media_box[2]),
        number(&media_box[3]),
    ]
}

/// The count written in the root of the page tree
pub fn page_tree_count(doc: &lopdf::Document) -> i64 {
    let catalog = doc.catalog().expect("document has a catalog");
    let tree = dict(doc, catalog.get(b"Pages").expect("catalog has pages"));
    tree.get(b"Count")
        .and_then(Object::as_i64)
        .expect("page tree has a count")
}

/// Resource name => font dictionary, for the fonts a page lists
fn page_fonts<'a>(doc: &'a lopdf::Document, page: ObjectId) -> Vec<(String, &'a Dictionary)> {
    let resources = dict(
        doc,
        page_dict(doc, page)
            .get(b"Resources")
            .expect("page has resources"),
    );
    let Ok(fonts) = resources.get(b"Font") else {
        return Vec::new();
    };
    dict(doc, fonts)
        .iter()
        .map(|(name, font)| (String::from_utf8_lossy(name).into_owned(), dict(doc, font)))
        .collect()
}

/// Base font names of the fonts a page lists in its resources
pub fn page_font_names(doc: &lopdf::Document, page: ObjectId) -> Vec<String> {
    page_fonts(doc, page)
        .into_iter()
        .map(|(_, font)| {
            let name = font
                .get(b"BaseFont")
                .and_then(Object::as_name)
                .expect("font has a base font");
            String::from_utf8_lossy(name).into_owned()
        })
        .collect()
}

/// Number of Type0 font dictionaries in the whole file
pub fn type0_font_count(doc: &lopdf::Document) -> usize {
    doc.objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .filter(|dict| {
            matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name.as_slice() == b"Type0")
        })
        .count()
}

/// Parse the bfchar entries of a ToUnicode CMap
fn to_unicode(cmap: &str) -> HashMap<u16, String> {
    let mut map = HashMap::new();
    let mut in_block = false;
    for line in cmap.lines().map(str::trim) {
        if line.ends_with("beginbfchar") {
            in_block = true;
            continue;
        }
        if line == "endbfchar" {
            in_block = false;
            continue;
        }
        if !in_block {
            continue;
        }

        let parts: Vec<&str> = line
            .split(|ch| ch == '<' || ch == '>' || ch == ' ')
            .filter(|part| !part.is_empty())
            .collect();
        let [gid, units] = parts.as_slice() else {
            panic!("malformed bfchar line {line:?}");
        };
        let gid = u16::from_str_radix(gid, 16).expect("hex glyph id");
        let units: Vec<u16> = (0..units.len())
            .step_by(4)
            .map(|i| u16::from_str_radix(&units[i..i + 4], 16).expect("hex utf-16"))
            .collect();
        map.insert(gid, String::from_utf16(&units).expect("valid utf-16"));
    }
    map
}

fn font_cmap(doc: &lopdf::Document, font: &Dictionary) -> HashMap<u16, String> {
    let stream = resolve(doc, font.get(b"ToUnicode").expect("font has a ToUnicode map"))
        .as_stream()
        .expect("ToUnicode is a stream");
    let cmap = stream
        .decompressed_content()
        .expect("ToUnicode decompresses");
    to_unicode(&String::from_utf8(cmap).expect("cmap is ascii"))
}

/// One text-showing operation on a page
#[derive(Debug, Clone, PartialEq)]
pub struct ShownText {
    /// Resource name of the font
    pub font: String,
    pub size: f64,
    /// Text position set by the preceding `Td`
    pub position: (f64, f64),
    pub text: String,
}

/// Every string shown on a page, in content-stream order, decoded through the
/// ToUnicode maps of the page's fonts
pub fn page_text(doc: &lopdf::Document, page: ObjectId) -> Vec<ShownText> {
    let cmaps: HashMap<String, HashMap<u16, String>> = page_fonts(doc, page)
        .into_iter()
        .map(|(name, font)| (name, font_cmap(doc, font)))
        .collect();

    let content = doc.get_page_content(page).expect("page has content");
    let content = Content::decode(&content).expect("content stream decodes");

    let mut shown = Vec::new();
    let mut font = String::new();
    let mut size = 0.0;
    let mut position = (0.0, 0.0);
    for op in content.operations.iter() {
        match op.operator.as_str() {
            "Tf" => {
                let name = op.operands[0].as_name().expect("font name");
                font = String::from_utf8_lossy(name).into_owned();
                size = number(&op.operands[1]);
            }
            "Td" => position = (number(&op.operands[0]), number(&op.operands[1])),
            "Tj" => {
                let Object::String(bytes, _) = &op.operands[0] else {
                    panic!("Tj operand is not a string");
                };
                let cmap = cmaps.get(&font).expect("font is listed in the page resources");
                let text = bytes
                    .chunks(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .map(|gid| cmap.get(&gid).cloned().expect("glyph has a unicode mapping"))
                    .collect();
                shown.push(ShownText {
                    font: font.clone(),
                    size,
                    position,
                    text,
                });
            }
            _ => {}
        }
    }
    shown
}

/// All text on a page, one line per shown string
pub fn extract_text(doc: &lopdf::Document, page: ObjectId) -> String {
    page_text(doc, page)
        .into_iter()
        .map(|shown| shown.text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A string from the document information dictionary
pub fn info_entry(doc: &lopdf::Document, key: &[u8]) -> Option<String> {
    let info = dict(doc, doc.trailer.get(b"Info").ok()?);
    match info.get(key).ok()? {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}
