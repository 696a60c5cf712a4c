//! The input contract: canvases and the OCR text fragments placed on them.

use crate::{BuildError, Pt, Rect};
use serde::{Deserialize, Serialize};

/// Pixel dimensions of one OCR source image. Every canvas becomes exactly one
/// page in the generated document, sized one point per pixel.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCanvas")]
pub struct Canvas {
    width: Pt,
    height: Pt,
}

#[derive(Deserialize)]
struct RawCanvas {
    width: f32,
    height: f32,
}

impl TryFrom<RawCanvas> for Canvas {
    type Error = BuildError;

    fn try_from(raw: RawCanvas) -> Result<Self, Self::Error> {
        Canvas::new(raw.width, raw.height)
    }
}

impl Canvas {
    /// Create a canvas, rejecting dimensions that are not finite and strictly positive
    pub fn new(width: f32, height: f32) -> Result<Canvas, BuildError> {
        let (width, height) = (Pt(width), Pt(height));
        if !width.is_finite() || !height.is_finite() || *width <= 0.0 || *height <= 0.0 {
            return Err(BuildError::InvalidCanvas(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Canvas { width, height })
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn height(&self) -> Pt {
        self.height
    }

    /// The page box this canvas maps to, with the origin in the bottom-left corner
    pub fn media_box(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

/// One OCR-detected text region. Coordinates are in canvas pixels with the origin
/// in the top-left corner of the source image; `y` is the top edge of the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFragment")]
pub struct TextFragment {
    text: String,
    x: Pt,
    y: Pt,
    width: Pt,
    height: Pt,
}

#[derive(Deserialize)]
struct RawFragment {
    text: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl TryFrom<RawFragment> for TextFragment {
    type Error = BuildError;

    fn try_from(raw: RawFragment) -> Result<Self, Self::Error> {
        TextFragment::new(raw.text, raw.x, raw.y, raw.width, raw.height)
    }
}

impl TextFragment {
    /// Create a fragment. Negative or non-finite geometry is rejected; empty text and
    /// zero-sized boxes are accepted here and skipped when the document is encoded,
    /// since OCR output routinely contains them.
    pub fn new<S: Into<String>>(
        text: S,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<TextFragment, BuildError> {
        let (x, y, width, height) = (Pt(x), Pt(y), Pt(width), Pt(height));
        for (name, value) in [("x", x), ("y", y), ("width", width), ("height", height)] {
            if !value.is_finite() || *value < 0.0 {
                return Err(BuildError::InvalidFragment(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        Ok(TextFragment {
            text: text.into(),
            x,
            y,
            width,
            height,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn x(&self) -> Pt {
        self.x
    }

    pub fn y(&self) -> Pt {
        self.y
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn height(&self) -> Pt {
        self.height
    }

    /// A fragment with nothing to draw: text that is blank or only control characters,
    /// or a box without area
    pub fn is_degenerate(&self) -> bool {
        self.text
            .chars()
            .all(|ch| ch.is_whitespace() || ch.is_control())
            || *self.width <= 0.0
            || *self.height <= 0.0
    }
}

/// A canvas together with the fragments recognised on it, in reading order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInput {
    pub canvas: Canvas,
    #[serde(default)]
    pub fragments: Vec<TextFragment>,
}

impl PageInput {
    pub fn new(canvas: Canvas, fragments: Vec<TextFragment>) -> PageInput {
        PageInput { canvas, fragments }
    }
}

/// Everything needed to build one document: one entry per output page
pub type LayoutInput = Vec<PageInput>;
