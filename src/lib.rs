//! Rebuild OCR results as PDFs: one page per source image, with each recognised text
//! fragment set at the position and size of its bounding box so the output can be
//! searched and copied from.
//!
//! ```no_run
//! use ocr_pdf::{
//!     BuildOptions, Canvas, Coverage, DirectoryFontSource, Encoder, FontRegistry, PageInput,
//!     TextFragment,
//! };
//!
//! let mut registry = FontRegistry::new("DejaVuMathTeXGyre.ttf");
//! registry.add("DejaVuSans.ttf", Coverage::cyrillic());
//! let source = DirectoryFontSource::new("assets");
//!
//! let page = PageInput::new(
//!     Canvas::new(300.0, 300.0)?,
//!     vec![TextFragment::new("Hello", 20.0, 200.0, 200.0, 20.0)?],
//! );
//! let result = Encoder::new(&registry, &source, BuildOptions::default()).build(&vec![page])?;
//! std::fs::write("hello.pdf", result.bytes())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod content;

mod document;
pub use document::*;

mod encoder;
pub use encoder::*;

mod error;
pub use error::*;

/// Font sizing for fragment boxes
pub mod fit;

mod font;
pub use font::*;

mod font_source;
pub use font_source::*;

mod fragment;
pub use fragment::*;

mod info;
pub use info::*;

pub mod layout;

mod options;
pub use options::*;

mod page;
pub use page::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod resolver;
pub use resolver::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
