//! Turn an OCR layout stored as JSON into a searchable PDF.
//!
//! ```text
//! cargo run --example ocr-to-pdf -- layout.json assets out.pdf
//! ```
//!
//! `layout.json` holds a list of pages, each a `canvas` (`width`, `height`) with its
//! recognised `fragments` (`text`, `x`, `y`, `width`, `height`, in pixels from the
//! top-left corner of the image).

use ocr_pdf::{
    BuildOptions, Coverage, DirectoryFontSource, Encoder, FontRegistry, Info, LayoutInput,
};
use std::{error::Error, fs::File, io::BufWriter, path::PathBuf};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(layout), Some(fonts), Some(out)) = (args.next(), args.next(), args.next()) else {
        eprintln!("usage: ocr-to-pdf <layout.json> <font dir> <out.pdf>");
        std::process::exit(2);
    };

    let input: LayoutInput = serde_json::from_reader(File::open(&layout)?)?;

    let mut registry = FontRegistry::new("DejaVuMathTeXGyre.ttf");
    registry.add("DejaVuSans.ttf", Coverage::Glyphs);
    let source = DirectoryFontSource::new(fonts);

    let mut info = Info::new();
    let title = PathBuf::from(&layout);
    if let Some(name) = title.file_stem().and_then(|stem| stem.to_str()) {
        info.title(name);
    }
    let options = BuildOptions::default().with_info(Some(info));

    let out = BufWriter::new(File::create(&out)?);
    let pages = Encoder::new(&registry, &source, options).build_to(&input, out)?;
    tracing::info!(pages, "wrote {layout} as a PDF");

    Ok(())
}
