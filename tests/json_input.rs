mod common;

use common::*;
use ocr_pdf::{BuildOptions, Encoder, LayoutInput, Pt};

const LAYOUT: &str = r#"[
    {
        "canvas": { "width": 300, "height": 300 },
        "fragments": [
            { "text": "Hello", "x": 20, "y": 200, "width": 200, "height": 20 },
            { "text": "Барышня", "x": 20, "y": 240, "width": 150, "height": 18.5 }
        ]
    },
    { "canvas": { "width": 612, "height": 792 } }
]"#;

#[test]
fn layout_from_json() {
    let input: LayoutInput = serde_json::from_str(LAYOUT).expect("layout parses");
    assert_eq!(input.len(), 2);
    assert!(input[1].fragments.is_empty());

    let registry = registry();
    let source = source();
    let result = Encoder::new(&registry, &source, BuildOptions::default())
        .build(&input)
        .expect("document builds");
    assert_eq!(result.page_count(), 2);

    let doc = load(result.bytes());
    let pages = pages(&doc);
    assert_eq!(extract_text(&doc, pages[0]), "Hello\nБарышня");
    assert_eq!(media_box(&doc, pages[1]), [0.0, 0.0, 612.0, 792.0]);
}

#[test]
fn invalid_geometry_is_rejected() {
    let negative = r#"[{ "canvas": { "width": 300, "height": 300 },
        "fragments": [{ "text": "x", "x": -1, "y": 0, "width": 5, "height": 5 }] }]"#;
    assert!(serde_json::from_str::<LayoutInput>(negative).is_err());

    let flat = r#"[{ "canvas": { "width": 0, "height": 300 } }]"#;
    assert!(serde_json::from_str::<LayoutInput>(flat).is_err());
}

#[test]
fn options_from_json() {
    let options: BuildOptions = serde_json::from_str(
        r#"{ "min_font_size": 4, "max_font_size": 48, "ascent_ratio": 0.9 }"#,
    )
    .expect("options parse");
    assert_eq!(options.min_font_size(), Pt(4.0));
    assert_eq!(options.max_font_size(), Some(Pt(48.0)));
    assert_eq!(options.ascent_ratio(), Some(0.9));
    assert!(options.info().is_none());

    let defaults: BuildOptions = serde_json::from_str("{}").expect("options parse");
    assert_eq!(defaults, BuildOptions::default());

    assert!(serde_json::from_str::<BuildOptions>(r#"{ "min_font_size": 20, "max_font_size": 10 }"#).is_err());
}
