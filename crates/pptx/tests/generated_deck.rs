use deck_core::{parse_titles, truncate_content, Deck, Layout, Theme, Topic, Variant};
use deck_pptx::{PptxReader, PptxWriter};
use std::fs::File;
use std::io::Cursor;

fn deck_from_response(topic: &str, titles_response: &str, body: &str, max_chars: usize) -> Deck {
    let titles = parse_titles(titles_response);
    let contents: Vec<String> = titles
        .iter()
        .map(|_| truncate_content(body, max_chars))
        .collect();
    Deck::from_parts(Topic::new(topic).unwrap(), titles, contents)
}

#[test]
fn test_one_content_slide_per_non_blank_title() {
    let deck = deck_from_response(
        "Volcanoes",
        "How Volcanoes Form\n\nTypes of Eruptions\n \nFamous Volcanoes\nSafety\n\n",
        "Magma rises.",
        200,
    );

    let bytes = PptxWriter::default().to_bytes(&deck, Theme::Default).unwrap();
    let summary = PptxReader::new().read(Cursor::new(bytes)).unwrap();

    assert_eq!(summary.slide_count(), 5);
    assert_eq!(
        summary.titles(),
        vec![
            "Volcanoes",
            "How Volcanoes Form",
            "Types of Eruptions",
            "Famous Volcanoes",
            "Safety"
        ]
    );
}

#[test]
fn test_every_slide_carries_theme_background() {
    let deck = deck_from_response("Oceans", "Currents\nReefs", "Water.", 200);

    for theme in Theme::ALL {
        let bytes = PptxWriter::default().to_bytes(&deck, theme).unwrap();
        let summary = PptxReader::new().read(Cursor::new(bytes)).unwrap();
        let expected = theme.colors().background.to_hex();

        assert!(summary
            .slides
            .iter()
            .all(|s| s.background.as_deref() == Some(expected.as_str())));
    }
}

#[test]
fn test_truncated_body_is_written() {
    let long_body = "word ".repeat(100);
    let deck = deck_from_response("Language", "Grammar", &long_body, 300);

    let bytes = PptxWriter::new(Layout::for_variant(Variant::OpenAi))
        .to_bytes(&deck, Theme::Light)
        .unwrap();
    let summary = PptxReader::new().read(Cursor::new(bytes)).unwrap();

    let body = &summary.slides[1].body;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].chars().count(), 303);
    assert!(body[0].ends_with("..."));
}

#[test]
fn test_writer_clips_unshaped_bodies() {
    let topic = Topic::new("Rivers").unwrap();
    let deck = Deck::from_parts(topic, ["Deltas", "Floods"], ["a".repeat(450), "short".to_string()]);

    let bytes = PptxWriter::new(Layout::for_variant(Variant::Gemini))
        .to_bytes(&deck, Theme::Default)
        .unwrap();
    let summary = PptxReader::new().read(Cursor::new(bytes)).unwrap();

    assert_eq!(summary.slides[1].body, vec![format!("{}...", "a".repeat(200))]);
    assert_eq!(summary.slides[2].body, vec!["short"]);
}

#[test]
fn test_title_slide_has_no_body_text() {
    let deck = deck_from_response("Chess", "Openings", "e4 e5", 200);
    let bytes = PptxWriter::default().to_bytes(&deck, Theme::Dark).unwrap();
    let summary = PptxReader::new().read(Cursor::new(bytes)).unwrap();

    assert_eq!(summary.slides[0].title.as_deref(), Some("Chess"));
    assert!(summary.slides[0].body.is_empty());
    assert_eq!(summary.slides[1].body, vec!["e4 e5"]);
}

#[test]
fn test_multiline_body_and_special_characters() {
    let deck = deck_from_response(
        "Q&A Live",
        "Tips & <Tricks>",
        "First point\nSecond point",
        200,
    );

    let dir = tempfile::tempdir().unwrap();
    let path = PptxWriter::default()
        .save(&deck, Theme::Blue, dir.path())
        .unwrap();
    assert_eq!(path, dir.path().join("Q&A Live_presentation.pptx"));

    let summary = PptxReader::new().read(File::open(&path).unwrap()).unwrap();
    assert_eq!(summary.titles(), vec!["Q&A Live", "Tips & <Tricks>"]);
    assert_eq!(summary.slides[1].body, vec!["First point", "Second point"]);
}

#[test]
fn test_empty_title_list_yields_title_slide_only() {
    let deck = deck_from_response("Nothing", "\n\n", "unused", 200);
    let bytes = PptxWriter::default().to_bytes(&deck, Theme::Light).unwrap();
    let summary = PptxReader::new().read(Cursor::new(bytes)).unwrap();

    assert_eq!(summary.slide_count(), 1);
}
