//! PPTX reader used to inspect generated decks.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Text and styling recovered from one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InspectedSlide {
    /// 1-based slide number.
    pub number: usize,
    /// Text of the title placeholder, if any.
    pub title: Option<String>,
    /// Non-empty paragraphs of every other text frame, in document order.
    pub body: Vec<String>,
    /// Solid background colour as hex, if the slide sets one.
    pub background: Option<String>,
}

/// All slides of a deck, in presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub slides: Vec<InspectedSlide>,
}

impl DeckSummary {
    /// Number of slides, including the title slide.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide titles in order.
    pub fn titles(&self) -> Vec<&str> {
        self.slides
            .iter()
            .filter_map(|s| s.title.as_deref())
            .collect()
    }
}

/// Reader for PPTX (Office Open XML) files.
pub struct PptxReader;

impl PptxReader {
    /// Create a new PPTX reader.
    pub fn new() -> Self {
        Self
    }

    /// Read every slide of a PPTX package.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<DeckSummary> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_paths = self.slide_order(&mut archive)?;
        let mut summary = DeckSummary::default();

        for (idx, path) in slide_paths.iter().enumerate() {
            let xml = read_file_from_archive(&mut archive, path)?;
            summary.slides.push(parse_slide(&xml, idx + 1)?);
        }

        Ok(summary)
    }

    /// Resolve the `<p:sldIdLst>` order of `presentation.xml` to part paths.
    fn slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels = read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let targets = relationship_targets(&rels)?;

        let presentation = read_file_from_archive(archive, "ppt/presentation.xml")?;
        let mut reader = Reader::from_str(&presentation);
        reader.trim_text(true);

        let mut paths = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"sldId" =>
                {
                    let rel_id = e
                        .attributes()
                        .flatten()
                        .find(|attr| attr.key.as_ref().ends_with(b":id"))
                        .map(|attr| String::from_utf8_lossy(&attr.value).to_string());

                    match rel_id.and_then(|id| targets.get(&id)) {
                        Some(target) => paths.push(resolve_target(target)),
                        None => log::warn!("Slide id without a relationship target, skipping"),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing presentation.xml: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(paths)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Map relationship ids to their targets.
fn relationship_targets(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut id = String::new();
                let mut target = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                targets.insert(id, target);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(targets)
}

/// Turn a target relative to `ppt/` (or package-absolute) into a part path.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target),
    }
}

/// Shape being collected while walking a slide.
#[derive(Debug, Default)]
struct ShapeText {
    is_title: bool,
    paragraphs: Vec<String>,
}

/// Walk a slide part and collect placeholder text and the background colour.
fn parse_slide(xml: &str, number: usize) -> Result<InspectedSlide> {
    let mut reader = Reader::from_str(xml);
    let mut slide = InspectedSlide {
        number,
        ..Default::default()
    };

    let mut current_shape: Option<ShapeText> = None;
    let mut current_paragraph: Option<String> = None;
    let mut in_text = false;
    let mut in_background = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current_shape = Some(ShapeText::default()),
                b"bg" => in_background = true,
                b"p" if current_shape.is_some() => current_paragraph = Some(String::new()),
                b"t" if current_paragraph.is_some() => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"ph" => {
                    if let Some(ref mut shape) = current_shape {
                        shape.is_title = is_title_placeholder(e);
                    }
                }
                b"srgbClr" if in_background && slide.background.is_none() => {
                    slide.background = e
                        .attributes()
                        .flatten()
                        .find(|attr| attr.key.as_ref() == b"val")
                        .map(|attr| String::from_utf8_lossy(&attr.value).to_string());
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(ref mut paragraph) = current_paragraph {
                        let text = e.unescape().unwrap_or_default();
                        paragraph.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"bg" => in_background = false,
                b"p" => {
                    if let (Some(paragraph), Some(shape)) =
                        (current_paragraph.take(), current_shape.as_mut())
                    {
                        shape.paragraphs.push(paragraph);
                    }
                }
                b"sp" => {
                    if let Some(shape) = current_shape.take() {
                        if shape.is_title {
                            slide.title = Some(shape.paragraphs.join("\n"));
                        } else {
                            slide
                                .body
                                .extend(shape.paragraphs.into_iter().filter(|p| !p.is_empty()));
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing slide {}: {}",
                    number, e
                )));
            }
            _ => {}
        }
    }

    Ok(slide)
}

fn is_title_placeholder(ph: &BytesStart<'_>) -> bool {
    ph.attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"type" && matches!(attr.value.as_ref(), b"title" | b"ctrTitle"))
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("/ppt/slides/slide2.xml"), "ppt/slides/slide2.xml");
    }

    #[test]
    fn test_parse_slide_title_body_background() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld>
            <p:bg><p:bgPr><a:solidFill><a:srgbClr val="0066CC"/></a:solidFill></p:bgPr></p:bg>
            <p:spTree>
              <p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
                <p:txBody><a:p><a:r><a:t>Hello &amp; welcome</a:t></a:r></a:p></p:txBody></p:sp>
              <p:sp><p:nvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>
                <p:txBody><a:p><a:r><a:t>First</a:t></a:r></a:p><a:p><a:endParaRPr/></a:p><a:p><a:r><a:t>Second</a:t></a:r></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#;

        let slide = parse_slide(xml, 2).unwrap();

        assert_eq!(slide.number, 2);
        assert_eq!(slide.title.as_deref(), Some("Hello & welcome"));
        assert_eq!(slide.body, vec!["First", "Second"]);
        assert_eq!(slide.background.as_deref(), Some("0066CC"));
    }

    #[test]
    fn test_relationship_targets() {
        let xml = r#"<Relationships xmlns="x"><Relationship Id="rId5" Type="t" Target="slides/slide1.xml"/></Relationships>"#;
        let targets = relationship_targets(xml).unwrap();
        assert_eq!(targets.get("rId5").map(String::as_str), Some("slides/slide1.xml"));
    }
}
