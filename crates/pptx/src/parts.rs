//! Per-deck package parts: content types, relationships, document
//! properties, `presentation.xml`, and the slides themselves.

use crate::xml::{XmlSink, NS_A, NS_P, NS_PACKAGE_RELS, NS_R};
use deck_core::{
    paragraphs, truncate_content, BoxGeometry, Layout, Result, Rgb, Slide, ThemeColors, Topic,
};

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_APP_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_PRES_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_TABLE_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
const CT_CORE_PROPS: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP_PROPS: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";
const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";

/// Relationship ids `rId1`..`rId4` of `presentation.xml.rels` are taken by
/// the master, theme, presProps and tableStyles; slides follow.
const FIRST_SLIDE_REL: usize = 5;

/// Slide ids start at 256 by convention.
const FIRST_SLIDE_ID: usize = 256;

/// Font sizes in `<a:rPr sz>` are hundredths of a point.
const SZ_PER_POINT: u32 = 100;

/// Path of the `n`th slide (1-based).
pub fn slide_path(n: usize) -> String {
    format!("ppt/slides/slide{}.xml", n)
}

/// Path of the relationship part of the `n`th slide (1-based).
pub fn slide_rels_path(n: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", n)
}

/// Which slide layout a slide is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    /// Title slide: centred title plus an empty subtitle.
    Title,
    /// Title and body text.
    Content,
}

impl SlideKind {
    fn layout_target(self) -> &'static str {
        match self {
            SlideKind::Title => "../slideLayouts/slideLayout1.xml",
            SlideKind::Content => "../slideLayouts/slideLayout2.xml",
        }
    }
}

/// `[Content_Types].xml` for a deck of `slide_count` slides.
pub fn content_types(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlSink::new()?;
    xml.start(
        "Types",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/content-types",
        )],
    )?;
    xml.empty("Default", &[("Extension", "rels"), ("ContentType", CT_RELS)])?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;

    let overrides = [
        ("/ppt/presentation.xml", CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT),
        ("/ppt/slideLayouts/slideLayout2.xml", CT_SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml", CT_THEME),
        ("/ppt/presProps.xml", CT_PRES_PROPS),
        ("/ppt/tableStyles.xml", CT_TABLE_STYLES),
        ("/docProps/core.xml", CT_CORE_PROPS),
        ("/docProps/app.xml", CT_APP_PROPS),
    ];
    for (part, content_type) in overrides {
        xml.empty(
            "Override",
            &[("PartName", part), ("ContentType", content_type)],
        )?;
    }

    for n in 1..=slide_count {
        let part = format!("/{}", slide_path(n));
        xml.empty("Override", &[("PartName", part.as_str()), ("ContentType", CT_SLIDE)])?;
    }

    xml.end("Types")?;
    Ok(xml.finish())
}

/// Write a relationships part from `(id, type, target)` triples.
fn relationships(rels: &[(String, &str, String)]) -> Result<Vec<u8>> {
    let mut xml = XmlSink::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    for (id, rel_type, target) in rels {
        xml.empty(
            "Relationship",
            &[
                ("Id", id.as_str()),
                ("Type", *rel_type),
                ("Target", target.as_str()),
            ],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

/// `_rels/.rels`
pub fn root_rels() -> Result<Vec<u8>> {
    relationships(&[
        (
            "rId1".to_string(),
            REL_OFFICE_DOCUMENT,
            "ppt/presentation.xml".to_string(),
        ),
        (
            "rId2".to_string(),
            REL_CORE_PROPS,
            "docProps/core.xml".to_string(),
        ),
        (
            "rId3".to_string(),
            REL_APP_PROPS,
            "docProps/app.xml".to_string(),
        ),
    ])
}

/// `ppt/_rels/presentation.xml.rels`
pub fn presentation_rels(slide_count: usize) -> Result<Vec<u8>> {
    let mut rels = vec![
        (
            "rId1".to_string(),
            REL_SLIDE_MASTER,
            "slideMasters/slideMaster1.xml".to_string(),
        ),
        ("rId2".to_string(), REL_THEME, "theme/theme1.xml".to_string()),
        ("rId3".to_string(), REL_PRES_PROPS, "presProps.xml".to_string()),
        (
            "rId4".to_string(),
            REL_TABLE_STYLES,
            "tableStyles.xml".to_string(),
        ),
    ];

    for n in 1..=slide_count {
        rels.push((
            format!("rId{}", FIRST_SLIDE_REL + n - 1),
            REL_SLIDE,
            format!("slides/slide{}.xml", n),
        ));
    }

    relationships(&rels)
}

/// `ppt/slides/_rels/slideN.xml.rels`
pub fn slide_rels(kind: SlideKind) -> Result<Vec<u8>> {
    relationships(&[(
        "rId1".to_string(),
        REL_SLIDE_LAYOUT,
        kind.layout_target().to_string(),
    )])
}

/// `ppt/presentation.xml`
pub fn presentation(layout: &Layout, slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlSink::new()?;
    xml.start(
        "p:presentation",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    xml.start("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    xml.end("p:sldMasterIdLst")?;

    xml.start("p:sldIdLst", &[])?;
    for idx in 0..slide_count {
        let id = (FIRST_SLIDE_ID + idx).to_string();
        let rel = format!("rId{}", FIRST_SLIDE_REL + idx);
        xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
    }
    xml.end("p:sldIdLst")?;

    xml.empty(
        "p:sldSz",
        &[
            ("cx", layout.slide_width.to_string().as_str()),
            ("cy", layout.slide_height.to_string().as_str()),
        ],
    )?;
    xml.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;

    xml.end("p:presentation")?;
    Ok(xml.finish())
}

/// `docProps/core.xml`
pub fn core_props(topic: &Topic) -> Result<Vec<u8>> {
    let mut xml = XmlSink::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.text_element("dc:title", topic.as_str())?;
    xml.text_element("dc:creator", env!("CARGO_PKG_NAME"))?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

/// `docProps/app.xml`
pub fn app_props(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlSink::new()?;
    xml.start(
        "Properties",
        &[
            (
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ),
            (
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ),
        ],
    )?;
    xml.text_element("Application", env!("CARGO_PKG_NAME"))?;
    xml.text_element("Slides", &slide_count.to_string())?;
    xml.end("Properties")?;
    Ok(xml.finish())
}

/// Run formatting applied to every paragraph of one text frame.
#[derive(Debug, Clone, Copy)]
struct RunStyle {
    size_pt: u32,
    color: Rgb,
}

/// A placeholder shape on a slide.
struct Placeholder<'a> {
    id: u32,
    name: &'a str,
    ph_type: Option<&'a str>,
    ph_idx: Option<&'a str>,
    geometry: Option<BoxGeometry>,
    wrap: bool,
    paragraphs: Vec<String>,
    style: RunStyle,
}

/// The title slide: the topic in the centred title, an empty subtitle.
pub fn title_slide(topic: &Topic, colors: ThemeColors, layout: &Layout) -> Result<Vec<u8>> {
    let title = Placeholder {
        id: 2,
        name: "Title 1",
        ph_type: Some("ctrTitle"),
        ph_idx: None,
        geometry: None,
        wrap: false,
        paragraphs: paragraphs(topic.as_str()),
        style: RunStyle {
            size_pt: layout.title_font_pt,
            color: colors.title,
        },
    };
    let subtitle = Placeholder {
        id: 3,
        name: "Subtitle 2",
        ph_type: Some("subTitle"),
        ph_idx: Some("1"),
        geometry: None,
        wrap: false,
        paragraphs: vec![String::new()],
        style: RunStyle {
            size_pt: layout.body_font_pt,
            color: colors.body,
        },
    };

    slide_part(colors.background, &[title, subtitle])
}

/// A content slide: the generated title and the body text box.
///
/// The body box is placed at the layout margins and word-wrapped. The body is
/// clipped to the layout's character budget, then each line becomes one
/// paragraph.
pub fn content_slide(slide: &Slide, colors: ThemeColors, layout: &Layout) -> Result<Vec<u8>> {
    let title = Placeholder {
        id: 2,
        name: "Title 1",
        ph_type: Some("title"),
        ph_idx: None,
        geometry: None,
        wrap: false,
        paragraphs: paragraphs(&slide.title),
        style: RunStyle {
            size_pt: layout.title_font_pt,
            color: colors.title,
        },
    };
    let body = Placeholder {
        id: 3,
        name: "Content Placeholder 2",
        ph_type: None,
        ph_idx: Some("1"),
        geometry: Some(layout.body_box()),
        wrap: true,
        paragraphs: paragraphs(&truncate_content(&slide.body, layout.max_body_chars)),
        style: RunStyle {
            size_pt: layout.body_font_pt,
            color: colors.body,
        },
    };

    slide_part(colors.background, &[title, body])
}

fn slide_part(background: Rgb, shapes: &[Placeholder<'_>]) -> Result<Vec<u8>> {
    let mut xml = XmlSink::new()?;
    xml.start(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    xml.start("p:cSld", &[])?;

    // Background must precede the shape tree.
    xml.start("p:bg", &[])?;
    xml.start("p:bgPr", &[])?;
    write_solid_fill(&mut xml, background)?;
    xml.empty("a:effectLst", &[])?;
    xml.end("p:bgPr")?;
    xml.end("p:bg")?;

    xml.start("p:spTree", &[])?;
    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;
    xml.start("p:grpSpPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    xml.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    xml.end("a:xfrm")?;
    xml.end("p:grpSpPr")?;

    for shape in shapes {
        write_placeholder(&mut xml, shape)?;
    }

    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sld")?;
    Ok(xml.finish())
}

fn write_placeholder(xml: &mut XmlSink, shape: &Placeholder<'_>) -> Result<()> {
    xml.start("p:sp", &[])?;

    xml.start("p:nvSpPr", &[])?;
    xml.empty(
        "p:cNvPr",
        &[("id", shape.id.to_string().as_str()), ("name", shape.name)],
    )?;
    xml.start("p:cNvSpPr", &[])?;
    xml.empty("a:spLocks", &[("noGrp", "1")])?;
    xml.end("p:cNvSpPr")?;
    xml.start("p:nvPr", &[])?;
    let mut ph_attrs = Vec::with_capacity(2);
    if let Some(ph_type) = shape.ph_type {
        ph_attrs.push(("type", ph_type));
    }
    if let Some(idx) = shape.ph_idx {
        ph_attrs.push(("idx", idx));
    }
    xml.empty("p:ph", &ph_attrs)?;
    xml.end("p:nvPr")?;
    xml.end("p:nvSpPr")?;

    match shape.geometry {
        Some(geometry) => {
            xml.start("p:spPr", &[])?;
            xml.start("a:xfrm", &[])?;
            xml.empty(
                "a:off",
                &[
                    ("x", geometry.x.to_string().as_str()),
                    ("y", geometry.y.to_string().as_str()),
                ],
            )?;
            xml.empty(
                "a:ext",
                &[
                    ("cx", geometry.cx.to_string().as_str()),
                    ("cy", geometry.cy.to_string().as_str()),
                ],
            )?;
            xml.end("a:xfrm")?;
            xml.end("p:spPr")?;
        }
        None => xml.empty("p:spPr", &[])?,
    }

    xml.start("p:txBody", &[])?;
    if shape.wrap {
        xml.start("a:bodyPr", &[("wrap", "square")])?;
        xml.empty("a:normAutofit", &[])?;
        xml.end("a:bodyPr")?;
    } else {
        xml.empty("a:bodyPr", &[])?;
    }
    xml.empty("a:lstStyle", &[])?;
    for paragraph in &shape.paragraphs {
        write_paragraph(xml, paragraph, shape.style)?;
    }
    xml.end("p:txBody")?;

    xml.end("p:sp")
}

fn write_paragraph(xml: &mut XmlSink, text: &str, style: RunStyle) -> Result<()> {
    let size = (style.size_pt * SZ_PER_POINT).to_string();

    xml.start("a:p", &[])?;
    if text.is_empty() {
        xml.start("a:endParaRPr", &[("lang", "en-US"), ("sz", size.as_str())])?;
        write_solid_fill(xml, style.color)?;
        xml.end("a:endParaRPr")?;
    } else {
        xml.start("a:r", &[])?;
        xml.start(
            "a:rPr",
            &[("lang", "en-US"), ("sz", size.as_str()), ("dirty", "0")],
        )?;
        write_solid_fill(xml, style.color)?;
        xml.end("a:rPr")?;
        xml.text_element("a:t", text)?;
        xml.end("a:r")?;
    }
    xml.end("a:p")
}

fn write_solid_fill(xml: &mut XmlSink, color: Rgb) -> Result<()> {
    xml.start("a:solidFill", &[])?;
    xml.empty("a:srgbClr", &[("val", color.to_hex().as_str())])?;
    xml.end("a:solidFill")
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Theme, Variant};

    fn as_string(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_content_types_lists_every_slide() {
        let xml = as_string(content_types(3).unwrap());

        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide3.xml""#));
        assert!(!xml.contains("slide4.xml"));
        assert!(xml.contains(CT_PRESENTATION));
    }

    #[test]
    fn test_presentation_slide_ids() {
        let layout = Layout::for_variant(Variant::Gemini);
        let xml = as_string(presentation(&layout, 2).unwrap());

        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId5"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId6"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#));
    }

    #[test]
    fn test_presentation_rels_match_slide_ids() {
        let xml = as_string(presentation_rels(2).unwrap());

        assert!(xml.contains(r#"Id="rId5""#));
        assert!(xml.contains(r#"Target="slides/slide2.xml""#));
        assert!(!xml.contains("rId7"));
    }

    #[test]
    fn test_title_slide_styles_title_and_background() {
        let topic = Topic::new("Deep Sea").unwrap();
        let layout = Layout::default();
        let xml = as_string(title_slide(&topic, Theme::Dark.colors(), &layout).unwrap());

        assert!(xml.contains(r#"<p:ph type="ctrTitle"/>"#));
        assert!(xml.contains(r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="000000"/>"#));
        assert!(xml.contains(
            r#"<a:rPr lang="en-US" sz="3000" dirty="0"><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill></a:rPr><a:t>Deep Sea</a:t>"#
        ));
        assert!(xml.contains(r#"<a:endParaRPr lang="en-US" sz="1600"><a:solidFill><a:srgbClr val="C8C8C8"/>"#));
    }

    #[test]
    fn test_content_slide_places_body_at_margins() {
        let slide = Slide::new("Hive Life", "Line one\nLine two");
        let layout = Layout::for_variant(Variant::Gemini);
        let xml = as_string(content_slide(&slide, Theme::Blue.colors(), &layout).unwrap());

        assert!(xml.contains(r#"<a:off x="914400" y="1371600"/><a:ext cx="7315200" cy="4572000"/>"#));
        assert!(xml.contains(r#"<a:bodyPr wrap="square"><a:normAutofit/></a:bodyPr>"#));
        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
        assert!(xml.contains("<a:t>Line one</a:t>"));
        assert!(xml.contains("<a:t>Line two</a:t>"));
        assert!(xml.contains(r#"sz="1600""#));
        assert!(xml.contains(r#"<a:srgbClr val="0066CC"/>"#));
    }

    #[test]
    fn test_content_slide_clips_long_body() {
        let slide = Slide::new("Long", "z".repeat(250));
        let layout = Layout::for_variant(Variant::Gemini);
        let xml = as_string(content_slide(&slide, Theme::Light.colors(), &layout).unwrap());

        let clipped = format!("<a:t>{}...</a:t>", "z".repeat(200));
        assert!(xml.contains(&clipped));
    }

    #[test]
    fn test_slide_text_is_escaped() {
        let slide = Slide::new("R&D <2024>", "\"quoted\" & more");
        let xml = as_string(content_slide(&slide, Theme::Light.colors(), &Layout::default()).unwrap());

        assert!(xml.contains("<a:t>R&amp;D &lt;2024&gt;</a:t>"));
        assert!(xml.contains("<a:t>&quot;quoted&quot; &amp; more</a:t>"));
    }

    #[test]
    fn test_slide_rels_point_at_layout() {
        let title = as_string(slide_rels(SlideKind::Title).unwrap());
        let content = as_string(slide_rels(SlideKind::Content).unwrap());

        assert!(title.contains("../slideLayouts/slideLayout1.xml"));
        assert!(content.contains("../slideLayouts/slideLayout2.xml"));
    }
}
