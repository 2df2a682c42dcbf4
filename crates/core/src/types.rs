//! Domain types for representing a generated slide deck.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// English Metric Units per inch (OOXML drawing unit).
pub const EMU_PER_INCH: i64 = 914_400;

/// Convert inches to EMUs.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64) as i64
}

/// The topic a deck is generated for.
///
/// Used verbatim as the title-slide heading and as the output file-name stem,
/// so it must be non-blank and free of path separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    /// Validate and wrap a user-entered topic.
    pub fn new(topic: impl Into<String>) -> Result<Self> {
        let topic = topic.into();

        if topic.trim().is_empty() {
            return Err(Error::InvalidTopic("topic is empty".to_string()));
        }

        if topic.contains(['/', '\\', '\0']) {
            return Err(Error::InvalidTopic(format!(
                "'{}' contains a path separator",
                topic
            )));
        }

        Ok(Self(topic))
    }

    /// Get the topic text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Topic {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Hex form used by `<a:srgbClr val="...">`, e.g. `0066CC`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Colours applied uniformly to every slide of a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: Rgb,
    pub title: Rgb,
    pub body: Rgb,
}

/// One of the four built-in deck themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    Blue,
    #[default]
    Default,
}

impl Theme {
    /// All themes in selector order.
    pub const ALL: [Theme; 4] = [Theme::Light, Theme::Dark, Theme::Blue, Theme::Default];

    /// The fixed (background, title, body) colour triple for this theme.
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Light => ThemeColors {
                background: Rgb(242, 242, 242),
                title: Rgb(0, 0, 0),
                body: Rgb(50, 50, 50),
            },
            Theme::Dark => ThemeColors {
                background: Rgb(0, 0, 0),
                title: Rgb(255, 255, 255),
                body: Rgb(200, 200, 200),
            },
            Theme::Blue => ThemeColors {
                background: Rgb(0, 102, 204),
                title: Rgb(255, 255, 255),
                body: Rgb(255, 255, 255),
            },
            Theme::Default => ThemeColors {
                background: Rgb(255, 255, 255),
                title: Rgb(0, 0, 0),
                body: Rgb(50, 50, 50),
            },
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Blue => "Blue",
            Theme::Default => "Default",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownTheme(s.to_string()))
    }
}

/// The two generator variants: which text-generation backend is used, and
/// the content budget and body-box margins that go with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    /// Google Gemini backend, 200-character slide bodies.
    #[default]
    Gemini,
    /// OpenAI chat-completions backend, 300-character slide bodies.
    OpenAi,
}

impl Variant {
    /// Maximum number of characters kept from each generated slide body.
    pub fn max_content_chars(self) -> usize {
        match self {
            Variant::Gemini => 200,
            Variant::OpenAi => 300,
        }
    }

    /// Margins of the body text box, measured from the slide edges.
    pub fn margins(self) -> Margins {
        match self {
            Variant::Gemini => Margins {
                left: inches(1.0),
                top: inches(1.5),
                right: inches(1.0),
                bottom: inches(1.0),
            },
            Variant::OpenAi => Margins {
                left: inches(0.5),
                top: inches(1.5),
                right: inches(0.5),
                bottom: inches(0.5),
            },
        }
    }

    /// Lowercase label accepted on the command line.
    pub fn label(self) -> &'static str {
        match self {
            Variant::Gemini => "gemini",
            Variant::OpenAi => "openai",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Variant::Gemini),
            "openai" | "open-ai" | "gpt" => Ok(Variant::OpenAi),
            _ => Err(Error::UnknownVariant(s.to_string())),
        }
    }
}

/// Margins in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

/// Position and size of a shape in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGeometry {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// Static page layout and typography of a deck.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Slide width in EMUs.
    pub slide_width: i64,
    /// Slide height in EMUs.
    pub slide_height: i64,
    /// Margins of the body text box on content slides.
    pub margins: Margins,
    /// Title font size in points.
    pub title_font_pt: u32,
    /// Body font size in points.
    pub body_font_pt: u32,
    /// Character budget of a content slide body.
    pub max_body_chars: usize,
}

impl Layout {
    /// 10" x 7.5" slides with the margins of the given variant.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            slide_width: inches(10.0),
            slide_height: inches(7.5),
            margins: variant.margins(),
            title_font_pt: 30,
            body_font_pt: 16,
            max_body_chars: variant.max_content_chars(),
        }
    }

    /// Override the body character budget.
    pub fn with_max_body_chars(mut self, max_body_chars: usize) -> Self {
        self.max_body_chars = max_body_chars;
        self
    }

    /// The body text box: full slide minus margins.
    pub fn body_box(&self) -> BoxGeometry {
        BoxGeometry {
            x: self.margins.left,
            y: self.margins.top,
            cx: self.slide_width - self.margins.left - self.margins.right,
            cy: self.slide_height - self.margins.top - self.margins.bottom,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}

/// A content slide: a generated title and its (already truncated) body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub title: String,
    pub body: String,
}

impl Slide {
    /// Create a new content slide.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A complete deck: the title slide topic followed by the content slides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub topic: Topic,
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create a deck with only a title slide.
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            slides: Vec::new(),
        }
    }

    /// Pair titles with contents by position.
    ///
    /// Extra entries in the longer list are dropped.
    pub fn from_parts<T, C>(topic: Topic, titles: T, contents: C) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let slides = titles
            .into_iter()
            .zip(contents)
            .map(|(title, body)| Slide::new(title, body))
            .collect();

        Self { topic, slides }
    }

    /// Add a content slide.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Total number of slides, including the title slide.
    pub fn slide_count(&self) -> usize {
        self.slides.len() + 1
    }
}
