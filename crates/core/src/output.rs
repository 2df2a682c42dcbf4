//! Output file naming and the embeddable download link.

use crate::{Result, Topic};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};

/// Directory decks are written to when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "generated_ppt";

/// MIME type of an OOXML presentation.
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// File name of the deck for a topic: `<topic>_presentation.pptx`.
pub fn output_filename(topic: &Topic) -> String {
    format!("{}_presentation.pptx", topic.as_str())
}

/// Full output path of the deck for a topic inside `dir`.
///
/// The same topic always maps to the same path, so regenerating a deck
/// replaces the previous file.
pub fn output_path(dir: &Path, topic: &Topic) -> PathBuf {
    dir.join(output_filename(topic))
}

/// Read a saved deck and wrap it in an HTML download link.
///
/// The file is embedded as a base64 `data:` URI, and the `download`
/// attribute carries the path the deck was saved under.
pub fn download_link(path: &Path) -> Result<String> {
    let contents = std::fs::read(path)?;
    log::debug!("Encoding {} bytes from {}", contents.len(), path.display());

    Ok(format!(
        r#"<a href="data:{};base64,{}" download="{}">Download the PowerPoint Presentation</a>"#,
        PPTX_MIME,
        STANDARD.encode(&contents),
        escape_attribute(&path.display().to_string())
    ))
}

/// Escape a string for use inside a double-quoted HTML attribute.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
