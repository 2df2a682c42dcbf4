//! Core domain types, generated-text shaping, and output naming for
//! AI-generated slide decks.

pub mod content;
pub mod error;
pub mod output;
pub mod types;

pub use content::{paragraphs, parse_titles, truncate_content};
pub use error::{Error, Result};
pub use output::{download_link, output_filename, output_path, DEFAULT_OUTPUT_DIR};
pub use types::{
    inches, BoxGeometry, Deck, Layout, Margins, Rgb, Slide, Theme, ThemeColors, Topic, Variant,
    EMU_PER_INCH,
};
