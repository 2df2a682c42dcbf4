//! PPTX (Office Open XML) backend for generated slide decks.
//!
//! Writes a deck as a .pptx package (a ZIP archive of XML parts) and reads
//! packages back for inspection.

pub mod parts;
pub mod reader;
pub mod templates;
pub mod writer;
mod xml;

pub use reader::{DeckSummary, InspectedSlide, PptxReader};
pub use writer::PptxWriter;
