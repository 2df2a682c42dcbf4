//! PPTX package writer.

use crate::parts::{self, SlideKind};
use crate::templates::STATIC_PARTS;
use deck_core::{output_path, Deck, Error, Layout, Result, Theme};
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes a [`Deck`] as an Office Open XML presentation.
#[derive(Debug, Clone, Default)]
pub struct PptxWriter {
    layout: Layout,
}

impl PptxWriter {
    /// Create a writer using the given page layout.
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// The page layout used for every deck.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Serialize the deck into an in-memory `.pptx` package.
    pub fn to_bytes(&self, deck: &Deck, theme: Theme) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write(deck, theme, &mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Serialize the deck as a `.pptx` package into `writer`.
    ///
    /// Slide 1 is the title slide; each content slide follows in order.
    /// Bodies longer than the layout's `max_body_chars` are clipped.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, theme: Theme, writer: W) -> Result<()> {
        let colors = theme.colors();
        let slide_count = deck.slide_count();
        let mut zip = PackageWriter::new(writer);

        zip.add("[Content_Types].xml", &parts::content_types(slide_count)?)?;
        zip.add("_rels/.rels", &parts::root_rels()?)?;
        zip.add("docProps/core.xml", &parts::core_props(&deck.topic)?)?;
        zip.add("docProps/app.xml", &parts::app_props(slide_count)?)?;
        zip.add(
            "ppt/presentation.xml",
            &parts::presentation(&self.layout, slide_count)?,
        )?;
        zip.add(
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels(slide_count)?,
        )?;

        for (path, content) in STATIC_PARTS {
            zip.add(path, content.as_bytes())?;
        }

        zip.add(
            &parts::slide_path(1),
            &parts::title_slide(&deck.topic, colors, &self.layout)?,
        )?;
        zip.add(&parts::slide_rels_path(1), &parts::slide_rels(SlideKind::Title)?)?;

        for (idx, slide) in deck.slides.iter().enumerate() {
            let n = idx + 2;
            zip.add(
                &parts::slide_path(n),
                &parts::content_slide(slide, colors, &self.layout)?,
            )?;
            zip.add(&parts::slide_rels_path(n), &parts::slide_rels(SlideKind::Content)?)?;
        }

        zip.finish()?;

        log::debug!(
            "Wrote {} slides with the {} theme",
            slide_count,
            theme.label()
        );
        Ok(())
    }

    /// Save the deck as `<topic>_presentation.pptx` inside `dir`.
    ///
    /// Creates `dir` if needed and replaces any existing deck of the same
    /// name. The package is fully built before the file is touched, so a
    /// failure leaves no partial file behind.
    pub fn save(&self, deck: &Deck, theme: Theme, dir: &Path) -> Result<PathBuf> {
        let bytes = self.to_bytes(deck, theme)?;

        std::fs::create_dir_all(dir)?;
        let path = output_path(dir, &deck.topic);
        std::fs::write(&path, bytes)?;

        log::info!("Saved {}", path.display());
        Ok(path)
    }
}

/// Adds deflated entries to a ZIP archive.
struct PackageWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: FileOptions,
}

impl<W: Write + Seek> PackageWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    fn add(&mut self, path: &str, content: &[u8]) -> Result<()> {
        self.zip
            .start_file(path, self.options)
            .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", path, e)))?;
        self.zip
            .write_all(content)
            .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", path, e)))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        Ok(())
    }
}
