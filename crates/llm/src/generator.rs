//! The text-generation seam and the content generator built on it.

use crate::prompts;
use deck_core::{parse_titles, truncate_content, Deck, Result, Topic};

/// A remote (or fake) text-generation service.
///
/// One call is one blocking request: a prompt in, free text out.
pub trait TextGenerator {
    /// Complete a prompt.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Name used in log and error messages.
    fn name(&self) -> &str;
}

impl<G: TextGenerator + ?Sized> TextGenerator for Box<G> {
    fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<G: TextGenerator + ?Sized> TextGenerator for &G {
    fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Produces slide titles and slide bodies for a topic.
#[derive(Debug, Clone)]
pub struct ContentGenerator<G> {
    generator: G,
    max_content_chars: usize,
}

impl<G: TextGenerator> ContentGenerator<G> {
    /// Create a content generator that clips bodies to `max_content_chars`.
    pub fn new(generator: G, max_content_chars: usize) -> Self {
        Self {
            generator,
            max_content_chars,
        }
    }

    /// Character budget of each slide body.
    pub fn max_content_chars(&self) -> usize {
        self.max_content_chars
    }

    /// Ask for the slide titles of a topic.
    ///
    /// Nominally five titles come back; the count is not enforced.
    pub fn slide_titles(&self, topic: &str) -> Result<Vec<String>> {
        let response = self.generator.complete(&prompts::titles_prompt(topic))?;
        let titles = parse_titles(&response);
        log::debug!(
            "{} returned {} slide titles for '{}'",
            self.generator.name(),
            titles.len(),
            topic
        );
        Ok(titles)
    }

    /// Ask for the body text of one slide, clipped to the character budget.
    pub fn slide_content(&self, slide_title: &str) -> Result<String> {
        let response = self
            .generator
            .complete(&prompts::content_prompt(slide_title))?;
        Ok(truncate_content(&response, self.max_content_chars))
    }

    /// Generate a whole deck: one title request, then one request per title.
    ///
    /// The first failing request aborts the run.
    pub fn generate(&self, topic: Topic) -> Result<Deck> {
        let titles = self.slide_titles(topic.as_str())?;

        let contents = titles
            .iter()
            .enumerate()
            .map(|(idx, title)| {
                log::info!("Generating slide {}/{}: {}", idx + 1, titles.len(), title);
                self.slide_content(title)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Deck::from_parts(topic, titles, contents))
    }
}
