//! Prompt templates and fixed sampling settings.

/// System role sent with every request.
pub const SYSTEM_ROLE: &str = "You are a helpful assistant.";

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.7;

/// Prompt asking for the slide titles of a topic.
pub fn titles_prompt(topic: &str) -> String {
    format!("Generate 5 slide titles for the topic '{}'.", topic)
}

/// Prompt asking for the body text of one slide.
pub fn content_prompt(slide_title: &str) -> String {
    format!("Generate content for the slide: '{}'.", slide_title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts() {
        assert_eq!(
            titles_prompt("Rust"),
            "Generate 5 slide titles for the topic 'Rust'."
        );
        assert_eq!(
            content_prompt("Ownership"),
            "Generate content for the slide: 'Ownership'."
        );
    }
}
