//! Fixed token lexicons for emotional valence, threat, social relevance,
//! and semantic classification.
//!
//! The tables are small and fixed, so plain match arms beat a map: no
//! allocation, no init order, and the compiler checks for duplicates.

/// Emotional charge of a token (-1 to 1); unknown tokens score 0.
pub fn emotional_valence(token: &str) -> f64 {
    match token {
        "happy" => 0.8,
        "sad" => -0.7,
        "angry" => -0.6,
        "fear" => -0.9,
        "joy" => 0.9,
        "scared" => -0.8,
        "worried" => -0.5,
        "excited" => 0.7,
        "calm" => 0.3,
        "anxious" => -0.6,
        "love" => 0.9,
        "hate" => -0.8,
        "good" => 0.5,
        "bad" => -0.5,
        _ => 0.0,
    }
}

/// Perceived threat level of a token (0 to 1, negative for safety cues).
pub fn threat_level(token: &str) -> f64 {
    match token {
        "danger" => 0.9,
        "safe" => -0.5,
        "threat" => 0.8,
        "attack" => 0.9,
        "protect" => -0.3,
        "explosion" => 0.95,
        "gun" => 0.8,
        "weapon" => 0.7,
        "enemy" => 0.8,
        "combat" => 0.9,
        "loud" => 0.4,
        "noise" => 0.3,
        "unknown" => 0.4,
        "stranger" => 0.5,
        "dark" => 0.3,
        _ => 0.0,
    }
}

/// Social interaction relevance of a token (0 to 1).
pub fn social_relevance(token: &str) -> f64 {
    match token {
        "person" => 0.7,
        "people" => 0.8,
        "friend" => 0.6,
        "family" => 0.5,
        "stranger" => 0.8,
        "crowd" => 0.9,
        "alone" => 0.4,
        "together" => 0.6,
        "talk" => 0.5,
        "speak" => 0.5,
        "eye" => 0.7,
        "contact" => 0.6,
        "social" => 0.8,
        "interaction" => 0.7,
        _ => 0.0,
    }
}

/// Sensory processing load: substring heuristic over the token.
pub fn sensory_intensity(token: &str) -> f64 {
    if token.contains("loud") || token.contains("bright") || token.contains("noise") {
        0.8
    } else {
        0.2
    }
}

/// Semantic categories a token belongs to.
pub fn semantic_categories(token: &str) -> Vec<&'static str> {
    const CATEGORIES: &[(&str, &[&str])] = &[
        (
            "emotion",
            &[
                "happy", "sad", "angry", "fear", "joy", "scared", "worried", "excited", "calm",
                "anxious", "love", "hate",
            ],
        ),
        (
            "threat",
            &[
                "danger", "threat", "attack", "explosion", "gun", "weapon", "enemy", "combat",
                "loud", "noise",
            ],
        ),
        (
            "social",
            &[
                "person",
                "people",
                "friend",
                "family",
                "stranger",
                "crowd",
                "talk",
                "speak",
                "eye",
                "contact",
                "social",
                "interaction",
            ],
        ),
        (
            "sensory",
            &[
                "loud", "bright", "dark", "noise", "sound", "light", "touch", "feel", "see",
                "hear",
            ],
        ),
        (
            "body",
            &[
                "pain", "hurt", "tired", "sick", "healthy", "strong", "weak", "heart", "breath",
                "body",
            ],
        ),
    ];

    CATEGORIES
        .iter()
        .filter(|(_, words)| words.contains(&token))
        .map(|(category, _)| *category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_emotional_tokens_score_nonzero() {
        assert_eq!(emotional_valence("happy"), 0.8);
        assert_eq!(emotional_valence("fear"), -0.9);
        assert_eq!(emotional_valence("table"), 0.0);
    }

    #[test]
    fn threat_lexicon_includes_safety_cues() {
        assert_eq!(threat_level("explosion"), 0.95);
        assert_eq!(threat_level("safe"), -0.5);
        assert_eq!(threat_level("chair"), 0.0);
    }

    #[test]
    fn social_lexicon_hits() {
        assert_eq!(social_relevance("crowd"), 0.9);
        assert_eq!(social_relevance("rock"), 0.0);
    }

    #[test]
    fn sensory_intensity_is_a_substring_heuristic() {
        assert_eq!(sensory_intensity("loud"), 0.8);
        assert_eq!(sensory_intensity("loudly"), 0.8);
        assert_eq!(sensory_intensity("noises"), 0.8);
        assert_eq!(sensory_intensity("quiet"), 0.2);
    }

    #[test]
    fn tokens_can_belong_to_multiple_categories() {
        let categories = semantic_categories("loud");
        assert!(categories.contains(&"threat"));
        assert!(categories.contains(&"sensory"));

        assert!(semantic_categories("xyzzy").is_empty());
    }
}
