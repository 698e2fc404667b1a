use unicode_normalization::UnicodeNormalization;
use warui_types::{Level, TermType};

/// Schedule-name keywords per level, lowest level first
const LEVEL_KEYWORDS: [(Level, &[&str]); 5] = [
    (Level::N5, &["n5", "beginner"]),
    (Level::N4, &["n4", "pre-intermediate", "preintermediate"]),
    (Level::N3, &["n3", "intermediate"]),
    (Level::N2, &["n2", "pre-advanced", "preadvanced"]),
    (Level::N1, &["n1", "advanced"]),
];

const TYPE_KEYWORDS: [(TermType, &[&str]); 3] = [
    (TermType::Grammar, &["grammar"]),
    (TermType::Vocab, &["vocabulary", "vocab", "words"]),
    (TermType::Kanji, &["kanji", "characters"]),
];

/// NFKC, trimmed and lowercased, so "ＪＬＰＴ Ｎ３" matches like "jlpt n3"
fn normalize_name(name: &str) -> String {
    name.nfkc().collect::<String>().trim().to_lowercase()
}

/// Estimate a schedule's level from its name.
///
/// The default level (n5) is never searched for: the first higher level
/// whose keyword appears in the name wins, in table order, so
/// "pre-intermediate" resolves to n4 before "intermediate" can match n3.
pub fn estimate_level_by_keywords(schedule_name: &str) -> Level {
    let name = normalize_name(schedule_name);

    LEVEL_KEYWORDS[1..]
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map(|(level, _)| *level)
        .unwrap_or_default()
}

/// Estimate the kind of terms a schedule holds from its name
pub fn estimate_type_by_keywords(schedule_name: &str) -> Option<TermType> {
    let name = normalize_name(schedule_name);

    TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map(|(term_type, _)| *term_type)
}

/// Classify a raw term by the fields it carries. The service does not
/// report the type, so `onyomi` marks kanji, `typeofspeech` vocabulary and
/// `title_japanese` grammar, checked in that order.
pub fn classify_term(term: &serde_json::Value) -> Option<TermType> {
    if term.get("onyomi").is_some() {
        Some(TermType::Kanji)
    } else if term.get("typeofspeech").is_some() {
        Some(TermType::Vocab)
    } else if term.get("title_japanese").is_some() {
        Some(TermType::Grammar)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_level_from_schedule_name() {
        assert_eq!(estimate_level_by_keywords("JLPT N3 Grammar Pack"), Level::N3);
        assert_eq!(estimate_level_by_keywords("My Custom List"), Level::N5);
        assert_eq!(estimate_level_by_keywords("Beginner words"), Level::N5);
        assert_eq!(estimate_level_by_keywords("  ADVANCED reading "), Level::N1);
    }

    #[test]
    fn test_level_keyword_table_order() {
        // "pre-intermediate" contains "intermediate", n4 is checked first
        assert_eq!(estimate_level_by_keywords("Pre-Intermediate Kanji"), Level::N4);
        assert_eq!(estimate_level_by_keywords("Pre-advanced vocab"), Level::N2);
        // two level hints, lower table entry wins
        assert_eq!(estimate_level_by_keywords("N4 to N2 bridge"), Level::N4);
    }

    #[test]
    fn test_level_full_width_name() {
        assert_eq!(estimate_level_by_keywords("ＪＬＰＴ Ｎ２ 文法"), Level::N2);
    }

    #[test]
    fn test_type_from_schedule_name() {
        assert_eq!(
            estimate_type_by_keywords("JLPT N3 Grammar Pack"),
            Some(TermType::Grammar)
        );
        assert_eq!(estimate_type_by_keywords("Core words"), Some(TermType::Vocab));
        assert_eq!(
            estimate_type_by_keywords("Characters N5"),
            Some(TermType::Kanji)
        );
        assert_eq!(estimate_type_by_keywords("My Custom List"), None);
    }

    #[test]
    fn test_classify_by_field_shape() {
        assert_eq!(classify_term(&json!({ "onyomi": "ニチ" })), Some(TermType::Kanji));
        assert_eq!(
            classify_term(&json!({ "typeofspeech": "noun" })),
            Some(TermType::Vocab)
        );
        assert_eq!(
            classify_term(&json!({ "title_japanese": "〜ながら" })),
            Some(TermType::Grammar)
        );
        assert_eq!(classify_term(&json!({ "id": 1, "kanji_full": "日" })), None);
    }

    #[test]
    fn test_classify_precedence() {
        let term = json!({ "onyomi": "ニチ", "typeofspeech": "noun" });
        assert_eq!(classify_term(&term), Some(TermType::Kanji));
    }
}
