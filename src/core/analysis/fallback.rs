//! Deterministic keyword fallback analysis
//!
//! Used whenever the external analyzer is unreachable, times out, or
//! returns something unparseable. One configurable component: the keyword
//! tables are selected by locale, there are no parallel code paths.

use crate::config::Locale;
use crate::domain::{AnalysisResult, Category, Urgency};

const SUMMARY_MAX_CHARS: usize = 120;

struct KeywordTables {
    positive: &'static [&'static str],
    negative: &'static [&'static str],
    complaint: &'static [&'static str],
    question: &'static [&'static str],
    request: &'static [&'static str],
    praise: &'static [&'static str],
    critical: &'static [&'static str],
    high: &'static [&'static str],
    low: &'static [&'static str],
}

static DE_AT: KeywordTables = KeywordTables {
    positive: &[
        "super",
        "toll",
        "top",
        "danke",
        "freundlich",
        "wunderbar",
        "prima",
        "perfekt",
        "klasse",
    ],
    negative: &[
        "problem",
        "beschwerde",
        "schlecht",
        "nicht",
        "fehler",
        "hygiene",
        "skandal",
        "sofort",
        "gravierend",
        "nie wieder",
    ],
    complaint: &[
        "beschwerde",
        "problem",
        "nicht geliefert",
        "zu viel verrechnet",
        "hygiene",
        "fehler",
    ],
    question: &["führt ihr", "gibt es", "wo finde", "online bestell", "wann"],
    request: &["bitte liefern", "würde gern", "wünsche"],
    praise: &["super", "toll", "danke", "freundlich", "top", "prima"],
    critical: &[
        "hygiene",
        "gesundheit",
        "lebensmittel",
        "vergiftung",
        "verletzung",
        "unfall",
        "gefährlich",
        "sofortiger",
        "dringend",
        "notfall",
        "rohes fleisch",
        "handschuhe",
        "sofort",
        "kritisch",
        "skandal",
    ],
    high: &["schnell", "bald", "wichtig", "unverzüglich"],
    low: &["wenn möglich", "gelegentlich"],
};

static EN: KeywordTables = KeywordTables {
    positive: &[
        "great",
        "awesome",
        "thank",
        "friendly",
        "wonderful",
        "perfect",
        "excellent",
        "love",
    ],
    negative: &[
        "problem",
        "complaint",
        "bad",
        "not",
        "error",
        "hygiene",
        "scandal",
        "terrible",
        "immediately",
        "never again",
    ],
    complaint: &[
        "complaint",
        "problem",
        "not delivered",
        "overcharged",
        "hygiene",
        "error",
        "broken",
    ],
    question: &["do you carry", "is there", "where can i find", "order online", "when"],
    request: &["please deliver", "would like", "wish", "could you"],
    praise: &["great", "awesome", "thank", "friendly", "perfect", "excellent"],
    critical: &[
        "hygiene",
        "health",
        "food safety",
        "poisoning",
        "injury",
        "accident",
        "dangerous",
        "urgent",
        "emergency",
        "raw meat",
        "gloves",
        "immediately",
        "critical",
        "scandal",
    ],
    high: &["quick", "soon", "important", "asap"],
    low: &["if possible", "occasionally", "no rush"],
};

fn tables(locale: Locale) -> &'static KeywordTables {
    match locale {
        Locale::DeAt => &DE_AT,
        Locale::En => &EN,
    }
}

/// Keyword-count heuristic over category, urgency and sentiment
pub fn fallback_analysis(content: &str, locale: Locale) -> AnalysisResult {
    let t = tables(locale);
    let c = content.to_lowercase();

    let hits = |words: &[&str]| words.iter().filter(|w| c.contains(*w)).count();
    let any = |words: &[&str]| words.iter().any(|w| c.contains(w));

    let pos = hits(t.positive) as f64;
    let neg = hits(t.negative) as f64;
    let sentiment = (((pos * 0.3).min(1.0) - (neg * 0.3).min(1.0)) * 100.0).round() / 100.0;

    let category = if any(t.complaint) {
        Category::Complaint
    } else if any(t.question) {
        Category::Question
    } else if any(t.request) {
        Category::Request
    } else if any(t.praise) {
        Category::Praise
    } else {
        Category::Suggestion
    };

    let urgency = if any(t.critical) {
        Urgency::Critical
    } else if any(t.high) {
        Urgency::High
    } else if any(t.low) {
        Urgency::Low
    } else {
        Urgency::Medium
    };

    AnalysisResult {
        category,
        urgency,
        sentiment,
        summary: summarize(content),
    }
}

fn summarize(content: &str) -> String {
    if content.chars().count() > SUMMARY_MAX_CHARS {
        let truncated: String = content.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{truncated}…")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Das ist eine Beschwerde über die Lieferung", Category::Complaint; "complaint keyword")]
    #[test_case("Führt ihr auch Bio-Produkte?", Category::Question; "question keyword")]
    #[test_case("Bitte liefern Sie nächste Woche", Category::Request; "request keyword")]
    #[test_case("Super Service, danke!", Category::Praise; "praise keyword")]
    #[test_case("Die Filiale könnte länger offen haben", Category::Suggestion; "no keyword defaults to suggestion")]
    fn test_de_category(content: &str, expected: Category) {
        let result = fallback_analysis(content, Locale::DeAt);
        assert_eq!(result.category, expected);
    }

    #[test_case("Im Kühlregal liegt rohes Fleisch offen herum!", Urgency::Critical; "critical safety keyword")]
    #[test_case("Bitte schnell erledigen", Urgency::High; "high keyword")]
    #[test_case("Wenn möglich beim nächsten Mal", Urgency::Low; "low keyword")]
    #[test_case("Alles in Ordnung soweit", Urgency::Medium; "default medium")]
    fn test_de_urgency(content: &str, expected: Urgency) {
        let result = fallback_analysis(content, Locale::DeAt);
        assert_eq!(result.urgency, expected);
    }

    #[test]
    fn test_sentiment_positive_and_bounded() {
        let result = fallback_analysis(
            "Super toll, danke, freundlich, wunderbar, prima, perfekt!",
            Locale::DeAt,
        );
        assert!(result.sentiment > 0.0);
        assert!(result.sentiment <= 1.0);
    }

    #[test]
    fn test_sentiment_negative() {
        let result = fallback_analysis("Problem über Problem, schlecht und fehlerhaft", Locale::DeAt);
        assert!(result.sentiment < 0.0);
        assert!(result.sentiment >= -1.0);
    }

    #[test]
    fn test_deterministic() {
        let a = fallback_analysis("Beschwerde: nicht geliefert, sofort klären!", Locale::DeAt);
        let b = fallback_analysis("Beschwerde: nicht geliefert, sofort klären!", Locale::DeAt);
        assert_eq!(a.category, b.category);
        assert_eq!(a.urgency, b.urgency);
        assert_eq!(a.sentiment, b.sentiment);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn test_summary_truncated_at_120_chars() {
        let long = "a".repeat(300);
        let result = fallback_analysis(&long, Locale::DeAt);
        assert_eq!(result.summary.chars().count(), 121);
        assert!(result.summary.ends_with('…'));
    }

    #[test]
    fn test_english_tables() {
        let result = fallback_analysis("This is a complaint, the order never arrived", Locale::En);
        assert_eq!(result.category, Category::Complaint);

        let result = fallback_analysis("Urgent: food safety issue in the deli!", Locale::En);
        assert_eq!(result.urgency, Urgency::Critical);
    }
}
