//! Pattern matching over raw bulletin text, for pages that are not
//! well-formed XML or that lack the expected structure.

use std::sync::LazyLock;

use regex::Regex;

use super::DayReading;

/// Recognized condition words, in match priority.
pub(crate) const CONDITION_WORDS: [&str; 10] = [
    "Sunny",
    "Clear",
    "Cloudy",
    "Partly cloudy",
    "Overcast",
    "Showers",
    "Rain",
    "Thunderstorm",
    "Windy",
    "Fog",
];

const TITLE_LIMIT: usize = 64;
const TRAILING_CONDITION_LIMIT: usize = 20;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

static CONDITION_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    CONDITION_WORDS
        .iter()
        .map(|word| (*word, compile(&format!(r"(?i)\b{}\b", regex::escape(word)))))
        .collect()
});

static TEMP_NEAR_CURRENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)Current[^\n\r]*?(-?\d+(?:\.\d+)?)\s*°?C"));
static TEMP_ANYWHERE: LazyLock<Regex> = LazyLock::new(|| compile(r"(-?\d+(?:\.\d+)?)\s*°?C"));
static TITLE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<title>(.*?)</title>"));
static META_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)<meta[^>]+name=['"]description['"][^>]+content=['"]([^'"]+)['"]"#)
});
static ISSUED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(Updated|Issued)\s+(at|on)\s+([\w:,\s]+)\b"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

static MIN_MAX_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)Min\s+(-?\d+(?:\.\d+)?)\s*°?C[^\n\r]*?Max\s+(-?\d+(?:\.\d+)?)\s*°?C([^<\n\r]{0,40})")
});
static MIN_LABEL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)Min(?:imum)?:?\s*(-?\d+(?:\.\d+)?)\s*°?C"));
static MAX_LABEL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)Max(?:imum)?:?\s*(-?\d+(?:\.\d+)?)\s*°?C"));

static NO_WARNINGS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)No\s+warnings?"));
static WARNING_HEADING: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)<h[1-4][^>]*>([^<]*warning[^<]*)</h[1-4]>"));
static WARNING_WORD: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bwarning\b"));

pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// A temperature on the same line as the word "Current".
pub(crate) fn temperature_near_current(text: &str) -> Option<f64> {
    capture_number(&TEMP_NEAR_CURRENT, text)
}

/// The first temperature anywhere in the text.
pub(crate) fn first_temperature(text: &str) -> Option<f64> {
    capture_number(&TEMP_ANYWHERE, text)
}

/// First vocabulary word present in `text`, as spelled in the vocabulary.
pub(crate) fn condition_word(text: &str) -> Option<String> {
    CONDITION_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(word, _)| (*word).to_string())
}

pub(crate) fn page_title(text: &str) -> Option<String> {
    let caps = TITLE.captures(text)?;
    let title = collapse_whitespace(caps.get(1)?.as_str());
    (!title.is_empty()).then(|| truncate_chars(&title, TITLE_LIMIT))
}

pub(crate) fn meta_description(text: &str) -> Option<String> {
    let caps = META_DESCRIPTION.captures(text)?;
    Some(truncate_chars(caps.get(1)?.as_str(), TITLE_LIMIT))
}

/// The "Issued at ..." phrase, when the bulletin states one.
pub(crate) fn issued_phrase(text: &str) -> Option<String> {
    ISSUED
        .captures(text)
        .and_then(|caps| caps.get(0))
        .map(|m| collapse_whitespace(m.as_str()))
}

fn trailing_condition(trailing: &str) -> Option<String> {
    let trailing = trailing.trim();
    condition_word(trailing).or_else(|| {
        (!trailing.is_empty()).then(|| truncate_chars(trailing, TRAILING_CONDITION_LIMIT))
    })
}

/// `Min 12°C ... Max 23°C Showers` on one line, one reading per match.
pub(crate) fn min_max_pairs(text: &str) -> Vec<DayReading> {
    MIN_MAX_PAIR
        .captures_iter(text)
        .map(|caps| DayReading {
            date: None,
            min: caps.get(1).and_then(|m| m.as_str().parse().ok()),
            max: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            condition: caps.get(3).and_then(|m| trailing_condition(m.as_str())),
        })
        .collect()
}

/// Separately labelled minimums and maximums, zipped in document order.
pub(crate) fn min_max_columns(text: &str) -> Vec<DayReading> {
    let values = |re: &Regex| -> Vec<f64> {
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse().ok()))
            .collect()
    };
    let mins = values(&MIN_LABEL);
    let maxs = values(&MAX_LABEL);
    mins.into_iter()
        .zip(maxs)
        .map(|(min, max)| DayReading {
            date: None,
            min: Some(min),
            max: Some(max),
            condition: None,
        })
        .collect()
}

pub(crate) fn mentions_no_warnings(text: &str) -> bool {
    NO_WARNINGS.is_match(text)
}

pub(crate) fn warning_headings(text: &str) -> Vec<String> {
    WARNING_HEADING
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| collapse_whitespace(m.as_str()))
        .filter(|title| !title.is_empty())
        .collect()
}

pub(crate) fn warning_word_count(text: &str) -> usize {
    WARNING_WORD.find_iter(text).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_prefers_current_line() {
        let html = "<p>Max 30°C</p>\n<p>Current temperature: 18.5 °C</p>";
        assert_eq!(temperature_near_current(html), Some(18.5));
        assert_eq!(first_temperature(html), Some(30.0));
    }

    #[test]
    fn temperature_without_degree_sign() {
        assert_eq!(temperature_near_current("current reading -2C"), Some(-2.0));
        assert_eq!(first_temperature("no numbers here"), None);
    }

    #[test]
    fn current_must_share_the_line() {
        assert_eq!(temperature_near_current("Current\n21°C"), None);
    }

    #[test]
    fn condition_follows_vocabulary_order() {
        assert_eq!(condition_word("rain later, sunny now").as_deref(), Some("Sunny"));
        assert_eq!(condition_word("Partly cloudy").as_deref(), Some("Cloudy"));
        assert_eq!(condition_word("THUNDERSTORM").as_deref(), Some("Thunderstorm"));
        assert_eq!(condition_word("Rainfall totals"), None);
    }

    #[test]
    fn title_is_collapsed_and_truncated() {
        let html = format!("<title>\n  Sydney \t Forecast {}</title>", "x".repeat(100));
        let title = page_title(&html).unwrap();
        assert!(title.starts_with("Sydney Forecast x"));
        assert_eq!(title.chars().count(), 64);
        assert_eq!(page_title("<title>   </title>"), None);
    }

    #[test]
    fn meta_description_content() {
        let html = r#"<meta name="description" content="Latest weather for Hobart">"#;
        assert_eq!(meta_description(html).as_deref(), Some("Latest weather for Hobart"));
    }

    #[test]
    fn issued_phrase_detected() {
        let text = "Issued at 4:20 pm EST on Wednesday 1 May 2024";
        assert!(issued_phrase(text).unwrap().starts_with("Issued at 4:20"));
        assert_eq!(issued_phrase("no timestamp"), None);
    }

    #[test]
    fn pairs_with_trailing_condition() {
        let html = "Mon Min 12°C Max 23°C Showers easing\nTue Min 10°C Max 19°C Mostly fine day\n";
        let pairs = min_max_pairs(html);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].min, Some(12.0));
        assert_eq!(pairs[0].max, Some(23.0));
        assert_eq!(pairs[0].condition.as_deref(), Some("Showers"));
        assert_eq!(pairs[1].condition.as_deref(), Some("Mostly fine day"));
    }

    #[test]
    fn trailing_text_is_truncated() {
        let html = "Min 5°C Max 15°C a very long description of tomorrow";
        let pairs = min_max_pairs(html);
        assert_eq!(pairs[0].condition.as_deref(), Some("a very long descript"));
    }

    #[test]
    fn columns_zip_to_shortest() {
        let html = "<td>Minimum: 8°C</td><td>Min: 9°C</td>\n<td>Maximum: 20°C</td>";
        let cols = min_max_columns(html);
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].min, Some(8.0));
        assert_eq!(cols[0].max, Some(20.0));
        assert_eq!(cols[0].condition, None);
    }

    #[test]
    fn warnings_text() {
        assert!(mentions_no_warnings("There are No  Warnings current"));
        assert!(mentions_no_warnings("no warning in effect"));
        let html = "<h2 class=\"x\">Flood   Warning for the Hawkesbury</h2><h3>Forecast</h3>";
        assert_eq!(warning_headings(html), vec!["Flood Warning for the Hawkesbury"]);
        assert_eq!(warning_word_count("Warning! warnings; a WARNING."), 2);
    }
}
