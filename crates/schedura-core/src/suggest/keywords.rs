//! Word-boundary keyword matching.

use std::sync::OnceLock;

use regex::Regex;

/// Lower-cased text with every non-alphanumeric run collapsed to one space,
/// padded with a space on each side so phrases can be matched as ` phrase `.
#[derive(Debug, Clone)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(title: &str, description: &str) -> Self {
        Self(normalize(&format!("{title} {description}")))
    }

    /// Whether `keyword` (a word or phrase) occurs on word boundaries.
    pub fn contains(&self, keyword: &str) -> bool {
        let needle = normalize(keyword);
        if needle.trim().is_empty() {
            return false;
        }
        self.0.contains(&needle)
    }

    /// Number of distinct keywords from `keywords` found in the text.
    pub fn count_matches<S: AsRef<str>>(&self, keywords: &[S]) -> usize {
        let mut seen: Vec<String> = Vec::new();
        for keyword in keywords {
            let needle = normalize(keyword.as_ref());
            if needle.trim().is_empty() || seen.contains(&needle) {
                continue;
            }
            if self.0.contains(&needle) {
                seen.push(needle);
            }
        }
        seen.len()
    }

    pub fn as_str(&self) -> &str {
        self.0.trim()
    }
}

fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    let mut last_space = true;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            out.push(ch);
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    if !last_space {
        out.push(' ');
    }
    out
}

fn date_reference_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"\bdue (?:on |by )?\d{1,2}(?:st|nd|rd|th)? (?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)",
            r"\bdue (?:on |by )?\d{1,2}/\d{1,2}(?:/\d{2,4})?",
            r"\bby (?:this |next )?(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
            r"\b(?:this|next) (?:week|month)\b",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

/// Whether the raw text mentions a concrete due date or near-term period.
pub fn mentions_date(title: &str, description: &str) -> bool {
    let text = format!("{title} {description}").to_lowercase();
    date_reference_patterns().iter().any(|re| re.is_match(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_respect_word_boundaries() {
        let text = NormalizedText::new("I know the keyboard shortcut", "");
        assert!(!text.contains("now"));
        assert!(!text.contains("key"));
        assert!(text.contains("keyboard"));
    }

    #[test]
    fn phrases_match_across_punctuation() {
        let text = NormalizedText::new("Fix bug -- no rush!", "do it WHEN-POSSIBLE");
        assert!(text.contains("no rush"));
        assert!(text.contains("when possible"));
        assert_eq!(text.as_str(), "fix bug no rush do it when possible");
    }

    #[test]
    fn each_keyword_counts_once() {
        let text = NormalizedText::new("meeting meeting with client", "");
        let keywords = ["meeting", "client", "Meeting", "office"];
        assert_eq!(text.count_matches(&keywords), 2);
    }

    #[test]
    fn detects_date_references() {
        assert!(mentions_date("Submit form due by 12/05", ""));
        assert!(mentions_date("Essay", "due on 3rd mar"));
        assert!(mentions_date("Renew passport by next friday", ""));
        assert!(mentions_date("Plan offsite this week", ""));
        assert!(!mentions_date("Water plants", "every so often"));
    }
}
