//! Keyword classification of free text into a category and scores.

use serde::Serialize;

use super::keywords::{mentions_date, NormalizedText};
use super::priority::{estimate_minutes, priority_quadrant, Quadrant};
use crate::model::{Category, CategoryDomain, EntityId};
use crate::storage::{KeywordLevels, SuggestionConfig};

/// Everything the task form can be prefilled with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub category_id: Option<EntityId>,
    pub importance: u8,
    pub urgency: u8,
    pub quadrant: Quadrant,
    pub estimated_minutes: u32,
}

impl Suggestion {
    pub fn for_text(
        title: &str,
        description: &str,
        categories: &[Category],
        config: &SuggestionConfig,
    ) -> Self {
        let category_id = suggest_category(title, description, categories, config);
        let (importance, urgency) = suggest_importance_urgency(title, description, config);
        Self {
            category_id,
            importance,
            urgency,
            quadrant: priority_quadrant(importance, urgency),
            estimated_minutes: estimate_minutes(title, description, importance, urgency),
        }
    }
}

/// Best matching category for the text.
///
/// Built-in domains score against their keyword table. Custom categories
/// score their own name plus any table keyed by their lower-cased name.
/// Ties keep the earlier category. Without any match the Personal category
/// (or the first one) is returned.
pub fn suggest_category(
    title: &str,
    description: &str,
    categories: &[Category],
    config: &SuggestionConfig,
) -> Option<EntityId> {
    let text = NormalizedText::new(title, description);

    let mut best: Option<(&Category, usize)> = None;
    for category in categories {
        let score = category_score(&text, category, config);
        if score == 0 {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((category, score)),
        }
    }

    if let Some((category, score)) = best {
        tracing::trace!(category = %category.name, score, "category suggested");
        return Some(category.id.clone());
    }

    categories
        .iter()
        .find(|c| c.effective_domain() == CategoryDomain::Personal)
        .or_else(|| categories.first())
        .map(|c| c.id.clone())
}

fn category_score(text: &NormalizedText, category: &Category, config: &SuggestionConfig) -> usize {
    let domain = category.effective_domain();
    let key = match domain {
        CategoryDomain::Custom => category.name.to_lowercase(),
        other => other.as_str().to_string(),
    };
    let table = config
        .category_keywords
        .get(&key)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut score = text.count_matches(table);
    let name_listed = table.iter().any(|k| k.eq_ignore_ascii_case(&category.name));
    if domain == CategoryDomain::Custom && !name_listed && text.contains(&category.name) {
        score += 1;
    }
    score
}

/// Importance and urgency on the 1..=5 scale.
///
/// A mention of a concrete due date or near-term period raises urgency to
/// at least 4.
pub fn suggest_importance_urgency(
    title: &str,
    description: &str,
    config: &SuggestionConfig,
) -> (u8, u8) {
    let text = NormalizedText::new(title, description);
    let importance = level(&text, &config.importance);
    let mut urgency = level(&text, &config.urgency);
    if mentions_date(title, description) {
        urgency = urgency.max(4);
    }
    (importance, urgency)
}

fn level(text: &NormalizedText, levels: &KeywordLevels) -> u8 {
    let high = text.count_matches(&levels.high) as i64;
    let low = text.count_matches(&levels.low) as i64;
    match high - low {
        net if net >= 2 => 5,
        1 => 4,
        0 => 3,
        -1 => 2,
        _ => 1,
    }
}
