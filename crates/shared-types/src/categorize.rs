//! Keyword-based category suggestions for the incident description.
//!
//! Suggestions are advisory. Nothing here ever sets a record's category.

use serde::{Deserialize, Serialize};

use crate::fir::FirCategory;

/// Description length (in characters) at which suggestions start.
pub const SUGGESTION_THRESHOLD: usize = 50;

/// Keyword table, in ranking order.
const KEYWORDS: &[(FirCategory, &[&str])] = &[
    (FirCategory::Theft, &["stole", "theft", "stolen"]),
    (FirCategory::Assault, &["hit", "attack", "beat"]),
    (FirCategory::Burglary, &["broke", "entered", "break-in"]),
    (FirCategory::Cybercrime, &["online", "internet", "hack"]),
];

const FALLBACK: [FirCategory; 3] = [FirCategory::Theft, FirCategory::Assault, FirCategory::Burglary];

/// Rank categories whose keywords appear in `description`.
///
/// Matching is a case-insensitive substring scan. With no match the first
/// three categories are returned so the user always has something to pick.
pub fn suggest_categories(description: &str) -> Vec<FirCategory> {
    let text = description.to_lowercase();
    let matched: Vec<FirCategory> = KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| text.contains(w)))
        .map(|(category, _)| *category)
        .collect();
    if matched.is_empty() {
        FALLBACK.to_vec()
    } else {
        matched
    }
}

/// Suggestions once the description is long enough, `None` before that.
pub fn suggestions_for(description: &str) -> Option<Vec<FirCategory>> {
    if description.trim().chars().count() >= SUGGESTION_THRESHOLD {
        Some(suggest_categories(description))
    } else {
        None
    }
}

/// Body of `POST /api/utils/categorize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategorizeRequest {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategorizeResponse {
    pub suggestions: Vec<FirCategory>,
}
