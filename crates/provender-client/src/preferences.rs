//! Preference source contract
//!
//! The preference data itself comes from an excluded collaborator (a
//! spreadsheet, a survey tool); the orchestration only depends on this
//! narrow contract. When the collaborator fails, callers fall back to
//! [`StaticPreferences::default`].

use crate::CatalogQuery;
use async_trait::async_trait;
use provender_types::Amount;
use serde::{Deserialize, Serialize};

/// One person's snack preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub name: String,
    pub dietary_tags: Vec<String>,
    /// Per-person unit-price ceiling
    pub budget: Option<Amount>,
}

/// Where preferences come from
#[async_trait]
pub trait PreferenceSource: Send + Sync {
    /// Fetch the current preference list; an error means the caller
    /// should fall back to a fixed default list
    async fn preferences(&self) -> Result<Vec<Preference>, String>;
}

/// Fixed in-process preference list; the fallback when the real
/// collaborator is unavailable
#[derive(Debug, Clone)]
pub struct StaticPreferences {
    preferences: Vec<Preference>,
}

impl StaticPreferences {
    pub fn new(preferences: Vec<Preference>) -> Self {
        Self { preferences }
    }
}

impl Default for StaticPreferences {
    fn default() -> Self {
        Self {
            preferences: vec![
                Preference {
                    name: "omnivores".to_string(),
                    dietary_tags: vec![],
                    budget: None,
                },
                Preference {
                    name: "vegans".to_string(),
                    dietary_tags: vec!["vegan".to_string()],
                    budget: None,
                },
                Preference {
                    name: "gluten-free".to_string(),
                    dietary_tags: vec!["gluten-free".to_string()],
                    budget: None,
                },
            ],
        }
    }
}

#[async_trait]
impl PreferenceSource for StaticPreferences {
    async fn preferences(&self) -> Result<Vec<Preference>, String> {
        Ok(self.preferences.clone())
    }
}

/// Derive a catalog query from a preference list: the union of everyone's
/// dietary tags and the tightest per-person budget
pub fn catalog_query_for(preferences: &[Preference]) -> CatalogQuery {
    let mut dietary: Vec<String> = Vec::new();
    for preference in preferences {
        for tag in &preference.dietary_tags {
            if !dietary.iter().any(|d| d.eq_ignore_ascii_case(tag)) {
                dietary.push(tag.clone());
            }
        }
    }
    let max_budget = preferences
        .iter()
        .filter_map(|p| p.budget.as_ref())
        .map(|amount| amount.minor)
        .min();

    CatalogQuery {
        categories: None,
        dietary: if dietary.is_empty() { None } else { Some(dietary) },
        max_budget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provender_types::Currency;

    #[tokio::test]
    async fn test_static_source_answers() {
        let source = StaticPreferences::default();
        let preferences = source.preferences().await.unwrap();
        assert!(!preferences.is_empty());
    }

    #[test]
    fn test_query_unions_tags_and_takes_tightest_budget() {
        let preferences = vec![
            Preference {
                name: "a".to_string(),
                dietary_tags: vec!["vegan".to_string()],
                budget: Some(Amount::from_minor(2_000, Currency::USD)),
            },
            Preference {
                name: "b".to_string(),
                dietary_tags: vec!["Vegan".to_string(), "halal".to_string()],
                budget: Some(Amount::from_minor(1_500, Currency::USD)),
            },
        ];
        let query = catalog_query_for(&preferences);
        assert_eq!(query.dietary, Some(vec!["vegan".to_string(), "halal".to_string()]));
        assert_eq!(query.max_budget, Some(1_500));
    }

    #[test]
    fn test_empty_preferences_mean_open_query() {
        let query = catalog_query_for(&[]);
        assert!(query.dietary.is_none());
        assert!(query.max_budget.is_none());
    }
}
