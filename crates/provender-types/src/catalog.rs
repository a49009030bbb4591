//! Catalog item types
//!
//! Catalog items are immutable after catalog initialization. Each vendor
//! owns its own SKU namespace.

use crate::{Amount, VendorId};
use serde::{Deserialize, Serialize};

/// A purchasable item in a vendor's catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// SKU, unique per vendor
    pub sku: String,
    /// Display name
    pub name: String,
    /// Unit price
    pub unit_price: Amount,
    /// Category, e.g. "snacks" or "beverages"
    pub category: String,
    /// Dietary tags, e.g. "vegan", "gluten-free"
    pub dietary_tags: Vec<String>,
    /// Minimum order quantity, if the vendor imposes one
    pub min_quantity: Option<u32>,
    /// Owning vendor
    pub vendor: VendorId,
}

impl CatalogItem {
    /// Effective minimum order quantity (1 when none is set)
    pub fn effective_min_quantity(&self) -> u32 {
        self.min_quantity.unwrap_or(1).max(1)
    }

    /// Whether this item shares at least one tag with the requested set
    pub fn matches_dietary(&self, requested: &[String]) -> bool {
        requested.is_empty()
            || self
                .dietary_tags
                .iter()
                .any(|tag| requested.iter().any(|r| r.eq_ignore_ascii_case(tag)))
    }
}

/// Filter for catalog queries
///
/// Every field is optional; an empty filter matches the whole catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilter {
    /// Restrict to these categories
    pub categories: Option<Vec<String>>,
    /// Require at least one shared dietary tag
    pub dietary: Option<Vec<String>>,
    /// Reject items whose unit price exceeds this budget
    pub max_budget: Option<Amount>,
}

impl CatalogFilter {
    /// Whether an item passes this filter
    pub fn matches(&self, item: &CatalogItem) -> bool {
        if let Some(categories) = &self.categories {
            if !categories.iter().any(|c| c.eq_ignore_ascii_case(&item.category)) {
                return false;
            }
        }
        if let Some(dietary) = &self.dietary {
            if !item.matches_dietary(dietary) {
                return false;
            }
        }
        if let Some(max) = &self.max_budget {
            if item.unit_price.currency != max.currency || item.unit_price > *max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;

    fn item(category: &str, tags: &[&str], price_minor: i64) -> CatalogItem {
        CatalogItem {
            sku: "SKU-1".to_string(),
            name: "Trail mix".to_string(),
            unit_price: Amount::from_minor(price_minor, Currency::USD),
            category: category.to_string(),
            dietary_tags: tags.iter().map(|t| t.to_string()).collect(),
            min_quantity: None,
            vendor: VendorId::from("standard"),
        }
    }

    #[test]
    fn test_empty_filter_matches() {
        assert!(CatalogFilter::default().matches(&item("snacks", &["vegan"], 500)));
    }

    #[test]
    fn test_category_filter() {
        let filter = CatalogFilter {
            categories: Some(vec!["Beverages".to_string()]),
            ..Default::default()
        };
        assert!(!filter.matches(&item("snacks", &[], 500)));
        assert!(filter.matches(&item("beverages", &[], 500)));
    }

    #[test]
    fn test_dietary_filter_needs_one_shared_tag() {
        let filter = CatalogFilter {
            dietary: Some(vec!["vegan".to_string(), "halal".to_string()]),
            ..Default::default()
        };
        assert!(filter.matches(&item("snacks", &["Vegan", "gluten-free"], 500)));
        assert!(!filter.matches(&item("snacks", &["dairy"], 500)));
    }

    #[test]
    fn test_budget_filter() {
        let filter = CatalogFilter {
            max_budget: Some(Amount::from_minor(500, Currency::USD)),
            ..Default::default()
        };
        assert!(filter.matches(&item("snacks", &[], 500)));
        assert!(!filter.matches(&item("snacks", &[], 501)));
    }

    #[test]
    fn test_min_quantity_default() {
        let mut i = item("snacks", &[], 500);
        assert_eq!(i.effective_min_quantity(), 1);
        i.min_quantity = Some(20);
        assert_eq!(i.effective_min_quantity(), 20);
    }
}
