//! Provender Catalog - Per-vendor item catalogs
//!
//! Catalogs are initialized once and read-only afterwards, so they can be
//! shared freely across request handlers without synchronization.

use provender_types::{Amount, CatalogFilter, CatalogItem, Currency, ProvenderError, Result, VendorId};
use std::collections::HashMap;

/// A vendor's catalog, keyed by SKU
#[derive(Debug, Clone)]
pub struct CatalogStore {
    vendor: VendorId,
    items: HashMap<String, CatalogItem>,
    /// Insertion order, so queries return a stable listing
    order: Vec<String>,
}

impl CatalogStore {
    /// Build a catalog from its items
    ///
    /// Later duplicates of a SKU replace earlier ones.
    pub fn new(vendor: VendorId, items: Vec<CatalogItem>) -> Self {
        let mut map = HashMap::with_capacity(items.len());
        let mut order = Vec::with_capacity(items.len());
        for item in items {
            if !map.contains_key(&item.sku) {
                order.push(item.sku.clone());
            }
            map.insert(item.sku.clone(), item);
        }
        Self {
            vendor,
            items: map,
            order,
        }
    }

    /// The owning vendor
    pub fn vendor(&self) -> &VendorId {
        &self.vendor
    }

    /// Look up one item by SKU
    pub fn get(&self, sku: &str) -> Result<&CatalogItem> {
        self.items.get(sku).ok_or_else(|| ProvenderError::UnknownSku {
            sku: sku.to_string(),
        })
    }

    /// All items passing the filter, in catalog order
    pub fn query(&self, filter: &CatalogFilter) -> Vec<CatalogItem> {
        self.order
            .iter()
            .filter_map(|sku| self.items.get(sku))
            .filter(|item| filter.matches(item))
            .cloned()
            .collect()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn item(
    vendor: &VendorId,
    sku: &str,
    name: &str,
    price_minor: i64,
    category: &str,
    tags: &[&str],
    min_quantity: Option<u32>,
) -> CatalogItem {
    CatalogItem {
        sku: sku.to_string(),
        name: name.to_string(),
        unit_price: Amount::from_minor(price_minor, Currency::USD),
        category: category.to_string(),
        dietary_tags: tags.iter().map(|t| t.to_string()).collect(),
        min_quantity,
        vendor: vendor.clone(),
    }
}

/// The built-in catalog for the standard (budget) vendor
pub fn standard_catalog(vendor: VendorId) -> CatalogStore {
    let items = vec![
        item(&vendor, "STD-GRAN-01", "Granola bars (box of 12)", 1_450, "snacks", &["vegetarian"], Some(5)),
        item(&vendor, "STD-TRAIL-01", "Trail mix 500g", 899, "snacks", &["vegan", "gluten-free"], Some(10)),
        item(&vendor, "STD-CHIPS-01", "Tortilla chips family bag", 499, "snacks", &["vegan", "gluten-free"], Some(12)),
        item(&vendor, "STD-COOKIE-01", "Oat cookies (tray of 24)", 1_200, "snacks", &["vegetarian"], None),
        item(&vendor, "STD-FRUIT-01", "Seasonal fruit crate", 2_500, "fresh", &["vegan", "gluten-free"], None),
        item(&vendor, "STD-WATER-01", "Sparkling water 12-pack", 650, "beverages", &["vegan", "gluten-free"], Some(4)),
        item(&vendor, "STD-JUICE-01", "Cold-pressed juice 6-pack", 1_800, "beverages", &["vegan"], None),
    ];
    CatalogStore::new(vendor, items)
}

/// The built-in catalog for the premium vendor
pub fn premium_catalog(vendor: VendorId) -> CatalogStore {
    let items = vec![
        item(&vendor, "PRM-CHOC-01", "Single-origin chocolate box", 3_200, "snacks", &["vegetarian"], None),
        item(&vendor, "PRM-NUTS-01", "Roasted nut selection 750g", 2_400, "snacks", &["vegan", "gluten-free"], Some(6)),
        item(&vendor, "PRM-CHEESE-01", "Artisan cheese board", 4_500, "fresh", &["vegetarian"], None),
        item(&vendor, "PRM-FRUIT-01", "Exotic fruit crate", 3_900, "fresh", &["vegan", "gluten-free"], None),
        item(&vendor, "PRM-KOMBU-01", "Kombucha 8-pack", 2_800, "beverages", &["vegan", "gluten-free"], Some(3)),
        item(&vendor, "PRM-COFFEE-01", "Specialty coffee beans 1kg", 2_950, "beverages", &["vegan"], None),
    ];
    CatalogStore::new(vendor, items)
}
