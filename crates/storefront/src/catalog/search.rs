//! Catalog search, filtering, and sorting.

use std::str::FromStr;

use pocket_shop_core::DisplayCurrency;

use super::Product;

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Alphabetical by name, case-insensitive.
    Name,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "featured" => Ok(Self::Featured),
            "price-asc" | "price_asc" | "low-high" => Ok(Self::PriceAsc),
            "price-desc" | "price_desc" | "high-low" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Search criteria. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Free text; every whitespace-separated term must appear in the name,
    /// short name, brand, or category.
    pub text: Option<String>,
    /// Exact category, case-insensitive.
    pub category: Option<String>,
    /// Exact brand, case-insensitive.
    pub brand: Option<String>,
    /// Inclusive lower bound on the display price.
    pub min_price: Option<u64>,
    /// Inclusive upper bound on the display price.
    pub max_price: Option<u64>,
    pub sort: SortOrder,
}

impl ProductQuery {
    /// A free-text query with no other criteria.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Whether `product` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, product: &Product, currency: &DisplayCurrency) -> bool {
        self.matches_text(product)
            && matches_exact(self.category.as_deref(), &product.category)
            && matches_exact(self.brand.as_deref(), &product.brand)
            && self.matches_price(product, currency)
    }

    fn matches_text(&self, product: &Product) -> bool {
        let Some(text) = self.text.as_deref() else {
            return true;
        };
        let haystack = format!(
            "{} {} {} {}",
            product.name,
            product.short_name.as_deref().unwrap_or_default(),
            product.brand,
            product.category
        )
        .to_lowercase();

        text.to_lowercase()
            .split_whitespace()
            .all(|term| haystack.contains(term))
    }

    fn matches_price(&self, product: &Product, currency: &DisplayCurrency) -> bool {
        if self.min_price.is_none() && self.max_price.is_none() {
            return true;
        }
        let Some(price) = product.display_price(currency) else {
            return false;
        };
        self.min_price.is_none_or(|min| price >= min) && self.max_price.is_none_or(|max| price <= max)
    }
}

fn matches_exact(wanted: Option<&str>, actual: &str) -> bool {
    wanted.is_none_or(|w| w.trim().is_empty() || w.trim().eq_ignore_ascii_case(actual.trim()))
}

/// Filter `products` by `query` and sort the matches.
///
/// Sorting is stable, so ties keep catalog order.
#[must_use]
pub fn search(products: &[Product], query: &ProductQuery, currency: &DisplayCurrency) -> Vec<Product> {
    let mut results: Vec<Product> = products
        .iter()
        .filter(|p| query.matches(p, currency))
        .cloned()
        .collect();

    match query.sort {
        SortOrder::Featured => {}
        SortOrder::PriceAsc => results.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceDesc => results.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Name => results.sort_by_cached_key(|p| p.name.to_lowercase()),
    }
    results
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocket_shop_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i64, name: &str, brand: &str, category: &str, price: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            short_name: None,
            price: Decimal::new(price, 0),
            images: Vec::new(),
            brand: brand.to_string(),
            category: category.to_string(),
            description: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Galaxy Phone", "Stellar", "phones", 500),
            product(2, "Pixel Phone", "Orbit", "phones", 450),
            product(3, "Air Laptop", "Stellar", "laptops", 1200),
            product(4, "Buds", "Orbit", "audio", 80),
        ]
    }

    fn ids(results: &[Product]) -> Vec<String> {
        results.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_text_search_all_terms() {
        let currency = DisplayCurrency::default();
        let results = search(&catalog(), &ProductQuery::text("stellar PHONE"), &currency);
        assert_eq!(ids(&results), ["1"]);
    }

    #[test]
    fn test_category_and_brand_filters() {
        let currency = DisplayCurrency::default();
        let query = ProductQuery {
            category: Some("Phones".to_string()),
            brand: Some("orbit".to_string()),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&search(&catalog(), &query, &currency)), ["2"]);
    }

    #[test]
    fn test_price_range_uses_display_price() {
        let currency = DisplayCurrency::default();
        let query = ProductQuery {
            min_price: Some(100),
            max_price: Some(500),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&search(&catalog(), &query, &currency)), ["1", "2"]);
    }

    #[test]
    fn test_sort_orders() {
        let currency = DisplayCurrency::default();
        let mut query = ProductQuery {
            sort: SortOrder::PriceAsc,
            ..ProductQuery::default()
        };
        assert_eq!(ids(&search(&catalog(), &query, &currency)), ["4", "2", "1", "3"]);

        query.sort = SortOrder::PriceDesc;
        assert_eq!(ids(&search(&catalog(), &query, &currency)), ["3", "1", "2", "4"]);

        query.sort = SortOrder::Name;
        assert_eq!(ids(&search(&catalog(), &query, &currency)), ["3", "4", "1", "2"]);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("price-asc".parse::<SortOrder>().unwrap(), SortOrder::PriceAsc);
        assert_eq!("".parse::<SortOrder>().unwrap(), SortOrder::Featured);
        assert!("random".parse::<SortOrder>().is_err());
    }
}
