use std::str::FromStr;

use super::product::Product;

/// Category selector; `"all"` disables category filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => product.category == *category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s.is_empty() || s == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_string())
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CategoryFilter::from(s))
    }
}

/// Case-insensitive substring match against name or description.
/// An empty term matches everything.
pub fn matches_search(product: &Product, search: &str) -> bool {
    let needle = search.to_lowercase();
    needle.is_empty()
        || product.name.to_lowercase().contains(&needle)
        || product.description.to_lowercase().contains(&needle)
}

/// Products matching both the search term and the category, in input order.
pub fn filter_products(
    products: &[Product],
    search: &str,
    category: &CategoryFilter,
) -> Vec<Product> {
    products
        .iter()
        .filter(|p| category.matches(p) && matches_search(p, search))
        .cloned()
        .collect()
}

/// Distinct categories in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for p in products {
        if !seen.contains(&p.category) {
            seen.push(p.category.clone());
        }
    }
    seen
}
