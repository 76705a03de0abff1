//! Product listing query parameters.

use std::str::FromStr;

use orderain_core::CategoryId;
use rust_decimal::Decimal;

const DEFAULT_PER_PAGE: u32 = 12;

/// Sort field for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Name,
    Price,
}

impl SortBy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            _ => Err(format!("invalid sort field: {s}")),
        }
    }
}

/// Sort direction for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("invalid sort direction: {s}")),
        }
    }
}

/// Filters, sorting, and pagination for the product listing endpoint.
///
/// Filtering happens server-side; this type only encodes parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    page: u32,
    per_page: u32,
    sort_by: SortBy,
    sort_direction: SortDirection,
    search: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    categories: Vec<CategoryId>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
            search: None,
            min_price: None,
            max_price: None,
            categories: Vec::new(),
        }
    }
}

impl ProductQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based page number; zero is bumped to one.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    #[must_use]
    pub const fn sort(mut self, sort_by: SortBy, direction: SortDirection) -> Self {
        self.sort_by = sort_by;
        self.sort_direction = direction;
        self
    }

    /// Free-text search; blank input clears the search.
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search.trim().to_string())
        };
        self
    }

    #[must_use]
    pub const fn min_price(mut self, min: Decimal) -> Self {
        self.min_price = Some(min);
        self
    }

    #[must_use]
    pub const fn max_price(mut self, max: Decimal) -> Self {
        self.max_price = Some(max);
        self
    }

    #[must_use]
    pub fn category(mut self, category: CategoryId) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.page
    }

    /// Encode as query string pairs, in the order the backend documents them.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("sort_by", self.sort_by.as_str().to_string()),
            ("sort_direction", self.sort_direction.as_str().to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        for category in &self.categories {
            pairs.push(("category[]", category.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pairs() {
        let pairs = ProductQuery::new().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_string()),
                ("per_page", "12".to_string()),
                ("sort_by", "name".to_string()),
                ("sort_direction", "asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_all_filters_and_repeated_categories() {
        let pairs = ProductQuery::new()
            .page(3)
            .per_page(24)
            .sort(SortBy::Price, SortDirection::Desc)
            .search("  iphone ")
            .min_price(Decimal::new(100, 0))
            .max_price(Decimal::new(99950, 2))
            .category(CategoryId::new(4))
            .category(CategoryId::new(9))
            .category(CategoryId::new(4))
            .to_pairs();

        assert!(pairs.contains(&("page", "3".to_string())));
        assert!(pairs.contains(&("sort_by", "price".to_string())));
        assert!(pairs.contains(&("sort_direction", "desc".to_string())));
        assert!(pairs.contains(&("search", "iphone".to_string())));
        assert!(pairs.contains(&("min_price", "100".to_string())));
        assert!(pairs.contains(&("max_price", "999.50".to_string())));
        let categories: Vec<_> = pairs.iter().filter(|(k, _)| *k == "category[]").collect();
        assert_eq!(categories.len(), 2);
    }

    #[test]
    fn test_blank_search_and_zero_page() {
        let query = ProductQuery::new().search("   ").page(0);
        assert_eq!(query.current_page(), 1);
        assert!(query.to_pairs().iter().all(|(k, _)| *k != "search"));
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("price".parse::<SortBy>(), Ok(SortBy::Price));
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("rating".parse::<SortBy>().is_err());
    }
}
