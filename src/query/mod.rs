//! Search query values and paged request parameters
//!
//! A [`SearchQuery`] is what the user edits: free text plus a set of named
//! filters. A [`PageRequest`] is what goes over the wire: the query together
//! with the page cursor, page size and sort settings.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable snapshot of the user's search input
///
/// Filter keys are unique. An empty value means the filter is unset and is
/// left out of requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub free_text: String,
    pub filters: BTreeMap<String, String>,
}

impl SearchQuery {
    #[must_use]
    pub fn new(free_text: impl Into<String>) -> Self {
        Self {
            free_text: free_text.into(),
            filters: BTreeMap::new(),
        }
    }

    /// Copy of this query with a filter set (or replaced)
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Copy of this query with different free text
    #[must_use]
    pub fn with_text(mut self, free_text: impl Into<String>) -> Self {
        self.free_text = free_text.into();
        self
    }

    /// Trimmed free text, or `None` if blank
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.free_text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Filters that carry a value
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .map(|(key, value)| (key.as_str(), value.trim()))
            .filter(|(_, value)| !value.is_empty())
    }
}

/// Sort direction sent as `sort_order`
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// The listing an entity feed pages through
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Company,
    Bank,
    Venue,
}

impl EntityKind {
    /// Endpoint path relative to the service root
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Company => "/companies",
            Self::Bank => "/banks",
            Self::Venue => "/venues",
        }
    }

    /// Name of the list field in a page body
    #[must_use]
    pub const fn items_field(self) -> &'static str {
        match self {
            Self::Company => "companies",
            Self::Bank => "banks",
            Self::Venue => "venues",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Bank => "bank",
            Self::Venue => "venue",
        }
    }
}

/// Page size and ordering shared by every request of a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            limit: 50,
            sort_by: "name".to_string(),
            sort_order: SortOrder::Asc,
        }
    }
}

/// One paged search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub kind: EntityKind,
    /// 1-based page number
    pub page: u32,
    pub settings: PageSettings,
    pub query: SearchQuery,
}

impl PageRequest {
    /// Query-string parameters in wire order
    ///
    /// `query` is omitted for blank free text and unset filters are omitted.
    #[must_use]
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.settings.limit.to_string()),
            ("sort_by".to_string(), self.settings.sort_by.clone()),
            (
                "sort_order".to_string(),
                self.settings.sort_order.as_str().to_string(),
            ),
        ];

        if let Some(text) = self.query.text() {
            params.push(("query".to_string(), text.to_string()));
        }

        params.extend(
            self.query
                .active_filters()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(query: SearchQuery) -> PageRequest {
        PageRequest {
            kind: EntityKind::Bank,
            page: 2,
            settings: PageSettings::default(),
            query,
        }
    }

    #[test]
    fn test_params_include_paging_and_sort() {
        let params = request(SearchQuery::default()).params();
        assert_eq!(
            params,
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "50".to_string()),
                ("sort_by".to_string(), "name".to_string()),
                ("sort_order".to_string(), "asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_params_skip_blank_text_and_unset_filters() {
        let query = SearchQuery::new("   ")
            .with_filter("region", "")
            .with_filter("industry", "  ")
            .with_filter("risk_level", "high");

        let params = request(query).params();
        assert!(!params.iter().any(|(key, _)| key == "query"));
        assert!(!params.iter().any(|(key, _)| key == "region"));
        assert!(params.contains(&("risk_level".to_string(), "high".to_string())));
    }

    #[test]
    fn test_params_trim_text() {
        let params = request(SearchQuery::new("  zenith ")).params();
        assert!(params.contains(&("query".to_string(), "zenith".to_string())));
    }

    #[test]
    fn test_with_filter_replaces_value() {
        let query = SearchQuery::default()
            .with_filter("region", "Ashanti")
            .with_filter("region", "Volta");
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters["region"], "Volta");
    }

    #[test]
    fn test_queries_compare_by_value() {
        let a = SearchQuery::new("gcb").with_filter("type", "commercial");
        let b = SearchQuery::new("gcb").with_filter("type", "commercial");
        assert_eq!(a, b);
        assert_ne!(a, b.with_text("gcb bank"));
    }

    #[test]
    fn test_entity_kind_endpoints() {
        assert_eq!(EntityKind::Company.path(), "/companies");
        assert_eq!(EntityKind::Bank.items_field(), "banks");
        assert_eq!(EntityKind::Venue.as_str(), "venue");
    }

    #[test]
    fn test_sort_order_serde() {
        let json = serde_json::to_string(&SortOrder::Desc).unwrap();
        assert_eq!(json, "\"desc\"");
    }
}
