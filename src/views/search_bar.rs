use serde::Serialize;
use utoipa::ToSchema;

/// Search bar state; the typed query itself stays in the browser
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchBarView {
    pub placeholder: String,
    pub loading: bool,
    pub search_enabled: bool,
    pub locate_enabled: bool,
}

impl SearchBarView {
    pub fn new(loading: bool) -> Self {
        Self {
            placeholder: "Search for a city...".to_string(),
            loading,
            search_enabled: !loading,
            locate_enabled: !loading,
        }
    }
}

/// Trim a submitted query; blank input is not a search
pub fn normalize_query(raw: &str) -> Option<String> {
    let query = raw.trim();
    (!query.is_empty()).then(|| query.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Paris "), Some("Paris".to_string()));
        assert_eq!(normalize_query("New York"), Some("New York".to_string()));
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(""), None);
    }

    #[test]
    fn test_controls_disabled_while_loading() {
        let bar = SearchBarView::new(true);
        assert!(!bar.search_enabled);
        assert!(!bar.locate_enabled);
        assert!(SearchBarView::new(false).search_enabled);
    }
}
