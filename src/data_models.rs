use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw key/value pairs of a URL query string, as handed out by a navigator.
pub type QueryMap = BTreeMap<String, String>;

/// Result-type discriminator. Selects both the backend index and the
/// rendering variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Jobs,
    News,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Jobs => "jobs",
            SearchType::News => "news",
        }
    }

    /// Strict decode of a raw query value. Unknown values yield `None`.
    pub fn from_query_value(raw: &str) -> Option<SearchType> {
        match raw {
            "jobs" => Some(SearchType::Jobs),
            "news" => Some(SearchType::News),
            _ => None,
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub title: String,
    pub url: Option<String>,
    pub company: String,
    pub location: String,
    pub employment_type: String,
    pub seniority_level: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResult {
    pub title: String,
    pub url: Option<String>,
    pub date: String,
    pub description: String,
}

/// One record of a result page. The variant always matches the `SearchType`
/// the page was requested with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchResult {
    Job(JobResult),
    News(NewsResult),
}

impl SearchResult {
    pub fn title(&self) -> &str {
        match self {
            SearchResult::Job(job) => &job.title,
            SearchResult::News(news) => &news.title,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            SearchResult::Job(job) => job.url.as_deref(),
            SearchResult::News(news) => news.url.as_deref(),
        }
    }

    pub fn search_type(&self) -> SearchType {
        match self {
            SearchResult::Job(_) => SearchType::Jobs,
            SearchResult::News(_) => SearchType::News,
        }
    }
}

/// One page of results plus the backend's total hit count. `results.len()` is
/// not necessarily the page size and not necessarily `<= total`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total: u64,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[test]
fn test_search_type_strict_decode() {
    assert_eq!(SearchType::from_query_value("jobs"), Some(SearchType::Jobs));
    assert_eq!(SearchType::from_query_value("news"), Some(SearchType::News));
    assert_eq!(SearchType::from_query_value("News"), None);
    assert_eq!(SearchType::from_query_value(""), None);
    assert_eq!(SearchType::default(), SearchType::Jobs);
}

#[test]
fn test_shared_accessors_dispatch_on_variant() {
    let news = SearchResult::News(NewsResult {
        title: "Rates hold".to_string(),
        url: Some("https://news.example/rates".to_string()),
        date: "2024-03-01".to_string(),
        description: String::new(),
    });
    assert_eq!(news.title(), "Rates hold");
    assert_eq!(news.url(), Some("https://news.example/rates"));
    assert_eq!(news.search_type(), SearchType::News);
}
