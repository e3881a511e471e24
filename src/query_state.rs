use crate::data_models::{QueryMap, SearchType};
use crate::pagination;

pub const TERM_KEY: &str = "term";
pub const TYPE_KEY: &str = "type";
pub const START_KEY: &str = "start";
/// Accepted as an alias of `start` when decoding, never emitted.
pub const OFFSET_KEY: &str = "offset";

/// The canonical (term, type, offset) triple describing the search on screen.
///
/// Always decoded from the navigator's current query and never mutated in
/// place: every change is a new value pushed back through the navigator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryState {
    pub term: String,
    pub search_type: SearchType,
    /// Zero-based, always a multiple of `pagination::PAGE_SIZE`.
    pub offset: u64,
}

impl QueryState {
    pub fn new(term: impl Into<String>, search_type: SearchType) -> Self {
        QueryState {
            term: term.into(),
            search_type,
            offset: 0,
        }
    }

    /// Total decode of a raw URL query. Missing or invalid values fall back to
    /// an empty term, `jobs`, and offset 0.
    pub fn parse(query: &QueryMap) -> Self {
        let term = query.get(TERM_KEY).cloned().unwrap_or_default();
        let search_type = query
            .get(TYPE_KEY)
            .and_then(|raw| SearchType::from_query_value(raw))
            .unwrap_or_default();
        let raw_offset = query
            .get(START_KEY)
            .or_else(|| query.get(OFFSET_KEY))
            .map(String::as_str);

        QueryState {
            term,
            search_type,
            offset: parse_offset(raw_offset),
        }
    }

    /// A state only triggers a fetch when it carries a non-blank term.
    pub fn is_searchable(&self) -> bool {
        !self.term.trim().is_empty()
    }

    /// Same term, different type. Switching type restarts at the first page.
    pub fn with_type(&self, search_type: SearchType) -> Self {
        QueryState {
            term: self.term.clone(),
            search_type,
            offset: 0,
        }
    }

    pub fn with_offset(&self, offset: u64) -> Self {
        QueryState {
            term: self.term.clone(),
            search_type: self.search_type,
            offset: pagination::align(offset),
        }
    }

    /// Encodes back into query pairs. `start` is omitted on the first page.
    pub fn to_query(&self) -> QueryMap {
        let mut query = QueryMap::new();
        query.insert(TERM_KEY.to_string(), self.term.clone());
        query.insert(TYPE_KEY.to_string(), self.search_type.as_str().to_string());
        if self.offset > 0 {
            query.insert(START_KEY.to_string(), self.offset.to_string());
        }
        query
    }
}

/// Strict unsigned decimal parse. Anything else, negative numbers included,
/// becomes 0; valid values are floored onto a page boundary.
pub fn parse_offset(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .map(pagination::align)
        .unwrap_or(0)
}
