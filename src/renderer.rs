use std::fmt;

use crate::data_models::{JobResult, NewsResult, SearchResult, SearchType};
use crate::pagination::{NextControl, NextPolicy, PaginationControls};
use crate::query_state::QueryState;

/// Job descriptions longer than this many characters are cut.
pub const DESCRIPTION_LIMIT: usize = 300;
const ELLIPSIS: &str = "...";
const SEPARATOR: &str = " \u{2022} ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    Link { text: String, href: String },
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Details {
    Job {
        /// `company • location`
        company_line: String,
        /// `employment type • seniority level`
        employment_line: String,
        description: String,
        read_more: Option<String>,
    },
    News {
        date: String,
        description: String,
    },
}

/// Display fields of one result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    pub title: Title,
    pub details: Details,
}

/// Display fields for one result. The client decodes every page as the type
/// it was requested with, so the variant always matches the active type.
pub fn render(result: &SearchResult) -> RenderedResult {
    match result {
        SearchResult::Job(job) => render_job(job),
        SearchResult::News(news) => render_news(news),
    }
}

fn render_title(title: &str, url: Option<&str>) -> Title {
    match url {
        Some(href) => Title::Link {
            text: title.to_string(),
            href: href.to_string(),
        },
        None => Title::Plain(title.to_string()),
    }
}

fn render_job(job: &JobResult) -> RenderedResult {
    let (description, truncated) = truncate_description(&job.description);
    RenderedResult {
        title: render_title(&job.title, job.url.as_deref()),
        details: Details::Job {
            company_line: format!("{}{SEPARATOR}{}", job.company, job.location),
            employment_line: format!("{}{SEPARATOR}{}", job.employment_type, job.seniority_level),
            description,
            read_more: if truncated { job.url.clone() } else { None },
        },
    }
}

fn render_news(news: &NewsResult) -> RenderedResult {
    RenderedResult {
        title: render_title(&news.title, news.url.as_deref()),
        details: Details::News {
            date: news.date.clone(),
            description: news.description.clone(),
        },
    }
}

/// Raw character cut, not word aware. Returns the display text and whether
/// anything was dropped.
pub fn truncate_description(description: &str) -> (String, bool) {
    match description.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => (format!("{}{ELLIPSIS}", &description[..cut]), true),
        None => (description.to_string(), false),
    }
}

/// "Showing 10 out of 42 jobs results"
pub fn summary_line(shown: usize, total: u64, search_type: SearchType) -> String {
    format!("Showing {shown} out of {total} {search_type} results")
}

pub fn page_title(query: &QueryState) -> String {
    format!("{} - {} results", query.term, query.search_type)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsPage {
    pub title: String,
    pub summary: String,
    pub results: Vec<RenderedResult>,
    pub pagination: PaginationControls,
}

impl ResultsPage {
    pub fn new(
        query: &QueryState,
        results: &[SearchResult],
        total: u64,
        policy: NextPolicy,
    ) -> Self {
        ResultsPage {
            title: page_title(query),
            summary: summary_line(results.len(), total, query.search_type),
            results: results.iter().map(render).collect(),
            pagination: PaginationControls::for_page(query.offset, total, policy),
        }
    }
}

/// What the search page shows for a given controller status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPage {
    Idle,
    Loading,
    Failed { message: String },
    NoResults,
    Results(ResultsPage),
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Title::Link { text, href } => write!(f, "{text} <{href}>"),
            Title::Plain(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for RenderedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        match &self.details {
            Details::Job {
                company_line,
                employment_line,
                description,
                read_more,
            } => {
                writeln!(f, "  {company_line}")?;
                writeln!(f, "  {employment_line}")?;
                writeln!(f, "  {description}")?;
                if let Some(href) = read_more {
                    writeln!(f, "  Read more: {href}")?;
                }
            }
            Details::News { date, description } => {
                writeln!(f, "  {date}")?;
                writeln!(f, "  {description}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SearchPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchPage::Idle => Ok(()),
            SearchPage::Loading => writeln!(f, "Loading..."),
            SearchPage::Failed { message } => writeln!(f, "Search failed: {message}"),
            SearchPage::NoResults => writeln!(f, "No results found."),
            SearchPage::Results(page) => {
                writeln!(f, "{}", page.title)?;
                writeln!(f, "{}", page.summary)?;
                writeln!(f)?;
                for result in &page.results {
                    writeln!(f, "{result}")?;
                }
                if let Some(offset) = page.pagination.previous {
                    write!(f, "[Previous: start={offset}] ")?;
                }
                match page.pagination.next {
                    NextControl::Enabled(offset) => writeln!(f, "[Next: start={offset}]"),
                    NextControl::Disabled => writeln!(f, "[Next: disabled]"),
                }
            }
        }
    }
}

#[test]
fn test_truncate_counts_characters_not_bytes() {
    let description = "é".repeat(301);
    let (text, truncated) = truncate_description(&description);
    assert!(truncated);
    assert_eq!(text.chars().count(), DESCRIPTION_LIMIT + ELLIPSIS.len());
    assert!(text.ends_with("é..."));
}

#[test]
fn test_truncate_boundary() {
    let exact = "a".repeat(DESCRIPTION_LIMIT);
    assert_eq!(truncate_description(&exact), (exact.clone(), false));

    let over = "a".repeat(DESCRIPTION_LIMIT + 1);
    assert_eq!(
        truncate_description(&over),
        (format!("{exact}..."), true)
    );
}
