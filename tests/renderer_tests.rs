use scout::data_models::{JobResult, NewsResult, SearchResult, SearchType};
use scout::pagination::{NextControl, NextPolicy};
use scout::query_state::QueryState;
use scout::renderer::{
    DESCRIPTION_LIMIT, Details, RenderedResult, ResultsPage, Title, render, summary_line,
};

fn job(description: &str, url: Option<&str>) -> SearchResult {
    SearchResult::Job(JobResult {
        title: "Backend Engineer".to_string(),
        url: url.map(str::to_string),
        company: "Acme".to_string(),
        location: "Lisbon".to_string(),
        employment_type: "Full-time".to_string(),
        seniority_level: "Entry level".to_string(),
        description: description.to_string(),
    })
}

fn news(url: Option<&str>) -> SearchResult {
    SearchResult::News(NewsResult {
        title: "Hiring picks up".to_string(),
        url: url.map(str::to_string),
        date: "2024-05-01".to_string(),
        description: "x".repeat(1000),
    })
}

fn job_details(rendered: &RenderedResult) -> (&str, &str, &str, Option<&str>) {
    match &rendered.details {
        Details::Job {
            company_line,
            employment_line,
            description,
            read_more,
        } => (
            company_line.as_str(),
            employment_line.as_str(),
            description.as_str(),
            read_more.as_deref(),
        ),
        Details::News { .. } => panic!("expected job details"),
    }
}

#[test]
fn test_long_job_description_is_truncated_with_read_more() {
    let description = "d".repeat(350);
    let rendered = render(&job(&description, Some("https://jobs.example/1")));

    let (_, _, text, read_more) = job_details(&rendered);
    assert_eq!(text, format!("{}...", "d".repeat(300)));
    assert_eq!(text.chars().count(), DESCRIPTION_LIMIT + 3);
    assert_eq!(read_more, Some("https://jobs.example/1"));
}

#[test]
fn test_short_job_description_is_untouched() {
    let description = "d".repeat(200);
    let rendered = render(&job(&description, Some("https://jobs.example/1")));

    let (_, _, text, read_more) = job_details(&rendered);
    assert_eq!(text, description);
    assert_eq!(read_more, None);
}

#[test]
fn test_truncation_threshold_is_exactly_three_hundred() {
    let at_limit = render(&job(&"d".repeat(300), Some("https://j")));
    assert_eq!(job_details(&at_limit).3, None);

    let past_limit = render(&job(&"d".repeat(301), Some("https://j")));
    assert_eq!(job_details(&past_limit).3, Some("https://j"));
}

#[test]
fn test_job_lines_join_with_bullet() {
    let rendered = render(&job("short", None));
    let (company_line, employment_line, _, _) = job_details(&rendered);
    assert_eq!(company_line, "Acme \u{2022} Lisbon");
    assert_eq!(employment_line, "Full-time \u{2022} Entry level");
}

#[test]
fn test_news_shows_date_and_full_description() {
    let rendered = render(&news(Some("https://news.example/a")));
    match rendered.details {
        Details::News { date, description } => {
            assert_eq!(date, "2024-05-01");
            assert_eq!(description.len(), 1000);
        }
        Details::Job { .. } => panic!("expected news details"),
    }
}

#[test]
fn test_title_links_to_url_when_present() {
    let rendered = render(&news(Some("https://news.example/a")));
    assert_eq!(
        rendered.title,
        Title::Link {
            text: "Hiring picks up".to_string(),
            href: "https://news.example/a".to_string(),
        }
    );
}

#[test]
fn test_title_is_plain_text_without_url() {
    let rendered = render(&news(None));
    assert_eq!(rendered.title, Title::Plain("Hiring picks up".to_string()));

    let long_job = render(&job(&"d".repeat(400), None));
    assert_eq!(long_job.title, Title::Plain("Backend Engineer".to_string()));
    assert_eq!(job_details(&long_job).3, None);
}

#[test]
fn test_results_page_header_and_pagination() {
    let query = QueryState::new("engineer", SearchType::Jobs).with_offset(10);
    let results = vec![job("a", None), job("b", None)];
    let page = ResultsPage::new(&query, &results, 12, NextPolicy::GuardByTotal);

    assert_eq!(page.title, "engineer - jobs results");
    assert_eq!(page.summary, "Showing 2 out of 12 jobs results");
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.pagination.previous, Some(0));
    assert_eq!(page.pagination.next, NextControl::Disabled);
}

#[test]
fn test_summary_line_for_news() {
    assert_eq!(
        summary_line(10, 57, SearchType::News),
        "Showing 10 out of 57 news results"
    );
}
