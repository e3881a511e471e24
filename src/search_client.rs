use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::Url;
use serde::{Deserialize, Deserializer};

use crate::config::Config;
use crate::data_models::{JobResult, NewsResult, SearchResponse, SearchResult, SearchType};
use crate::errors::{FetchError, FetchResult};

/// Anything able to answer one page of a search. A single attempt per call;
/// retries are the caller's business.
pub trait SearchBackend: Send + Sync {
    fn search(
        &self,
        term: &str,
        search_type: SearchType,
        offset: u64,
    ) -> impl Future<Output = FetchResult<SearchResponse>> + Send;
}

/// HTTP client for `GET /search?term=..&type=..&start=..`.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl SearchClient {
    pub fn new(base_url: &str, timeout: Duration) -> FetchResult<Self> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join("search"))
            .map_err(|_| FetchError::InvalidEndpoint(base_url.to_string()))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(SearchClient { http, endpoint })
    }

    pub fn from_config(config: &Config) -> FetchResult<Self> {
        Self::new(&config.search_api_url, config.timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_page(
        &self,
        term: &str,
        search_type: SearchType,
        offset: u64,
    ) -> FetchResult<SearchResponse> {
        let started = Instant::now();
        let start_param = offset.to_string();
        let res = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("term", term),
                ("type", search_type.as_str()),
                ("start", start_param.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: backend_error_message(&body),
            });
        }

        let raw: RawSearchResponse = serde_json::from_str(&body)?;
        let response = raw.normalize(search_type);
        log::debug!(
            "search {search_type} {term:?} start={offset}: {} of {} results in {}ms",
            response.results.len(),
            response.total,
            started.elapsed().as_millis()
        );
        Ok(response)
    }
}

impl SearchBackend for SearchClient {
    fn search(
        &self,
        term: &str,
        search_type: SearchType,
        offset: u64,
    ) -> impl Future<Output = FetchResult<SearchResponse>> + Send {
        self.fetch_page(term, search_type, offset)
    }
}

/// Extracts `{"error": "..."}` from a failed response body, if present.
fn backend_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.is_empty())
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    results: Vec<RawResult>,
    total: u64,
}

/// Union of the job and news record shapes. The backend serializes
/// dataframe rows, so any field may be missing, null or non-string.
#[derive(Debug, Default, Deserialize)]
struct RawResult {
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    company: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    job_employment_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    job_seniority_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    date: Option<String>,
}

impl RawSearchResponse {
    fn normalize(self, search_type: SearchType) -> SearchResponse {
        SearchResponse {
            results: self
                .results
                .into_iter()
                .map(|raw| raw.normalize(search_type))
                .collect(),
            total: self.total,
        }
    }
}

impl RawResult {
    fn normalize(self, search_type: SearchType) -> SearchResult {
        // news rows carry `link` instead of `url`
        let url = non_empty(self.url).or_else(|| non_empty(self.link));
        match search_type {
            SearchType::Jobs => SearchResult::Job(JobResult {
                title: self.title.unwrap_or_default(),
                url,
                company: self.company.unwrap_or_default(),
                location: self.location.unwrap_or_default(),
                employment_type: self.job_employment_type.unwrap_or_default(),
                seniority_level: self.job_seniority_level.unwrap_or_default(),
                description: self.description.unwrap_or_default(),
            }),
            SearchType::News => SearchResult::News(NewsResult {
                title: self.title.unwrap_or_default(),
                url,
                date: self.date.unwrap_or_default(),
                description: self.description.unwrap_or_default(),
            }),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str, search_type: SearchType) -> SearchResponse {
        serde_json::from_str::<RawSearchResponse>(body)
            .unwrap()
            .normalize(search_type)
    }

    #[test]
    fn test_news_link_becomes_url() {
        let response = decode(
            r#"{"results":[{"title":"Markets rally","link":"https://n.example/1","date":"2024-01-02","description":"Stocks up","type":"news"}],"total":1}"#,
            SearchType::News,
        );
        assert_eq!(
            response.results,
            vec![SearchResult::News(NewsResult {
                title: "Markets rally".to_string(),
                url: Some("https://n.example/1".to_string()),
                date: "2024-01-02".to_string(),
                description: "Stocks up".to_string(),
            })]
        );
    }

    #[test]
    fn test_url_wins_over_link_unless_empty() {
        let response = decode(
            r#"{"results":[{"title":"a","url":"https://u","link":"https://l"},{"title":"b","url":"","link":"https://l"}],"total":2}"#,
            SearchType::News,
        );
        assert_eq!(response.results[0].url(), Some("https://u"));
        assert_eq!(response.results[1].url(), Some("https://l"));
    }

    #[test]
    fn test_job_fields_are_mapped() {
        let response = decode(
            r#"{"results":[{"title":"Rust Engineer","url":"https://j.example/1","company":"Acme","location":"Berlin","job_employment_type":"Full-time","job_seniority_level":"Mid-Senior level","description":"Build things","logo":"https://img","type":"job"}],"total":42}"#,
            SearchType::Jobs,
        );
        assert_eq!(response.total, 42);
        let SearchResult::Job(job) = &response.results[0] else {
            panic!("expected a job result");
        };
        assert_eq!(job.company, "Acme");
        assert_eq!(job.location, "Berlin");
        assert_eq!(job.employment_type, "Full-time");
        assert_eq!(job.seniority_level, "Mid-Senior level");
    }

    #[test]
    fn test_null_and_numeric_fields_are_tolerated() {
        let response = decode(
            r#"{"results":[{"title":null,"date":20240102,"description":null}],"total":1}"#,
            SearchType::News,
        );
        let SearchResult::News(news) = &response.results[0] else {
            panic!("expected a news result");
        };
        assert_eq!(news.title, "");
        assert_eq!(news.date, "20240102");
        assert_eq!(news.url, None);
    }

    #[test]
    fn test_missing_total_is_a_decode_error() {
        assert!(serde_json::from_str::<RawSearchResponse>(r#"{"results":[]}"#).is_err());
    }

    #[test]
    fn test_backend_error_message() {
        assert_eq!(
            backend_error_message(r#"{"error": "Term is required"}"#),
            Some("Term is required".to_string())
        );
        assert_eq!(backend_error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_endpoint_appends_search_path() {
        let client = SearchClient::new("http://127.0.0.1:5000", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:5000/search");
        assert!(SearchClient::new("not a url", Duration::from_secs(1)).is_err());
    }
}
