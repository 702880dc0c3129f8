//! REST request builders for the news and comment APIs.
//!
//! Every builder accumulates query parameters through chained setters and
//! fires exactly one GET per [`ApiGetRequest::get`] call. Parameters are
//! cleared after each request, so a builder can be reused for the next page
//! without leaking the previous query.
//!
//! # Endpoints
//!
//! | Builder | Endpoint | Key parameter |
//! |---------|----------|---------------|
//! | [`NewsApiEverything`] | `newsapi.org/v2/everything` | `apiKey` |
//! | [`NewsApiHeadlines`] | `newsapi.org/v2/top-headlines` | `apiKey` |
//! | [`NytArticleSearch`] | `api.nytimes.com/svc/search/v2/articlesearch.json` | `api-key` |
//! | [`YouTubeCommentThreads`] | `googleapis.com/youtube/v3/commentThreads` | `key` |
//!
//! # Results
//!
//! A 200 response becomes [`ApiOutcome::Success`] carrying either the raw
//! JSON or the output of the injected [`ParseJson`] implementation. Any other
//! status becomes [`ApiOutcome::Failure`] so the caller can branch on it.
//! Transport errors are returned as `Err`. There is no retry.

use crate::models::Document;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

pub const NEWSAPI_EVERYTHING_ENDPOINT: &str = "https://newsapi.org/v2/everything";
pub const NEWSAPI_HEADLINES_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";
pub const NYT_ARTICLE_SEARCH_ENDPOINT: &str = "https://api.nytimes.com/svc/search/v2/articlesearch.json";
pub const YOUTUBE_COMMENT_THREADS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/commentThreads";

/// Read an API key from a text file.
///
/// # Arguments
///
/// * `path` - File holding the key and nothing else
///
/// # Returns
///
/// The key with surrounding whitespace (usually a trailing newline) trimmed.
/// A missing file yields an [`std::io::ErrorKind::NotFound`] error.
pub fn read_api_key_from_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    let key = std::fs::read_to_string(path.as_ref())?;
    Ok(key.trim().to_string())
}

/// Turns a successful JSON response into documents.
pub trait ParseJson {
    fn parse(&self, json: &Value) -> Result<Vec<Document>, Box<dyn Error>>;
}

/// Parser for NewsAPI `everything` and `top-headlines` responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NewsApiParser;

#[derive(Deserialize)]
struct NewsApiBody {
    articles: Vec<NewsApiArticle>,
}

#[derive(Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    url: String,
}

impl ParseJson for NewsApiParser {
    fn parse(&self, json: &Value) -> Result<Vec<Document>, Box<dyn Error>> {
        let body = NewsApiBody::deserialize(json)?;
        Ok(body
            .articles
            .into_iter()
            .map(|a| Document {
                title: a.title.unwrap_or_default(),
                description: a.description.unwrap_or_default(),
                timestamp: a.published_at.unwrap_or_default(),
                source: Document::host_of(&a.url),
                url: a.url,
                content: None,
            })
            .collect())
    }
}

/// Parser for NYT article search responses (`response.docs`).
#[derive(Debug, Default, Clone, Copy)]
pub struct NytParser;

#[derive(Deserialize)]
struct NytBody {
    response: NytResponse,
}

#[derive(Deserialize)]
struct NytResponse {
    #[serde(default)]
    docs: Vec<NytDoc>,
}

#[derive(Deserialize)]
struct NytDoc {
    headline: Option<NytHeadline>,
    #[serde(rename = "abstract")]
    summary: Option<String>,
    pub_date: Option<String>,
    web_url: String,
}

#[derive(Deserialize)]
struct NytHeadline {
    main: Option<String>,
}

impl ParseJson for NytParser {
    fn parse(&self, json: &Value) -> Result<Vec<Document>, Box<dyn Error>> {
        let body = NytBody::deserialize(json)?;
        Ok(body
            .response
            .docs
            .into_iter()
            .map(|d| Document {
                title: d.headline.and_then(|h| h.main).unwrap_or_default(),
                description: d.summary.unwrap_or_default(),
                timestamp: d.pub_date.unwrap_or_default(),
                source: Document::host_of(&d.web_url),
                url: d.web_url,
                content: None,
            })
            .collect())
    }
}

/// Body of a successful response.
#[derive(Debug)]
pub enum Payload {
    /// No parser was configured.
    Json(Value),
    /// Output of the configured parser.
    Documents(Vec<Document>),
}

/// A non-200 response, kept for the caller to inspect.
#[derive(Debug, Clone)]
pub struct FailedResponse {
    pub status: u16,
    /// Canonical reason phrase, e.g. `Unauthorized`.
    pub reason: String,
    pub url: String,
    pub body: String,
}

impl fmt::Display for FailedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.reason)
    }
}

/// Outcome of one request: the `(success, payload)` pair as an enum.
#[derive(Debug)]
pub enum ApiOutcome {
    Success(Payload),
    Failure(FailedResponse),
}

impl ApiOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success(_))
    }
}

/// Common contract of all request builders.
pub trait ApiGetRequest {
    /// Fire the request with the accumulated parameters, then clear them.
    ///
    /// # Returns
    ///
    /// * `Ok(ApiOutcome::Success)` for a 200, with parsed documents when a
    ///   parser is set and the raw JSON otherwise
    /// * `Ok(ApiOutcome::Failure)` for any other status
    /// * `Err` for transport errors, undecodable bodies and parser errors
    async fn get(&mut self) -> Result<ApiOutcome, Box<dyn Error>>;

    /// Full URL of the last request, `None` before the first one.
    fn last_request(&self) -> Option<&str>;
}

/// Shared state behind every builder.
struct GetRequest {
    api_key: String,
    key_param: &'static str,
    endpoint: String,
    parser: Option<Box<dyn ParseJson>>,
    params: BTreeMap<&'static str, String>,
    last_url: Option<String>,
    client: reqwest::Client,
}

impl fmt::Debug for GetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetRequest")
            .field("endpoint", &self.endpoint)
            .field("params", &self.params.keys().collect::<Vec<_>>())
            .field("has_parser", &self.parser.is_some())
            .finish()
    }
}

impl GetRequest {
    fn new(api_key: impl Into<String>, key_param: &'static str, endpoint: &str) -> Self {
        Self {
            api_key: api_key.into(),
            key_param,
            endpoint: endpoint.to_string(),
            parser: None,
            params: BTreeMap::new(),
            last_url: None,
            client: reqwest::Client::new(),
        }
    }

    fn set(&mut self, key: &'static str, value: impl ToString) {
        self.params.insert(key, value.to_string());
    }

    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint))]
    async fn send(&mut self) -> Result<ApiOutcome, Box<dyn Error>> {
        let mut params = std::mem::take(&mut self.params);
        debug!(params = ?params.keys().collect::<Vec<_>>(), "Sending request");
        params.insert(self.key_param, self.api_key.clone());

        let response = self.client.get(&self.endpoint).query(&params).send().await?;
        let url = response.url().to_string();
        self.last_url = Some(url.clone());

        let status = response.status();
        if status == StatusCode::OK {
            let json: Value = response.json().await?;
            let payload = match &self.parser {
                Some(parser) => {
                    let documents = parser.parse(&json)?;
                    info!(count = documents.len(), "Parsed documents");
                    Payload::Documents(documents)
                }
                None => Payload::Json(json),
            };
            return Ok(ApiOutcome::Success(payload));
        }

        let failed = FailedResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            url,
            body: response.text().await.unwrap_or_default(),
        };
        warn!(status = failed.status, reason = %failed.reason, "Request failed");
        Ok(ApiOutcome::Failure(failed))
    }
}

/// Builder for the NewsAPI `everything` endpoint.
#[derive(Debug)]
pub struct NewsApiEverything {
    request: GetRequest,
}

impl NewsApiEverything {
    /// Builder for `api_key`, pointing at the public endpoint with no parser.
    ///
    /// # Arguments
    ///
    /// * `api_key` - NewsAPI key, sent as the `apiKey` query parameter
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            request: GetRequest::new(api_key, "apiKey", NEWSAPI_EVERYTHING_ENDPOINT),
        }
    }

    /// Parse 200 responses into documents instead of returning raw JSON.
    pub fn with_parser(mut self, parser: impl ParseJson + 'static) -> Self {
        self.request.parser = Some(Box::new(parser));
        self
    }

    /// Point the builder at another base URL (mirrors, local stubs).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.request.endpoint = endpoint.to_string();
        self
    }

    /// Keywords or phrases to search for.
    pub fn q(&mut self, q: &str) -> &mut Self {
        self.request.set("q", q);
        self
    }

    /// Restrict the search to fields, comma-separated (`title,description,content`).
    pub fn search_in(&mut self, fields: &str) -> &mut Self {
        self.request.set("searchIn", fields);
        self
    }

    /// Source ids, comma-separated (`bbc-news,the-verge`).
    pub fn sources(&mut self, sources: &str) -> &mut Self {
        self.request.set("sources", sources);
        self
    }

    /// Domains to restrict the search to, comma-separated.
    pub fn domains(&mut self, domains: &str) -> &mut Self {
        self.request.set("domains", domains);
        self
    }

    /// Domains to remove from the results, comma-separated.
    pub fn exclude_domains(&mut self, domains: &str) -> &mut Self {
        self.request.set("excludeDomains", domains);
        self
    }

    /// Oldest allowed publication date, sent as `YYYY-MM-DD`.
    pub fn from_date(&mut self, date: NaiveDate) -> &mut Self {
        self.request.set("from", date.format("%Y-%m-%d"));
        self
    }

    /// Newest allowed publication date, sent as `YYYY-MM-DD`.
    pub fn to_date(&mut self, date: NaiveDate) -> &mut Self {
        self.request.set("to", date.format("%Y-%m-%d"));
        self
    }

    /// 2-letter ISO-639-1 language code.
    pub fn language(&mut self, lang: &str) -> &mut Self {
        self.request.set("language", lang);
        self
    }

    /// `relevancy`, `popularity` or `publishedAt`.
    pub fn sort_by(&mut self, sort: &str) -> &mut Self {
        self.request.set("sortBy", sort);
        self
    }

    /// Results per page, up to 100.
    pub fn page_size(&mut self, size: u32) -> &mut Self {
        self.request.set("pageSize", size);
        self
    }

    /// One-based result page.
    pub fn page(&mut self, num: u32) -> &mut Self {
        self.request.set("page", num);
        self
    }
}

impl ApiGetRequest for NewsApiEverything {
    async fn get(&mut self) -> Result<ApiOutcome, Box<dyn Error>> {
        self.request.send().await
    }

    fn last_request(&self) -> Option<&str> {
        self.request.last_url.as_deref()
    }
}

/// Builder for the NewsAPI `top-headlines` endpoint.
///
/// NewsAPI rejects `country`/`category` combined with `sources`.
#[derive(Debug)]
pub struct NewsApiHeadlines {
    request: GetRequest,
}

impl NewsApiHeadlines {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            request: GetRequest::new(api_key, "apiKey", NEWSAPI_HEADLINES_ENDPOINT),
        }
    }

    pub fn with_parser(mut self, parser: impl ParseJson + 'static) -> Self {
        self.request.parser = Some(Box::new(parser));
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.request.endpoint = endpoint.to_string();
        self
    }

    /// 2-letter ISO 3166-1 country code.
    pub fn country(&mut self, country: &str) -> &mut Self {
        self.request.set("country", country);
        self
    }

    pub fn category(&mut self, category: &str) -> &mut Self {
        self.request.set("category", category);
        self
    }

    pub fn sources(&mut self, sources: &str) -> &mut Self {
        self.request.set("sources", sources);
        self
    }

    pub fn q(&mut self, q: &str) -> &mut Self {
        self.request.set("q", q);
        self
    }

    pub fn page_size(&mut self, size: u32) -> &mut Self {
        self.request.set("pageSize", size);
        self
    }

    pub fn page(&mut self, num: u32) -> &mut Self {
        self.request.set("page", num);
        self
    }
}

impl ApiGetRequest for NewsApiHeadlines {
    async fn get(&mut self) -> Result<ApiOutcome, Box<dyn Error>> {
        self.request.send().await
    }

    fn last_request(&self) -> Option<&str> {
        self.request.last_url.as_deref()
    }
}

/// Builder for the NYT article search endpoint.
#[derive(Debug)]
pub struct NytArticleSearch {
    request: GetRequest,
}

impl NytArticleSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            request: GetRequest::new(api_key, "api-key", NYT_ARTICLE_SEARCH_ENDPOINT),
        }
    }

    pub fn with_parser(mut self, parser: impl ParseJson + 'static) -> Self {
        self.request.parser = Some(Box::new(parser));
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.request.endpoint = endpoint.to_string();
        self
    }

    pub fn q(&mut self, query: &str) -> &mut Self {
        self.request.set("q", query);
        self
    }

    /// Zero-based result page (10 results each).
    pub fn page(&mut self, page: u32) -> &mut Self {
        self.request.set("page", page);
        self
    }

    /// Oldest publication date, sent as `YYYYMMDD`.
    pub fn begin_date(&mut self, date: NaiveDate) -> &mut Self {
        self.request.set("begin_date", date.format("%Y%m%d"));
        self
    }

    /// Newest publication date, sent as `YYYYMMDD`.
    pub fn end_date(&mut self, date: NaiveDate) -> &mut Self {
        self.request.set("end_date", date.format("%Y%m%d"));
        self
    }

    /// `newest`, `oldest` or `relevance`.
    pub fn sort(&mut self, sort: &str) -> &mut Self {
        self.request.set("sort", sort);
        self
    }
}

impl ApiGetRequest for NytArticleSearch {
    async fn get(&mut self) -> Result<ApiOutcome, Box<dyn Error>> {
        self.request.send().await
    }

    fn last_request(&self) -> Option<&str> {
        self.request.last_url.as_deref()
    }
}

/// Builder for the YouTube Data API `commentThreads` endpoint.
#[derive(Debug)]
pub struct YouTubeCommentThreads {
    request: GetRequest,
}

impl YouTubeCommentThreads {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            request: GetRequest::new(api_key, "key", YOUTUBE_COMMENT_THREADS_ENDPOINT),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.request.endpoint = endpoint.to_string();
        self
    }

    /// Resource parts to return, usually `snippet`.
    pub fn part(&mut self, part: &str) -> &mut Self {
        self.request.set("part", part);
        self
    }

    /// Video whose comment threads are listed.
    pub fn video_id(&mut self, video_id: &str) -> &mut Self {
        self.request.set("videoId", video_id);
        self
    }

    /// Threads per page, 1 to 100.
    pub fn max_results(&mut self, max: u32) -> &mut Self {
        self.request.set("maxResults", max);
        self
    }

    /// `nextPageToken` from the previous response.
    pub fn page_token(&mut self, token: &str) -> &mut Self {
        self.request.set("pageToken", token);
        self
    }
}

impl ApiGetRequest for YouTubeCommentThreads {
    async fn get(&mut self) -> Result<ApiOutcome, Box<dyn Error>> {
        self.request.send().await
    }

    fn last_request(&self) -> Option<&str> {
        self.request.last_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub;
    use serde_json::json;

    const NEWSAPI_BODY: &str = r#"{
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {
                "source": {"id": null, "name": "BBC News"},
                "title": "First headline",
                "description": null,
                "publishedAt": "2025-02-14T10:00:00Z",
                "url": "https://www.bbc.co.uk/news/articles/abc"
            },
            {
                "source": {"id": "cnn", "name": "CNN"},
                "title": "Second headline",
                "description": "Teaser",
                "publishedAt": "2025-02-14T11:00:00Z",
                "url": "https://edition.cnn.com/2025/02/14/politics/x"
            }
        ]
    }"#;

    #[test]
    fn test_read_api_key_from_missing_file() {
        let err = read_api_key_from_file("").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_api_key_trims_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        std::fs::write(&path, "abc123\n").unwrap();
        assert_eq!(read_api_key_from_file(&path).unwrap(), "abc123");
    }

    #[test]
    fn test_newsapi_parser() {
        let json: Value = serde_json::from_str(NEWSAPI_BODY).unwrap();
        let docs = NewsApiParser.parse(&json).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "First headline");
        assert_eq!(docs[0].description, "");
        assert_eq!(docs[0].source, "www.bbc.co.uk");
        assert_eq!(docs[1].description, "Teaser");
        assert_eq!(docs[1].timestamp, "2025-02-14T11:00:00Z");
        assert!(docs.iter().all(|d| d.content.is_none()));
    }

    #[test]
    fn test_newsapi_parser_rejects_missing_articles() {
        assert!(NewsApiParser.parse(&json!({"status": "ok"})).is_err());
    }

    #[test]
    fn test_nyt_parser() {
        let json = json!({
            "status": "OK",
            "response": {
                "docs": [{
                    "abstract": "Summary text",
                    "web_url": "https://www.nytimes.com/2025/02/14/us/story.html",
                    "headline": {"main": "Story headline"},
                    "pub_date": "2025-02-14T12:00:00+0000",
                    "source": "The New York Times"
                }]
            }
        });
        let docs = NytParser.parse(&json).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "Story headline");
        assert_eq!(docs[0].description, "Summary text");
        assert_eq!(docs[0].source, "www.nytimes.com");
    }

    #[tokio::test]
    async fn test_everything_success_with_parser_and_params_cleared() {
        let (base, urls, handle) =
            spawn_stub(vec![(200, NEWSAPI_BODY.to_string()), (200, "{}".to_string())]);
        let mut news = NewsApiEverything::new("secret")
            .with_parser(NewsApiParser)
            .with_endpoint(&format!("{base}/v2/everything"));
        assert!(news.last_request().is_none());

        let outcome = news
            .q("mass shooting")
            .from_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
            .page(2)
            .get()
            .await
            .unwrap();
        match outcome {
            ApiOutcome::Success(Payload::Documents(docs)) => assert_eq!(docs.len(), 2),
            other => panic!("unexpected outcome: {other:?}"),
        }
        let first = urls.recv().unwrap();
        assert!(first.contains("q=mass+shooting"));
        assert!(first.contains("from=2025-02-01"));
        assert!(first.contains("page=2"));
        assert!(first.contains("apiKey=secret"));
        assert!(news.last_request().unwrap().contains("/v2/everything?"));

        // Second request carries only the key; the parser fails on `{}`.
        let second = news.get().await;
        assert!(second.is_err());
        let second_url = urls.recv().unwrap();
        assert!(!second_url.contains("q="));
        assert!(second_url.contains("apiKey=secret"));
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_headlines_without_parser_returns_raw_json() {
        let (base, urls, handle) = spawn_stub(vec![(200, NEWSAPI_BODY.to_string())]);
        let mut headlines = NewsApiHeadlines::new("k").with_endpoint(&base);
        let outcome = headlines.country("us").category("business").get().await.unwrap();
        match outcome {
            ApiOutcome::Success(Payload::Json(value)) => {
                assert_eq!(value["articles"].as_array().unwrap().len(), 2)
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let url = urls.recv().unwrap();
        assert!(url.contains("country=us"));
        assert!(url.contains("category=business"));
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_non_200_is_failure() {
        let (base, urls, handle) = spawn_stub(vec![(
            401,
            r#"{"status":"error","code":"apiKeyInvalid"}"#.to_string(),
        )]);
        let mut nyt = NytArticleSearch::new("bad").with_parser(NytParser).with_endpoint(&base);
        let outcome = nyt.q("election").page(0).get().await.unwrap();
        assert!(!outcome.is_success());
        match outcome {
            ApiOutcome::Failure(failed) => {
                assert_eq!(failed.status, 401);
                assert_eq!(failed.reason, "Unauthorized");
                assert!(failed.body.contains("apiKeyInvalid"));
                assert_eq!(failed.to_string(), "401 Unauthorized");
                assert!(failed.url.starts_with(&base));
                assert!(failed.url.contains("q=election"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(urls.recv().unwrap().contains("api-key=bad"));
        handle.join().unwrap();
    }
}
