//! Per-publisher scrape adapters.
//!
//! Every adapter implements [`WebscrapeContent`]: it declares the domain it
//! targets, fetches a page into its soup (plain HTTP, or a browser session
//! when the site needs JavaScript or hides content behind a modal), and
//! extracts a title and body text with publisher-specific selectors.
//! Adapters for sites with a usable search page also implement
//! [`SearchResults`].
//!
//! # Supported Publishers
//!
//! | Publisher | Module | Fetch | Search |
//! |-----------|--------|-------|--------|
//! | AP News | [`apnews`] | HTTP | yes |
//! | CNN | [`cnn`] | HTTP | no |
//! | New York Times | [`nyt`] | browser, modal dismissed | no |
//! | BBC | [`bbc`] | HTTP | no |
//! | MSNBC | [`msnbc`] | HTTP | no |
//! | New York Post | [`nypost`] | HTTP | yes |
//! | Mother Jones | [`motherjones`] | HTTP | yes |
//! | The Center Square | [`centersquare`] | HTTP | no |
//! | The Dispatch | [`dispatch`] | HTTP | no |
//! | OANN | [`oann`] | HTTP | yes |
//! | ABC News | [`abcnews`] | HTTP | no |
//! | Fox News | [`foxnews`] | HTTP, browser for search | yes |
//!
//! Missing elements fail immediately with [`ScrapeError::MissingElement`];
//! there is no fallback extraction.

pub mod abcnews;
pub mod apnews;
pub mod bbc;
pub mod centersquare;
pub mod cnn;
pub mod dispatch;
pub mod fetch;
pub mod foxnews;
pub mod motherjones;
pub mod msnbc;
pub mod nypost;
pub mod nyt;
pub mod oann;

use crate::models::{Article, Document};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::error::Error;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Default cap for [`SearchResults::get_search_results`].
pub const DEFAULT_MAX_RESULTS: usize = 1000;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("no document loaded; make_soup must succeed first")]
    NoDocument,

    #[error("no element matches `{selector}`")]
    MissingElement { selector: String },

    #[error("invalid selector `{0}`")]
    InvalidSelector(String),

    #[error("browser session failed: {0}")]
    Browser(String),
}

/// Mutable state every adapter carries: the parsed page and what was
/// extracted from it.
#[derive(Default)]
pub struct ScrapedPage {
    title: Option<String>,
    content: Option<String>,
    soup: Option<Html>,
}

impl ScrapedPage {
    /// The loaded document, or [`ScrapeError::NoDocument`].
    pub fn soup(&self) -> Result<&Html, ScrapeError> {
        self.soup.as_ref().ok_or(ScrapeError::NoDocument)
    }

    /// Replace the document. Earlier extraction results are discarded.
    pub fn set_html(&mut self, html: &str) {
        self.soup = Some(Html::parse_document(html));
        self.title = None;
        self.content = None;
    }

    /// Store the trimmed text of the first match of `css` as the title.
    pub fn scrape_heading(&mut self, css: &str) -> Result<(), ScrapeError> {
        let title = element_text(first_element(self.soup()?, css)?);
        self.title = Some(title.trim().to_string());
        Ok(())
    }

    /// Store the given paragraphs, joined by single spaces, as the content.
    pub fn set_content(&mut self, paragraphs: Vec<String>) {
        self.content = Some(paragraphs.join(" "));
    }
}

/// Shared extraction contract of all publisher adapters.
pub trait WebscrapeContent {
    /// Publisher domain; comma-separated when a publisher has several.
    fn domain() -> &'static str
    where
        Self: Sized;

    fn page(&self) -> &ScrapedPage;

    fn page_mut(&mut self) -> &mut ScrapedPage;

    /// Fetch `url` and parse it into the soup. Plain HTTP by default.
    async fn make_soup(&mut self, url: &str) -> Result<(), Box<dyn Error>> {
        let html = fetch::fetch_html(url).await?;
        self.page_mut().set_html(&html);
        Ok(())
    }

    /// Use an already-fetched document as the soup.
    fn load_html(&mut self, html: &str) {
        self.page_mut().set_html(html);
    }

    fn scrape_title(&mut self) -> Result<(), ScrapeError>;

    fn scrape_content(&mut self) -> Result<(), ScrapeError>;

    fn title(&self) -> Option<&str> {
        self.page().title.as_deref()
    }

    fn content(&self) -> Option<&str> {
        self.page().content.as_deref()
    }
}

/// Paginated site search, for publishers that offer one.
pub trait SearchResults: WebscrapeContent {
    /// Links of up to `max_results` distinct search hits for `query`.
    async fn get_search_results(&mut self, query: &str, max_results: usize) -> Result<Vec<String>, Box<dyn Error>>;
}

/// Result elements found on one search page and the links they carried.
#[derive(Debug, Default)]
pub struct SearchPage {
    pub found: usize,
    pub links: Vec<String>,
}

/// Spaces become `+`, as the sites' own search forms submit them.
pub fn htmlify_query(query: &str) -> String {
    query.replace(' ', "+")
}

pub fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::InvalidSelector(css.to_string()))
}

/// Concatenated text nodes of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

pub fn first_element<'a>(soup: &'a Html, css: &str) -> Result<ElementRef<'a>, ScrapeError> {
    soup.select(&selector(css)?)
        .next()
        .ok_or_else(|| ScrapeError::MissingElement { selector: css.to_string() })
}

/// Text of every match of `css` in the document.
pub fn all_texts(soup: &Html, css: &str) -> Result<Vec<String>, ScrapeError> {
    Ok(soup.select(&selector(css)?).map(element_text).collect())
}

/// Text of every match of `css` below `scope`.
pub fn texts_within(scope: ElementRef<'_>, css: &str) -> Result<Vec<String>, ScrapeError> {
    Ok(scope.select(&selector(css)?).map(element_text).collect())
}

/// Text of the `<p>` elements that are direct children of `scope`.
pub fn child_paragraphs(scope: ElementRef<'_>) -> Vec<String> {
    scope
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "p")
        .map(element_text)
        .collect()
}

/// `href` of every match of `css`; matches without one are skipped.
pub fn hrefs(soup: &Html, css: &str) -> Result<SearchPage, ScrapeError> {
    let mut page = SearchPage::default();
    for anchor in soup.select(&selector(css)?) {
        page.found += 1;
        if let Some(href) = anchor.value().attr("href") {
            page.links.push(href.to_string());
        }
    }
    Ok(page)
}

/// Walk a site's search pages from `first_page` upward.
///
/// Stops when a page has no result elements, adds no new links, or the
/// collected links reach `max_results`. Links keep first-seen order.
///
/// # Arguments
///
/// * `adapter` - Adapter whose `make_soup` fetches each search page
/// * `max_results` - Cap on the number of links returned
/// * `first_page` - Page number passed to `endpoint` first
/// * `endpoint` - Builds the search URL for a page number
/// * `extract` - Pulls result count and links out of a parsed page
///
/// # Returns
///
/// Distinct links in first-seen order, at most `max_results` of them, or the
/// first fetch or extraction error.
#[instrument(level = "info", skip(adapter, endpoint, extract))]
pub async fn paginate_search<A, E, X>(
    adapter: &mut A,
    max_results: usize,
    first_page: usize,
    endpoint: E,
    extract: X,
) -> Result<Vec<String>, Box<dyn Error>>
where
    A: WebscrapeContent,
    E: Fn(usize) -> String,
    X: Fn(&Html) -> Result<SearchPage, ScrapeError>,
{
    let mut links = Vec::new();
    let mut seen = HashSet::new();
    let mut page = first_page;

    loop {
        let url = endpoint(page);
        adapter.make_soup(&url).await?;
        let result = extract(adapter.page().soup()?)?;
        if result.found == 0 {
            debug!(page, "No results on page; stopping");
            break;
        }

        let before = links.len();
        for link in result.links {
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
        info!(page, new = links.len() - before, total = links.len(), "Collected search page");

        if links.len() >= max_results || links.len() == before {
            break;
        }
        page += 1;
    }

    links.truncate(max_results);
    Ok(links)
}

/// Every publisher with a working adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Publisher {
    ApNews,
    Cnn,
    Nyt,
    Bbc,
    Msnbc,
    NyPost,
    MotherJones,
    CenterSquare,
    Dispatch,
    Oann,
    AbcNews,
    FoxNews,
}

impl Publisher {
    pub const ALL: [Publisher; 12] = [
        Publisher::ApNews,
        Publisher::Cnn,
        Publisher::Nyt,
        Publisher::Bbc,
        Publisher::Msnbc,
        Publisher::NyPost,
        Publisher::MotherJones,
        Publisher::CenterSquare,
        Publisher::Dispatch,
        Publisher::Oann,
        Publisher::AbcNews,
        Publisher::FoxNews,
    ];

    pub fn domain(self) -> &'static str {
        match self {
            Publisher::ApNews => apnews::ApNews::domain(),
            Publisher::Cnn => cnn::Cnn::domain(),
            Publisher::Nyt => nyt::NewYorkTimes::domain(),
            Publisher::Bbc => bbc::Bbc::domain(),
            Publisher::Msnbc => msnbc::Msnbc::domain(),
            Publisher::NyPost => nypost::NewYorkPost::domain(),
            Publisher::MotherJones => motherjones::MotherJones::domain(),
            Publisher::CenterSquare => centersquare::CenterSquare::domain(),
            Publisher::Dispatch => dispatch::Dispatch::domain(),
            Publisher::Oann => oann::Oann::domain(),
            Publisher::AbcNews => abcnews::AbcNews::domain(),
            Publisher::FoxNews => foxnews::FoxNews::domain(),
        }
    }

    /// Whether `host` is one of this publisher's domains or a subdomain of one.
    pub fn matches_host(self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.domain()
            .split(',')
            .map(str::trim)
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")))
    }

    /// The publisher whose adapter handles `url`, if any.
    pub fn for_url(url: &str) -> Option<Publisher> {
        let host = Document::host_of(url);
        Publisher::ALL.into_iter().find(|p| p.matches_host(&host))
    }

    pub fn supports_search(self) -> bool {
        matches!(
            self,
            Publisher::ApNews | Publisher::NyPost | Publisher::MotherJones | Publisher::Oann | Publisher::FoxNews
        )
    }

    /// Fetch `url` and extract its title and content.
    #[instrument(level = "info", skip(self), fields(publisher = ?self))]
    pub async fn scrape(self, url: &str) -> Result<Article, Box<dyn Error>> {
        match self {
            Publisher::ApNews => scrape_with(&mut apnews::ApNews::default(), url).await,
            Publisher::Cnn => scrape_with(&mut cnn::Cnn::default(), url).await,
            Publisher::Nyt => scrape_with(&mut nyt::NewYorkTimes::default(), url).await,
            Publisher::Bbc => scrape_with(&mut bbc::Bbc::default(), url).await,
            Publisher::Msnbc => scrape_with(&mut msnbc::Msnbc::default(), url).await,
            Publisher::NyPost => scrape_with(&mut nypost::NewYorkPost::default(), url).await,
            Publisher::MotherJones => scrape_with(&mut motherjones::MotherJones::default(), url).await,
            Publisher::CenterSquare => scrape_with(&mut centersquare::CenterSquare::default(), url).await,
            Publisher::Dispatch => scrape_with(&mut dispatch::Dispatch::default(), url).await,
            Publisher::Oann => scrape_with(&mut oann::Oann::default(), url).await,
            Publisher::AbcNews => scrape_with(&mut abcnews::AbcNews::default(), url).await,
            Publisher::FoxNews => scrape_with(&mut foxnews::FoxNews::default(), url).await,
        }
    }

    /// Run the publisher's site search.
    #[instrument(level = "info", skip(self), fields(publisher = ?self))]
    pub async fn search(self, query: &str, max_results: usize) -> Result<Vec<String>, Box<dyn Error>> {
        match self {
            Publisher::ApNews => apnews::ApNews::default().get_search_results(query, max_results).await,
            Publisher::NyPost => nypost::NewYorkPost::default().get_search_results(query, max_results).await,
            Publisher::MotherJones => {
                motherjones::MotherJones::default().get_search_results(query, max_results).await
            }
            Publisher::Oann => oann::Oann::default().get_search_results(query, max_results).await,
            Publisher::FoxNews => foxnews::FoxNews::default().get_search_results(query, max_results).await,
            other => Err(format!("{other:?} has no search support").into()),
        }
    }
}

/// Run `make_soup`, `scrape_title` and `scrape_content` on one adapter.
///
/// # Returns
///
/// An [`Article`] with the extracted title and content, or the first error.
/// A missing title or body element fails with [`ScrapeError::MissingElement`].
pub async fn scrape_with<A: WebscrapeContent>(adapter: &mut A, url: &str) -> Result<Article, Box<dyn Error>> {
    adapter.make_soup(url).await?;
    adapter.scrape_title()?;
    adapter.scrape_content()?;
    Ok(Article {
        url: url.to_string(),
        title: adapter.title().unwrap_or_default().to_string(),
        content: adapter.content().unwrap_or_default().to_string(),
    })
}

/// Fill `content` of every document whose URL belongs to a known publisher.
///
/// Documents from unknown hosts, and failed scrapes, keep `content == None`.
/// Returns how many documents were filled.
#[instrument(level = "info", skip_all, fields(documents = documents.len()))]
pub async fn fill_documents(documents: &mut [Document]) -> usize {
    let mut filled = 0;
    for document in documents.iter_mut() {
        let Some(publisher) = Publisher::for_url(&document.url) else {
            debug!(url = %document.url, "No adapter for host");
            continue;
        };
        match publisher.scrape(&document.url).await {
            Ok(article) => {
                document.content = Some(article.content);
                filled += 1;
            }
            Err(e) => warn!(url = %document.url, error = %e, "Scrape failed; leaving content empty"),
        }
    }
    info!(filled, "Filled document contents");
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub;

    #[test]
    fn test_htmlify_query() {
        assert_eq!(htmlify_query("mass shootings"), "mass+shootings");
    }

    #[test]
    fn test_scraped_page_without_document() {
        let page = ScrapedPage::default();
        assert!(matches!(page.soup(), Err(ScrapeError::NoDocument)));
    }

    #[test]
    fn test_scrape_heading_missing_element() {
        let mut page = ScrapedPage::default();
        page.set_html("<html><body><h2>Not it</h2></body></html>");
        match page.scrape_heading("h1") {
            Err(ScrapeError::MissingElement { selector }) => assert_eq!(selector, "h1"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_set_html_resets_results() {
        let mut page = ScrapedPage::default();
        page.set_html("<h1> First </h1>");
        page.scrape_heading("h1").unwrap();
        assert_eq!(page.title.as_deref(), Some("First"));
        page.set_html("<h1>Second</h1>");
        assert!(page.title.is_none());
    }

    #[test]
    fn test_invalid_selector() {
        let soup = Html::parse_document("<p>x</p>");
        assert!(matches!(all_texts(&soup, "p[["), Err(ScrapeError::InvalidSelector(_))));
    }

    #[test]
    fn test_child_paragraphs_skips_nested() {
        let soup = Html::parse_document(
            "<div id=\"body\"><p>one</p><div><p>nested</p></div><p>two</p></div>",
        );
        let body = first_element(&soup, "#body").unwrap();
        assert_eq!(child_paragraphs(body), vec!["one", "two"]);
    }

    #[test]
    fn test_hrefs_counts_anchors_without_href() {
        let soup = Html::parse_document("<a class=\"hit\" href=\"/a\">A</a><a class=\"hit\">B</a>");
        let page = hrefs(&soup, "a.hit").unwrap();
        assert_eq!(page.found, 2);
        assert_eq!(page.links, vec!["/a"]);
    }

    #[test]
    fn test_publisher_for_url() {
        assert_eq!(
            Publisher::for_url("https://www.bbc.co.uk/news/articles/c0"),
            Some(Publisher::Bbc)
        );
        assert_eq!(Publisher::for_url("https://www.bbc.com/news"), Some(Publisher::Bbc));
        assert_eq!(
            Publisher::for_url("https://apnews.com/article/abc"),
            Some(Publisher::ApNews)
        );
        assert_eq!(
            Publisher::for_url("https://edition.cnn.com/2025/01/01/x"),
            Some(Publisher::Cnn)
        );
        assert_eq!(Publisher::for_url("https://notcnn.com/x"), None);
        assert_eq!(Publisher::for_url("https://example.org/"), None);
    }

    #[test]
    fn test_every_publisher_has_a_domain() {
        for publisher in Publisher::ALL {
            assert!(!publisher.domain().is_empty(), "{publisher:?}");
        }
    }

    fn results_page(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|l| format!("<a class=\"hit\" href=\"{l}\">hit</a>"))
            .collect();
        format!("<html><body>{anchors}</body></html>")
    }

    async fn run_search(base: &str, max_results: usize) -> Vec<String> {
        let mut adapter = apnews::ApNews::default();
        paginate_search(
            &mut adapter,
            max_results,
            1,
            |page| format!("{base}/search?p={page}"),
            |soup| hrefs(soup, "a.hit"),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_paginate_stops_on_empty_page() {
        let (base, urls, handle) = spawn_stub(vec![
            (200, results_page(&["/a", "/b"])),
            (200, results_page(&["/c"])),
            (200, results_page(&[])),
        ]);
        let links = run_search(&base, 10).await;
        assert_eq!(links, vec!["/a", "/b", "/c"]);
        assert_eq!(urls.recv().unwrap(), "/search?p=1");
        assert_eq!(urls.recv().unwrap(), "/search?p=2");
        assert_eq!(urls.recv().unwrap(), "/search?p=3");
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_paginate_stops_when_page_adds_nothing() {
        let (base, urls, handle) = spawn_stub(vec![
            (200, results_page(&["/a", "/b", "/a"])),
            (200, results_page(&["/b", "/a"])),
        ]);
        let links = run_search(&base, 10).await;
        assert_eq!(links, vec!["/a", "/b"]);
        handle.join().unwrap();
        assert_eq!(urls.iter().count(), 2);
    }

    #[tokio::test]
    async fn test_paginate_truncates_at_cap() {
        let (base, urls, handle) = spawn_stub(vec![
            (200, results_page(&["/a", "/b"])),
            (200, results_page(&["/b", "/c", "/d"])),
        ]);
        let links = run_search(&base, 3).await;
        assert_eq!(links, vec!["/a", "/b", "/c"]);
        handle.join().unwrap();
        assert_eq!(urls.iter().count(), 2);
    }

    #[tokio::test]
    async fn test_scrape_with_loads_soup() {
        let (base, _urls, handle) = spawn_stub(vec![(
            200,
            "<html><body><h1 class=\"Page-headline\">Headline</h1>\
             <div class=\"RichTextStoryBody RichTextBody\"><p>Body text.</p></div></body></html>"
                .to_string(),
        )]);
        let mut adapter = apnews::ApNews::default();
        let article = scrape_with(&mut adapter, &format!("{base}/article/x")).await.unwrap();
        assert!(adapter.page().soup().is_ok());
        assert_eq!(article.title, "Headline");
        assert_eq!(article.content, "Body text.");
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_search_unsupported_publisher() {
        let err = Publisher::Cnn.search("anything", 5).await.unwrap_err();
        assert!(err.to_string().contains("no search support"));
    }

    #[tokio::test]
    async fn test_fill_documents_skips_unknown_hosts() {
        let mut docs = vec![Document {
            title: "t".to_string(),
            description: String::new(),
            timestamp: String::new(),
            source: "example.org".to_string(),
            url: "https://example.org/story".to_string(),
            content: None,
        }];
        assert_eq!(fill_documents(&mut docs).await, 0);
        assert!(docs[0].content.is_none());
    }
}
