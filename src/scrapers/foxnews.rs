//! Fox News adapter.
//!
//! Articles are plain HTML. Search is rendered client-side and grows by ten
//! results per click on a "load more" control, so it runs in a browser
//! session: click until enough results are loaded or the control stops
//! responding twice, then parse the rendered page.

use super::fetch::BrowserSession;
use super::{
    ScrapeError, ScrapedPage, SearchPage, SearchResults, WebscrapeContent, child_paragraphs,
    first_element, selector,
};
use scraper::Html;
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

const TITLE: &str = "h1[class*=\"headline\"]";
const BODY: &str = "div.article-body";
const LOAD_MORE: &str = "/html/body/div/div/div/div[2]/div[2]/div/div[3]/div[2]";
const RESULT_TITLE: &str = "h2.title";
const RESULTS_PER_CLICK: usize = 10;

#[derive(Default)]
pub struct FoxNews {
    page: ScrapedPage,
}

impl WebscrapeContent for FoxNews {
    fn domain() -> &'static str {
        "foxnews.com"
    }

    fn page(&self) -> &ScrapedPage {
        &self.page
    }

    fn page_mut(&mut self) -> &mut ScrapedPage {
        &mut self.page
    }

    fn scrape_title(&mut self) -> Result<(), ScrapeError> {
        self.page.scrape_heading(TITLE)
    }

    fn scrape_content(&mut self) -> Result<(), ScrapeError> {
        let body = first_element(self.page.soup()?, BODY)?;
        let paragraphs = child_paragraphs(body);
        self.page.set_content(paragraphs);
        Ok(())
    }
}

pub fn search_url(query: &str) -> String {
    format!(
        "https://www.foxnews.com/search-results/search#q={}",
        urlencoding::encode(query)
    )
}

fn search_page(soup: &Html) -> Result<SearchPage, ScrapeError> {
    let anchor = selector("a")?;
    let mut page = SearchPage::default();
    for title in soup.select(&selector(RESULT_TITLE)?) {
        page.found += 1;
        if let Some(href) = title.select(&anchor).next().and_then(|a| a.value().attr("href")) {
            page.links.push(href.to_string());
        }
    }
    Ok(page)
}

/// Click "load more" until `max_results` are showing or clicking fails twice.
async fn load_results(session: &BrowserSession, url: &str, max_results: usize) -> Result<String, ScrapeError> {
    let page = session.open(url).await?;
    let button = page
        .find_xpath(LOAD_MORE)
        .await
        .map_err(|e| ScrapeError::Browser(e.to_string()))?;

    let mut loaded = 0;
    let mut failed_once = false;
    loop {
        match button.click().await {
            Ok(_) => {
                loaded += RESULTS_PER_CLICK;
                debug!(loaded, "Loaded more results");
                if loaded >= max_results {
                    break;
                }
            }
            Err(e) if !failed_once => {
                debug!(error = %e, "Load more not clickable; retrying once");
                failed_once = true;
            }
            Err(_) => break,
        }
        sleep(Duration::from_secs(1)).await;
    }

    page.content().await.map_err(|e| ScrapeError::Browser(e.to_string()))
}

impl SearchResults for FoxNews {
    #[instrument(level = "info", skip(self))]
    async fn get_search_results(&mut self, query: &str, max_results: usize) -> Result<Vec<String>, Box<dyn Error>> {
        let session = BrowserSession::launch().await?;
        let rendered = load_results(&session, &search_url(query), max_results).await;
        session.close().await?;

        self.page.set_html(&rendered?);
        let mut links = search_page(self.page.soup()?)?.links;
        links.truncate(max_results);
        info!(count = links.len(), "Collected Fox News search results");
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<html><body>
<h1 class="headline speakable">Markets rally on jobs report</h1>
<div class="article-body">
  <p>Stocks climbed Friday.</p>
  <div class="ad-container"><p>Advertisement</p></div>
  <p>The Dow gained 400 points.</p>
</div>
</body></html>"#;

    #[test]
    fn test_domain() {
        assert_eq!(FoxNews::domain(), "foxnews.com");
    }

    #[test]
    fn test_scrape_fixture() {
        let mut fox = FoxNews::default();
        fox.load_html(ARTICLE);
        fox.scrape_title().unwrap();
        fox.scrape_content().unwrap();
        assert_eq!(fox.title(), Some("Markets rally on jobs report"));
        assert_eq!(fox.content(), Some("Stocks climbed Friday. The Dow gained 400 points."));
    }

    #[test]
    fn test_search_url_encodes_spaces() {
        assert_eq!(
            search_url("border security"),
            "https://www.foxnews.com/search-results/search#q=border%20security"
        );
    }

    #[test]
    fn test_search_page() {
        let soup = Html::parse_document(
            r#"<article><h2 class="title"><a href="https://www.foxnews.com/politics/a">A</a></h2></article>
<article><h2 class="title"><a href="https://www.foxnews.com/us/b">B</a></h2></article>"#,
        );
        let page = search_page(&soup).unwrap();
        assert_eq!(page.found, 2);
        assert_eq!(page.links[0], "https://www.foxnews.com/politics/a");
    }
}
