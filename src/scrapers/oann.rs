//! One America News adapter.

use super::{
    ScrapeError, ScrapedPage, SearchPage, SearchResults, WebscrapeContent, first_element,
    htmlify_query, paginate_search, selector, texts_within,
};
use scraper::Html;
use std::error::Error;

const TITLE: &str = "h1[class*=\"title\"]";
const BODY: &str = "article[class*=\"content\"]";
const RESULT_ENTRY: &str = "h2.entry-title";

#[derive(Default)]
pub struct Oann {
    page: ScrapedPage,
}

impl WebscrapeContent for Oann {
    fn domain() -> &'static str {
        "oann.com"
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
        let paragraphs = texts_within(body, "p")?;
        self.page.set_content(paragraphs);
        Ok(())
    }
}

fn search_page(soup: &Html) -> Result<SearchPage, ScrapeError> {
    let anchor = selector("a")?;
    let mut page = SearchPage::default();
    for entry in soup.select(&selector(RESULT_ENTRY)?) {
        page.found += 1;
        if let Some(href) = entry.select(&anchor).next().and_then(|a| a.value().attr("href")) {
            page.links.push(href.to_string());
        }
    }
    Ok(page)
}

impl SearchResults for Oann {
    async fn get_search_results(&mut self, query: &str, max_results: usize) -> Result<Vec<String>, Box<dyn Error>> {
        let query = htmlify_query(query);
        paginate_search(
            self,
            max_results,
            1,
            |page| format!("https://www.oann.com/page/{page}/?s={query}"),
            search_page,
        )
        .await
    }
}
