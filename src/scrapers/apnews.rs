//! AP News adapter.
//!
//! Article pages carry the headline in `h1.Page-headline` and the story as
//! direct `<p>` children of the rich-text body. Search results come from
//! `https://apnews.com/search?q=<query>&s=0&p=<page>`; only links pointing at
//! `/article/` pages are kept.

use super::{
    ScrapeError, ScrapedPage, SearchPage, SearchResults, WebscrapeContent, child_paragraphs,
    first_element, htmlify_query, paginate_search, selector,
};
use scraper::Html;
use std::error::Error;

const TITLE: &str = "h1.Page-headline";
const BODY: &str = "div.RichTextStoryBody.RichTextBody";
const RESULT_LINK: &str = "a[class*=\"Link\"]";

#[derive(Default)]
pub struct ApNews {
    page: ScrapedPage,
}

impl WebscrapeContent for ApNews {
    fn domain() -> &'static str {
        "apnews.com"
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
        let paragraphs = child_paragraphs(body)
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        self.page.set_content(paragraphs);
        Ok(())
    }
}

fn search_page(soup: &Html) -> Result<SearchPage, ScrapeError> {
    let mut page = SearchPage::default();
    for anchor in soup.select(&selector(RESULT_LINK)?) {
        page.found += 1;
        if let Some(href) = anchor.value().attr("href") {
            if href.contains("article") {
                page.links.push(href.to_string());
            }
        }
    }
    Ok(page)
}

impl SearchResults for ApNews {
    async fn get_search_results(&mut self, query: &str, max_results: usize) -> Result<Vec<String>, Box<dyn Error>> {
        let query = htmlify_query(query);
        paginate_search(
            self,
            max_results,
            1,
            |page| format!("https://apnews.com/search?q={query}&s=0&p={page}"),
            search_page,
        )
        .await
    }
}
