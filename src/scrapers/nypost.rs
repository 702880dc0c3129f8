//! New York Post adapter.
//!
//! Search pages live at `https://nypost.com/search/<query>/page/<n>/` and
//! tag every result anchor with a `postid-*` class.

use super::{
    ScrapeError, ScrapedPage, SearchResults, WebscrapeContent, first_element, hrefs, htmlify_query,
    paginate_search, texts_within,
};
use std::error::Error;

const TITLE: &str = "h1.headline.headline--single-fallback";
const BODY: &str = "div.single__content.entry-content.m-bottom";
const RESULT_LINK: &str = "a[class*=\"postid\"]";

#[derive(Default)]
pub struct NewYorkPost {
    page: ScrapedPage,
}

impl WebscrapeContent for NewYorkPost {
    fn domain() -> &'static str {
        "nypost.com"
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

impl SearchResults for NewYorkPost {
    async fn get_search_results(&mut self, query: &str, max_results: usize) -> Result<Vec<String>, Box<dyn Error>> {
        let query = htmlify_query(query);
        paginate_search(
            self,
            max_results,
            1,
            |page| format!("https://nypost.com/search/{query}/page/{page}/?orderby=relevance"),
            |soup| hrefs(soup, RESULT_LINK),
        )
        .await
    }
}
