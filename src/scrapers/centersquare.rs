//! The Center Square adapter.

use super::{ScrapeError, ScrapedPage, WebscrapeContent, first_element, texts_within};

const TITLE: &str = "h1[class*=\"headline\"]";
const BODY: &str = "div[id*=\"article-body\"]";

#[derive(Default)]
pub struct CenterSquare {
    page: ScrapedPage,
}

impl WebscrapeContent for CenterSquare {
    fn domain() -> &'static str {
        "thecentersquare.com"
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
