//! MSNBC adapter.
//!
//! Class names on MSNBC carry build hashes, so matching is by substring:
//! any `h1` with `headline` in its class, and body/graf paragraphs inside
//! the first `content` container.

use super::{ScrapeError, ScrapedPage, WebscrapeContent, first_element, texts_within};

const TITLE: &str = "h1[class*=\"headline\"]";
const BODY: &str = "div[class*=\"content\"]";
const PARAGRAPHS: &str = "p[class*=\"body\"], p[class*=\"graf\"]";

#[derive(Default)]
pub struct Msnbc {
    page: ScrapedPage,
}

impl WebscrapeContent for Msnbc {
    fn domain() -> &'static str {
        "msnbc.com"
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
        let paragraphs = texts_within(body, PARAGRAPHS)?;
        self.page.set_content(paragraphs);
        Ok(())
    }
}
