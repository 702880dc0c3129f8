//! New York Times adapter.
//!
//! NYT renders articles client-side and shows a registration modal, so
//! pages are loaded through a browser session that clicks the modal away
//! before the HTML is captured.

use super::fetch::browser_html;
use super::{ScrapeError, ScrapedPage, WebscrapeContent, all_texts};
use std::error::Error;

const TITLE: &str = "h1[data-testid=\"headline\"], h1.css-1fyu99.e1h9rw200";
const PARAGRAPHS: &str = "p.css-at9mc1.evys1bk0";

#[derive(Default)]
pub struct NewYorkTimes {
    page: ScrapedPage,
}

impl WebscrapeContent for NewYorkTimes {
    fn domain() -> &'static str {
        "nytimes.com"
    }

    fn page(&self) -> &ScrapedPage {
        &self.page
    }

    fn page_mut(&mut self) -> &mut ScrapedPage {
        &mut self.page
    }

    async fn make_soup(&mut self, url: &str) -> Result<(), Box<dyn Error>> {
        let html = browser_html(url, true).await?;
        self.page.set_html(&html);
        Ok(())
    }

    fn scrape_title(&mut self) -> Result<(), ScrapeError> {
        self.page.scrape_heading(TITLE)
    }

    fn scrape_content(&mut self) -> Result<(), ScrapeError> {
        let paragraphs = all_texts(self.page.soup()?, PARAGRAPHS)?;
        self.page.set_content(paragraphs);
        Ok(())
    }
}
