//! CNN adapter.
//!
//! The headline is `h1#maincontent`; body paragraphs are tagged
//! `paragraph inline-placeholder vossi-paragraph` and carry layout
//! newlines and indentation, which are stripped per paragraph.

use super::{ScrapeError, ScrapedPage, WebscrapeContent, all_texts};

const TITLE: &str = "h1#maincontent";
const PARAGRAPHS: &str = "p.paragraph.inline-placeholder.vossi-paragraph";

#[derive(Default)]
pub struct Cnn {
    page: ScrapedPage,
}

impl WebscrapeContent for Cnn {
    fn domain() -> &'static str {
        "cnn.com"
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
        let paragraphs = all_texts(self.page.soup()?, PARAGRAPHS)?
            .into_iter()
            .map(|p| p.replace('\n', "").trim().to_string())
            .collect();
        self.page.set_content(paragraphs);
        Ok(())
    }
}
