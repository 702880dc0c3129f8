//! ABC News adapter.
//!
//! ABC ships CSS-module class names; the headline and paragraph classes
//! below are the hashed names seen across its article templates.

use super::{ScrapeError, ScrapedPage, WebscrapeContent, all_texts};

const TITLE_CLASSES: [&str; 5] = ["vMjAx", "gjbzK", "tntuS", "eHrJ", "mTgUP"];
const PARAGRAPH_CLASSES: [&str; 8] = ["EkqkG", "IGXmU", "nlgHS", "yuUao", "MvWXB", "TjIXL", "aGjvy", "ebVHC"];

/// A selector list matching `tag` elements whose class contains any of `classes`.
fn class_fragments(tag: &str, classes: &[&str]) -> String {
    classes
        .iter()
        .map(|class| format!("{tag}[class*=\"{class}\"]"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Default)]
pub struct AbcNews {
    page: ScrapedPage,
}

impl WebscrapeContent for AbcNews {
    fn domain() -> &'static str {
        "abcnews.go.com"
    }

    fn page(&self) -> &ScrapedPage {
        &self.page
    }

    fn page_mut(&mut self) -> &mut ScrapedPage {
        &mut self.page
    }

    fn scrape_title(&mut self) -> Result<(), ScrapeError> {
        self.page.scrape_heading(&class_fragments("h1", &TITLE_CLASSES))
    }

    fn scrape_content(&mut self) -> Result<(), ScrapeError> {
        let paragraphs = all_texts(self.page.soup()?, &class_fragments("p", &PARAGRAPH_CLASSES))?;
        self.page.set_content(paragraphs);
        Ok(())
    }
}
