//! BBC adapter. Covers both the international and UK domains.

use super::{ScrapeError, ScrapedPage, WebscrapeContent, all_texts};

const TITLE: &str = "article > div > h1";
const PARAGRAPHS: &str = "article > div > p";

#[derive(Default)]
pub struct Bbc {
    page: ScrapedPage,
}

impl WebscrapeContent for Bbc {
    fn domain() -> &'static str {
        "bbc.com,bbc.co.uk"
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
        let paragraphs = all_texts(self.page.soup()?, PARAGRAPHS)?;
        self.page.set_content(paragraphs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<html><body><main><article>
  <div data-component="headline-block"><h1 class="sc-518485e5-0">Flood warnings issued across Wales</h1></div>
  <div data-component="text-block"><p>Heavy rain is expected overnight.</p></div>
  <div data-component="text-block"><p>The Met Office has issued <b>amber</b> warnings.</p></div>
  <figure><div><p>Image caption</p></div></figure>
</article></main></body></html>"#;

    #[test]
    fn test_domain() {
        assert_eq!(Bbc::domain(), "bbc.com,bbc.co.uk");
    }

    #[test]
    fn test_scrape_fixture() {
        let mut bbc = Bbc::default();
        bbc.load_html(ARTICLE);
        bbc.scrape_title().unwrap();
        bbc.scrape_content().unwrap();
        assert_eq!(bbc.title(), Some("Flood warnings issued across Wales"));
        assert_eq!(
            bbc.content(),
            Some("Heavy rain is expected overnight. The Met Office has issued amber warnings.")
        );
    }
}
