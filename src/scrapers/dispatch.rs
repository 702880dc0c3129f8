//! The Dispatch adapter.

use super::{ScrapeError, ScrapedPage, WebscrapeContent, first_element, texts_within};

const TITLE: &str = "h1[class*=\"h1\"]";
const BODY: &str = "section[id*=\"article-body\"]";

#[derive(Default)]
pub struct Dispatch {
    page: ScrapedPage,
}

impl WebscrapeContent for Dispatch {
    fn domain() -> &'static str {
        "thedispatch.com"
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

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<html><body>
<h1 class="typography-h1 article-title">The Morning Dispatch: Tariff Week</h1>
<section id="article-body-content">
  <p>Happy Monday!</p>
  <p>Here is what you need to know.</p>
</section>
</body></html>"#;

    #[test]
    fn test_domain() {
        assert_eq!(Dispatch::domain(), "thedispatch.com");
    }

    #[test]
    fn test_scrape_fixture() {
        let mut site = Dispatch::default();
        site.load_html(ARTICLE);
        site.scrape_title().unwrap();
        site.scrape_content().unwrap();
        assert_eq!(site.title(), Some("The Morning Dispatch: Tariff Week"));
        assert_eq!(site.content(), Some("Happy Monday! Here is what you need to know."));
    }

    #[test]
    fn test_missing_body() {
        let mut site = Dispatch::default();
        site.load_html("<html><body><h1 class=\"h1\">Only a title</h1></body></html>");
        site.scrape_title().unwrap();
        match site.scrape_content() {
            Err(ScrapeError::MissingElement { selector }) => assert_eq!(selector, BODY),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
