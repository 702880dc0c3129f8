//! Mother Jones adapter.
//!
//! Search results are `h3` elements with a `hed` class, each wrapping the
//! link to the story.

use super::{
    ScrapeError, ScrapedPage, SearchPage, SearchResults, WebscrapeContent, first_element,
    htmlify_query, paginate_search, selector, texts_within,
};
use scraper::Html;
use std::error::Error;

const TITLE: &str = "h1[class*=\"title\"]";
const BODY: &str = "article[class*=\"content\"]";
const RESULT_HEADER: &str = "h3[class*=\"hed\"]";

#[derive(Default)]
pub struct MotherJones {
    page: ScrapedPage,
}

impl WebscrapeContent for MotherJones {
    fn domain() -> &'static str {
        "motherjones.com"
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
    for header in soup.select(&selector(RESULT_HEADER)?) {
        page.found += 1;
        let href = header
            .select(&anchor)
            .next()
            .and_then(|a| a.value().attr("href"));
        if let Some(href) = href {
            page.links.push(href.to_string());
        }
    }
    Ok(page)
}

impl SearchResults for MotherJones {
    async fn get_search_results(&mut self, query: &str, max_results: usize) -> Result<Vec<String>, Box<dyn Error>> {
        let query = htmlify_query(query);
        paginate_search(
            self,
            max_results,
            1,
            |page| format!("https://www.motherjones.com/page/{page}/?s={query}"),
            search_page,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<html><body>
<article class="entry-content">
  <header><h1 class="entry-title">The Courts Are Next</h1></header>
  <p>Legal experts are alarmed.</p>
  <p>Here is why.</p>
</article>
</body></html>"#;

    #[test]
    fn test_domain() {
        assert_eq!(MotherJones::domain(), "motherjones.com");
    }

    #[test]
    fn test_scrape_fixture() {
        let mut jones = MotherJones::default();
        jones.load_html(ARTICLE);
        jones.scrape_title().unwrap();
        jones.scrape_content().unwrap();
        assert_eq!(jones.title(), Some("The Courts Are Next"));
        assert_eq!(jones.content(), Some("Legal experts are alarmed. Here is why."));
    }

    #[test]
    fn test_search_page() {
        let soup = Html::parse_document(
            r#"<ul>
  <li><h3 class="hed"><a href="https://www.motherjones.com/politics/2025/02/one/">One</a></h3></li>
  <li><h3 class="hed">No link</h3></li>
  <li><h3 class="hed"><a href="https://www.motherjones.com/politics/2025/02/two/">Two</a></h3></li>
</ul>"#,
        );
        let page = search_page(&soup).unwrap();
        assert_eq!(page.found, 3);
        assert_eq!(page.links.len(), 2);
    }
}
