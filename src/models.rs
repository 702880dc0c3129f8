//! Data models shared by the collection and processing pipelines.
//!
//! - [`Document`]: a news item produced by an API parser, optionally filled
//!   with scraped content
//! - [`Article`]: the title and body text a scrape adapter extracted
//! - [`VideoRequest`]: one YouTube video to collect comments for

use serde::{Deserialize, Serialize};

/// A news item as returned by one of the news APIs.
///
/// `content` stays `None` until a scrape adapter has fetched the article
/// body from `url`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Document {
    /// The headline.
    pub title: String,
    /// Short teaser text; empty when the API had none.
    pub description: String,
    /// Publication timestamp exactly as the API reported it.
    pub timestamp: String,
    /// Host part of `url`, e.g. `www.bbc.co.uk`.
    pub source: String,
    /// Link to the full article.
    pub url: String,
    /// Scraped body text.
    pub content: Option<String>,
}

impl Document {
    /// Host of the article URL, or an empty string when the URL does not parse.
    pub fn host_of(url: &str) -> String {
        url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }
}

/// Title and body text extracted from one article page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// The page the text came from.
    pub url: String,
    pub title: String,
    pub content: String,
}

/// A YouTube video whose comments should be collected.
///
/// `song` and `artist` only influence the output filename.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    pub video_id: String,
    pub song: Option<String>,
    pub artist: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of() {
        assert_eq!(
            Document::host_of("https://www.bbc.co.uk/news/world-1234"),
            "www.bbc.co.uk"
        );
        assert_eq!(Document::host_of("not a url"), "");
    }

    #[test]
    fn test_document_serialization() {
        let doc = Document {
            title: "Headline".to_string(),
            description: String::new(),
            timestamp: "2025-02-14T10:00:00Z".to_string(),
            source: "apnews.com".to_string(),
            url: "https://apnews.com/article/x".to_string(),
            content: None,
        };

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"content\":null"));
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
