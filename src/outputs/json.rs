//! JSON output for news documents.

use crate::models::Document;
use std::error::Error;
use std::io::Write;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `documents` as a pretty-printed JSON array to `path`.
///
/// # Arguments
///
/// * `documents` - The documents to serialize
/// * `path` - Output file; parent directories are created as needed
///
/// # Returns
///
/// `Ok(())` on success, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = documents.len()))]
pub async fn write_documents(documents: &[Document], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(documents)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!("Wrote JSON file");
    Ok(())
}

/// Print `documents` as a pretty-printed JSON array on stdout.
pub fn print_documents(documents: &[Document]) -> Result<(), Box<dyn Error>> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, documents)?;
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(title: &str) -> Document {
        Document {
            title: title.to_string(),
            description: String::new(),
            timestamp: "2024-03-01T12:00:00Z".to_string(),
            source: "apnews.com".to_string(),
            url: format!("https://apnews.com/article/{title}"),
            content: None,
        }
    }

    #[tokio::test]
    async fn test_write_documents_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("news.json");
        let documents = vec![document("one"), document("two")];

        write_documents(&documents, &path).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: Vec<Document> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, documents);
    }
}
