//! Bigram and trigram frequency tables for comment files.
//!
//! Comments are tokenized the way a bag-of-words count vectorizer does it:
//! lowercase, tokens of two or more word characters. A small blacklist of
//! filler words is dropped before tokenizing and the vectorizer's English
//! stopwords after.
//! N-grams never span two comments.

use crate::clean::stopwords;
use crate::utils::{InputSource, load_comments};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Words that dominate music-video comments without saying much.
pub const BLACKLIST: [&str; 8] = ["just", "dont", "song", "im", "like", "having", "things", "going"];

const OUTPUT_SUFFIX: &str = ".ngrams.json";

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramCount {
    pub ngram: String,
    pub count: usize,
}

fn drop_blacklisted(comment: &str) -> String {
    comment
        .split(' ')
        .filter(|word| !BLACKLIST.contains(word))
        .join(" ")
}

/// Lowercased vectorizer tokens with stopwords removed.
pub fn tokenize(text: &str, stopwords: &HashSet<String>) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|token| !stopwords.contains(token))
        .collect()
}

/// Count every bigram and trigram across `comments`.
///
/// Sorted by descending count, ties broken alphabetically.
pub fn count_ngrams(comments: &[String], stopwords: &HashSet<String>) -> Vec<NgramCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for comment in comments {
        let tokens = tokenize(&drop_blacklisted(comment), stopwords);
        for n in 2..=3 {
            for window in tokens.windows(n) {
                *counts.entry(window.join(" ")).or_default() += 1;
            }
        }
    }

    counts
        .into_iter()
        .map(|(ngram, count)| NgramCount { ngram, count })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ngram.cmp(&b.ngram)))
        .collect()
}

/// Where the table for `file` is written.
pub fn output_path(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_owned();
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

/// Build and write the n-gram table for each input file.
///
/// Existing `.ngrams.json` files in a directory are not re-read.
///
/// # Returns
///
/// The tables written, one `<input file>.ngrams.json` per input file.
#[instrument(level = "info", skip_all, fields(input = ?input))]
pub async fn write_ngram_tables(input: &InputSource) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut written = Vec::new();
    for file in input.files()? {
        if file.to_string_lossy().ends_with(OUTPUT_SUFFIX) {
            continue;
        }
        let comments = load_comments(&file)?;
        let table = count_ngrams(&comments, stopwords::vectorizer_english());
        info!(
            file = %file.display(),
            comments = comments.len(),
            ngrams = table.len(),
            top = table.first().map(|t| t.ngram.as_str()).unwrap_or(""),
            "Counted n-grams"
        );

        let path = output_path(&file);
        fs::write(&path, serde_json::to_string_pretty(&table)?).await?;
        info!(path = %path.display(), "Wrote n-gram table");
        written.push(path);
    }
    Ok(written)
}
