//! Stopword lists.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static ENGLISH: Lazy<HashSet<String>> =
    Lazy::new(|| word_set(include_str!("../../resources/stopwords_en.txt")));

static VECTORIZER_ENGLISH: Lazy<HashSet<String>> =
    Lazy::new(|| word_set(include_str!("../../resources/stopwords_vectorizer_en.txt")));

fn word_set(list: &str) -> HashSet<String> {
    list.lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// The NLTK English stopword list.
pub fn english() -> &'static HashSet<String> {
    &ENGLISH
}

/// The scikit-learn `ENGLISH_STOP_WORDS` list used by count vectorizers.
/// No contractions; tokens are already split on apostrophes there.
pub fn vectorizer_english() -> &'static HashSet<String> {
    &VECTORIZER_ENGLISH
}

/// Parse a comma-separated stopword list. Entries are trimmed and lowercased.
pub fn parse_list(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Drop every space-separated word whose lowercase form is in `stopwords`.
pub fn remove(text: &str, stopwords: &HashSet<String>) -> String {
    text.split(' ')
        .filter(|word| !stopwords.contains(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}
