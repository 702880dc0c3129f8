//! Dictionary-based spelling correction.
//!
//! Candidates within edit distance 1 are preferred over distance 2; among
//! candidates at the same distance the most frequent word wins. Frequency
//! is taken from the dictionary order (first line = most frequent) or from
//! an explicit `word count` pair per line.

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use tracing::info;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz'";

pub struct SpellChecker {
    frequencies: HashMap<String, u64>,
    longest_word: usize,
}

impl SpellChecker {
    /// Build from a word list, one `word` or `word count` per line.
    pub fn from_word_list(list: &str) -> Self {
        let lines: Vec<&str> = list.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let total = lines.len() as u64;
        let mut frequencies = HashMap::with_capacity(lines.len());
        for (rank, line) in lines.iter().enumerate() {
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else { continue };
            let count = parts
                .next()
                .and_then(|c| c.parse::<u64>().ok())
                .unwrap_or(total - rank as u64);
            frequencies.entry(word.to_lowercase()).or_insert(count);
        }
        let longest_word = frequencies.keys().map(|w| w.chars().count()).max().unwrap_or(0);
        Self { frequencies, longest_word }
    }

    /// The bundled English dictionary: about 111k words with counts taken
    /// from public-domain English prose (`word count` per line).
    pub fn english() -> Self {
        Self::from_word_list(include_str!("../../resources/words_en.txt"))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let checker = Self::from_word_list(&std::fs::read_to_string(path.as_ref())?);
        info!(words = checker.frequencies.len(), path = %path.as_ref().display(), "Loaded dictionary");
        Ok(checker)
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.frequencies.contains_key(word)
    }

    fn best<I: IntoIterator<Item = String>>(&self, candidates: I) -> Option<String> {
        candidates
            .into_iter()
            .filter_map(|c| self.frequencies.get(&c).map(|f| (*f, c)))
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))
            .map(|(_, word)| word)
    }

    /// Numbers, lone punctuation marks and tokens far longer than any
    /// dictionary word are left alone.
    fn should_check(&self, word: &str) -> bool {
        let len = word.chars().count();
        if len == 1 && word.chars().all(|c| c.is_ascii_punctuation()) {
            return false;
        }
        if len > self.longest_word + 3 {
            return false;
        }
        word != "nan" && word.parse::<f64>().is_err()
    }

    /// Most likely correction of `word`, lowercased.
    ///
    /// # Returns
    ///
    /// * `Some(word)` unchanged for numbers, single punctuation marks and
    ///   overlong tokens
    /// * the known word itself, or the most frequent candidate one edit
    ///   away, then two edits away
    /// * `None` when nothing within two edits is known
    pub fn correction(&self, word: &str) -> Option<String> {
        if word.is_empty() {
            return None;
        }
        if !self.should_check(word) {
            return Some(word.to_string());
        }
        let word = word.to_lowercase();
        if self.is_known(&word) {
            return Some(word);
        }
        let first = edits1(&word);
        if let Some(best) = self.best(first.iter().cloned()) {
            return Some(best);
        }
        self.best(first.iter().flat_map(|e| edits1(e)))
    }

    /// Correct every space-separated word, keeping words without a candidate.
    pub fn correct_text(&self, text: &str) -> String {
        text.split(' ')
            .map(|word| self.correction(word).unwrap_or_else(|| word.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// All strings one deletion, transposition, replacement or insertion away.
fn edits1(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut edits = Vec::with_capacity(n * 56 + 27);
    let rebuild = |left: &[char], middle: &[char], right: &[char]| -> String {
        left.iter().chain(middle).chain(right).collect()
    };

    for i in 0..n {
        edits.push(rebuild(&chars[..i], &[], &chars[i + 1..]));
        if i + 1 < n {
            edits.push(rebuild(&chars[..i], &[chars[i + 1], chars[i]], &chars[i + 2..]));
        }
        for c in ALPHABET.chars() {
            edits.push(rebuild(&chars[..i], &[c], &chars[i + 1..]));
        }
    }
    for i in 0..=n {
        for c in ALPHABET.chars() {
            edits.push(rebuild(&chars[..i], &[c], &chars[i..]));
        }
    }
    edits
}
