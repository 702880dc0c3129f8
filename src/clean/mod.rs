//! Comment-cleaning pipeline.
//!
//! Each enabled step runs over the whole list of comments before the next
//! one starts, in a fixed order. Every step that ran contributes one letter
//! to a code string, and the cleaned file is written as
//! `<code>_<original name>`:
//!
//! | Step | Code |
//! |------|------|
//! | ASCII fold | `a` |
//! | strip line breaks | `b` |
//! | strip punctuation | `p` |
//! | lowercase | `l` |
//! | strip digits | `n` |
//! | spell-correct | `s` |
//! | remove stopwords | `w` |
//! | stem | `S` |
//! | lemmatize | `L` |
//!
//! With no step enabled a file is skipped and nothing is written.

pub mod lemmatize;
pub mod spell;
pub mod stopwords;

use crate::utils::{InputSource, load_comments, single_to_multi, write_rows};
use lemmatize::Lemmatizer;
use rust_stemmers::{Algorithm, Stemmer};
use spell::SpellChecker;
use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Typographic marks removed alongside ASCII punctuation.
const EXTRA_PUNCTUATION: &[char] = &['‘', '’', '“', '”', '«', '»', '…', '–', '—', '•', '·', '¿', '¡'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AsciiFold,
    LineBreaks,
    Punctuation,
    Lowercase,
    Digits,
    SpellCheck,
    Stopwords,
    Stem,
    Lemmatize,
}

impl Step {
    pub const ORDER: [Step; 9] = [
        Step::AsciiFold,
        Step::LineBreaks,
        Step::Punctuation,
        Step::Lowercase,
        Step::Digits,
        Step::SpellCheck,
        Step::Stopwords,
        Step::Stem,
        Step::Lemmatize,
    ];

    pub fn code(self) -> char {
        match self {
            Step::AsciiFold => 'a',
            Step::LineBreaks => 'b',
            Step::Punctuation => 'p',
            Step::Lowercase => 'l',
            Step::Digits => 'n',
            Step::SpellCheck => 's',
            Step::Stopwords => 'w',
            Step::Stem => 'S',
            Step::Lemmatize => 'L',
        }
    }
}

/// Which steps to run, plus the word lists some of them need.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    pub convert_to_ascii: bool,
    pub remove_line_breaks: bool,
    pub remove_punctuation: bool,
    pub lowercase: bool,
    pub remove_numbers: bool,
    pub spell_check: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    pub lemmatize: bool,
    /// Replaces the NLTK English list when set.
    pub custom_stopwords: Option<HashSet<String>>,
    /// Word list for spell correction and lemma lookup; bundled list otherwise.
    pub dictionary: Option<PathBuf>,
}

impl CleanOptions {
    /// Every step enabled.
    pub fn all() -> Self {
        Self {
            convert_to_ascii: true,
            remove_line_breaks: true,
            remove_punctuation: true,
            lowercase: true,
            remove_numbers: true,
            spell_check: true,
            remove_stopwords: true,
            stem: true,
            lemmatize: true,
            ..Self::default()
        }
    }

    pub fn enabled(&self, step: Step) -> bool {
        match step {
            Step::AsciiFold => self.convert_to_ascii,
            Step::LineBreaks => self.remove_line_breaks,
            Step::Punctuation => self.remove_punctuation,
            Step::Lowercase => self.lowercase,
            Step::Digits => self.remove_numbers,
            Step::SpellCheck => self.spell_check,
            Step::Stopwords => self.remove_stopwords,
            Step::Stem => self.stem,
            Step::Lemmatize => self.lemmatize,
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        Step::ORDER.into_iter().filter(|s| self.enabled(*s)).collect()
    }

    /// Code letters of the enabled steps, without the trailing `_`.
    pub fn process_code(&self) -> String {
        self.steps().into_iter().map(Step::code).collect()
    }
}

pub fn fold_ascii(text: &str) -> String {
    deunicode::deunicode(text)
}

pub fn strip_line_breaks(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_ascii_punctuation() && !EXTRA_PUNCTUATION.contains(c))
        .collect()
}

pub fn strip_digits(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_digit()).collect()
}

fn map_words(text: &str, f: impl Fn(&str) -> String) -> String {
    text.split(' ').map(f).collect::<Vec<_>>().join(" ")
}

/// Run the enabled steps over `comments`.
///
/// Each step processes every comment before the next step starts. The
/// dictionary is loaded once, and only when spell-checking or lemmatizing.
pub fn clean_text(mut comments: Vec<String>, options: &CleanOptions) -> Result<Vec<String>, Box<dyn Error>> {
    let needs_dictionary = options.spell_check || options.lemmatize;
    let dictionary = match (&options.dictionary, needs_dictionary) {
        (Some(path), true) => Some(SpellChecker::from_file(path)?),
        (None, true) => Some(SpellChecker::english()),
        (_, false) => None,
    };

    for step in options.steps() {
        info!(step = ?step, code = %step.code(), "Running step");
        comments = match step {
            Step::AsciiFold => comments.iter().map(|c| fold_ascii(c)).collect(),
            Step::LineBreaks => comments.iter().map(|c| strip_line_breaks(c)).collect(),
            Step::Punctuation => comments.iter().map(|c| strip_punctuation(c)).collect(),
            Step::Lowercase => comments.iter().map(|c| c.to_lowercase()).collect(),
            Step::Digits => comments.iter().map(|c| strip_digits(c)).collect(),
            Step::SpellCheck => {
                let Some(spell) = dictionary.as_ref() else { continue };
                comments.iter().map(|c| spell.correct_text(c)).collect()
            }
            Step::Stopwords => {
                let words = options.custom_stopwords.as_ref().unwrap_or(stopwords::english());
                comments.iter().map(|c| stopwords::remove(c, words)).collect()
            }
            Step::Stem => {
                let stemmer = Stemmer::create(Algorithm::English);
                comments
                    .iter()
                    .map(|c| map_words(c, |w| stemmer.stem(&w.to_lowercase()).into_owned()))
                    .collect()
            }
            Step::Lemmatize => {
                let lemmatizer = Lemmatizer::new(dictionary.as_ref());
                comments.iter().map(|c| lemmatizer.lemmatize_text(c)).collect()
            }
        };
    }
    Ok(comments)
}

/// Clean every input file and write the results into `save_dir`.
///
/// # Arguments
///
/// * `input` - One comment CSV or a directory of them
/// * `save_dir` - Output directory; files are named `<code>_<original name>`
/// * `options` - Steps to run and the word lists they use
///
/// # Returns
///
/// The paths written; empty when no step is enabled. Unreadable inputs and
/// dictionaries are errors.
#[instrument(level = "info", skip(options), fields(code = %options.process_code()))]
pub fn clean_comments(input: &InputSource, save_dir: &Path, options: &CleanOptions) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let code = options.process_code();
    let mut written = Vec::new();

    for file in input.files()? {
        if code.is_empty() {
            info!(file = %file.display(), "No cleaning steps enabled; skipping");
            continue;
        }
        let comments = load_comments(&file)?;
        info!(file = %file.display(), comments = comments.len(), "Cleaning comments");
        let cleaned = clean_text(comments, options)?;

        let file_name = file
            .file_name()
            .ok_or_else(|| format!("{} has no file name", file.display()))?
            .to_string_lossy();
        let output = save_dir.join(format!("{code}_{file_name}"));
        write_rows(&single_to_multi(cleaned), &output)?;
        info!(path = %output.display(), "Wrote cleaned comments");
        written.push(output);
    }
    Ok(written)
}
