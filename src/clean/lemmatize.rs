//! Noun lemmatization.
//!
//! Irregular plurals come from an exception table. Regular plurals are
//! reduced with WordNet's noun detachment rules; when a dictionary is
//! available the shortest known candidate wins, otherwise a conservative
//! plural-stripping fallback applies.

use super::spell::SpellChecker;

const EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("oxen", "ox"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("selves", "self"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
];

/// WordNet noun suffix rules: (suffix, replacement).
const DETACHMENTS: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

pub struct Lemmatizer<'a> {
    dictionary: Option<&'a SpellChecker>,
}

impl<'a> Lemmatizer<'a> {
    pub fn new(dictionary: Option<&'a SpellChecker>) -> Self {
        Self { dictionary }
    }

    pub fn lemmatize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some((_, lemma)) = EXCEPTIONS.iter().find(|(plural, _)| *plural == lower) {
            return (*lemma).to_string();
        }

        if let Some(dictionary) = self.dictionary {
            let mut candidates: Vec<String> = DETACHMENTS
                .iter()
                .filter_map(|(suffix, replacement)| {
                    lower
                        .strip_suffix(suffix)
                        .filter(|stem| !stem.is_empty())
                        .map(|stem| format!("{stem}{replacement}"))
                })
                .filter(|candidate| dictionary.is_known(candidate))
                .collect();
            if dictionary.is_known(&lower) {
                candidates.push(lower.clone());
            }
            if let Some(shortest) = candidates.into_iter().min_by_key(|c| c.chars().count()) {
                return if shortest == lower { word.to_string() } else { shortest };
            }
        }

        fallback(word)
    }

    /// Lemmatize every space-separated word.
    pub fn lemmatize_text(&self, text: &str) -> String {
        text.split(' ').map(|w| self.lemmatize(w)).collect::<Vec<_>>().join(" ")
    }
}

fn fallback(word: &str) -> String {
    if word.chars().count() <= 3 || !word.is_ascii() {
        return word.to_string();
    }
    let lower = word.to_ascii_lowercase();
    if let Some(stem) = lower.strip_suffix("ies").filter(|s| s.len() > 1) {
        return format!("{}y", &word[..stem.len()]);
    }
    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if lower.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if lower.ends_with('s') && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s)) {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}
