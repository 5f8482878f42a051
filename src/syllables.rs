// Syllable breaks for the selection panel, from the embedded en-US
// hyphenation patterns.

use hyphenation::{Hyphenator, Language, Load, Standard};
use log::warn;
use once_cell::sync::Lazy;

static EN_US: Lazy<Option<Standard>> = Lazy::new(|| match Standard::from_embedded(Language::EnglishUS) {
    Ok(dictionary) => Some(dictionary),
    Err(err) => {
        warn!("hyphenation patterns unavailable, syllables disabled: {err}");
        None
    }
});

/// Syllables of each whitespace-separated word in `text`.
pub fn syllables(text: &str) -> Vec<Vec<String>> {
    text.split_whitespace()
        .map(|word| match EN_US.as_ref() {
            Some(dictionary) => split_word(dictionary, word),
            None => vec![word.to_string()],
        })
        .collect()
}

/// Lowercased syllables joined by hyphens, words separated by single spaces.
pub fn pronunciation(text: &str) -> String {
    syllables(text)
        .iter()
        .map(|word| word.join("-").to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_word(dictionary: &Standard, word: &str) -> Vec<String> {
    let hyphenated = dictionary.hyphenate(word);
    let mut parts = Vec::with_capacity(hyphenated.breaks.len() + 1);
    let mut start = 0;
    for &end in &hyphenated.breaks {
        if end > start && end < word.len() && word.is_char_boundary(end) {
            parts.push(word[start..end].to_string());
            start = end;
        }
    }
    parts.push(word[start..].to_string());
    parts
}
