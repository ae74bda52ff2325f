//! Tokenizer/tagger capability boundary.
//!
//! The engine consumes `(surface, class)` pairs and never implements the
//! linguistics itself. The structural-noise filter lives here because the
//! template parser and the slot binder must agree on it exactly.

use std::collections::HashMap;

use crate::error::LetterError;
use crate::tags::WordClass;

/// One token of tagged text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    /// The surface form, exactly as it will appear in the document.
    pub surface: String,
    /// The grammatical class, if the tagger recognized one.
    pub class: Option<WordClass>,
}

/// Capability: tokenize a unit of text and tag every word.
///
/// Implementations must tokenize deterministically; the template stores
/// the token vectors this trait produces and slot coordinates refer to
/// them for the lifetime of a letter.
pub trait Tagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, LetterError>;
}

/// Fragments that mark a token as structural noise: markup remnants,
/// mentions, URL parts. Noise tokens are never slotted and never bound,
/// whatever the tagger says about them.
const NOISE_FRAGMENTS: &[&str] = &[
    "<",
    ">",
    "span",
    "class",
    "id",
    "receiver",
    "signature",
    "/",
    "#",
    "@",
    "`",
    "'",
    "http",
    "html",
];

/// Whether a surface form should be excluded from slotting and binding.
pub fn is_structural_noise(surface: &str) -> bool {
    NOISE_FRAGMENTS.iter().any(|frag| surface.contains(frag))
}

/// Split text into word and punctuation tokens.
///
/// Sentence punctuation becomes its own token; apostrophes stay attached
/// so contractions survive as a single (noise-filtered) token. Characters
/// like `@`, `#` and `/` also stay attached, which lets the noise filter
/// drop mentions and URL fragments whole.
pub fn split_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
        } else if is_split_punct(c) {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            tokens.push(c.to_string());
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

fn is_split_punct(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | '$'
    )
}

/// Fixed word → class lookup for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticTagger {
    classes: HashMap<String, WordClass>,
}

impl StaticTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a word under a class (case-insensitive lookup).
    pub fn with_word(mut self, surface: impl Into<String>, class: WordClass) -> Self {
        self.classes.insert(surface.into().to_lowercase(), class);
        self
    }
}

impl Tagger for StaticTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, LetterError> {
        Ok(split_tokens(text)
            .into_iter()
            .map(|surface| {
                let class = self.classes.get(&surface.to_lowercase()).copied();
                TaggedToken { surface, class }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_sentence_punctuation() {
        let tokens = split_tokens("Hello, world. (Really!)");
        assert_eq!(
            tokens,
            vec!["Hello", ",", "world", ".", "(", "Really", "!", ")"]
        );
    }

    #[test]
    fn keeps_contractions_whole() {
        let tokens = split_tokens("I can't stop, they're everywhere");
        assert!(tokens.contains(&"can't".to_string()));
        assert!(tokens.contains(&"they're".to_string()));
    }

    #[test]
    fn currency_symbol_is_its_own_token() {
        assert_eq!(split_tokens("$100"), vec!["$", "100"]);
    }

    #[test]
    fn noise_filter_catches_markup_and_urls() {
        assert!(is_structural_noise("can't"));
        assert!(is_structural_noise("@someone"));
        assert!(is_structural_noise("http://example.com"));
        assert!(is_structural_noise("</span>"));
        assert!(is_structural_noise("signature"));
        assert!(!is_structural_noise("sealion"));
        assert!(!is_structural_noise("quietly"));
    }

    #[test]
    fn static_tagger_is_case_insensitive() {
        let tagger = StaticTagger::new().with_word("Sealion", WordClass::Nn);
        let tagged = tagger.tag("sealion SEALION walrus").unwrap();
        assert_eq!(tagged[0].class, Some(WordClass::Nn));
        assert_eq!(tagged[1].class, Some(WordClass::Nn));
        assert_eq!(tagged[2].class, None);
    }
}
