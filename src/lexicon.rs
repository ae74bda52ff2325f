//! Lexicon-backed capability adapters.
//!
//! One JSON lexicon file backs three ports: the word-class tagger
//! (reverse lookup over the class index), the fallback word source
//! (forward lookup with random selection) and the name generator (first
//! and last name pools).

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use letterbot_core::tagger::split_tokens;
use letterbot_core::{
    LetterError, NameGenerator, NameStyle, TaggedToken, Tagger, WordClass, WordSource,
};

/// On-disk lexicon layout.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    /// Tag symbol → candidate words.
    #[serde(default)]
    classes: HashMap<String, Vec<String>>,
    #[serde(default)]
    first_names: Vec<String>,
    #[serde(default)]
    last_names: Vec<String>,
}

/// A class-indexed word store loaded into memory.
pub struct Lexicon {
    by_class: HashMap<WordClass, Vec<String>>,
    class_of: HashMap<String, WordClass>,
    first_names: Vec<String>,
    last_names: Vec<String>,
}

impl Lexicon {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lexicon {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("failed to parse lexicon {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: LexiconFile = serde_json::from_str(content)?;

        let mut by_class = HashMap::new();
        let mut class_of = HashMap::new();
        for (tag, words) in file.classes {
            let class: WordClass = match tag.parse() {
                Ok(class) => class,
                Err(_) => {
                    warn!(tag = %tag, "skipping lexicon entries with ineligible tag");
                    continue;
                }
            };
            for word in &words {
                class_of.entry(word.to_lowercase()).or_insert(class);
            }
            by_class.insert(class, words);
        }

        info!(
            classes = by_class.len(),
            words = class_of.len(),
            "loaded lexicon"
        );
        Ok(Self {
            by_class,
            class_of,
            first_names: file.first_names,
            last_names: file.last_names,
        })
    }
}

impl Tagger for Lexicon {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, LetterError> {
        Ok(split_tokens(text)
            .into_iter()
            .map(|surface| {
                let class = self.class_of.get(&surface.to_lowercase()).copied();
                TaggedToken { surface, class }
            })
            .collect())
    }
}

impl WordSource for Lexicon {
    fn random_word(&self, class: WordClass) -> Result<String, LetterError> {
        let mut rng = rand::thread_rng();
        self.by_class
            .get(&class)
            .and_then(|words| words.choose(&mut rng))
            .cloned()
            .ok_or(LetterError::WordClassExhausted(class))
    }
}

impl NameGenerator for Lexicon {
    fn generate(&self, style: NameStyle) -> Result<String, LetterError> {
        let mut rng = rand::thread_rng();
        let first = self
            .first_names
            .choose(&mut rng)
            .ok_or_else(|| LetterError::NameGeneration("no first names in lexicon".into()))?;
        match style {
            NameStyle::First => Ok(first.clone()),
            NameStyle::Full => {
                let last = self.last_names.choose(&mut rng).ok_or_else(|| {
                    LetterError::NameGeneration("no last names in lexicon".into())
                })?;
                Ok(format!("{first} {last}"))
            }
        }
    }
}
