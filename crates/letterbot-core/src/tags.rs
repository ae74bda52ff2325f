//! Grammatical word classes eligible for slotting.
//!
//! The closed set of tag symbols the engine will blank out and refill.
//! Words tagged outside this set are never touched in a template.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LetterError;

/// A grammatical class a slot or contributed word can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordClass {
    /// Adjective ("big")
    #[serde(rename = "JJ")]
    Jj,
    /// Adjective, comparative ("bigger")
    #[serde(rename = "JJR")]
    Jjr,
    /// Adjective, superlative ("biggest")
    #[serde(rename = "JJS")]
    Jjs,
    /// Noun, singular ("sealion")
    #[serde(rename = "NN")]
    Nn,
    /// Noun, plural ("sealions")
    #[serde(rename = "NNS")]
    Nns,
    /// Adverb ("quietly")
    #[serde(rename = "RB")]
    Rb,
    /// Adverb, comparative ("quieter")
    #[serde(rename = "RBR")]
    Rbr,
    /// Verb, base form ("run")
    #[serde(rename = "VB")]
    Vb,
    /// Verb, past participle ("run")
    #[serde(rename = "VBN")]
    Vbn,
    /// Verb, past tense ("ran")
    #[serde(rename = "VBD")]
    Vbd,
    /// Verb, gerund ("running")
    #[serde(rename = "VBG")]
    Vbg,
}

impl WordClass {
    /// Every eligible class, in tag-symbol order.
    pub const ALL: [WordClass; 11] = [
        WordClass::Jj,
        WordClass::Jjr,
        WordClass::Jjs,
        WordClass::Nn,
        WordClass::Nns,
        WordClass::Rb,
        WordClass::Rbr,
        WordClass::Vb,
        WordClass::Vbn,
        WordClass::Vbd,
        WordClass::Vbg,
    ];

    /// The tag symbol for this class.
    pub fn as_str(&self) -> &'static str {
        match self {
            WordClass::Jj => "JJ",
            WordClass::Jjr => "JJR",
            WordClass::Jjs => "JJS",
            WordClass::Nn => "NN",
            WordClass::Nns => "NNS",
            WordClass::Rb => "RB",
            WordClass::Rbr => "RBR",
            WordClass::Vb => "VB",
            WordClass::Vbn => "VBN",
            WordClass::Vbd => "VBD",
            WordClass::Vbg => "VBG",
        }
    }

    /// The display category this class is reported under.
    pub fn category(&self) -> WordCategory {
        match self {
            WordClass::Jj | WordClass::Jjr | WordClass::Jjs => WordCategory::Adjectives,
            WordClass::Nn | WordClass::Nns => WordCategory::Nouns,
            WordClass::Vb | WordClass::Vbn | WordClass::Vbd | WordClass::Vbg => {
                WordCategory::Verbs
            }
            WordClass::Rb | WordClass::Rbr => WordCategory::Adverbs,
        }
    }
}

impl fmt::Display for WordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordClass {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JJ" => Ok(WordClass::Jj),
            "JJR" => Ok(WordClass::Jjr),
            "JJS" => Ok(WordClass::Jjs),
            "NN" => Ok(WordClass::Nn),
            "NNS" => Ok(WordClass::Nns),
            "RB" => Ok(WordClass::Rb),
            "RBR" => Ok(WordClass::Rbr),
            "VB" => Ok(WordClass::Vb),
            "VBN" => Ok(WordClass::Vbn),
            "VBD" => Ok(WordClass::Vbd),
            "VBG" => Ok(WordClass::Vbg),
            _ => Err(LetterError::UnknownClass(s.to_string())),
        }
    }
}

/// Human-facing grouping used in status summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordCategory {
    Adjectives,
    Nouns,
    Verbs,
    Adverbs,
}

impl WordCategory {
    /// Fixed reporting order for status summaries.
    pub const ALL: [WordCategory; 4] = [
        WordCategory::Adjectives,
        WordCategory::Nouns,
        WordCategory::Verbs,
        WordCategory::Adverbs,
    ];

    pub fn plural(&self) -> &'static str {
        match self {
            WordCategory::Adjectives => "adjectives",
            WordCategory::Nouns => "nouns",
            WordCategory::Verbs => "verbs",
            WordCategory::Adverbs => "adverbs",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            WordCategory::Adjectives => "adjective",
            WordCategory::Nouns => "noun",
            WordCategory::Verbs => "verb",
            WordCategory::Adverbs => "adverb",
        }
    }
}
