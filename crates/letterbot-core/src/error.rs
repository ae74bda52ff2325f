//! Engine error types.

use thiserror::Error;

use crate::tags::WordClass;

/// Errors raised by the slot-filling engine.
#[derive(Debug, Error)]
pub enum LetterError {
    /// Template file could not be read.
    #[error("failed to read template {path}")]
    TemplateRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A tag symbol outside the eligible set.
    #[error("unknown word class tag: {0}")]
    UnknownClass(String),

    /// The word source has nothing to offer for a required class.
    /// Fatal for the finalize pass: an unresolved slot would corrupt
    /// composition.
    #[error("word source has no candidates for class {0}")]
    WordClassExhausted(WordClass),

    /// The tokenizer/tagger capability failed.
    #[error("tagger failed: {0}")]
    Tagger(String),

    /// The name-generation capability failed.
    #[error("name generation failed: {0}")]
    NameGeneration(String),

    /// No persisted state where some was expected.
    #[error("no persisted state at {path}: run `letterbot init` first")]
    StateMissing { path: String },

    /// Persisted state exists but cannot be trusted.
    #[error("persisted state at {path} is unreadable ({detail}): re-run `letterbot init`")]
    StateCorrupt { path: String, detail: String },

    /// A binding's coordinates do not land on a word in the stored template.
    #[error("binding for block {block} token {token} does not match the stored template")]
    TokenMismatch { block: usize, token: usize },

    /// Underlying I/O failure while persisting or composing.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LetterError::WordClassExhausted(WordClass::Nn);
        assert!(err.to_string().contains("NN"));

        let err = LetterError::StateMissing {
            path: "data/run_state.json".into(),
        };
        assert!(err.to_string().contains("letterbot init"));

        let err = LetterError::TokenMismatch { block: 3, token: 7 };
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains('7'));
    }
}
