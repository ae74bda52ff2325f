//! Fallback filler: completes a change frame from the word source.

use tracing::debug;

use crate::error::LetterError;
use crate::frame::WorkingState;
use crate::tags::WordClass;

/// Capability: a class-indexed store of candidate words.
pub trait WordSource {
    /// Return one uniformly random word of the given class.
    ///
    /// Must fail with [`LetterError::WordClassExhausted`] when the class
    /// has no candidates; the filler treats that as a fatal
    /// configuration error rather than skipping the slot.
    fn random_word(&self, class: WordClass) -> Result<String, LetterError>;
}

/// Fills every slot left open after all input rounds.
pub struct FallbackFiller<'a> {
    source: &'a dyn WordSource,
}

impl<'a> FallbackFiller<'a> {
    pub fn new(source: &'a dyn WordSource) -> Self {
        Self { source }
    }

    /// Draw a word for every remaining open slot, in frame order.
    /// Returns the number of slots filled; a no-op on an empty frame.
    ///
    /// On a word-source error the slot stays open, keeping the
    /// open/bound partition intact.
    pub fn fill_remaining(&self, state: &mut WorkingState) -> Result<usize, LetterError> {
        let mut filled = 0;
        while let Some(slot) = state.frame.peek() {
            let word = self.source.random_word(slot.class)?;
            state.frame.take_front();
            debug!(word = %word, class = %slot.class, "filled slot from word source");
            state.bind(slot, word);
            filled += 1;
        }
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{ChangeFrame, Slot};
    use crate::template::Template;
    use std::collections::HashMap;

    struct FixedWordSource(HashMap<WordClass, &'static str>);

    impl WordSource for FixedWordSource {
        fn random_word(&self, class: WordClass) -> Result<String, LetterError> {
            self.0
                .get(&class)
                .map(|w| w.to_string())
                .ok_or(LetterError::WordClassExhausted(class))
        }
    }

    fn state_with_slots(slots: &[Slot]) -> WorkingState {
        let mut frame = ChangeFrame::new();
        for slot in slots {
            frame.push(*slot);
        }
        WorkingState::new("Test", "test.txt", Template::default(), frame)
    }

    fn slot(block: usize, token: usize, class: WordClass) -> Slot {
        Slot {
            block,
            token,
            class,
        }
    }

    #[test]
    fn empties_the_frame() {
        let source = FixedWordSource(HashMap::from([
            (WordClass::Nn, "sealion"),
            (WordClass::Jj, "glorious"),
        ]));
        let filler = FallbackFiller::new(&source);
        let mut state = state_with_slots(&[
            slot(0, 1, WordClass::Nn),
            slot(0, 4, WordClass::Jj),
            slot(2, 0, WordClass::Nn),
        ]);

        let filled = filler.fill_remaining(&mut state).unwrap();

        assert_eq!(filled, 3);
        assert!(state.frame.is_empty());
        assert_eq!(state.bindings.len(), 3);
    }

    #[test]
    fn noop_when_already_empty() {
        let source = FixedWordSource(HashMap::new());
        let filler = FallbackFiller::new(&source);
        let mut state = state_with_slots(&[]);

        assert_eq!(filler.fill_remaining(&mut state).unwrap(), 0);
        assert!(state.bindings.is_empty());
    }

    #[test]
    fn missing_class_is_fatal_and_keeps_partition() {
        let source = FixedWordSource(HashMap::from([(WordClass::Nn, "sealion")]));
        let filler = FallbackFiller::new(&source);
        let mut state = state_with_slots(&[
            slot(0, 0, WordClass::Nn),
            slot(0, 2, WordClass::Rb),
            slot(1, 1, WordClass::Nn),
        ]);
        let carved = state.frame.len();

        let err = filler.fill_remaining(&mut state).unwrap_err();
        assert!(matches!(
            err,
            LetterError::WordClassExhausted(WordClass::Rb)
        ));

        // Partial progress is fine, losing slots is not.
        assert_eq!(state.frame.len() + state.bindings.len(), carved);
        assert!(state
            .frame
            .slots()
            .iter()
            .any(|s| s.class == WordClass::Rb));
    }
}
