//! Slot binder: matches tagged contributor words to open slots.

use tracing::debug;

use crate::error::LetterError;
use crate::frame::WorkingState;
use crate::tagger::{is_structural_noise, Tagger};

/// Binds free-text contributions into a working letter.
pub struct SlotBinder<'a> {
    tagger: &'a dyn Tagger,
}

impl<'a> SlotBinder<'a> {
    pub fn new(tagger: &'a dyn Tagger) -> Self {
        Self { tagger }
    }

    /// Bind words from `text` into the open slots of `state`.
    ///
    /// With `first_only`, only the first non-noise token of the text is
    /// considered (one contribution, one word). For each tagged word the
    /// most recently carved open slot of the same class receives it;
    /// words with no matching open slot are skipped. Returns the number
    /// of bindings created.
    ///
    /// Calling with an empty change frame returns immediately without
    /// tagging.
    pub fn bind(
        &self,
        state: &mut WorkingState,
        text: &str,
        first_only: bool,
    ) -> Result<usize, LetterError> {
        if state.frame.is_empty() {
            return Ok(0);
        }

        let mut tagged: Vec<_> = self
            .tagger
            .tag(text)?
            .into_iter()
            .filter(|t| !is_structural_noise(&t.surface))
            .collect();
        if first_only {
            tagged.truncate(1);
        }

        let mut bound = 0;
        for token in tagged {
            let Some(class) = token.class else { continue };
            if let Some(slot) = state.frame.take_last(class) {
                debug!(word = %token.surface, class = %class, "bound contribution");
                state.bind(slot, token.surface);
                bound += 1;
            }
        }
        Ok(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{ChangeFrame, Slot};
    use crate::tagger::{StaticTagger, TaggedToken};
    use crate::tags::WordClass;
    use crate::template::Template;
    use std::cell::Cell;

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
    fn single_adverb_binds_and_shrinks_frame_by_one() {
        let tagger = StaticTagger::new().with_word("quietly", WordClass::Rb);
        let binder = SlotBinder::new(&tagger);
        let mut state = state_with_slots(&[slot(0, 2, WordClass::Rb), slot(1, 0, WordClass::Nn)]);

        let bound = binder.bind(&mut state, "quietly", false).unwrap();

        assert_eq!(bound, 1);
        assert_eq!(state.frame.len(), 1);
        assert_eq!(state.bindings.len(), 1);
        assert_eq!(state.bindings[0].word, "quietly");
        assert_eq!((state.bindings[0].block, state.bindings[0].token), (0, 2));
    }

    #[test]
    fn never_binds_across_classes() {
        let tagger = StaticTagger::new().with_word("quietly", WordClass::Rb);
        let binder = SlotBinder::new(&tagger);
        let mut state = state_with_slots(&[slot(0, 0, WordClass::Nn), slot(0, 1, WordClass::Jj)]);

        let bound = binder.bind(&mut state, "quietly", false).unwrap();

        assert_eq!(bound, 0);
        assert_eq!(state.frame.len(), 2);
        assert!(state.bindings.is_empty());
    }

    #[test]
    fn last_carved_slot_of_class_receives_the_word() {
        let tagger = StaticTagger::new().with_word("walrus", WordClass::Nn);
        let binder = SlotBinder::new(&tagger);
        let mut state = state_with_slots(&[slot(0, 0, WordClass::Nn), slot(3, 5, WordClass::Nn)]);

        binder.bind(&mut state, "walrus", false).unwrap();

        assert_eq!((state.bindings[0].block, state.bindings[0].token), (3, 5));
    }

    #[test]
    fn first_only_considers_one_token() {
        let tagger = StaticTagger::new()
            .with_word("big", WordClass::Jj)
            .with_word("walrus", WordClass::Nn);
        let binder = SlotBinder::new(&tagger);
        let mut state = state_with_slots(&[slot(0, 0, WordClass::Jj), slot(0, 1, WordClass::Nn)]);

        let bound = binder.bind(&mut state, "big walrus", true).unwrap();

        assert_eq!(bound, 1);
        assert_eq!(state.bindings[0].word, "big");
        assert_eq!(state.frame.len(), 1);
    }

    #[test]
    fn noise_tokens_dropped_before_first_only_cut() {
        let tagger = StaticTagger::new().with_word("walrus", WordClass::Nn);
        let binder = SlotBinder::new(&tagger);
        let mut state = state_with_slots(&[slot(0, 0, WordClass::Nn)]);

        // The mention is noise; "walrus" is the first token considered.
        let bound = binder.bind(&mut state, "@letterbot walrus", true).unwrap();

        assert_eq!(bound, 1);
        assert_eq!(state.bindings[0].word, "walrus");
    }

    #[test]
    fn empty_frame_skips_tagging_entirely() {
        struct CountingTagger(Cell<usize>);
        impl Tagger for CountingTagger {
            fn tag(&self, _text: &str) -> Result<Vec<TaggedToken>, LetterError> {
                self.0.set(self.0.get() + 1);
                Ok(Vec::new())
            }
        }

        let tagger = CountingTagger(Cell::new(0));
        let binder = SlotBinder::new(&tagger);
        let mut state = state_with_slots(&[]);

        let bound = binder.bind(&mut state, "anything at all", false).unwrap();

        assert_eq!(bound, 0);
        assert_eq!(tagger.0.get(), 0, "tagger must not run on an empty frame");
    }
}
