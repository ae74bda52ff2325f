//! Change frames, slots and bindings.
//!
//! The change frame is the mutable set of still-open slots carved from a
//! template at parse time. Every carved slot is either open in the frame
//! or bound in the binding list, never both, never neither. The frame
//! only ever shrinks.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::tags::{WordCategory, WordClass};
use crate::template::Template;

/// Serialization schema version for persisted state records.
pub const STATE_VERSION: u32 = 1;

/// A single addressable word position inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub block: usize,
    pub token: usize,
    pub class: WordClass,
}

/// A replacement word committed to a slot's coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub block: usize,
    pub token: usize,
    pub word: String,
}

/// The insertion-ordered set of currently-open slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeFrame {
    slots: Vec<Slot>,
}

impl ChangeFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an open slot. Returns false (and leaves the frame untouched)
    /// if a slot already occupies the same coordinates.
    pub fn push(&mut self, slot: Slot) -> bool {
        if self
            .slots
            .iter()
            .any(|s| s.block == slot.block && s.token == slot.token)
        {
            return false;
        }
        self.slots.push(slot);
        true
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Remove and return the most recently added open slot of `class`.
    /// This is the binder's documented tie-break: last carved, first
    /// bound.
    pub fn take_last(&mut self, class: WordClass) -> Option<Slot> {
        let idx = self.slots.iter().rposition(|s| s.class == class)?;
        Some(self.slots.remove(idx))
    }

    /// The oldest remaining open slot, if any.
    pub fn peek(&self) -> Option<Slot> {
        self.slots.first().copied()
    }

    /// Remove the oldest remaining open slot.
    pub fn take_front(&mut self) -> Option<Slot> {
        if self.slots.is_empty() {
            None
        } else {
            Some(self.slots.remove(0))
        }
    }

    /// Human status of remaining needs, grouped by category:
    /// `"Words needed:\n2 nouns\n1 adjective\n"`. Empty string when the
    /// frame is empty. Category order is fixed so output is
    /// deterministic.
    pub fn status_summary(&self) -> String {
        if self.slots.is_empty() {
            return String::new();
        }

        let mut out = String::from("Words needed:\n");
        for category in WordCategory::ALL {
            let count = self
                .slots
                .iter()
                .filter(|s| s.class.category() == category)
                .count();
            match count {
                0 => {}
                1 => {
                    let _ = writeln!(out, "1 {}", category.singular());
                }
                n => {
                    let _ = writeln!(out, "{} {}", n, category.plural());
                }
            }
        }
        out
    }
}

/// The persisted record of one in-progress letter: the tokenized
/// template plus the open/bound slot partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingState {
    pub version: u32,
    pub title: String,
    pub source_path: PathBuf,
    pub template: Template,
    pub frame: ChangeFrame,
    pub bindings: Vec<Binding>,
}

impl WorkingState {
    pub fn new(
        title: impl Into<String>,
        source_path: impl Into<PathBuf>,
        template: Template,
        frame: ChangeFrame,
    ) -> Self {
        Self {
            version: STATE_VERSION,
            title: title.into(),
            source_path: source_path.into(),
            template,
            frame,
            bindings: Vec::new(),
        }
    }

    /// Commit a replacement word to a slot already removed from the
    /// frame.
    pub fn bind(&mut self, slot: Slot, word: impl Into<String>) {
        self.bindings.push(Binding {
            block: slot.block,
            token: slot.token,
            word: word.into(),
        });
    }

    /// All carved slots are bound.
    pub fn is_filled(&self) -> bool {
        self.frame.is_empty()
    }
}
