//! Persisted bot lifecycle state.
//!
//! One record tracks where the bot is in its multi-pass cycle: which
//! templates remain, which letter is current, how many collection passes
//! have happened and whether the current letter has already been
//! finalized. Every mutable field round-trips through persistence; each
//! external invocation is a separate process execution.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::frame::STATE_VERSION;

/// The bot's persisted run state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub version: u32,
    /// Remaining template queue; the next template is popped from the
    /// back.
    pub run_order: Vec<PathBuf>,
    /// Title of the letter currently in progress.
    pub current_title: String,
    /// Current pass number, 1..=passes_per_letter.
    pub pass: u32,
    /// Opaque cursor marking how far external input has been consumed.
    pub cursor: Option<String>,
    /// The current letter has been finalized and published.
    pub processed: bool,
}

impl RunState {
    pub fn new(run_order: Vec<PathBuf>) -> Self {
        Self {
            version: STATE_VERSION,
            run_order,
            current_title: String::new(),
            pass: 1,
            cursor: None,
            processed: false,
        }
    }

    /// Cyclic pass advance: after the final pass the counter wraps back
    /// to 1.
    pub fn advance_pass(&mut self, passes_per_letter: u32) {
        self.pass = (self.pass % passes_per_letter) + 1;
    }

    /// Whether this invocation is the finalize pass.
    pub fn is_final_pass(&self, passes_per_letter: u32) -> bool {
        self.pass == passes_per_letter
    }
}
