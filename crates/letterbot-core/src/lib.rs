//! letterbot-core: the template slot-filling engine.
//!
//! Pure letter-randomizing logic with no transport of its own; external
//! collaborators are injected at the seams:
//! - Template model and parser (blocks, tokens, change frames)
//! - Slot binder for incremental free-text contributions
//! - Fallback filler backed by a class-indexed word source
//! - Composer that reassembles bound templates into HTML letters
//! - Versioned JSON persistence for working and run state
//!
//! Scheduling, configuration and the concrete lexicon adapters live in
//! the `letterbot` application crate.

pub mod binder;
pub mod composer;
pub mod error;
pub mod filler;
pub mod frame;
pub mod parser;
pub mod run;
pub mod store;
pub mod tagger;
pub mod tags;
pub mod template;

// Re-export commonly used types
pub use binder::SlotBinder;
pub use composer::{ComposedLetter, Composer, NameGenerator, NameStyle};
pub use error::LetterError;
pub use filler::{FallbackFiller, WordSource};
pub use frame::{Binding, ChangeFrame, Slot, WorkingState, STATE_VERSION};
pub use parser::{ParserConfig, TemplateParser};
pub use run::RunState;
pub use store::StateStore;
pub use tagger::{StaticTagger, TaggedToken, Tagger};
pub use tags::{WordCategory, WordClass};
pub use template::{Block, BlockKind, NameSlotKind, Template, Token};
