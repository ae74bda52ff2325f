//! letterbot: application layer around the slot-filling engine.
//!
//! Wires configuration, the lexicon-backed capability adapters and the
//! file transports into the run state machine. The engine itself lives
//! in `letterbot-core`.

pub mod config;
pub mod lexicon;
pub mod ports;
pub mod runner;

pub use config::BotConfig;
pub use lexicon::Lexicon;
pub use ports::{FileInputSource, InputBatch, InputSource, OutboxPublisher, Publisher};
pub use runner::BotRunner;
