//! Template parser: carves a letter template into blocks and a change
//! frame.
//!
//! Each source line becomes one block (blank lines included, so block
//! index equals line index). Every word is tagged through the injected
//! tagger, then a configured fraction of the eligible words per block is
//! sampled without replacement into the change frame as open slots.

use rand::Rng;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::LetterError;
use crate::frame::{ChangeFrame, Slot, WorkingState};
use crate::tagger::{is_structural_noise, Tagger};
use crate::template::{scan_line, Block, Segment, Template, Token};

/// Parser tuning knobs.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Fraction of eligible words per block carved into slots. Higher
    /// values ask more of the fallback word source and less of
    /// contributors.
    pub fragmentation_ratio: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            fragmentation_ratio: 0.35,
        }
    }
}

/// Parses template files into fresh working state.
pub struct TemplateParser<'a> {
    config: ParserConfig,
    tagger: &'a dyn Tagger,
    titles: HashMap<String, String>,
}

impl<'a> TemplateParser<'a> {
    pub fn new(config: ParserConfig, tagger: &'a dyn Tagger) -> Self {
        Self {
            config,
            tagger,
            titles: HashMap::new(),
        }
    }

    /// Attach a filename → title map consulted by [`parse`](Self::parse).
    pub fn with_titles(mut self, titles: HashMap<String, String>) -> Self {
        self.titles = titles;
        self
    }

    /// Load a filename → title map from a `summary.json` file.
    pub fn load_titles(path: &Path) -> Result<HashMap<String, String>, LetterError> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|err| LetterError::StateCorrupt {
            path: path.display().to_string(),
            detail: err.to_string(),
        })
    }

    /// Parse a template file into fresh working state with an empty
    /// binding set. Persisting the result overwrites any previously
    /// in-progress letter.
    pub fn parse<R: Rng + ?Sized>(
        &self,
        path: &Path,
        rng: &mut R,
    ) -> Result<WorkingState, LetterError> {
        let text = fs::read_to_string(path).map_err(|err| LetterError::TemplateRead {
            path: path.display().to_string(),
            source: err,
        })?;
        let (template, frame) = self.parse_source(&text, rng)?;
        let title = self.title_for(path);
        debug!(
            title = %title,
            blocks = template.blocks.len(),
            slots = frame.len(),
            "parsed template"
        );
        Ok(WorkingState::new(title, path, template, frame))
    }

    /// Parse template source text into a tokenized template and its
    /// change frame.
    pub fn parse_source<R: Rng + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> Result<(Template, ChangeFrame), LetterError> {
        let mut blocks = Vec::new();
        let mut frame = ChangeFrame::new();

        for (block_idx, line) in text.split('\n').enumerate() {
            let scanned = scan_line(line);
            let mut tokens = Vec::new();
            let mut eligible = Vec::new();

            for segment in scanned.segments {
                match segment {
                    Segment::Name(kind) => tokens.push(Token::Name(kind)),
                    Segment::Text(text) => {
                        for tagged in self.tagger.tag(text)? {
                            if let Some(class) = tagged.class {
                                if !is_structural_noise(&tagged.surface) {
                                    eligible.push((tokens.len(), class));
                                }
                            }
                            tokens.push(Token::Word(tagged.surface));
                        }
                    }
                }
            }

            let take = (self.config.fragmentation_ratio * eligible.len() as f64).floor()
                as usize;
            let take = take.min(eligible.len());
            if take > 0 {
                for pick in rand::seq::index::sample(rng, eligible.len(), take) {
                    let (token_idx, class) = eligible[pick];
                    frame.push(Slot {
                        block: block_idx,
                        token: token_idx,
                        class,
                    });
                }
            }

            blocks.push(Block {
                kind: scanned.kind,
                tokens,
                hard_break: scanned.hard_break,
            });
        }

        Ok((Template::new(blocks), frame))
    }

    fn title_for(&self, path: &Path) -> String {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match self.titles.get(&file_name) {
            Some(title) => title.clone(),
            None => {
                warn!(file = %file_name, "no title mapping, falling back to file name");
                file_name
            }
        }
    }
}
