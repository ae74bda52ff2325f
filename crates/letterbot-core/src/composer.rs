//! Composer: reassembles a bound template into an HTML letter.
//!
//! Bindings overwrite their stored tokens, block texts are re-joined and
//! whitespace-repaired, and block kind metadata drives the HTML
//! containers: paragraph runs merge into one `<p>`, list-item runs are
//! wrapped in a single `<ul>`, headings map to `<h{level}>`. Name
//! placeholder regions are resolved through the injected generator.

use chrono::NaiveDate;
use std::fmt::Write as _;
use tracing::warn;

use crate::error::LetterError;
use crate::frame::WorkingState;
use crate::template::{Block, BlockKind, NameSlotKind, Token};

/// Name style requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    First,
    Full,
}

/// Capability: produce a proper name for addressee/signature regions.
pub trait NameGenerator {
    fn generate(&self, style: NameStyle) -> Result<String, LetterError>;
}

/// A finished letter plus its derived file name.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedLetter {
    pub html: String,
    pub file_name: String,
    /// Placeholder regions the generator could not resolve. These render
    /// empty; the failure is surfaced here instead of emitting the
    /// placeholder literal.
    pub unresolved_names: Vec<NameSlotKind>,
}

/// Ordered whitespace-repair rules, applied top to bottom. Later rules
/// may clean up artifacts of earlier ones.
const REPAIR_RULES: &[(&str, &str)] = &[
    (" ,", ","),
    (" .", "."),
    (" !", "!"),
    (" ?", "?"),
    (" :", ":"),
    (" ;", ";"),
    (" )", ")"),
    ("( ", "("),
    ("$ ", "$"),
    (" @ ", "@"),
    (" '", "'"),
];

/// Reassembles working state into publishable letters.
pub struct Composer<'a> {
    names: &'a dyn NameGenerator,
}

impl<'a> Composer<'a> {
    pub fn new(names: &'a dyn NameGenerator) -> Self {
        Self { names }
    }

    /// Compose the letter for `state`, dating the file name with `date`.
    ///
    /// Deterministic for identical state and generator output: repeated
    /// calls yield byte-identical documents.
    pub fn compose(
        &self,
        state: &WorkingState,
        date: NaiveDate,
    ) -> Result<ComposedLetter, LetterError> {
        let blocks = self.apply_bindings(state)?;

        let mut unresolved = Vec::new();
        let texts: Vec<String> = blocks
            .iter()
            .map(|block| self.render_block_text(block, &mut unresolved))
            .collect();

        let html = assemble_html(&blocks, &texts);
        let file_name = letter_file_name(&state.title, date);

        Ok(ComposedLetter {
            html,
            file_name,
            unresolved_names: unresolved,
        })
    }

    /// Overwrite stored tokens with their bindings on a copy of the
    /// template. Coordinates that miss a word token mean the stored
    /// template and the bindings have diverged; composing would corrupt
    /// the document, so fail loudly.
    fn apply_bindings(&self, state: &WorkingState) -> Result<Vec<Block>, LetterError> {
        let mut blocks = state.template.blocks.clone();
        for binding in &state.bindings {
            let mismatch = LetterError::TokenMismatch {
                block: binding.block,
                token: binding.token,
            };
            let Some(block) = blocks.get_mut(binding.block) else {
                return Err(mismatch);
            };
            let Some(token) = block.tokens.get_mut(binding.token) else {
                return Err(mismatch);
            };
            match token {
                Token::Word(word) => *word = binding.word.clone(),
                Token::Name(_) => return Err(mismatch),
            }
        }
        Ok(blocks)
    }

    fn render_block_text(&self, block: &Block, unresolved: &mut Vec<NameSlotKind>) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(block.tokens.len());
        for token in &block.tokens {
            match token {
                Token::Word(word) => parts.push(word.clone()),
                Token::Name(kind) => {
                    let style = if kind.first_only() {
                        NameStyle::First
                    } else {
                        NameStyle::Full
                    };
                    match self.names.generate(style) {
                        Ok(name) => parts.push(name),
                        Err(err) => {
                            warn!(error = %err, region = ?kind, "name generation failed, leaving region unresolved");
                            unresolved.push(*kind);
                        }
                    }
                }
            }
        }

        let mut text = parts.join(" ");
        for (from, to) in REPAIR_RULES {
            text = text.replace(from, to);
        }
        text
    }
}

/// Wrap repaired block texts in their HTML containers.
fn assemble_html(blocks: &[Block], texts: &[String]) -> String {
    let mut html = String::new();
    let mut i = 0;

    while i < blocks.len() {
        match blocks[i].kind {
            BlockKind::Blank => i += 1,
            BlockKind::Heading(level) => {
                let _ = write!(html, "<h{level}>{}</h{level}>", texts[i]);
                i += 1;
            }
            BlockKind::ListItem => {
                html.push_str("<ul>");
                while i < blocks.len() && blocks[i].kind == BlockKind::ListItem {
                    let _ = write!(html, "<li>{}</li>", texts[i]);
                    i += 1;
                }
                html.push_str("</ul>");
            }
            BlockKind::Paragraph => {
                html.push_str("<p>");
                let mut previous: Option<usize> = None;
                while i < blocks.len() && blocks[i].kind == BlockKind::Paragraph {
                    if let Some(prev) = previous {
                        // A hard break on the previous line forces a
                        // line break; otherwise source lines soft-wrap.
                        html.push_str(if blocks[prev].hard_break {
                            "<br/>"
                        } else {
                            " "
                        });
                    }
                    html.push_str(&texts[i]);
                    previous = Some(i);
                    i += 1;
                }
                html.push_str("</p>");
            }
        }
    }

    html
}

/// `{title with spaces → underscores}_{dd_mm_yy}.txt`
fn letter_file_name(title: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}.txt",
        title.replace(' ', "_"),
        date.format("%d_%m_%y")
    )
}
