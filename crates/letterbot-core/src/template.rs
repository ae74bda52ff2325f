//! Template document model.
//!
//! A template is an ordered list of blocks, one per source line, each
//! carrying its structural kind, its token vector and a hard-break flag.
//! Tokenization happens exactly once, at parse time; slot coordinates
//! always refer to these stored vectors.

use serde::{Deserialize, Serialize};

/// Addressee / signature placeholder flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSlotKind {
    Receiver,
    ReceiverFirst,
    Signature,
    SignatureFirst,
}

impl NameSlotKind {
    /// Whether this placeholder wants a first name only.
    pub fn first_only(&self) -> bool {
        matches!(
            self,
            NameSlotKind::ReceiverFirst | NameSlotKind::SignatureFirst
        )
    }
}

/// One token of a block: a surface word or a name placeholder region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    Word(String),
    Name(NameSlotKind),
}

impl Token {
    pub fn is_word(&self) -> bool {
        matches!(self, Token::Word(_))
    }
}

/// Structural kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    ListItem,
    Blank,
}

/// One source line of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub tokens: Vec<Token>,
    /// The source line ended with a markdown hard break (two spaces).
    pub hard_break: bool,
}

/// An ordered sequence of blocks; immutable once parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub blocks: Vec<Block>,
}

impl Template {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

/// A raw segment of one line: literal text to be tagged, or an extracted
/// name placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    Text(&'a str),
    Name(NameSlotKind),
}

/// Result of structurally scanning one source line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedLine<'a> {
    pub kind: BlockKind,
    pub hard_break: bool,
    pub segments: Vec<Segment<'a>>,
}

/// Placeholder markers, longest first so `receiver first` wins over
/// `receiver`.
const MARKERS: &[(&str, NameSlotKind)] = &[
    ("<span class=\"receiver first\">", NameSlotKind::ReceiverFirst),
    ("<span class=\"signature first\">", NameSlotKind::SignatureFirst),
    ("<span class=\"receiver\">", NameSlotKind::Receiver),
    ("<span class=\"signature\">", NameSlotKind::Signature),
];

const MARKER_CLOSE: &str = "</span>";

/// Scan one source line: classify its structural kind, record a trailing
/// hard break, strip the structural prefix and extract placeholder
/// regions. The placeholder inner text is discarded; it is regenerated at
/// composition time.
pub fn scan_line(line: &str) -> ScannedLine<'_> {
    let hard_break = line.ends_with("  ");
    let trimmed = line.trim_end();

    if trimmed.trim().is_empty() {
        return ScannedLine {
            kind: BlockKind::Blank,
            hard_break: false,
            segments: Vec::new(),
        };
    }

    let (kind, body) = classify(trimmed);
    ScannedLine {
        kind,
        hard_break,
        segments: extract_segments(body),
    }
}

/// Determine the block kind from the line's structural prefix and return
/// the body with the prefix removed.
fn classify(line: &str) -> (BlockKind, &str) {
    if let Some(rest) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        return (BlockKind::ListItem, rest);
    }
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) {
        if let Some(rest) = line[hashes..].strip_prefix(' ') {
            return (BlockKind::Heading(hashes as u8), rest);
        }
    }
    (BlockKind::Paragraph, line)
}

fn extract_segments(body: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = body;
    loop {
        // Earliest marker occurrence wins; MARKERS order breaks ties at
        // the same position (longest literal first).
        let hit = MARKERS
            .iter()
            .filter_map(|(open, kind)| rest.find(open).map(|at| (at, *open, *kind)))
            .min_by_key(|(at, open, _)| (*at, std::cmp::Reverse(open.len())));

        let Some((at, open, kind)) = hit else {
            if !rest.is_empty() {
                segments.push(Segment::Text(rest));
            }
            return segments;
        };

        if at > 0 {
            segments.push(Segment::Text(&rest[..at]));
        }
        segments.push(Segment::Name(kind));

        let after_open = &rest[at + open.len()..];
        rest = match after_open.find(MARKER_CLOSE) {
            Some(close) => &after_open[close + MARKER_CLOSE.len()..],
            // Unterminated marker: swallow the remainder as inner text.
            None => "",
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line() {
        let scanned = scan_line("   ");
        assert_eq!(scanned.kind, BlockKind::Blank);
        assert!(scanned.segments.is_empty());
        assert!(!scanned.hard_break);
    }

    #[test]
    fn heading_levels() {
        let scanned = scan_line("# Application for Employment");
        assert_eq!(scanned.kind, BlockKind::Heading(1));
        assert_eq!(
            scanned.segments,
            vec![Segment::Text("Application for Employment")]
        );

        let scanned = scan_line("### Closing remarks");
        assert_eq!(scanned.kind, BlockKind::Heading(3));
    }

    #[test]
    fn hash_without_space_is_a_paragraph() {
        let scanned = scan_line("#hashtag soup");
        assert_eq!(scanned.kind, BlockKind::Paragraph);
    }

    #[test]
    fn list_items() {
        for line in ["* seven years of experience", "- seven years of experience"] {
            let scanned = scan_line(line);
            assert_eq!(scanned.kind, BlockKind::ListItem);
            assert_eq!(
                scanned.segments,
                vec![Segment::Text("seven years of experience")]
            );
        }
    }

    #[test]
    fn hard_break_detected() {
        let scanned = scan_line("first line of the paragraph  ");
        assert!(scanned.hard_break);
        // Trailing spaces do not leak into the text segment.
        assert_eq!(
            scanned.segments,
            vec![Segment::Text("first line of the paragraph")]
        );
    }

    #[test]
    fn receiver_marker_extracted() {
        let scanned = scan_line("Dear <span class=\"receiver first\">name</span>,");
        assert_eq!(
            scanned.segments,
            vec![
                Segment::Text("Dear "),
                Segment::Name(NameSlotKind::ReceiverFirst),
                Segment::Text(","),
            ]
        );
    }

    #[test]
    fn signature_marker_alone_on_line() {
        let scanned = scan_line("<span class=\"signature\">placeholder</span>");
        assert_eq!(scanned.segments, vec![Segment::Name(NameSlotKind::Signature)]);
    }

    #[test]
    fn unterminated_marker_swallows_remainder() {
        let scanned = scan_line("Yours, <span class=\"signature\">name without close");
        assert_eq!(
            scanned.segments,
            vec![
                Segment::Text("Yours, "),
                Segment::Name(NameSlotKind::Signature),
            ]
        );
    }

    #[test]
    fn first_flavor_maps_to_first_only() {
        assert!(NameSlotKind::ReceiverFirst.first_only());
        assert!(NameSlotKind::SignatureFirst.first_only());
        assert!(!NameSlotKind::Receiver.first_only());
        assert!(!NameSlotKind::Signature.first_only());
    }
}
