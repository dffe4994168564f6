//! Formatting of agent replies into renderable chunks.
//!
//! Agent replies arrive as plain text. Before display, the text is split
//! into a flat sequence of paragraph and bulleted-list chunks so renderers
//! can style each kind without parsing markdown. Chunks are derived values:
//! they are recomputed from the stored message text on every render and
//! never persisted.

/// A structural piece of a formatted reply.
///
/// Chunks appear in the same order as the text that produced them. A run of
/// consecutive bullet lines collapses into a single `List`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageChunk {
    /// A prose paragraph. Adjacent non-bullet lines are joined with single
    /// spaces.
    Paragraph {
        /// The paragraph text.
        text: String,
    },

    /// A bulleted list. One item per bullet line, markers stripped.
    List {
        /// The list items, in source order.
        items: Vec<String>,
    },
}

/// Splits reply text into paragraph and list chunks.
///
/// Lines are scanned in order and trimmed. A blank line closes whatever
/// chunk is open. A line whose first character is `-`, `*`, or `•` becomes
/// a list item with the marker stripped; any other non-blank line joins the
/// open paragraph. Never fails, and empty input yields no chunks.
///
/// # Examples
///
/// ```
/// # use wayfinder::{MessageChunk, format_message_chunks};
/// let chunks = format_message_chunks("Two good options:\n- Delft\n- Leiden");
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(
///     chunks[1],
///     MessageChunk::List {
///         items: vec!["Delft".to_string(), "Leiden".to_string()],
///     }
/// );
/// ```
pub fn format_message_chunks(text: &str) -> Vec<MessageChunk> {
    let mut chunks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list: Vec<String> = Vec::new();

    fn flush_paragraph(chunks: &mut Vec<MessageChunk>, paragraph: &mut Vec<&str>) {
        if !paragraph.is_empty() {
            chunks.push(MessageChunk::Paragraph {
                text: paragraph.join(" "),
            });
            paragraph.clear();
        }
    }

    fn flush_list(chunks: &mut Vec<MessageChunk>, list: &mut Vec<String>) {
        if !list.is_empty() {
            chunks.push(MessageChunk::List {
                items: std::mem::take(list),
            });
        }
    }

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            flush_paragraph(&mut chunks, &mut paragraph);
            flush_list(&mut chunks, &mut list);
        } else if let Some(item) = bullet_item(line) {
            flush_paragraph(&mut chunks, &mut paragraph);
            list.push(item);
        } else {
            flush_list(&mut chunks, &mut list);
            paragraph.push(line);
        }
    }

    flush_paragraph(&mut chunks, &mut paragraph);
    flush_list(&mut chunks, &mut list);
    chunks
}

/// Returns the item text when the line starts with a bullet marker.
///
/// Only `-`, `*`, and `•` are markers. Numbered lists are deliberately not
/// recognized; `1. like this` stays prose.
fn bullet_item(line: &str) -> Option<String> {
    let mut chars = line.chars();
    match chars.next() {
        Some('-') | Some('*') | Some('•') => {}
        _ => return None,
    }
    Some(chars.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> MessageChunk {
        MessageChunk::Paragraph {
            text: text.to_string(),
        }
    }

    fn list(items: &[&str]) -> MessageChunk {
        MessageChunk::List {
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert_eq!(format_message_chunks(""), vec![]);
    }

    #[test]
    fn blank_lines_only_yield_no_chunks() {
        assert_eq!(format_message_chunks("\n\n\n"), vec![]);
        assert_eq!(format_message_chunks("   \n\t\n  "), vec![]);
    }

    #[test]
    fn single_line_is_a_paragraph() {
        assert_eq!(format_message_chunks("hello"), vec![paragraph("hello")]);
    }

    #[test]
    fn adjacent_lines_join_with_single_spaces() {
        assert_eq!(format_message_chunks("a\nb"), vec![paragraph("a b")]);
        assert_eq!(
            format_message_chunks("  a  \n  b  "),
            vec![paragraph("a b")]
        );
    }

    #[test]
    fn blank_line_splits_paragraphs() {
        assert_eq!(
            format_message_chunks("a\n\nb"),
            vec![paragraph("a"), paragraph("b")]
        );
    }

    #[test]
    fn consecutive_blank_lines_produce_no_empty_chunks() {
        assert_eq!(
            format_message_chunks("a\n\n\n\nb"),
            vec![paragraph("a"), paragraph("b")]
        );
    }

    #[test]
    fn bullet_lines_collapse_into_one_list() {
        assert_eq!(
            format_message_chunks("- x\n- y"),
            vec![list(&["x", "y"])]
        );
    }

    #[test]
    fn all_three_markers_are_equivalent() {
        assert_eq!(
            format_message_chunks("- a\n* b\n• c"),
            vec![list(&["a", "b", "c"])]
        );
    }

    #[test]
    fn marker_without_space_still_strips() {
        assert_eq!(format_message_chunks("-x"), vec![list(&["x"])]);
        assert_eq!(format_message_chunks("-  x"), vec![list(&["x"])]);
    }

    #[test]
    fn lone_marker_yields_an_empty_item() {
        assert_eq!(format_message_chunks("-"), vec![list(&[""])]);
    }

    #[test]
    fn numbered_lines_stay_prose() {
        assert_eq!(format_message_chunks("1. x"), vec![paragraph("1. x")]);
        assert_eq!(
            format_message_chunks("1. x\n2. y"),
            vec![paragraph("1. x 2. y")]
        );
    }

    #[test]
    fn prose_after_bullets_closes_the_list() {
        assert_eq!(
            format_message_chunks("- x\nmore"),
            vec![list(&["x"]), paragraph("more")]
        );
    }

    #[test]
    fn bullets_after_prose_close_the_paragraph() {
        assert_eq!(
            format_message_chunks("intro:\n- x\n- y\ntail"),
            vec![paragraph("intro:"), list(&["x", "y"]), paragraph("tail")]
        );
    }

    #[test]
    fn blank_line_between_lists_splits_them() {
        assert_eq!(
            format_message_chunks("- a\n\n- b"),
            vec![list(&["a"]), list(&["b"])]
        );
    }

    #[test]
    fn interleaved_structure_preserves_order() {
        let text = "First paragraph\nstill first.\n\n- one\n- two\n\nClosing thoughts\n";
        assert_eq!(
            format_message_chunks(text),
            vec![
                paragraph("First paragraph still first."),
                list(&["one", "two"]),
                paragraph("Closing thoughts"),
            ]
        );
    }

    #[test]
    fn crlf_input_trims_the_carriage_return() {
        assert_eq!(
            format_message_chunks("a\r\nb\r\n\r\n- c\r\n"),
            vec![paragraph("a b"), list(&["c"])]
        );
    }

    #[test]
    fn unicode_bullet_in_item_body_is_preserved() {
        assert_eq!(
            format_message_chunks("- tuition: €12,000"),
            vec![list(&["tuition: €12,000"])]
        );
    }
}
