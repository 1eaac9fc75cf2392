//! Per-line source snapshots: slice the original text around a type
//! error's critical nodes, tagging each slice `error` (in the fix's MCS),
//! `critical` (implicated but not removed by this fix), or `normal` (the
//! surrounding text filling the gaps between them).

use rustc_hash::FxHashMap;

use tyerr_common::span::Range;

/// How long a node's own text must be before `display_name` starts
/// truncating it to a `head...tail` shorthand. Not specified numerically
/// in the source material; twelve characters keeps short identifiers and
/// operators intact while still shortening a multi-line binding.
const DISPLAY_NAME_THRESHOLD: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanTag {
    Normal,
    Critical,
    Error,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Span {
    pub tag: SpanTag,
    pub text: String,
    pub from: u32,
    pub to: u32,
    pub node: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SnapshotLine {
    pub line_number: u32,
    pub spans: Vec<Span>,
}

fn slice_chars(chars: &[char], from: u32, to: u32) -> String {
    if to <= from {
        return String::new();
    }
    chars[(from - 1) as usize..(to - 1) as usize].iter().collect()
}

/// Builds one fix's source snapshot: every line touched by a node in
/// `critical_nodes`, with `mcs_nodes` spans tagged `error` and the rest
/// `critical`, gaps filled with `normal`.
pub fn build_snapshot(
    critical_nodes: &[u32],
    mcs_nodes: &rustc_hash::FxHashSet<u32>,
    node_range: &FxHashMap<u32, Range>,
    source: &str,
) -> Vec<SnapshotLine> {
    let lines: Vec<&str> = source.split('\n').collect();

    let mut line_has_node: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
    for &node in critical_nodes {
        if let Some(range) = node_range.get(&node) {
            for line in range.from.line..=range.to.line {
                line_has_node.entry(line).or_default().push(node);
            }
        }
    }

    let mut result = Vec::new();
    for (idx, line_text) in lines.iter().enumerate() {
        let line_number = idx as u32 + 1;
        let Some(nodes) = line_has_node.get(&line_number) else { continue };
        if nodes.is_empty() {
            continue;
        }

        let line_chars: Vec<char> = line_text.chars().collect();
        let line_length = line_chars.len() as u32;

        let mut critical_spans: Vec<Span> = nodes
            .iter()
            .filter_map(|&node| {
                let range = node_range.get(&node)?;
                let (from, to) = range.clip_to_line(line_number, line_length)?;
                let tag = if mcs_nodes.contains(&node) { SpanTag::Error } else { SpanTag::Critical };
                Some(Span { tag, text: slice_chars(&line_chars, from, to), from, to, node: Some(node) })
            })
            .collect();
        critical_spans.sort_by_key(|s| s.from);

        let mut spans = Vec::with_capacity(critical_spans.len() * 2 + 1);
        let mut cursor = 1u32;
        for span in &critical_spans {
            if span.from > cursor {
                spans.push(Span {
                    tag: SpanTag::Normal,
                    text: slice_chars(&line_chars, cursor, span.from),
                    from: cursor,
                    to: span.from,
                    node: None,
                });
            }
            cursor = cursor.max(span.to);
        }
        if cursor <= line_length {
            spans.push(Span {
                tag: SpanTag::Normal,
                text: slice_chars(&line_chars, cursor, line_length + 1),
                from: cursor,
                to: line_length + 1,
                node: None,
            });
        }
        spans.extend(critical_spans);
        spans.sort_by_key(|s| s.from);

        result.push(SnapshotLine { line_number, spans });
    }
    result
}

/// A node's human-readable label: its own source text verbatim if short,
/// otherwise the first and last four characters joined by `...`.
pub fn display_name(range: &Range, source: &str) -> String {
    let text = &source[range.from.offset as usize..range.to.offset as usize];
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= DISPLAY_NAME_THRESHOLD {
        return text.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyerr_common::span::Position;

    fn range(from_line: u32, from_col: u32, to_line: u32, to_col: u32, from_offset: u32, to_offset: u32) -> Range {
        Range::new(Position::new(from_offset, from_line, from_col), Position::new(to_offset, to_line, to_col))
    }

    #[test]
    fn single_node_on_one_line_is_tagged_critical_by_default() {
        let source = "x = 1 + 'a'";
        let mut node_range = FxHashMap::default();
        node_range.insert(1u32, range(1, 9, 1, 12, 8, 11));
        let mcs_nodes = rustc_hash::FxHashSet::default();

        let snapshot = build_snapshot(&[1], &mcs_nodes, &node_range, source);
        assert_eq!(snapshot.len(), 1);
        let line = &snapshot[0];
        assert_eq!(line.line_number, 1);
        let critical = line.spans.iter().find(|s| s.node == Some(1)).unwrap();
        assert_eq!(critical.tag, SpanTag::Critical);
        assert_eq!(critical.text, "'a'");
    }

    #[test]
    fn mcs_node_is_tagged_error() {
        let source = "x = 1 + 'a'";
        let mut node_range = FxHashMap::default();
        node_range.insert(1u32, range(1, 9, 1, 12, 8, 11));
        let mcs_nodes: rustc_hash::FxHashSet<u32> = [1u32].into_iter().collect();

        let snapshot = build_snapshot(&[1], &mcs_nodes, &node_range, source);
        let critical = snapshot[0].spans.iter().find(|s| s.node == Some(1)).unwrap();
        assert_eq!(critical.tag, SpanTag::Error);
    }

    #[test]
    fn gaps_are_filled_with_normal_spans_and_sorted_by_column() {
        let source = "x = 1 + 'a'";
        let mut node_range = FxHashMap::default();
        node_range.insert(1u32, range(1, 9, 1, 12, 8, 11));
        let mcs_nodes = rustc_hash::FxHashSet::default();

        let snapshot = build_snapshot(&[1], &mcs_nodes, &node_range, source);
        let spans = &snapshot[0].spans;
        assert_eq!(spans[0].tag, SpanTag::Normal);
        assert_eq!(spans[0].text, "x = 1 + ");
        assert_eq!(spans[1].tag, SpanTag::Critical);
        for pair in spans.windows(2) {
            assert!(pair[0].from <= pair[1].from);
        }
    }

    #[test]
    fn short_node_text_is_not_truncated() {
        let range = range(1, 1, 1, 2, 0, 1);
        assert_eq!(display_name(&range, "x"), "x");
    }

    #[test]
    fn long_node_text_truncates_to_head_and_tail() {
        let source = "abcdefghijklmnop";
        let r = range(1, 1, 1, 1 + source.len() as u32, 0, source.len() as u32);
        assert_eq!(display_name(&r, source), "abcd...mnop");
    }
}
