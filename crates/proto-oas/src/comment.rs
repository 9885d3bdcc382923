//! Leading-comment resolution and description/example splitting.
//!
//! Compiled descriptors carry comments in `source_code_info`, keyed by
//! declaration path (`descriptor.proto` field numbers interleaved with
//! indexes). [`CommentMap`] indexes them per file; [`split_comment`] divides
//! a comment into the schema description and an optional example at the
//! last case-insensitive `Example:` marker.

use std::collections::HashMap;

use proto_oas_core::descriptor::FileDescriptorProto;

/// Declaration path components (`descriptor.proto` field numbers).
pub(crate) mod tags {
    /// `FileDescriptorProto.message_type`
    pub(crate) const FILE_MESSAGE: i32 = 4;
    /// `FileDescriptorProto.service`
    pub(crate) const FILE_SERVICE: i32 = 6;
    /// `DescriptorProto.field`
    pub(crate) const MESSAGE_FIELD: i32 = 2;
    /// `DescriptorProto.nested_type`
    pub(crate) const MESSAGE_NESTED: i32 = 3;
    /// `ServiceDescriptorProto.method`
    pub(crate) const SERVICE_METHOD: i32 = 2;
}

/// Extend a declaration path with one child component.
pub(crate) fn child_path(parent: &[i32], tag: i32, index: usize) -> Vec<i32> {
    let mut path = Vec::with_capacity(parent.len() + 2);
    path.extend_from_slice(parent);
    path.push(tag);
    // Declaration counts fit i32; an overflow would only drop the comment.
    path.push(i32::try_from(index).unwrap_or(i32::MAX));
    path
}

/// Leading comments of one file, keyed by declaration path.
#[derive(Debug, Default)]
pub(crate) struct CommentMap {
    by_path: HashMap<Vec<i32>, String>,
}

impl CommentMap {
    pub(crate) fn from_file(file: &FileDescriptorProto) -> Self {
        let mut by_path = HashMap::new();
        if let Some(info) = &file.source_code_info {
            for location in &info.location {
                if let Some(comment) = &location.leading_comments {
                    if !comment.is_empty() {
                        by_path.insert(location.path.clone(), comment.clone());
                    }
                }
            }
        }
        Self { by_path }
    }

    /// Leading comment for a declaration, empty when none was recorded.
    pub(crate) fn leading(&self, path: &[i32]) -> &str {
        self.by_path.get(path).map_or("", String::as_str)
    }
}

/// A comment divided into description and example halves.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedComment {
    /// Line breaks preserved, leading spaces stripped per line.
    pub(crate) description: String,
    /// Collapsed to a single line-break-free string.
    pub(crate) example: String,
}

const EXAMPLE_MARKER: &[u8] = b"example:";

/// Split a leading comment at the last case-insensitive `Example:` marker.
pub(crate) fn split_comment(raw: &str) -> ParsedComment {
    let text = raw.trim();

    match find_last_marker(text) {
        Some(at) => ParsedComment {
            description: build_description(&text[..at]),
            example: build_example(&text[at + EXAMPLE_MARKER.len()..]),
        },
        None => ParsedComment {
            description: build_description(text),
            example: String::new(),
        },
    }
}

fn find_last_marker(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let len = EXAMPLE_MARKER.len();
    if bytes.len() < len {
        return None;
    }
    (0..=bytes.len() - len)
        .rev()
        .find(|&i| bytes[i..i + len].eq_ignore_ascii_case(EXAMPLE_MARKER))
}

/// Every line newline-terminated with leading spaces stripped, so indented
/// comment continuation lines render flush in the document.
fn build_description(text: &str) -> String {
    let mut out = String::new();
    for line in text.trim().lines() {
        out.push_str(line.trim_start_matches(' '));
        out.push('\n');
    }
    out
}

fn build_example(text: &str) -> String {
    text.trim().lines().map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proto_oas_core::descriptor::{Location, SourceCodeInfo};

    use super::*;

    #[test]
    fn splits_description_and_example() {
        let parsed = split_comment("The user's email address.\nExample: jane@shop.example");
        assert_eq!(parsed.description, "The user's email address.\n");
        assert_eq!(parsed.example, "jane@shop.example");
    }

    #[test]
    fn marker_is_case_insensitive() {
        let parsed = split_comment("Count of items.\nEXAMPLE: 42");
        assert_eq!(parsed.description, "Count of items.\n");
        assert_eq!(parsed.example, "42");
    }

    #[test]
    fn last_marker_wins() {
        let parsed = split_comment("Shows an example: of usage.\nExample: real-value");
        assert_eq!(parsed.description, "Shows an example: of usage.\n");
        assert_eq!(parsed.example, "real-value");
    }

    #[test]
    fn description_preserves_line_breaks() {
        let parsed = split_comment("First line.\n  Second line, indented.\nThird line.");
        assert_eq!(
            parsed.description,
            "First line.\nSecond line, indented.\nThird line.\n"
        );
        assert_eq!(parsed.example, "");
    }

    #[test]
    fn example_collapses_to_one_line() {
        let parsed = split_comment("A list.\nExample:\n  [1,\n   2,\n   3]");
        assert_eq!(parsed.description, "A list.\n");
        assert_eq!(parsed.example, "[1,2,3]");
    }

    #[test]
    fn no_marker_means_no_example() {
        let parsed = split_comment("Plain description only.");
        assert_eq!(parsed.description, "Plain description only.\n");
        assert_eq!(parsed.example, "");
    }

    #[test]
    fn empty_comment_yields_empty_parts() {
        assert_eq!(split_comment(""), ParsedComment::default());
        assert_eq!(split_comment("   \n  "), ParsedComment::default());
    }

    #[test]
    fn comment_map_lookup() {
        let file = FileDescriptorProto {
            source_code_info: Some(SourceCodeInfo {
                location: vec![
                    Location {
                        path: vec![tags::FILE_MESSAGE, 0],
                        leading_comments: Some(" A user account.\n".to_string()),
                    },
                    Location {
                        path: vec![tags::FILE_MESSAGE, 0, tags::MESSAGE_FIELD, 1],
                        leading_comments: Some(" The email.\n".to_string()),
                    },
                    Location {
                        path: vec![tags::FILE_SERVICE, 0],
                        leading_comments: None,
                    },
                ],
            }),
            ..Default::default()
        };

        let map = CommentMap::from_file(&file);
        assert_eq!(map.leading(&[4, 0]), " A user account.\n");
        assert_eq!(map.leading(&[4, 0, 2, 1]), " The email.\n");
        assert_eq!(map.leading(&[6, 0]), "");
        assert_eq!(map.leading(&[4, 7]), "");
    }

    #[test]
    fn child_path_extends_parent() {
        assert_eq!(child_path(&[], tags::FILE_MESSAGE, 2), vec![4, 2]);
        assert_eq!(
            child_path(&[4, 2], tags::MESSAGE_NESTED, 0),
            vec![4, 2, 3, 0]
        );
    }
}
