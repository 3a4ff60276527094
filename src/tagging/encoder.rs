use std::collections::HashSet;

use super::tag::{ComponentTag, CompositeTag, Marker};
use crate::fragment::ChunkedFragment;

/// What the encoder needs to know about one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenContext<'a> {
    /// The owning statement has at least one labeled fragment.
    pub statement_inside: bool,
    /// First token of the owning statement.
    pub first_in_statement: bool,
    /// Component label of the owning fragment.
    pub label: Option<&'a str>,
    /// First token of the owning fragment.
    pub first_in_unit: bool,
}

/// Encode a single token.
///
/// Statement and component positions are decided independently. A token of a
/// statement without components is always `O O`.
#[must_use]
pub fn encode(ctx: &TokenContext<'_>) -> CompositeTag {
    if !ctx.statement_inside {
        return CompositeTag::background();
    }

    let statement = if ctx.first_in_statement {
        Marker::Beginning
    } else {
        Marker::Inside
    };

    let component = match ctx.label {
        Some(label) => {
            if ctx.first_in_unit {
                ComponentTag::Beginning(label.to_string())
            } else {
                ComponentTag::Inside(label.to_string())
            }
        }
        _ => ComponentTag::Outside,
    };

    CompositeTag {
        statement,
        component,
    }
}

/// Encode a token sequence.
///
/// `token_units[i]` is the index into `fragments` of the fragment owning token
/// `i`; tokens must be in input order.
#[must_use]
pub fn encode_fragments(fragments: &[ChunkedFragment], token_units: &[usize]) -> Vec<CompositeTag> {
    let inside: HashSet<(&str, &str)> = fragments
        .iter()
        .filter(|f| f.component.is_some())
        .map(ChunkedFragment::statement_key)
        .collect();

    let mut seen_statements: HashSet<(&str, &str)> = HashSet::new();
    let mut previous_unit = None;

    token_units
        .iter()
        .map(|&unit| {
            let fragment = &fragments[unit];
            let key = fragment.statement_key();
            let first_in_unit = previous_unit != Some(unit);
            previous_unit = Some(unit);

            encode(&TokenContext {
                statement_inside: inside.contains(&key),
                first_in_statement: seen_statements.insert(key),
                label: fragment.component.as_deref(),
                first_in_unit,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, component: Option<&str>, stmt: &str) -> ChunkedFragment {
        ChunkedFragment::new("doc", text, component, stmt)
    }

    #[test]
    fn test_encode_background() {
        let tag = encode(&TokenContext {
            statement_inside: false,
            first_in_statement: true,
            label: None,
            first_in_unit: true,
        });
        assert_eq!(tag, CompositeTag::background());
    }

    #[test]
    fn test_encode_beginning_of_statement_and_component() {
        let tag = encode(&TokenContext {
            statement_inside: true,
            first_in_statement: true,
            label: Some("attribute"),
            first_in_unit: true,
        });
        assert_eq!(tag.to_string(), "B B attribute");
    }

    #[test]
    fn test_encode_unlabeled_fragment_inside_statement() {
        let tag = encode(&TokenContext {
            statement_inside: true,
            first_in_statement: false,
            label: None,
            first_in_unit: true,
        });
        assert_eq!(tag.to_string(), "I O");
    }

    #[test]
    fn test_encode_fragments_sequence() {
        let fragments = vec![
            frag("Preamble text", None, "0"),
            frag("The farmer", Some("attribute"), "1"),
            frag("must", Some("deontic"), "1"),
            frag("plant crops", Some("aim"), "1"),
        ];
        // Preamble(2) The farmer(2) must(1) plant crops(2)
        let units = vec![0, 0, 1, 1, 2, 3, 3];
        let tags: Vec<String> = encode_fragments(&fragments, &units)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            tags,
            vec![
                "O O",
                "O O",
                "B B attribute",
                "I I attribute",
                "I B deontic",
                "I B aim",
                "I I aim",
            ]
        );
    }

    #[test]
    fn test_encode_statement_with_partial_labels() {
        let fragments = vec![frag("If", None, "7"), frag("members", Some("attribute"), "7")];
        let tags: Vec<String> = encode_fragments(&fragments, &[0, 1])
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(tags, vec!["B O", "I B attribute"]);
    }

    #[test]
    fn test_encode_same_statement_id_different_sources() {
        let fragments = vec![
            ChunkedFragment::new("a", "x", Some("aim"), "1"),
            ChunkedFragment::new("b", "y", Some("aim"), "1"),
        ];
        let tags = encode_fragments(&fragments, &[0, 1]);
        assert_eq!(tags[0].statement, Marker::Beginning);
        assert_eq!(tags[1].statement, Marker::Beginning);
    }
}
