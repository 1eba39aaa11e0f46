//! Tests for selection expression parsing and evaluation

use ediq::epath::Epath;
use ediq::errors::EdiError;
use ediq::model::Node;

fn element(name: &str, value: &str) -> Node {
    Node::Element {
        name: name.to_string(),
        value: value.to_string(),
    }
}

// INTERCHANGE
// └── L0002
//     ├── IK3 (IK301)
//     └── CTX (CTX01 composite: CTX01-01, CTX01-02)
// └── CTX (CTX01 element)
fn sample_tree() -> Node {
    Node::Loop {
        id: "INTERCHANGE".to_string(),
        children: vec![
            Node::Loop {
                id: "L0002".to_string(),
                children: vec![
                    Node::Segment {
                        tag: "IK3".to_string(),
                        children: vec![element("IK301", "CLM")],
                    },
                    Node::Segment {
                        tag: "CTX".to_string(),
                        children: vec![Node::Composite {
                            name: "CTX01".to_string(),
                            children: vec![
                                element("CTX01-01", "CLM01"),
                                element("CTX01-02", "123456789"),
                            ],
                        }],
                    },
                ],
            },
            Node::Segment {
                tag: "CTX".to_string(),
                children: vec![element("CTX01", "TRAILING")],
            },
        ],
    }
}

// ============================================================
// Expression Parsing Tests
// ============================================================

#[test]
fn given_expression_without_leading_slash_when_parsing_then_selection_error() {
    let result = Epath::parse("AK2");
    assert!(matches!(result, Err(EdiError::Selection { .. })));
}

#[test]
fn given_empty_descendant_expression_when_parsing_then_selection_error() {
    let result = Epath::parse("//");
    assert!(matches!(result, Err(EdiError::Selection { .. })));
}

#[test]
fn given_trailing_slash_when_parsing_then_selection_error() {
    let result = Epath::parse("//AK2/");
    assert!(matches!(result, Err(EdiError::Selection { .. })));
}

#[test]
fn given_step_with_invalid_characters_when_parsing_then_selection_error() {
    let result = Epath::parse("//AK2[1]");
    assert!(matches!(result, Err(EdiError::Selection { .. })));
}

// ============================================================
// Evaluation Tests
// ============================================================

#[test]
fn given_descendant_name_when_selecting_then_all_depths_match_in_document_order() {
    let tree = sample_tree();
    let epath = Epath::parse("//CTX01").unwrap();
    let matches = epath.select(&tree);

    // The composite inside L0002 comes before the trailing element
    assert_eq!(matches.len(), 2);
    assert!(matches!(matches[0], Node::Composite { .. }));
    assert!(matches!(matches[1], Node::Element { .. }));
}

#[test]
fn given_child_step_when_selecting_then_only_children_of_matches_survive() {
    let tree = sample_tree();
    let epath = Epath::parse("//CTX01/CTX01-02").unwrap();
    let matches = epath.select(&tree);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text(), "123456789");
}

#[test]
fn given_rooted_expression_when_selecting_then_first_step_anchors_at_root() {
    let tree = sample_tree();

    let root_match = Epath::parse("/INTERCHANGE").unwrap().select(&tree);
    assert_eq!(root_match.len(), 1);
    assert_eq!(root_match[0].local_name(), "INTERCHANGE");

    // IK3 is not a child of the root, only of L0002
    let not_anchored = Epath::parse("/IK3").unwrap().select(&tree);
    assert!(not_anchored.is_empty());
}

#[test]
fn given_wildcard_step_when_selecting_then_every_child_matches() {
    let tree = sample_tree();
    let matches = Epath::parse("/INTERCHANGE/*").unwrap().select(&tree);
    assert_eq!(matches.len(), 2);
}

#[test]
fn given_name_with_no_occurrences_when_selecting_then_empty() {
    let tree = sample_tree();
    let matches = Epath::parse("//ZZZ").unwrap().select(&tree);
    assert!(matches.is_empty());
}
