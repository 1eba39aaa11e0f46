//! Reconstruction of delimited EDI text from a node tree.
//!
//! Serialization is pure and stateless: recursive descent over the node,
//! consulting the delimiter set and appending to an output buffer. Element
//! text is emitted verbatim; no escaping is performed.
//!
//! Whether two adjacent children of a segment are joined by the repetition
//! separator or the element separator is decided solely by local-name
//! equality of the neighbors, because the tree carries no explicit
//! repetition marker. Distinct but identically named adjacent elements
//! would therefore be joined as a repetition. Known limitation.

use itertools::Itertools;

use crate::model::{Delimiters, Node};

/// Reconstruct a node as delimited EDI text.
///
/// `line_format` puts each segment of a loop on its own line; it has no
/// effect on segments, composites and elements serialized directly.
pub fn serialize(node: &Node, delimiters: &Delimiters, line_format: bool) -> String {
    let mut output = String::new();
    match node {
        Node::Loop { children, .. } => {
            serialize_loop(children, delimiters, line_format, &mut output)
        }
        Node::Segment { tag, children } => {
            serialize_segment(tag, children, delimiters, &mut output)
        }
        Node::Composite { children, .. } => serialize_composite(children, delimiters, &mut output),
        Node::Element { value, .. } => output.push_str(value),
    }
    output
}

/// Loops delegate to their segments and nested loops; all delimiters come
/// from the segments themselves. In line-formatted mode every segment,
/// including the last, is followed by one line terminator.
fn serialize_loop(children: &[Node], delimiters: &Delimiters, line_format: bool, output: &mut String) {
    for child in children {
        match child {
            Node::Loop { children, .. } => {
                serialize_loop(children, delimiters, line_format, output)
            }
            Node::Segment { tag, children } => {
                serialize_segment(tag, children, delimiters, output);
                if line_format {
                    output.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn serialize_segment(tag: &str, children: &[Node], delimiters: &Delimiters, output: &mut String) {
    output.push_str(tag);
    output.push(delimiters.element);

    let mut previous: Option<&str> = None;

    for child in children {
        if let Some(previous) = previous {
            if child.local_name() == previous {
                output.push(delimiters.repetition);
            } else {
                output.push(delimiters.element);
            }
        }

        match child {
            Node::Composite { children, .. } => {
                serialize_composite(children, delimiters, output)
            }
            _ => output.push_str(child.text()),
        }

        previous = Some(child.local_name());
    }

    output.push(delimiters.segment);
}

fn serialize_composite(components: &[Node], delimiters: &Delimiters, output: &mut String) {
    let separator = delimiters.component.to_string();
    output.push_str(&components.iter().map(Node::text).join(&separator));
}
