//! Node model and delimiter set for a parsed interchange.

use termtree::Tree;

/// One node of the parsed interchange tree.
///
/// Child kinds are constrained by construction: loops contain loops and
/// segments, segments contain composites and elements, composites contain
/// elements only. The parser enforces this; serialization relies on it
/// without re-validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Repeating structural grouping. Emits no delimiter of its own.
    Loop { id: String, children: Vec<Node> },
    /// Named record, terminated by the segment terminator.
    Segment { tag: String, children: Vec<Node> },
    /// Group of elements at one segment position, joined by the component
    /// separator.
    Composite { name: String, children: Vec<Node> },
    /// Smallest data-bearing unit. The value may be empty; empty elements
    /// are positional and must be preserved.
    Element { name: String, value: String },
}

impl Node {
    /// Local name: loop id, segment tag, or element/composite name.
    pub fn local_name(&self) -> &str {
        match self {
            Node::Loop { id, .. } => id,
            Node::Segment { tag, .. } => tag,
            Node::Composite { name, .. } | Node::Element { name, .. } => name,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Loop { children, .. }
            | Node::Segment { children, .. }
            | Node::Composite { children, .. } => children,
            Node::Element { .. } => &[],
        }
    }

    /// Text payload of a simple element; empty for structural nodes.
    pub fn text(&self) -> &str {
        match self {
            Node::Element { value, .. } => value,
            _ => "",
        }
    }

    /// Render the node structure for terminal display.
    pub fn to_display_tree(&self) -> Tree<String> {
        let label = match self {
            Node::Element { name, value } => format!("{} = {}", name, value),
            _ => self.local_name().to_string(),
        };
        let leaves: Vec<_> = self.children().iter().map(Node::to_display_tree).collect();
        Tree::new(label).with_leaves(leaves)
    }
}

/// The four single-character delimiter roles of an interchange.
///
/// Fixed fields instead of a keyed map: once a value exists, no role can be
/// missing. Discovery from the ISA header is the only construction point;
/// the set is shared read-only for the life of the interchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Terminates each segment
    pub segment: char,
    /// Separates elements within a segment
    pub element: char,
    /// Separates components within a composite
    pub component: char,
    /// Separates repeated occurrences of the same element
    pub repetition: char,
}

impl Delimiters {
    /// Stock 005010 delimiters.
    pub fn x12_default() -> Self {
        Self {
            segment: '~',
            element: '*',
            component: ':',
            repetition: '^',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_tree_labels() {
        let segment = Node::Segment {
            tag: "AK2".to_string(),
            children: vec![Node::Element {
                name: "AK201".to_string(),
                value: "837".to_string(),
            }],
        };
        let rendered = segment.to_display_tree().to_string();
        assert!(rendered.starts_with("AK2"));
        assert!(rendered.contains("AK201 = 837"));
    }
}
