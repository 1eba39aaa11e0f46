//! X12 stream parsing: delimiter discovery and tree construction.
//!
//! Two steps: the fixed-width ISA header yields the delimiter set, then the
//! input is tokenized segment by segment into the node tree. Envelope
//! segments bracket implicit loops (GS..GE a group, ST..SE a transaction);
//! inside a transaction an optional schema groups segments into named loops
//! with an explicit stack.

use tracing::{debug, instrument, warn};

use crate::errors::{EdiError, EdiResult};
use crate::model::{Delimiters, Node};
use crate::schema::{LoopDef, TransactionSchema};

/// ISA is fixed-width; the delimiter roles live at fixed byte offsets.
const ISA_LENGTH: usize = 106;
const ELEMENT_OFFSET: usize = 3;
const REPETITION_OFFSET: usize = 82;
const COMPONENT_OFFSET: usize = 104;
const SEGMENT_OFFSET: usize = 105;

const LOOP_INTERCHANGE: &str = "INTERCHANGE";
const LOOP_GROUP: &str = "GROUP";
const LOOP_TRANSACTION: &str = "TRANSACTION";

/// A parsed interchange: the node tree plus the delimiters it arrived with.
#[derive(Debug)]
pub struct Interchange {
    pub root: Node,
    pub delimiters: Delimiters,
}

pub struct InterchangeParser<'a> {
    schema: Option<&'a TransactionSchema>,
}

impl Default for InterchangeParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> InterchangeParser<'a> {
    pub fn new() -> Self {
        Self { schema: None }
    }

    pub fn with_schema(schema: &'a TransactionSchema) -> Self {
        Self {
            schema: Some(schema),
        }
    }

    #[instrument(level = "debug", skip(self, input))]
    pub fn parse(&self, input: &str) -> EdiResult<Interchange> {
        let delimiters = discover_delimiters(input)?;
        let mut segments = Vec::new();

        for (index, raw) in input.split(delimiters.segment).enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            // The leading chunk is the ISA header: fixed-width, so the
            // component and repetition characters inside it are data, not
            // delimiters.
            let segment = if index == 0 {
                tokenize_isa(raw, &delimiters)
            } else {
                tokenize_segment(raw, &delimiters, index)?
            };
            segments.push(segment);
        }

        debug!(segments = segments.len(), "interchange tokenized");
        Ok(Interchange {
            root: self.assemble(segments),
            delimiters,
        })
    }

    /// Group the flat segment sequence into envelope and schema loops.
    fn assemble(&self, segments: Vec<Node>) -> Node {
        let top_defs: &[LoopDef] = self.schema.map(|s| s.loops.as_slice()).unwrap_or(&[]);
        let mut interchange: Vec<Node> = Vec::new();
        let mut group: Option<Vec<Node>> = None;
        let mut transaction: Option<LoopMatcher> = None;

        for segment in segments {
            let tag = segment.local_name().to_string();
            match tag.as_str() {
                "GS" => {
                    flush_open_transaction(&mut transaction, &mut group, &mut interchange);
                    flush_open_group(&mut group, &mut interchange);
                    group = Some(vec![segment]);
                }
                "GE" => {
                    flush_open_transaction(&mut transaction, &mut group, &mut interchange);
                    if let Some(mut children) = group.take() {
                        children.push(segment);
                        interchange.push(loop_node(LOOP_GROUP, children));
                    } else {
                        warn!("GE without matching GS");
                        interchange.push(segment);
                    }
                }
                "ST" => {
                    flush_open_transaction(&mut transaction, &mut group, &mut interchange);
                    let mut matcher = LoopMatcher::new(top_defs);
                    matcher.push_segment(segment);
                    transaction = Some(matcher);
                }
                "SE" => {
                    if let Some(matcher) = transaction.take() {
                        let mut children = matcher.finish();
                        children.push(segment);
                        let node = loop_node(LOOP_TRANSACTION, children);
                        match group.as_mut() {
                            Some(g) => g.push(node),
                            None => interchange.push(node),
                        }
                    } else {
                        warn!("SE without matching ST");
                        match group.as_mut() {
                            Some(g) => g.push(segment),
                            None => interchange.push(segment),
                        }
                    }
                }
                "IEA" => {
                    flush_open_transaction(&mut transaction, &mut group, &mut interchange);
                    flush_open_group(&mut group, &mut interchange);
                    interchange.push(segment);
                }
                _ => {
                    if let Some(matcher) = transaction.as_mut() {
                        matcher.push_segment(segment);
                    } else if let Some(children) = group.as_mut() {
                        children.push(segment);
                    } else {
                        interchange.push(segment);
                    }
                }
            }
        }

        flush_open_transaction(&mut transaction, &mut group, &mut interchange);
        flush_open_group(&mut group, &mut interchange);
        loop_node(LOOP_INTERCHANGE, interchange)
    }
}

/// Read the delimiter set out of the ISA header.
///
/// An alphanumeric ISA11 means the interchange predates 00402 and defines
/// no repetition separator; that role is then unavailable and the
/// interchange is rejected rather than silently defaulted.
pub fn discover_delimiters(input: &str) -> EdiResult<Delimiters> {
    let bytes = input.as_bytes();

    if bytes.len() < ISA_LENGTH {
        return Err(EdiError::Parse {
            index: 0,
            reason: "input is shorter than the fixed-width ISA header".to_string(),
        });
    }
    if &bytes[..3] != b"ISA" {
        return Err(EdiError::Parse {
            index: 0,
            reason: "interchange does not start with an ISA header".to_string(),
        });
    }

    let roles = [
        ("element", ELEMENT_OFFSET),
        ("repetition", REPETITION_OFFSET),
        ("component", COMPONENT_OFFSET),
        ("segment", SEGMENT_OFFSET),
    ];

    let mut chars = [' '; 4];
    for (slot, (role, offset)) in chars.iter_mut().zip(roles) {
        let byte = bytes[offset];
        if !byte.is_ascii() {
            return Err(EdiError::Parse {
                index: 0,
                reason: format!("non-ASCII byte at ISA offset {offset} ({role} separator)"),
            });
        }
        *slot = char::from(byte);
    }
    let [element, repetition, component, segment] = chars;

    if repetition.is_ascii_alphanumeric() {
        return Err(EdiError::Delimiter {
            role: "repetition",
            reason: format!(
                "ISA11 is '{repetition}'; interchanges before 00402 carry no repetition separator"
            ),
        });
    }
    for (index, (role, _)) in roles.into_iter().enumerate() {
        if chars[index + 1..].contains(&chars[index]) {
            return Err(EdiError::Delimiter {
                role,
                reason: format!("character '{}' is assigned to more than one role", chars[index]),
            });
        }
    }

    let delimiters = Delimiters {
        segment,
        element,
        component,
        repetition,
    };
    debug!(?delimiters, "delimiters discovered");
    Ok(delimiters)
}

/// ISA elements are taken verbatim: the component and repetition separators
/// are themselves data at ISA16 and ISA11.
fn tokenize_isa(raw: &str, delimiters: &Delimiters) -> Node {
    let mut fields = raw.split(delimiters.element);
    let tag = fields.next().unwrap_or_default().to_string();
    let children = fields
        .enumerate()
        .map(|(position, value)| Node::Element {
            name: format!("{}{:02}", tag, position + 1),
            value: value.to_string(),
        })
        .collect();
    Node::Segment { tag, children }
}

fn tokenize_segment(raw: &str, delimiters: &Delimiters, index: usize) -> EdiResult<Node> {
    let mut fields = raw.split(delimiters.element);
    let tag = fields.next().unwrap_or_default().to_string();

    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(EdiError::Parse {
            index,
            reason: format!("invalid segment tag '{tag}'"),
        });
    }

    let mut children = Vec::new();
    for (position, field) in fields.enumerate() {
        let name = format!("{}{:02}", tag, position + 1);
        // Occurrences of a repeated element share the position's name
        for occurrence in field.split(delimiters.repetition) {
            if occurrence.contains(delimiters.component) {
                let components = occurrence
                    .split(delimiters.component)
                    .enumerate()
                    .map(|(component, value)| Node::Element {
                        name: format!("{}-{:02}", name, component + 1),
                        value: value.to_string(),
                    })
                    .collect();
                children.push(Node::Composite {
                    name: name.clone(),
                    children: components,
                });
            } else {
                children.push(Node::Element {
                    name: name.clone(),
                    value: occurrence.to_string(),
                });
            }
        }
    }

    Ok(Node::Segment { tag, children })
}

fn loop_node(id: &str, children: Vec<Node>) -> Node {
    Node::Loop {
        id: id.to_string(),
        children,
    }
}

fn flush_open_transaction(
    transaction: &mut Option<LoopMatcher<'_>>,
    group: &mut Option<Vec<Node>>,
    interchange: &mut Vec<Node>,
) {
    if let Some(matcher) = transaction.take() {
        warn!("transaction not terminated by SE; closing at envelope boundary");
        let node = loop_node(LOOP_TRANSACTION, matcher.finish());
        match group {
            Some(children) => children.push(node),
            None => interchange.push(node),
        }
    }
}

fn flush_open_group(group: &mut Option<Vec<Node>>, interchange: &mut Vec<Node>) {
    if let Some(children) = group.take() {
        warn!("group not terminated by GE; closing at envelope boundary");
        interchange.push(loop_node(LOOP_GROUP, children));
    }
}

struct LoopFrame<'a> {
    def: &'a LoopDef,
    children: Vec<Node>,
}

/// Stack matcher that groups a transaction's segments into schema loops.
///
/// For each segment tag, from the innermost open loop outward: the loop's
/// own start tag closes it and opens a sibling instance; a child loop's
/// start tag descends; a tag listed in the loop's segments appends;
/// anything else closes the loop and retries one level up. With no schema
/// every segment is a direct child of the transaction.
struct LoopMatcher<'a> {
    defs: &'a [LoopDef],
    open: Vec<LoopFrame<'a>>,
    children: Vec<Node>,
}

impl<'a> LoopMatcher<'a> {
    fn new(defs: &'a [LoopDef]) -> Self {
        Self {
            defs,
            open: Vec::new(),
            children: Vec::new(),
        }
    }

    fn push_segment(&mut self, segment: Node) {
        let tag = segment.local_name().to_string();

        loop {
            if let Some(frame) = self.open.last() {
                if frame.def.start == tag {
                    self.close_innermost();
                    continue;
                }
            }

            let context: &'a [LoopDef] = match self.open.last() {
                Some(frame) => {
                    let def: &'a LoopDef = frame.def;
                    &def.loops
                }
                None => self.defs,
            };
            if let Some(def) = context.iter().find(|d| d.start == tag) {
                self.open.push(LoopFrame {
                    def,
                    children: vec![segment],
                });
                return;
            }

            match self.open.last_mut() {
                Some(frame) if frame.def.segments.contains(&tag) => {
                    frame.children.push(segment);
                    return;
                }
                Some(_) => self.close_innermost(),
                None => {
                    self.children.push(segment);
                    return;
                }
            }
        }
    }

    fn close_innermost(&mut self) {
        let Some(frame) = self.open.pop() else {
            return;
        };
        let node = Node::Loop {
            id: frame.def.id.clone(),
            children: frame.children,
        };
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.children.push(node),
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.open.is_empty() {
            self.close_innermost();
        }
        self.children
    }
}
