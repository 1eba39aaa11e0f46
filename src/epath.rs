//! Minimal path-expression selection over the node tree.
//!
//! `//NAME` selects every node with that local name in document (pre-order)
//! order; further `/NAME` steps narrow to matching children, `*` matches
//! any name, and a single leading `/` anchors the first step at the root.
//! Selection never reorders or deduplicates.

use regex::Regex;

use crate::errors::{EdiError, EdiResult};
use crate::model::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Any,
    Name(String),
}

#[derive(Debug, Clone)]
pub struct Epath {
    anywhere: bool,
    steps: Vec<Step>,
}

impl Epath {
    pub fn parse(expr: &str) -> EdiResult<Self> {
        let name_pattern = Regex::new(r"^[A-Za-z0-9-]+$").unwrap();

        let (anywhere, rest) = if let Some(rest) = expr.strip_prefix("//") {
            (true, rest)
        } else if let Some(rest) = expr.strip_prefix('/') {
            (false, rest)
        } else {
            return Err(selection_error(expr, "expression must start with '/' or '//'"));
        };
        if rest.is_empty() {
            return Err(selection_error(expr, "expression has no steps"));
        }

        let steps = rest
            .split('/')
            .map(|step| {
                if step == "*" {
                    Ok(Step::Any)
                } else if name_pattern.is_match(step) {
                    Ok(Step::Name(step.to_string()))
                } else {
                    Err(selection_error(expr, &format!("invalid step '{step}'")))
                }
            })
            .collect::<EdiResult<Vec<_>>>()?;

        Ok(Self { anywhere, steps })
    }

    /// Evaluate against a tree, returning matches in document order.
    pub fn select<'a>(&self, root: &'a Node) -> Vec<&'a Node> {
        let Some((first, rest)) = self.steps.split_first() else {
            return Vec::new();
        };

        let mut current = Vec::new();
        if self.anywhere {
            collect_matching(root, first, &mut current);
        } else if matches(first, root) {
            current.push(root);
        }

        for step in rest {
            let mut next = Vec::new();
            for node in current {
                for child in node.children() {
                    if matches(step, child) {
                        next.push(child);
                    }
                }
            }
            current = next;
        }

        current
    }
}

fn matches(step: &Step, node: &Node) -> bool {
    match step {
        Step::Any => true,
        Step::Name(name) => node.local_name() == name,
    }
}

fn collect_matching<'a>(node: &'a Node, step: &Step, found: &mut Vec<&'a Node>) {
    if matches(step, node) {
        found.push(node);
    }
    for child in node.children() {
        collect_matching(child, step, found);
    }
}

fn selection_error(expr: &str, reason: &str) -> EdiError {
    EdiError::Selection {
        expr: expr.to_string(),
        reason: reason.to_string(),
    }
}
