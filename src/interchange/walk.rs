//! Generic depth-first traversal over decoded documents.
//!
//! The walker knows nothing about UML. It visits every object reachable from
//! a root, whatever key it sits under, and reports the tag it was found
//! under plus its ancestor count. Arrays are transparent: items of a
//! repeated tag are visited at the same depth as a single child would be.
//! XMI 1.x property elements (`UML:Namespace.ownedElement`) are transparent
//! the same way, and its reference stubs (`<UML:Class xmi.idref="c"/>`) are
//! not visited at all, so both encodings yield the same visits.
//!
//! ```text
//! document           depth 0
//! └── xmi:XMI        depth 1
//!     └── uml:Model  depth 2
//!         ├── packagedElement[0]  depth 3
//!         └── packagedElement[1]  depth 3
//! ```

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::decode::ATTR_PREFIX;
use super::node::{self, Node};

/// One visited object.
#[derive(Clone, Copy, Debug)]
pub struct Visit<'a> {
    /// Tag (key) the object was stored under; empty for the walk root.
    pub tag: &'a str,
    /// The object itself.
    pub node: &'a Node,
    /// Number of enclosing objects between the walk root and this one.
    pub depth: usize,
}

impl<'a> Visit<'a> {
    /// Kind tag of the visited node.
    pub fn kind(&self) -> &'a str {
        node::kind_of(self.tag, self.node)
    }

    /// Id of the visited node, if it has one.
    pub fn id(&self) -> Option<&'a str> {
        node::id_of(self.node)
    }
}

/// Whether the walker should descend into the current node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Descend,
    SkipChildren,
}

/// Visit every object under `root` in document order.
///
/// A missing root is a no-op.
pub fn walk<'a>(root: Option<&'a Value>, mut visitor: impl FnMut(Visit<'a>)) {
    walk_pruned(root, |visit| {
        visitor(visit);
        Control::Descend
    });
}

/// Like [`walk`], but the visitor decides whether to enter each subtree.
pub fn walk_pruned<'a>(root: Option<&'a Value>, mut visitor: impl FnMut(Visit<'a>) -> Control) {
    if let Some(root) = root {
        visit_value("", root, 0, &mut visitor);
    }
}

/// Walk the subtrees below `node` without visiting `node` itself.
///
/// Children keep their tags and start at depth 1.
pub fn walk_below<'a>(node: &'a Node, mut visitor: impl FnMut(Visit<'a>) -> Control) {
    for (key, child) in node {
        if matches!(child, Value::Object(_) | Value::Array(_)) {
            visit_value(key, child, 1, &mut visitor);
        }
    }
}

fn visit_value<'a, F>(tag: &'a str, value: &'a Value, depth: usize, visitor: &mut F)
where
    F: FnMut(Visit<'a>) -> Control,
{
    match value {
        Value::Object(node) if node::is_reference_stub(node) => {}
        Value::Object(node) if node::is_property_element(tag, node) => {
            for (key, child) in node {
                if matches!(child, Value::Object(_) | Value::Array(_)) {
                    visit_value(key, child, depth, visitor);
                }
            }
        }
        Value::Object(node) => {
            if visitor(Visit { tag, node, depth }) == Control::SkipChildren {
                return;
            }
            for (key, child) in node {
                if matches!(child, Value::Object(_) | Value::Array(_)) {
                    visit_value(key, child, depth + 1, visitor);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                visit_value(tag, item, depth, visitor);
            }
        }
        _ => {}
    }
}

/// Result of [`tally_kind`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindTally {
    /// Nodes whose kind matched.
    pub nodes: usize,
    /// Summed length of the requested field over the matching nodes.
    pub items: usize,
}

/// Count nodes of `kind` under `root`.
///
/// When `field` is given, also sum that field's length on each match. Some
/// vendors encode multiplicity as an IDREFS attribute (`memberEnd="a b"`)
/// and others as repeated children; both are counted.
pub fn tally_kind(root: Option<&Value>, kind: &str, field: Option<&str>) -> KindTally {
    let mut tally = KindTally::default();
    walk(root, |visit| {
        if visit.kind() == kind {
            tally.nodes += 1;
            if let Some(field) = field {
                tally.items += field_len(visit.node, field);
            }
        }
    });
    tally
}

/// Length of a field: token count for attributes, item count for children.
pub fn field_len(node: &Node, field: &str) -> usize {
    let attr_len = node
        .get(&format!("{ATTR_PREFIX}{field}"))
        .and_then(Value::as_str)
        .map(|v| v.split_whitespace().count())
        .unwrap_or(0);
    let child_len = match node.get(field) {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(_)) => 1,
        _ => 0,
    };
    attr_len + child_len
}

/// Collect every visit matching `predicate`.
pub fn collect<'a>(root: Option<&'a Value>, predicate: impl Fn(&Visit<'a>) -> bool) -> Vec<Visit<'a>> {
    let mut out = Vec::new();
    walk(root, |visit| {
        if predicate(&visit) {
            out.push(visit);
        }
    });
    out
}

/// Collect matches without descending into a match's own subtree.
pub fn collect_outermost<'a>(
    root: Option<&'a Value>,
    predicate: impl Fn(&Visit<'a>) -> bool,
) -> Vec<Visit<'a>> {
    let mut out = Vec::new();
    walk_pruned(root, |visit| {
        if predicate(&visit) {
            out.push(visit);
            Control::SkipChildren
        } else {
            Control::Descend
        }
    });
    out
}

/// Build an id -> node table in one pass. The first node with an id wins.
pub fn index_by_id(root: Option<&Value>) -> FxHashMap<&str, Visit<'_>> {
    let mut index = FxHashMap::default();
    walk(root, |visit| {
        if let Some(id) = visit.id() {
            index.entry(id).or_insert(visit);
        }
    });
    index
}
