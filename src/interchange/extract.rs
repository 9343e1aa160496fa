//! Model extraction from decoded XMI.
//!
//! [`parse`] is the entry point. Extraction runs as a handful of
//! independent walks over the decoded tree, each building one table, and a
//! final assembly that stitches the tables into a [`Model`]:
//!
//! ```text
//! decode ─► locate model root
//!        ├─► reference tables     (whole document)
//!        ├─► stereotype table     (whole document: profile applications)
//!        ├─► depth map            (model root)
//!        ├─► package map          (model root)
//!        ├─► elements + features + class stats
//!        ├─► relationships        (model root)
//!        ├─► diagrams             (whole document)
//!        └─► metrics, quality, search index
//! ```
//!
//! Nothing below the decoder fails. A node whose shape is not recognized
//! simply contributes nothing.

use std::path::Path;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;

use super::decode;
use super::metrics::{Metrics, QualitySummary};
use super::model::{
    Attribute, ClassStat, Diagram, Model, ModelElement, Port, PortDirection, ROOT_PACKAGE,
    Relationship, join_path,
};
use super::node::{self, Node};
use super::resolve::{self, Endpoint, ReferenceTables};
use super::search::SearchIndex;
use super::walk::{self, Control, Visit};
use super::InterchangeError;

/// Wrapper tags that enclose the model in an XMI document.
const WRAPPER_KEYS: &[&str] = &["xmi:XMI", "XMI", "xmi:xmi"];

/// XMI 1.x content section inside the wrapper.
const CONTENT_KEY: &str = "XMI.content";

/// Tags of the model node itself.
const MODEL_KEYS: &[&str] = &[
    "uml:Model",
    "UML:Model",
    "Model",
    "sysml:Model",
    "xmi:Model",
    "uml:model",
];

/// Kinds extracted as model elements.
const ELEMENT_KINDS: &[&str] = &[
    "Class",
    "Package",
    "Requirement",
    "Block",
    "Component",
    "Interface",
    "InterfaceBlock",
    "ConstraintBlock",
    "Actor",
    "UseCase",
    "Activity",
    "StateMachine",
    "DataType",
    "Enumeration",
    "Signal",
];

/// Kinds whose owned attributes and ports are extracted.
const CLASSIFIER_KINDS: &[&str] = &[
    "Class",
    "Block",
    "Component",
    "Interface",
    "InterfaceBlock",
    "ConstraintBlock",
];

/// Kinds read as client → supplier relationships.
const DEPENDENCY_KINDS: &[&str] = &[
    "Dependency",
    "Usage",
    "Abstraction",
    "Realization",
    "InterfaceRealization",
    "Substitution",
    "Satisfy",
    "Verify",
    "DeriveReqt",
    "Trace",
    "Refine",
    "Copy",
    "Allocate",
];

/// Parse XMI text into a model.
///
/// Fails only when the text cannot be decoded as XML.
pub fn parse(text: &str) -> Result<Model, InterchangeError> {
    let document = decode::decode(text)?;
    Ok(extract(&document))
}

/// Read and parse an XMI file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Model, InterchangeError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse(&text)
}

/// Build a model from an already decoded document.
pub fn extract(document: &Value) -> Model {
    Extractor::new(document).run()
}

/// Find the model node, falling back to the wrapper or the document itself.
pub fn locate_model_root(document: &Value) -> &Value {
    let mut current = document;
    if let Some(inner) = WRAPPER_KEYS
        .iter()
        .find_map(|k| current.get(k))
        .filter(|v| v.is_object())
    {
        current = inner;
    }
    if let Some(content) = current.get(CONTENT_KEY).filter(|v| v.is_object()) {
        current = content;
    }
    MODEL_KEYS
        .iter()
        .find_map(|k| current.get(k))
        .filter(|v| v.is_object())
        .unwrap_or(current)
}

/// Ancestor count from `root` for every id-bearing node beneath it.
pub fn depth_map(root: &Value) -> FxHashMap<&str, usize> {
    let mut depths = FxHashMap::default();
    walk::walk(Some(root), |visit| {
        if let Some(id) = visit.id() {
            depths.entry(id).or_insert(visit.depth);
        }
    });
    depths
}

/// Enclosing package path for every id-bearing node beneath `root`.
///
/// A node's path names the packages *around* it; a package's own name only
/// appears in the paths of its contents.
pub fn package_map(root: &Value) -> FxHashMap<&str, String> {
    let mut paths = FxHashMap::default();
    let mut scopes: Vec<(usize, String)> = Vec::new();
    walk::walk(Some(root), |visit| {
        while scopes.last().is_some_and(|(depth, _)| *depth >= visit.depth) {
            scopes.pop();
        }
        let current = scopes
            .last()
            .map(|(_, path)| path.as_str())
            .unwrap_or(ROOT_PACKAGE);
        let id = visit.id();
        if let Some(id) = id {
            paths.entry(id).or_insert_with(|| current.to_string());
        }
        if visit.kind() == "Package" {
            let segment = node::name_of(visit.node)
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .or(id)
                .unwrap_or("Package");
            let path = join_path(current, segment);
            scopes.push((visit.depth, path));
        }
    });
    paths
}

// ============================================================================
// STEREOTYPES
// ============================================================================

/// Stereotypes applied through profile applications.
///
/// Covers `<sysml:Block base_Class="id"/>` (UML profile style) and
/// `<element xmi:idref="id"><properties stereotype="block"/></element>`
/// (Enterprise Architect extension style).
#[derive(Debug, Default)]
pub struct StereotypeTable<'a> {
    names: FxHashMap<&'a str, Vec<&'a str>>,
    directions: FxHashMap<&'a str, &'a str>,
}

impl<'a> StereotypeTable<'a> {
    pub fn build(document: &'a Value) -> Self {
        let mut table = Self::default();
        walk::walk(Some(document), |visit| {
            let n = visit.node;
            if node::is_stereotype_application(n) {
                let stereotype = visit.kind();
                let direction = node::attr(n, "direction");
                for (key, value) in node::attrs(n) {
                    if !node::local_name(key).starts_with("base_") {
                        continue;
                    }
                    for base in value.split_whitespace() {
                        table.add(base, stereotype);
                        if let Some(direction) = direction {
                            table.directions.entry(base).or_insert(direction);
                        }
                    }
                }
            } else if let Some(target) = node::attr(n, "xmi:idref") {
                let applied = node::children(n, "properties")
                    .find_map(|p| node::attr(p, "stereotype"))
                    .filter(|s| !s.trim().is_empty());
                if let Some(stereotype) = applied {
                    table.add(target, stereotype.trim());
                }
            }
        });
        table
    }

    fn add(&mut self, base: &'a str, stereotype: &'a str) {
        let entry = self.names.entry(base).or_default();
        if !entry.contains(&stereotype) {
            entry.push(stereotype);
        }
    }

    /// Applied stereotypes for an element, joined with `, `.
    pub fn get(&self, id: &str) -> Option<String> {
        self.names.get(id).map(|names| names.join(", "))
    }

    /// Direction carried by a port's stereotype application (`FlowPort`).
    pub fn direction(&self, id: &str) -> Option<&'a str> {
        self.directions.get(id).copied()
    }
}

/// Best-effort stereotype lookup inside an element's own subtree.
///
/// Only descends into id-less children (vendor property blocks), never into
/// nested elements, which carry their own stereotypes.
pub fn inline_stereotype(n: &Node) -> Option<String> {
    if let Some(found) = stereotype_in(n) {
        return Some(found);
    }
    let mut found = None;
    walk::walk_below(n, |visit| {
        if found.is_some() || visit.id().is_some() {
            return Control::SkipChildren;
        }
        found = stereotype_in(visit.node);
        Control::Descend
    });
    found
}

fn stereotype_in(n: &Node) -> Option<String> {
    n.iter()
        .filter(|(key, _)| key.to_lowercase().contains("stereotype"))
        .find_map(|(_, value)| stereotype_text(value))
}

fn stereotype_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => Some(s.as_str()),
        _ => node::objects(Some(value)).find_map(|child| {
            node::name_of(child)
                .or_else(|| node::attr(child, "xmi:type").map(node::local_name))
                .or_else(|| node::idref_of(child))
                .or_else(|| child.get(decode::TEXT_KEY).and_then(Value::as_str))
        }),
    }?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

// ============================================================================
// EXTRACTOR
// ============================================================================

struct Extractor<'a> {
    document: &'a Value,
    root: &'a Value,
    tables: ReferenceTables<'a>,
    stereotypes: StereotypeTable<'a>,
    depths: FxHashMap<&'a str, usize>,
    packages: FxHashMap<&'a str, String>,
    /// Attribute/port id -> owning element id.
    feature_owners: FxHashMap<&'a str, &'a str>,
    rel_counter: u32,
}

impl<'a> Extractor<'a> {
    fn new(document: &'a Value) -> Self {
        let root = locate_model_root(document);
        Self {
            document,
            root,
            tables: ReferenceTables::build(document),
            stereotypes: StereotypeTable::build(document),
            depths: depth_map(root),
            packages: package_map(root),
            feature_owners: FxHashMap::default(),
            rel_counter: 0,
        }
    }

    fn run(mut self) -> Model {
        let (mut elements, class_stats) = self.extract_elements();
        let relationships = self.extract_relationships();
        self.attach_relationships(&mut elements, &relationships);
        let diagrams = extract_diagrams(self.document);

        let mut diagrams_by_type: IndexMap<String, usize> = IndexMap::new();
        for diagram in &diagrams {
            *diagrams_by_type.entry(diagram.diagram_type.clone()).or_insert(0) += 1;
        }

        let metrics = Metrics::compute(self.document, &elements, &class_stats, &diagrams);
        let quality = QualitySummary::compute(&elements, &relationships, &class_stats);
        let search_index = SearchIndex::build(&elements, &relationships);

        tracing::debug!(
            "extracted model: {} elements, {} relationships, {} classes, {} diagrams",
            elements.len(),
            relationships.len(),
            class_stats.len(),
            diagrams.len()
        );

        Model {
            elements,
            relationships,
            class_stats,
            diagrams,
            metrics,
            diagrams_by_type,
            quality,
            search_index,
        }
    }

    // ------------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------------

    fn extract_elements(&mut self) -> (Vec<ModelElement>, Vec<ClassStat>) {
        let visits = walk::collect(Some(self.root), |visit| {
            visit.id().is_some()
                && ELEMENT_KINDS.contains(&visit.kind())
                && !node::is_stereotype_application(visit.node)
        });

        let mut seen = FxHashSet::default();
        let mut elements = Vec::with_capacity(visits.len());
        let mut class_stats = Vec::new();

        for visit in visits {
            let Some(id) = visit.id() else {
                continue;
            };
            if !seen.insert(id) {
                tracing::trace!("skipping duplicate element id {id}");
                continue;
            }
            let kind = visit.kind();
            let mut element = ModelElement::new(id, kind);
            element.name = node::name_of(visit.node).map(String::from);
            element.stereotype = self
                .stereotypes
                .get(id)
                .or_else(|| inline_stereotype(visit.node));
            element.package = self
                .packages
                .get(id)
                .cloned()
                .unwrap_or_else(|| ROOT_PACKAGE.to_string());
            element.depth = self.depths.get(id).copied().unwrap_or(0);

            if CLASSIFIER_KINDS.contains(&kind) {
                self.extract_features(id, visit.node, &mut element);
                let connectors = node::children(visit.node, "ownedConnector").count();
                class_stats.push(ClassStat {
                    id: element.id.clone(),
                    name: element.name.clone(),
                    package: element.package.clone(),
                    attributes: element.attributes.len(),
                    ports: element.ports.len(),
                    connectors,
                    is_block: ClassStat::looks_like_block(
                        element.stereotype.as_deref(),
                        element.ports.len(),
                        connectors,
                    ),
                });
            }

            elements.push(element);
        }

        (elements, class_stats)
    }

    fn extract_features(&mut self, owner: &'a str, class: &'a Node, element: &mut ModelElement) {
        for tag in ["ownedAttribute", "ownedPort"] {
            for child in node::children(class, tag) {
                let Some(id) = node::id_of(child) else {
                    continue;
                };
                self.feature_owners.entry(id).or_insert(owner);
                let name = node::name_of(child).unwrap_or_default().to_string();
                let type_name = self
                    .tables
                    .type_name(node::first_ref(child, "type"))
                    .map(String::from);

                if resolve::is_port_node(tag, node::kind_of(tag, child)) {
                    let direction = node::attr(child, "direction")
                        .or_else(|| self.stereotypes.direction(id))
                        .map(PortDirection::from_xmi)
                        .unwrap_or_default();
                    element.ports.push(Port {
                        id: id.to_string(),
                        name,
                        type_name,
                        direction,
                        multiplicity: multiplicity_of(child),
                    });
                } else {
                    element.attributes.push(Attribute {
                        id: id.to_string(),
                        name,
                        type_name,
                    });
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Relationships
    // ------------------------------------------------------------------------

    fn extract_relationships(&mut self) -> Vec<Relationship> {
        let mut relationships = Vec::new();
        // Nearest enclosing id-bearing node, for generalizations.
        let mut owners: Vec<(usize, &'a str)> = Vec::new();
        let mut found: Vec<(Visit<'a>, Option<&'a str>)> = Vec::new();

        walk::walk(Some(self.root), |visit| {
            while owners.last().is_some_and(|(depth, _)| *depth >= visit.depth) {
                owners.pop();
            }
            let owner = owners.last().map(|(_, id)| *id);
            found.push((visit, owner));
            if let Some(id) = visit.id() {
                owners.push((visit.depth, id));
            }
        });

        for (visit, owner) in found {
            if node::is_stereotype_application(visit.node) {
                continue;
            }
            if let Some(rel) = self.relationship_from(visit, owner) {
                relationships.push(rel);
            }
        }
        relationships
    }

    fn relationship_from(&mut self, visit: Visit<'a>, owner: Option<&'a str>) -> Option<Relationship> {
        let n = visit.node;
        let kind = visit.kind();

        let (kind, source, target) = if kind == "Association"
            || kind == "AssociationClass"
            || node::attr(n, "memberEnd").is_some()
            || n.contains_key("memberEnd")
            || n.contains_key("ownedEnd")
        {
            let mut ends = node::refs(n, "memberEnd");
            for end in node::children(n, "ownedEnd").filter_map(node::id_of) {
                if ends.len() >= 2 {
                    break;
                }
                if !ends.contains(&end) {
                    ends.push(end);
                }
            }
            ("Association".to_string(), ends.first().copied(), ends.get(1).copied())
        } else if DEPENDENCY_KINDS.contains(&kind)
            || (has_ref(n, "client") && has_ref(n, "supplier"))
        {
            let source = node::first_ref(n, "client").or_else(|| node::first_ref(n, "source"));
            let target = node::first_ref(n, "supplier").or_else(|| node::first_ref(n, "target"));
            let kind = visit
                .id()
                .and_then(|id| self.stereotypes.get(id))
                .unwrap_or_else(|| kind.to_string());
            (kind, source, target)
        } else if kind == "Generalization" {
            let source = node::first_ref(n, "specific").or(owner);
            ("Generalization".to_string(), source, node::first_ref(n, "general"))
        } else if kind == "Connector" {
            let mut ends = node::children(n, "end")
                .filter_map(|end| node::id_of(end).or_else(|| node::first_ref(end, "role")));
            ("Connector".to_string(), ends.next(), ends.next())
        } else {
            return None;
        };

        let id = match visit.id() {
            Some(id) => id.to_string(),
            None => self.next_rel_id(),
        };
        let source = self.tables.resolve_endpoint(source);
        let target = self.tables.resolve_endpoint(target);
        if source.id.is_none() || target.id.is_none() {
            tracing::trace!("relationship {id} ({kind}) has a missing endpoint");
        }

        let mut rel = Relationship::new(id, kind);
        rel.name = node::name_of(n)
            .filter(|s| !s.trim().is_empty())
            .map(String::from);
        set_endpoint(&mut rel.source, &mut rel.source_name, &mut rel.source_ref, source);
        set_endpoint(&mut rel.target, &mut rel.target_name, &mut rel.target_ref, target);
        Some(rel)
    }

    /// Generate a relationship id for nodes that carry none.
    fn next_rel_id(&mut self) -> String {
        self.rel_counter += 1;
        format!("_rel_{}", self.rel_counter)
    }

    /// Record relationship ids on their endpoint elements.
    ///
    /// An endpoint that names a port or attribute attaches to the owner.
    fn attach_relationships(&self, elements: &mut [ModelElement], relationships: &[Relationship]) {
        let index: FxHashMap<String, usize> = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();

        let locate = |id: Option<&str>, reference: Option<&str>| -> Option<usize> {
            let candidates = [id, reference];
            candidates
                .iter()
                .flatten()
                .find_map(|c| index.get(*c).copied())
                .or_else(|| {
                    candidates
                        .iter()
                        .flatten()
                        .find_map(|c| self.feature_owners.get(*c))
                        .and_then(|owner| index.get(*owner).copied())
                })
        };

        for rel in relationships {
            if let Some(i) = locate(rel.source.as_deref(), rel.source_ref.as_deref()) {
                elements[i].outgoing.insert(rel.id.clone());
            }
            if let Some(i) = locate(rel.target.as_deref(), rel.target_ref.as_deref()) {
                elements[i].incoming.insert(rel.id.clone());
            }
        }
    }
}

fn set_endpoint(
    id: &mut Option<String>,
    name: &mut String,
    reference: &mut Option<String>,
    endpoint: Endpoint<'_>,
) {
    *id = endpoint.id.map(String::from);
    *name = endpoint.name.to_string();
    *reference = endpoint.reference.map(String::from);
}

fn has_ref(n: &Node, key: &str) -> bool {
    node::first_ref(n, key).is_some()
}

/// Multiplicity string from `lowerValue`/`upperValue` or a plain attribute.
fn multiplicity_of(n: &Node) -> String {
    if let Some(m) = node::attr(n, "multiplicity").filter(|m| !m.trim().is_empty()) {
        return m.trim().to_string();
    }
    // A bound literal without a value is 0 in UML.
    let bound = |key: &str| {
        let value = match node::children(n, key).next() {
            Some(literal) => Some(node::attr(literal, "value").map(str::trim).unwrap_or("0")),
            None => node::attr(n, key.trim_end_matches("Value")).map(str::trim),
        };
        value.map(|v| if v == "-1" { "*" } else { v })
    };
    let lower = bound("lowerValue").unwrap_or("1");
    let upper = bound("upperValue").unwrap_or("1");
    if lower == upper {
        lower.to_string()
    } else {
        format!("{lower}..{upper}")
    }
}

// ============================================================================
// DIAGRAMS
// ============================================================================

/// Collect diagrams anywhere in the document.
///
/// A node counts when its kind or tag mentions "diagram" and it has an id or
/// a name. Only the outermost such node is taken, so a vendor's nested
/// representation objects are not counted twice.
pub fn extract_diagrams(document: &Value) -> Vec<Diagram> {
    let visits = walk::collect_outermost(Some(document), |visit| {
        let mentions = visit.kind().to_lowercase().contains("diagram")
            || visit.tag.to_lowercase().contains("diagram");
        mentions
            && !node::is_stereotype_application(visit.node)
            && (visit.id().is_some() || node::name_of(visit.node).is_some())
    });

    visits
        .into_iter()
        .map(|visit| {
            let n = visit.node;
            let name = node::name_of(n)
                .or_else(|| node::children(n, "properties").find_map(|p| node::attr(p, "name")))
                .unwrap_or_default()
                .to_string();
            Diagram {
                id: visit.id().map(String::from),
                name,
                diagram_type: diagram_type(n).unwrap_or_else(|| "Unknown".to_string()),
            }
        })
        .collect()
}

fn diagram_type(n: &Node) -> Option<String> {
    let direct = node::attr(n, "diagramType")
        .or_else(|| node::children(n, "properties").find_map(|p| node::attr(p, "type")));
    if let Some(t) = direct.filter(|t| !t.trim().is_empty()) {
        return Some(t.trim().to_string());
    }

    // Nested vendor representation, e.g. MagicDraw's DiagramRepresentationObject.
    let mut nested = None;
    walk::walk_below(n, |visit| {
        if nested.is_some() {
            return Control::SkipChildren;
        }
        let tag = visit.tag.to_lowercase();
        if tag.contains("representation") || tag.contains("diagram") {
            if let Some(t) = node::attr(visit.node, "type").filter(|t| !t.trim().is_empty()) {
                nested = Some(t.trim().to_string());
                return Control::SkipChildren;
            }
        }
        Control::Descend
    });
    if nested.is_some() {
        return nested;
    }

    node::attr(n, "type")
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.trim().to_string())
}
