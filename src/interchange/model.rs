//! Normalized model produced by [`parse`](super::parse).
//!
//! A `Model` is a read-only snapshot: every parse builds a fresh one and the
//! analyses in [`checks`](crate::checks) only borrow it.
//!
//! ```text
//! Model
//! ├── elements: Vec<ModelElement>      (classes, packages, requirements, ...)
//! ├── relationships: Vec<Relationship> (associations, dependencies, connectors, ...)
//! ├── class_stats: Vec<ClassStat>
//! ├── diagrams: Vec<Diagram>
//! ├── metrics / diagrams_by_type / quality
//! └── search_index
//! ```

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::metrics::{Metrics, QualitySummary};
use super::search::SearchIndex;

/// Package path of elements declared directly under the model root.
pub const ROOT_PACKAGE: &str = "Root";

/// Separator between package path segments (`Root›A›B`).
pub const PATH_SEPARATOR: char = '›';

/// Append a segment to a package path.
pub fn join_path(parent: &str, segment: &str) -> String {
    format!("{parent}{PATH_SEPARATOR}{segment}")
}

// ============================================================================
// ELEMENTS
// ============================================================================

/// A structural model element (class, package, requirement, ...).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelElement {
    /// `xmi:id`, unique within one parse.
    pub id: String,
    pub name: Option<String>,
    /// Kind tag without namespace prefix (`Class`, `Package`, `Requirement`).
    pub kind: String,
    pub stereotype: Option<String>,
    /// Root-qualified path of the enclosing package.
    pub package: String,
    /// Ancestor count from the model root.
    pub depth: usize,
    pub attributes: Vec<Attribute>,
    pub ports: Vec<Port>,
    /// Ids of relationships targeting this element.
    pub incoming: IndexSet<String>,
    /// Ids of relationships originating at this element.
    pub outgoing: IndexSet<String>,
}

impl ModelElement {
    /// Create an unnamed element at the model root.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind: kind.into(),
            stereotype: None,
            package: ROOT_PACKAGE.to_string(),
            depth: 0,
            attributes: Vec::new(),
            ports: Vec::new(),
            incoming: IndexSet::new(),
            outgoing: IndexSet::new(),
        }
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the enclosing package path.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Set the stereotype.
    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotype = Some(stereotype.into());
        self
    }

    /// The trimmed name, if it is not blank.
    pub fn trimmed_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    pub fn is_package(&self) -> bool {
        self.kind == "Package"
    }

    /// Requirements are recognized by kind or by applied stereotype.
    pub fn is_requirement(&self) -> bool {
        self.kind.contains("Requirement")
            || self
                .stereotype
                .as_deref()
                .is_some_and(|s| s.contains("Requirement"))
    }

    /// Path that elements declared inside this element would carry.
    ///
    /// Unnamed packages contribute their id as the path segment.
    pub fn own_path(&self) -> String {
        join_path(&self.package, self.trimmed_name().unwrap_or(&self.id))
    }
}

/// An owned attribute of a class.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: String,
    pub name: String,
    /// Declared type name, or the raw type reference when it has no name.
    pub type_name: Option<String>,
}

/// Flow direction of a port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    In,
    Out,
    #[default]
    InOut,
}

impl PortDirection {
    /// Parse a vendor direction string; anything unrecognized is `InOut`.
    pub fn from_xmi(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "in" | "input" | "provided" => Self::In,
            "out" | "output" | "required" | "return" => Self::Out,
            _ => Self::InOut,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "inout",
        }
    }
}

/// A port owned by a class.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,
    pub name: String,
    pub type_name: Option<String>,
    pub direction: PortDirection,
    /// `1`, `0..1`, `1..*`, ...
    pub multiplicity: String,
}

// ============================================================================
// RELATIONSHIPS
// ============================================================================

/// A directed relationship between two elements.
///
/// Endpoints that could not be found in the document keep the raw reference
/// as their id. An endpoint absent from the document entirely is `None`, and
/// its display name is [`UNRESOLVED`](super::resolve::UNRESOLVED).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    /// `Association`, `Dependency`, `Generalization`, `Satisfy`, `Connector`, ...
    pub kind: String,
    pub source: Option<String>,
    pub target: Option<String>,
    pub source_name: String,
    pub target_name: String,
    /// First resolution hop of the source (connector role or raw reference).
    pub source_ref: Option<String>,
    /// First resolution hop of the target.
    pub target_ref: Option<String>,
    pub name: Option<String>,
}

impl Relationship {
    /// Create a relationship with unresolved endpoints.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            source: None,
            target: None,
            source_name: super::resolve::UNRESOLVED.to_string(),
            target_name: super::resolve::UNRESOLVED.to_string(),
            source_ref: None,
            target_ref: None,
            name: None,
        }
    }

    /// Set both endpoint ids, using them as display names too.
    pub fn between(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        let (source, target) = (source.into(), target.into());
        self.source_name = source.clone();
        self.target_name = target.clone();
        self.source_ref = Some(source.clone());
        self.target_ref = Some(target.clone());
        self.source = Some(source);
        self.target = Some(target);
        self
    }

    /// Non-empty endpoint ids.
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        [self.source.as_deref(), self.target.as_deref()]
            .into_iter()
            .flatten()
            .filter(|id| !id.is_empty())
    }

    /// First-hop references, before any role resolution.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        [self.source_ref.as_deref(), self.target_ref.as_deref()]
            .into_iter()
            .flatten()
    }

    /// True when either endpoint is missing or blank.
    pub fn is_dangling(&self) -> bool {
        let blank = |e: &Option<String>| e.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.source) || blank(&self.target)
    }
}

// ============================================================================
// DERIVED VIEWS
// ============================================================================

/// Per-class structural tallies.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStat {
    pub id: String,
    pub name: Option<String>,
    pub package: String,
    pub attributes: usize,
    pub ports: usize,
    pub connectors: usize,
    /// Stereotype mentions "block", or the class has ports or connectors.
    pub is_block: bool,
}

impl ClassStat {
    pub fn looks_like_block(stereotype: Option<&str>, ports: usize, connectors: usize) -> bool {
        stereotype.is_some_and(|s| s.to_lowercase().contains("block")) || ports > 0 || connectors > 0
    }
}

/// A diagram found anywhere in the document, usually in vendor extensions.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub id: Option<String>,
    pub name: String,
    /// Vendor type tag, `Unknown` when none was found.
    pub diagram_type: String,
}

// ============================================================================
// MODEL
// ============================================================================

/// Snapshot of one parsed document.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub elements: Vec<ModelElement>,
    pub relationships: Vec<Relationship>,
    pub class_stats: Vec<ClassStat>,
    pub diagrams: Vec<Diagram>,
    pub metrics: Metrics,
    pub diagrams_by_type: IndexMap<String, usize>,
    pub quality: QualitySummary,
    pub search_index: SearchIndex,
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an element by id.
    pub fn element(&self, id: &str) -> Option<&ModelElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements declared directly in the package at `path`.
    pub fn elements_in_package<'a>(
        &'a self,
        path: &'a str,
    ) -> impl Iterator<Item = &'a ModelElement> + 'a {
        self.elements.iter().filter(move |e| e.package == path)
    }

    /// Package elements.
    pub fn packages(&self) -> impl Iterator<Item = &ModelElement> {
        self.elements.iter().filter(|e| e.is_package())
    }

    /// Requirement elements.
    pub fn requirements(&self) -> impl Iterator<Item = &ModelElement> {
        self.elements.iter().filter(|e| e.is_requirement())
    }

    /// Every port together with its owning element.
    pub fn ports(&self) -> impl Iterator<Item = (&ModelElement, &Port)> {
        self.elements
            .iter()
            .flat_map(|e| e.ports.iter().map(move |p| (e, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.relationships.is_empty()
    }
}
