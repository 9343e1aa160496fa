//! Reference resolution across XMI id namespaces.
//!
//! Relationship endpoints in XMI rarely point at the element a reader cares
//! about. A connector end names a *role* (a property or port), and the
//! property's `type` is the connected class. An association's `memberEnd`
//! names properties, whose types are the associated classes.
//!
//! Resolution is a fixed chain over four independently built tables:
//!
//! ```text
//! raw ──► end role | property type | port type | raw     (hop 1)
//!     ──► property type | port type | hop 1               (hop 2)
//!     ──► display name | resolved id
//! ```
//!
//! Not every document populates every hop; missing hops fall through.

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::node::{self, Node};
use super::walk::{self, Visit};

/// Display name for an endpoint that could not be resolved at all.
pub const UNRESOLVED: &str = "Unknown";

/// Lookup tables for one parsed document.
#[derive(Clone, Debug, Default)]
pub struct ReferenceTables<'a> {
    names: FxHashMap<&'a str, &'a str>,
    property_types: FxHashMap<&'a str, &'a str>,
    port_types: FxHashMap<&'a str, &'a str>,
    end_roles: FxHashMap<&'a str, &'a str>,
}

/// A resolved relationship endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoint<'a> {
    /// Result of the first hop: the role, property type, or the raw reference.
    pub reference: Option<&'a str>,
    /// Resolved element id after both hops.
    pub id: Option<&'a str>,
    /// Display name, falling back to the resolved id or [`UNRESOLVED`].
    pub name: &'a str,
}

impl Endpoint<'_> {
    /// Endpoint for a reference that was absent.
    pub fn unresolved() -> Self {
        Self {
            reference: None,
            id: None,
            name: UNRESOLVED,
        }
    }
}

impl<'a> ReferenceTables<'a> {
    /// Build all tables in a single walk over the document.
    pub fn build(document: &'a Value) -> Self {
        let mut tables = Self::default();
        walk::walk(Some(document), |visit| tables.record(visit));
        tracing::trace!(
            "reference tables: {} names, {} property types, {} port types, {} end roles",
            tables.names.len(),
            tables.property_types.len(),
            tables.port_types.len(),
            tables.end_roles.len()
        );
        tables
    }

    fn record(&mut self, visit: Visit<'a>) {
        let Some(id) = visit.id() else {
            return;
        };
        let node = visit.node;
        if let Some(name) = node::name_of(node).filter(|n| !n.trim().is_empty()) {
            self.names.entry(id).or_insert(name);
        }
        if node::is_stereotype_application(node) {
            return;
        }

        let kind = visit.kind();
        if is_port_node(visit.tag, kind) {
            if let Some(ty) = node::first_ref(node, "type") {
                self.port_types.entry(id).or_insert(ty);
            }
        } else if is_property_node(visit.tag, kind) {
            if let Some(ty) = node::first_ref(node, "type") {
                self.property_types.entry(id).or_insert(ty);
            }
        } else if is_connector_end(visit.tag, kind, node) {
            if let Some(role) = node::first_ref(node, "role") {
                self.end_roles.entry(id).or_insert(role);
            }
        }
    }

    /// Record a display name.
    pub fn insert_name(&mut self, id: &'a str, name: &'a str) {
        self.names.insert(id, name);
    }

    /// Record a property's declared type.
    pub fn insert_property_type(&mut self, property: &'a str, ty: &'a str) {
        self.property_types.insert(property, ty);
    }

    /// Record a port's declared type.
    pub fn insert_port_type(&mut self, port: &'a str, ty: &'a str) {
        self.port_types.insert(port, ty);
    }

    /// Record a connector end's role.
    pub fn insert_end_role(&mut self, end: &'a str, role: &'a str) {
        self.end_roles.insert(end, role);
    }

    /// Display name registered for an id.
    pub fn name_of(&self, id: &str) -> Option<&'a str> {
        self.names.get(id).copied()
    }

    /// Number of named ids.
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// Resolve a raw endpoint reference through the two-hop chain.
    pub fn resolve_endpoint(&self, raw: Option<&'a str>) -> Endpoint<'a> {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Endpoint::unresolved();
        };
        let first = self
            .end_roles
            .get(raw)
            .or_else(|| self.property_types.get(raw))
            .or_else(|| self.port_types.get(raw))
            .copied()
            .unwrap_or(raw);
        let id = self.type_of(first).unwrap_or(first);
        let name = self.name_of(id).unwrap_or(id);
        Endpoint {
            reference: Some(first),
            id: Some(id),
            name,
        }
    }

    /// Display name for a declared type reference; the raw id if unnamed.
    pub fn type_name(&self, type_ref: Option<&'a str>) -> Option<&'a str> {
        let type_ref = type_ref.filter(|r| !r.is_empty())?;
        Some(self.name_of(type_ref).unwrap_or(type_ref))
    }

    fn type_of(&self, id: &str) -> Option<&'a str> {
        self.property_types
            .get(id)
            .or_else(|| self.port_types.get(id))
            .copied()
    }
}

/// Ports: any `*Port` kind, or an `ownedPort` child.
pub fn is_port_node(tag: &str, kind: &str) -> bool {
    kind.ends_with("Port") || tag == "ownedPort"
}

/// Properties: `Property` kind, or an untyped attribute/end child.
pub fn is_property_node(tag: &str, kind: &str) -> bool {
    kind == "Property"
        || (matches!(tag, "ownedAttribute" | "ownedEnd") && kind == tag)
}

fn is_connector_end(tag: &str, kind: &str, node: &Node) -> bool {
    kind == "ConnectorEnd" || (tag == "end" && node::first_ref(node, "role").is_some())
}
