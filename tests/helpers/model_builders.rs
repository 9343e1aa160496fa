//! In-memory model builders for analysis tests.

use syster_audit::interchange::{ClassStat, Model, ModelElement, Port, PortDirection, Relationship};

/// A model holding `elements` and `relationships`, with class stats for
/// every Class element.
pub fn model_of(elements: Vec<ModelElement>, relationships: Vec<Relationship>) -> Model {
    let class_stats = elements
        .iter()
        .filter(|e| e.kind == "Class")
        .map(|e| ClassStat {
            id: e.id.clone(),
            name: e.name.clone(),
            package: e.package.clone(),
            attributes: e.attributes.len(),
            ports: e.ports.len(),
            connectors: 0,
            is_block: ClassStat::looks_like_block(e.stereotype.as_deref(), e.ports.len(), 0),
        })
        .collect();
    let mut model = Model::new();
    model.elements = elements;
    model.relationships = relationships;
    model.class_stats = class_stats;
    model
}

/// A named Class at the model root.
pub fn class(id: &str, name: &str) -> ModelElement {
    ModelElement::new(id, "Class").with_name(name)
}

/// A named element of any kind at the model root.
pub fn element(kind: &str, id: &str, name: &str) -> ModelElement {
    ModelElement::new(id, kind).with_name(name)
}

/// An untyped bidirectional port.
pub fn port(id: &str, name: &str) -> Port {
    Port {
        id: id.to_string(),
        name: name.to_string(),
        type_name: None,
        direction: PortDirection::InOut,
        multiplicity: "1".to_string(),
    }
}
