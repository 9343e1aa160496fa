//! Flat search index over a model.

use serde::Serialize;

use super::model::{ModelElement, Relationship};

/// What a search entry points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Element,
    Attribute,
    Port,
    Relationship,
}

/// One searchable item.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub entry_type: EntryType,
    pub package: Option<String>,
    /// Owning element for attributes and ports.
    pub parent_id: Option<String>,
    pub parent_name: Option<String>,
}

/// All searchable items of a model, in model order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    /// Index elements (with their attributes and ports) and relationships.
    pub fn build(elements: &[ModelElement], relationships: &[Relationship]) -> Self {
        let mut entries = Vec::new();

        for element in elements {
            let parent_name = element.name.clone().unwrap_or_default();
            entries.push(SearchEntry {
                id: element.id.clone(),
                name: parent_name.clone(),
                kind: element.kind.clone(),
                entry_type: EntryType::Element,
                package: Some(element.package.clone()),
                parent_id: None,
                parent_name: None,
            });
            for attribute in &element.attributes {
                entries.push(SearchEntry {
                    id: attribute.id.clone(),
                    name: attribute.name.clone(),
                    kind: "Property".to_string(),
                    entry_type: EntryType::Attribute,
                    package: Some(element.package.clone()),
                    parent_id: Some(element.id.clone()),
                    parent_name: Some(parent_name.clone()),
                });
            }
            for port in &element.ports {
                entries.push(SearchEntry {
                    id: port.id.clone(),
                    name: port.name.clone(),
                    kind: "Port".to_string(),
                    entry_type: EntryType::Port,
                    package: Some(element.package.clone()),
                    parent_id: Some(element.id.clone()),
                    parent_name: Some(parent_name.clone()),
                });
            }
        }

        for rel in relationships {
            let name = rel
                .name
                .clone()
                .unwrap_or_else(|| format!("{} → {}", rel.source_name, rel.target_name));
            entries.push(SearchEntry {
                id: rel.id.clone(),
                name,
                kind: rel.kind.clone(),
                entry_type: EntryType::Relationship,
                package: None,
                parent_id: None,
                parent_name: None,
            });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive substring search over name, id and kind.
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&SearchEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&query)
                    || e.id.to_lowercase().contains(&query)
                    || e.kind.to_lowercase().contains(&query)
            })
            .collect()
    }
}
