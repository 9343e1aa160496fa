//! Lookups shared by the analyses.
//!
//! Rules, smells and hotspots ask the same questions many times over: is
//! this id an endpoint, is this requirement satisfied, which element has
//! this id. [`ModelIndex`] answers each in constant time from tables built
//! in one pass over the model and the relationship list.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::interchange::{Model, ModelElement, Relationship, UNRESOLVED};

/// Per-call lookup tables over a model and a relationship list.
#[derive(Debug)]
pub struct ModelIndex<'a> {
    pub model: &'a Model,
    pub relationships: &'a [Relationship],
    /// Non-empty resolved endpoint ids.
    endpoints: FxHashSet<&'a str>,
    /// Endpoint ids plus first-hop references (connector roles).
    mentioned: FxHashSet<&'a str>,
    satisfied: FxHashSet<&'a str>,
    verified: FxHashSet<&'a str>,
    by_id: FxHashMap<&'a str, &'a ModelElement>,
    by_name: FxHashMap<&'a str, &'a ModelElement>,
}

impl<'a> ModelIndex<'a> {
    pub fn build(model: &'a Model, relationships: &'a [Relationship]) -> Self {
        let mut index = Self {
            model,
            relationships,
            endpoints: FxHashSet::default(),
            mentioned: FxHashSet::default(),
            satisfied: FxHashSet::default(),
            verified: FxHashSet::default(),
            by_id: FxHashMap::default(),
            by_name: FxHashMap::default(),
        };

        for rel in relationships {
            let kind = rel.kind.to_lowercase();
            let satisfies = kind.contains("satisfy");
            let verifies = kind.contains("verify");
            for id in rel.endpoints() {
                index.endpoints.insert(id);
                index.mentioned.insert(id);
                if satisfies {
                    index.satisfied.insert(id);
                }
                if verifies {
                    index.verified.insert(id);
                }
            }
            index.mentioned.extend(rel.references());
        }

        // First element wins on repeated ids and names.
        for element in &model.elements {
            index.by_id.entry(element.id.as_str()).or_insert(element);
            if let Some(name) = element.trimmed_name() {
                index.by_name.entry(name).or_insert(element);
            }
        }

        index
    }

    /// Element with this id.
    pub fn element(&self, id: &str) -> Option<&'a ModelElement> {
        self.by_id.get(id).copied()
    }

    /// Is `id` the resolved endpoint of some relationship?
    pub fn is_endpoint(&self, id: &str) -> bool {
        self.endpoints.contains(id)
    }

    /// Does some relationship reference `id` at any resolution hop?
    pub fn is_mentioned(&self, id: &str) -> bool {
        self.mentioned.contains(id)
    }

    /// Does a relationship whose kind contains "satisfy" touch `id`?
    pub fn is_satisfied(&self, id: &str) -> bool {
        self.satisfied.contains(id)
    }

    /// Does a relationship whose kind contains "verify" touch `id`?
    pub fn is_verified(&self, id: &str) -> bool {
        self.verified.contains(id)
    }

    /// Best-effort package of a relationship.
    ///
    /// The source element's package, else the target's, else the package of
    /// the first element whose name matches one of the endpoint display
    /// names.
    pub fn relationship_package(&self, rel: &Relationship) -> Option<&'a str> {
        let by_id = |id: Option<&str>| id.and_then(|id| self.element(id)).map(|e| e.package.as_str());
        by_id(rel.source.as_deref())
            .or_else(|| by_id(rel.target.as_deref()))
            .or_else(|| {
                [rel.source_name.as_str(), rel.target_name.as_str()]
                    .into_iter()
                    .map(str::trim)
                    .filter(|n| !n.is_empty() && *n != UNRESOLVED)
                    .find_map(|n| self.by_name.get(n).map(|e| e.package.as_str()))
            })
    }
}
