//! XMI ingestion for UML/SysML models.
//!
//! XMI as written by real authoring tools is schema-inconsistent: the same
//! concept shows up as an attribute in one tool and a child element in
//! another, and vendor extensions nest arbitrarily. This module reads it
//! without assuming a schema:
//!
//! ```text
//! ┌──────────────┐
//! │   XMI text   │
//! └──────┬───────┘
//!        │ decode (quick-xml)
//!        ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │              serde_json::Value (untyped tree)             │
//! │  - attributes under "@qname", text under "#text"          │
//! │  - repeated child tags collapse into arrays               │
//! └──────────────────────────────────────────────────────────┘
//!        │ walk + resolve
//!        ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Model                             │
//! │  - elements, relationships, class stats, diagrams         │
//! │  - metrics, quality summary, search index                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use syster_audit::interchange;
//!
//! let model = interchange::parse_file("vehicle.xmi")?;
//! println!("{} classes", model.metrics.classes);
//! ```

pub mod decode;
mod error;
pub mod extract;
pub mod metrics;
pub mod model;
pub mod node;
pub mod resolve;
pub mod search;
pub mod walk;

pub use decode::decode;
pub use error::InterchangeError;
pub use extract::{extract, parse, parse_file};
pub use metrics::{Metrics, QualitySummary};
pub use model::{
    Attribute, ClassStat, Diagram, Model, ModelElement, PATH_SEPARATOR, Port, PortDirection,
    ROOT_PACKAGE, Relationship,
};
pub use resolve::{Endpoint, ReferenceTables, UNRESOLVED};
pub use search::{EntryType, SearchEntry, SearchIndex};
