//! Graph store boundary
//!
//! The resolution engine never traverses the graph itself: it builds a
//! `GraphQuery` and hands it to a `GraphStore`.

pub mod memory;
pub mod query;
pub mod traits;

pub use memory::{ConceptRecord, FixtureError, MemoryGraph, SourceRecord};
pub use query::{Anchor, CanonicalProperty, GraphQuery, NodeLabel, Projection, QueryBranch};
pub use traits::{ConcordanceRow, GraphError, GraphStore};
