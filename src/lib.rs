//! Public Concordances - Concordance Resolution Service
//!
//! Resolves a canonical concept id to every identifier the concept is known
//! by across source systems, or an identifier under a named authority back
//! to the canonical concept. Each result pairs the concept's public identity
//! (`id`, `apiUrl`) with one `(authority, identifierValue)` equivalence.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  HTTP: GET /concordances?conceptId=...                          │
//! │        GET /concordances?authority=...&identifierValue=...      │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    ConcordanceService                            │
//! │   QueryPlanner ──► GraphStore ──► ResultAssembler                │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │           GraphStore (MemoryGraph from concept documents)        │
//! │   source node ─EQUIVALENT_TO─► canonical concept ◄─ leaves       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use public_concordances::{ConcordanceReader, ConcordanceService, MemoryGraph};
//!
//! let graph = Arc::new(MemoryGraph::load_path("fixtures/concepts")?);
//! let service = ConcordanceService::new(graph, "http://api.ft.com")?;
//!
//! let found = service
//!     .read_by_authority("http://api.ft.com/system/NAICS", &["5111".to_string()])
//!     .await?;
//! ```

pub mod assembler;
pub mod authority;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod ontology;
pub mod planner;
pub mod server;
pub mod service;

// Re-export main types
pub use assembler::{AssemblyError, ResultAssembler};
pub use authority::{AuthorityEntry, AuthorityRegistry};
pub use config::{ConfigError, ServiceConfig};
pub use error::ConcordanceError;
pub use graph::{ConcordanceRow, GraphError, GraphQuery, GraphStore, MemoryGraph};
pub use model::{Concept, Concordance, Concordances, Identifier};
pub use ontology::{ApiUrlBuilder, ApiUrlError, TypePathRules};
pub use planner::{QueryPlanner, ResolvedAuthority};
pub use server::{build_router, AppState};
pub use service::{ConcordanceReader, ConcordanceService};
