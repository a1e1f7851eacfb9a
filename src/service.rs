//! ConcordanceService: the resolution engine's public contract.
//!
//! Takes the graph store via `Arc<dyn GraphStore>` so that the same logic
//! runs against the in-memory graph or a test double. Every call is
//! independent; the service holds no mutable state.

use std::sync::Arc;

use async_trait::async_trait;

use crate::assembler::ResultAssembler;
use crate::authority::AuthorityRegistry;
use crate::error::ConcordanceError;
use crate::graph::{GraphError, GraphStore};
use crate::model::Concordances;
use crate::ontology::{ApiUrlBuilder, TypePathRules};
use crate::planner::QueryPlanner;

pub type Result<T> = std::result::Result<T, ConcordanceError>;

/// Read side of the concordance store, as consumed by the HTTP layer
///
/// `Ok(None)` means nothing matched (or the authority is not supported);
/// it is never an error.
#[async_trait]
pub trait ConcordanceReader: Send + Sync {
    /// Every identifier of the concepts behind `ids`
    async fn read_by_concept_id(&self, ids: &[String]) -> Result<Option<Concordances>>;

    /// The concepts known as `values` under the public authority `authority`
    async fn read_by_authority(
        &self,
        authority: &str,
        values: &[String],
    ) -> Result<Option<Concordances>>;

    /// Pass-through to the graph store's liveness probe
    async fn check_connectivity(&self) -> Result<()>;
}

pub struct ConcordanceService {
    graph: Arc<dyn GraphStore>,
    planner: QueryPlanner,
    assembler: ResultAssembler,
}

impl ConcordanceService {
    /// Service with the default authority table and type rules
    ///
    /// Fails if `public_api_url` is not an absolute URL.
    pub fn new(graph: Arc<dyn GraphStore>, public_api_url: &str) -> Result<Self> {
        Self::with_url_builder(graph, public_api_url, Arc::new(TypePathRules::default()))
    }

    pub fn with_url_builder(
        graph: Arc<dyn GraphStore>,
        public_api_url: &str,
        urls: Arc<dyn ApiUrlBuilder>,
    ) -> Result<Self> {
        url::Url::parse(public_api_url).map_err(|source| {
            ConcordanceError::InvalidPublicApiUrl {
                url: public_api_url.to_string(),
                source,
            }
        })?;

        let registry = AuthorityRegistry::new();
        Ok(Self {
            graph,
            planner: QueryPlanner::new(registry),
            assembler: ResultAssembler::new(registry, urls, public_api_url),
        })
    }
}

#[async_trait]
impl ConcordanceReader for ConcordanceService {
    async fn read_by_concept_id(&self, ids: &[String]) -> Result<Option<Concordances>> {
        let query = self.planner.plan_by_concept_ids(ids);

        let rows = match self.graph.execute(&query).await {
            Ok(rows) => rows,
            Err(GraphError::NoResults) => return Ok(None),
            Err(source) => {
                return Err(ConcordanceError::ConceptLookup {
                    ids: ids.to_vec(),
                    source,
                })
            }
        };

        Ok(Some(self.assembler.assemble(rows)?))
    }

    async fn read_by_authority(
        &self,
        authority: &str,
        values: &[String],
    ) -> Result<Option<Concordances>> {
        let Some(query) = self.planner.plan_by_authority(authority, values) else {
            tracing::debug!(authority, "Unsupported authority, nothing to look up");
            return Ok(None);
        };

        let rows = match self.graph.execute(&query).await {
            Ok(rows) => rows,
            Err(GraphError::NoResults) => return Ok(None),
            Err(source) => {
                return Err(ConcordanceError::AuthorityLookup {
                    authority: authority.to_string(),
                    values: values.to_vec(),
                    source,
                })
            }
        };

        Ok(Some(self.assembler.assemble(rows)?))
    }

    async fn check_connectivity(&self) -> Result<()> {
        self.graph
            .check_connectivity()
            .await
            .map_err(ConcordanceError::Connectivity)
    }
}
