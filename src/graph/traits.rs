//! Core traits and types for the graph store abstraction
//!
//! This module defines the `GraphStore` trait that the resolution engine
//! talks to. The engine only decides which traversal to request and how to
//! read the rows back; executing the traversal is the store's job.

use async_trait::async_trait;

use crate::graph::query::GraphQuery;

/// A single raw row returned by a concordance traversal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConcordanceRow {
    /// `prefUUID` of the canonical concept
    pub canonical_uuid: String,
    /// Node labels of the canonical concept
    pub types: Vec<String>,
    /// Internal authority name (not yet mapped to a public URI)
    pub authority: String,
    /// Identifier value under that authority
    pub authority_value: String,
}

/// The graph store trait
///
/// Implementations must be Send + Sync for use in async contexts.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute a traversal
    ///
    /// Rows are distinct and come back in traversal order. A traversal that
    /// matches nothing returns `GraphError::NoResults` rather than an empty
    /// vector.
    async fn execute(&self, query: &GraphQuery) -> Result<Vec<ConcordanceRow>, GraphError>;

    /// Cheap liveness probe used by health checks
    async fn check_connectivity(&self) -> Result<(), GraphError>;
}

/// Errors that can occur talking to the graph store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Sentinel: the traversal matched nothing. Not a failure.
    #[error("no results found")]
    NoResults,
    #[error("graph store unavailable: {0}")]
    Unavailable(String),
    #[error("query failed: {0}")]
    Query(String),
}
