use thiserror::Error;

use crate::assembler::AssemblyError;
use crate::graph::GraphError;

#[derive(Debug, Error)]
pub enum ConcordanceError {
    #[error("invalid public API URL {url:?}: {source}")]
    InvalidPublicApiUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("error accessing Concordance datastore for identifiers {ids:?}: {source}")]
    ConceptLookup { ids: Vec<String>, source: GraphError },

    #[error(
        "error accessing Concordance datastore for authority {authority} and values {values:?}: {source}"
    )]
    AuthorityLookup {
        authority: String,
        values: Vec<String>,
        source: GraphError,
    },

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("graph store connectivity check failed: {0}")]
    Connectivity(GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_carry_context() {
        let err = ConcordanceError::ConceptLookup {
            ids: vec!["abc".to_string()],
            source: GraphError::Query("boom".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc"));
        assert!(msg.contains("boom"));

        let err = ConcordanceError::AuthorityLookup {
            authority: "http://api.ft.com/system/LEI".to_string(),
            values: vec!["VNF516RB4DFV5NQ22UF0".to_string()],
            source: GraphError::Query("boom".to_string()),
        };
        assert!(err.to_string().contains("VNF516RB4DFV5NQ22UF0"));
    }
}
