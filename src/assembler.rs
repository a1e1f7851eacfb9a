//! Raw rows -> public concordances

use std::sync::Arc;

use crate::authority::AuthorityRegistry;
use crate::graph::ConcordanceRow;
use crate::model::{thing_uri, Concept, Concordance, Concordances, Identifier};
use crate::ontology::{ApiUrlBuilder, ApiUrlError, TypePathRules};

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("failed to build API URL for concept {canonical_uuid}: {source}")]
    ApiUrl {
        canonical_uuid: String,
        source: ApiUrlError,
    },
}

/// Maps graph rows to the public result model
///
/// Rows are emitted in the order the graph returned them. A row whose
/// authority has no public URI is dropped; a concept whose API URL cannot
/// be built fails the whole set.
#[derive(Clone)]
pub struct ResultAssembler {
    registry: AuthorityRegistry,
    urls: Arc<dyn ApiUrlBuilder>,
    base_url: String,
}

impl ResultAssembler {
    pub fn new(
        registry: AuthorityRegistry,
        urls: Arc<dyn ApiUrlBuilder>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            urls,
            base_url: base_url.into(),
        }
    }

    /// Assembler with the default registry and type rules
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(
            AuthorityRegistry::new(),
            Arc::new(TypePathRules::default()),
            base_url,
        )
    }

    pub fn assemble(&self, rows: Vec<ConcordanceRow>) -> Result<Concordances, AssemblyError> {
        let mut out = Vec::with_capacity(rows.len());

        for row in rows {
            let api_url = self
                .urls
                .api_url(&row.canonical_uuid, &row.types, &self.base_url)
                .map_err(|source| AssemblyError::ApiUrl {
                    canonical_uuid: row.canonical_uuid.clone(),
                    source,
                })?;

            let Some(authority) = self.registry.to_uri(&row.authority) else {
                tracing::debug!(
                    authority = %row.authority,
                    canonical_uuid = %row.canonical_uuid,
                    "Dropping row with unmapped authority"
                );
                continue;
            };

            out.push(Concordance {
                concept: Concept {
                    id: thing_uri(&row.canonical_uuid),
                    api_url,
                },
                identifier: Identifier {
                    authority: authority.to_string(),
                    identifier_value: row.authority_value,
                },
            });
        }

        Ok(Concordances { concordances: out })
    }
}

impl std::fmt::Debug for ResultAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultAssembler")
            .field("registry", &self.registry)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(uuid: &str, types: &[&str], authority: &str, value: &str) -> ConcordanceRow {
        ConcordanceRow {
            canonical_uuid: uuid.to_string(),
            types: types.iter().map(|s| s.to_string()).collect(),
            authority: authority.to_string(),
            authority_value: value.to_string(),
        }
    }

    const BRAND: &str = "b20801ac-5a76-43cf-b816-8c3b2f7133ad";

    #[test]
    fn test_maps_rows_in_order() {
        let assembler = ResultAssembler::with_base_url("http://api.ft.com");
        let types = ["Thing", "Concept", "Brand"];
        let set = assembler
            .assemble(vec![
                row(BRAND, &types, "Smartlogic", BRAND),
                row(BRAND, &types, "UPP", BRAND),
            ])
            .unwrap();

        assert_eq!(set.len(), 2);
        let first = &set.concordances[0];
        assert_eq!(first.concept.id, format!("http://api.ft.com/things/{BRAND}"));
        assert_eq!(first.concept.api_url, format!("http://api.ft.com/brands/{BRAND}"));
        assert_eq!(first.identifier.authority, "http://api.ft.com/system/SMARTLOGIC");
        assert_eq!(set.concordances[1].identifier.authority, "http://api.ft.com/system/UPP");
    }

    #[test]
    fn test_unmapped_authority_is_dropped() {
        let assembler = ResultAssembler::with_base_url("http://api.ft.com");
        let uuid = "3c4666ef-b403-4313-b648-d639762750e4";
        let types = ["Thing", "Concept", "Person"];
        let set = assembler
            .assemble(vec![
                row(uuid, &types, "GENERIC", "some-value"),
                row(uuid, &types, "UPP", uuid),
            ])
            .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.concordances[0].identifier.identifier_value, uuid);
    }

    #[test]
    fn test_only_unmapped_rows_yield_empty_set() {
        let assembler = ResultAssembler::with_base_url("http://api.ft.com");
        let set = assembler
            .assemble(vec![row("x", &["Thing"], "GENERIC", "v")])
            .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_url_failure_fails_whole_set() {
        let assembler = ResultAssembler::with_base_url("http://api.ft.com");
        let err = assembler
            .assemble(vec![
                row(BRAND, &["Brand"], "UPP", BRAND),
                row("untyped", &[], "UPP", "untyped"),
            ])
            .unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::ApiUrl { canonical_uuid, source: ApiUrlError::NoTypes(_) }
                if canonical_uuid == "untyped"
        ));
    }

    #[test]
    fn test_url_failure_wins_over_unmapped_authority() {
        // the API URL is built before the authority is looked up
        let assembler = ResultAssembler::with_base_url("http://api.ft.com");
        let err = assembler.assemble(vec![row("untyped", &[], "GENERIC", "v")]);
        assert!(err.is_err());
    }
}
