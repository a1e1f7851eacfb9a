//! Query planning
//!
//! Decides which traversal to request from the graph store:
//!
//! - by concept id: the union of the generic leaf traversal, the scalar
//!   property special cases (LEI, ISO-3166-1, NAICS, FTAnI) and the UPP
//!   self-identity of every leaf;
//! - by authority: exactly one traversal, chosen by the resolved authority.
//!
//! Whether a concept takes part in a special case depends on the canonical
//! node carrying the property, not on the shape of the identifier.

use crate::authority::{self, AuthorityRegistry};
use crate::graph::{Anchor, CanonicalProperty, GraphQuery, NodeLabel, Projection, QueryBranch};

/// An authority URI resolved to the traversal strategy it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAuthority {
    /// Platform identifiers: the value is the node's own uuid
    Upp,
    /// `leiCode` on the canonical concept
    Lei,
    /// `iso31661` on location concepts
    Iso31661,
    /// `industryIdentifier` on NAICS classifications
    Naics,
    /// `industryIdentifier` on FT-AnI classifications
    FtAnI,
    /// Any other registered authority, stored verbatim on source nodes
    Generic(&'static str),
}

impl ResolvedAuthority {
    /// Strategy for an internal authority name
    pub fn from_name(name: &'static str) -> Self {
        match name {
            authority::UPP => Self::Upp,
            authority::LEI => Self::Lei,
            authority::ISO_3166_1 => Self::Iso31661,
            authority::NAICS => Self::Naics,
            authority::FTANI => Self::FtAnI,
            other => Self::Generic(other),
        }
    }

    /// Internal authority name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upp => authority::UPP,
            Self::Lei => authority::LEI,
            Self::Iso31661 => authority::ISO_3166_1,
            Self::Naics => authority::NAICS,
            Self::FtAnI => authority::FTANI,
            Self::Generic(name) => *name,
        }
    }

    /// The single traversal that finds `values` under this authority
    pub fn query(&self, values: &[String]) -> GraphQuery {
        let values = values.to_vec();
        let branch = match self {
            Self::Upp => QueryBranch::new(
                Anchor::SourceUuid {
                    label: None,
                    uuids: values,
                },
                Projection::AnchorUuid {
                    authority: authority::UPP.to_string(),
                },
            ),
            Self::Lei => canonical_property_branch(None, CanonicalProperty::LeiCode, self, values),
            Self::Iso31661 => canonical_property_branch(
                Some(NodeLabel::Location),
                CanonicalProperty::Iso31661,
                self,
                values,
            ),
            Self::Naics => canonical_property_branch(
                Some(NodeLabel::NaicsIndustryClassification),
                CanonicalProperty::IndustryIdentifier,
                self,
                values,
            ),
            Self::FtAnI => canonical_property_branch(
                Some(NodeLabel::FtAnIIndustryClassification),
                CanonicalProperty::IndustryIdentifier,
                self,
                values,
            ),
            Self::Generic(name) => QueryBranch::new(
                Anchor::SourceAuthority {
                    authority: name.to_string(),
                    values,
                },
                Projection::AnchorAuthority,
            ),
        };
        GraphQuery::single(branch)
    }
}

fn canonical_property_branch(
    label: Option<NodeLabel>,
    property: CanonicalProperty,
    authority: &ResolvedAuthority,
    values: Vec<String>,
) -> QueryBranch {
    QueryBranch::new(
        Anchor::CanonicalProperty {
            label,
            property,
            values,
        },
        Projection::CanonicalProperty {
            property,
            authority: authority.name().to_string(),
        },
    )
}

/// Builds graph traversals for concordance lookups
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryPlanner {
    registry: AuthorityRegistry,
}

impl QueryPlanner {
    pub fn new(registry: AuthorityRegistry) -> Self {
        Self { registry }
    }

    /// Resolve a public authority URI; `None` if it is not supported
    pub fn resolve_authority(&self, authority_uri: &str) -> Option<ResolvedAuthority> {
        self.registry
            .from_uri(authority_uri)
            .map(ResolvedAuthority::from_name)
    }

    /// Union of every pattern that can contribute an identifier for the
    /// concepts behind `ids`
    pub fn plan_by_concept_ids(&self, ids: &[String]) -> GraphQuery {
        let from = |label: Option<NodeLabel>| Anchor::SourceUuid {
            label,
            uuids: ids.to_vec(),
        };
        let property = |property, authority: &str| Projection::CanonicalProperty {
            property,
            authority: authority.to_string(),
        };

        GraphQuery::union(vec![
            QueryBranch::new(from(None), Projection::LeafAuthority),
            QueryBranch::new(
                from(None),
                property(CanonicalProperty::LeiCode, authority::LEI),
            ),
            QueryBranch::new(
                from(Some(NodeLabel::Location)),
                property(CanonicalProperty::Iso31661, authority::ISO_3166_1),
            ),
            QueryBranch::new(
                from(Some(NodeLabel::NaicsIndustryClassification)),
                property(CanonicalProperty::IndustryIdentifier, authority::NAICS),
            ),
            QueryBranch::new(
                from(Some(NodeLabel::FtAnIIndustryClassification)),
                property(CanonicalProperty::IndustryIdentifier, authority::FTANI),
            ),
            QueryBranch::new(
                from(None),
                Projection::LeafUuid {
                    authority: authority::UPP.to_string(),
                },
            ),
        ])
    }

    /// Single traversal for `values` under `authority_uri`
    ///
    /// Returns `None` without planning anything when the URI is not a
    /// supported authority.
    pub fn plan_by_authority(&self, authority_uri: &str, values: &[String]) -> Option<GraphQuery> {
        self.resolve_authority(authority_uri)
            .map(|resolved| resolved.query(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_special_authorities() {
        let planner = QueryPlanner::default();
        let cases = [
            ("http://api.ft.com/system/UPP", ResolvedAuthority::Upp),
            ("http://api.ft.com/system/LEI", ResolvedAuthority::Lei),
            ("http://api.ft.com/system/ISO-3166-1", ResolvedAuthority::Iso31661),
            ("http://api.ft.com/system/NAICS", ResolvedAuthority::Naics),
            ("http://api.ft.com/system/FT-AnI", ResolvedAuthority::FtAnI),
            (
                "http://api.ft.com/system/FACTSET",
                ResolvedAuthority::Generic("FACTSET"),
            ),
            (
                "http://api.ft.com/system/FT-TME",
                ResolvedAuthority::Generic("TME"),
            ),
        ];
        for (uri, expected) in cases {
            assert_eq!(planner.resolve_authority(uri), Some(expected), "{uri}");
        }
    }

    #[test]
    fn test_unknown_authority_plans_nothing() {
        let planner = QueryPlanner::default();
        assert!(planner
            .plan_by_authority(
                "http://api.ft.com/system/UnsupportedAuthority",
                &strings(&["DANMUR-1"])
            )
            .is_none());
    }

    #[test]
    fn test_concept_id_plan_is_union_of_six() {
        let planner = QueryPlanner::default();
        let ids = strings(&["38ee195d-ebdd-48a9-af4b-c8a322e7b04d"]);
        let query = planner.plan_by_concept_ids(&ids);
        assert_eq!(query.branches.len(), 6);

        assert_eq!(query.branches[0].projection, Projection::LeafAuthority);
        assert_eq!(
            query.branches[5].projection,
            Projection::LeafUuid {
                authority: "UPP".to_string()
            }
        );

        let labels: Vec<_> = query
            .branches
            .iter()
            .map(|b| match &b.anchor {
                Anchor::SourceUuid { label, uuids } => {
                    assert_eq!(uuids, &ids);
                    *label
                }
                other => panic!("unexpected anchor {other:?}"),
            })
            .collect();
        assert_eq!(
            labels,
            vec![
                None,
                None,
                Some(NodeLabel::Location),
                Some(NodeLabel::NaicsIndustryClassification),
                Some(NodeLabel::FtAnIIndustryClassification),
                None,
            ]
        );
    }

    #[test]
    fn test_upp_matches_own_uuid() {
        let planner = QueryPlanner::default();
        let query = planner
            .plan_by_authority("http://api.ft.com/system/UPP", &strings(&["d56e7388"]))
            .unwrap();
        assert_eq!(
            query,
            GraphQuery::single(QueryBranch::new(
                Anchor::SourceUuid {
                    label: None,
                    uuids: strings(&["d56e7388"]),
                },
                Projection::AnchorUuid {
                    authority: "UPP".to_string()
                },
            ))
        );
    }

    #[test]
    fn test_iso_scoped_to_locations() {
        let planner = QueryPlanner::default();
        let query = planner
            .plan_by_authority("http://api.ft.com/system/ISO-3166-1", &strings(&["RO"]))
            .unwrap();
        assert_eq!(query.branches.len(), 1);
        assert_eq!(
            query.branches[0].anchor,
            Anchor::CanonicalProperty {
                label: Some(NodeLabel::Location),
                property: CanonicalProperty::Iso31661,
                values: strings(&["RO"]),
            }
        );
    }

    #[test]
    fn test_lei_is_unscoped() {
        let planner = QueryPlanner::default();
        let query = planner
            .plan_by_authority(
                "http://api.ft.com/system/LEI",
                &strings(&["VNF516RB4DFV5NQ22UF0"]),
            )
            .unwrap();
        assert!(matches!(
            &query.branches[0].anchor,
            Anchor::CanonicalProperty {
                label: None,
                property: CanonicalProperty::LeiCode,
                ..
            }
        ));
    }

    #[test]
    fn test_generic_uses_internal_name() {
        let planner = QueryPlanner::default();
        let query = planner
            .plan_by_authority("http://api.ft.com/system/FT-TME", &strings(&["VGhl"]))
            .unwrap();
        assert_eq!(
            query,
            GraphQuery::single(QueryBranch::new(
                Anchor::SourceAuthority {
                    authority: "TME".to_string(),
                    values: strings(&["VGhl"]),
                },
                Projection::AnchorAuthority,
            ))
        );
    }
}
