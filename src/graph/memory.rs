//! In-memory graph store
//!
//! Holds canonical concepts and the source nodes equivalent to them, shaped
//! like the concordance projection of a graph database. Concepts are loaded
//! from YAML or JSON documents (one concept or a list of concepts per file).
//!
//! Traversals follow the `EQUIVALENT_TO` shape: source node -> canonical
//! concept <- every source node of that concept.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::graph::query::{
    Anchor, CanonicalProperty, GraphQuery, NodeLabel, Projection, QueryBranch,
};
use crate::graph::traits::{ConcordanceRow, GraphError, GraphStore};

/// A canonical concept and its source representations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRecord {
    #[serde(rename = "prefUUID")]
    pub pref_uuid: String,
    /// Node labels of the canonical node
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub lei_code: Option<String>,
    #[serde(default)]
    pub iso31661: Option<String>,
    #[serde(default)]
    pub industry_identifier: Option<String>,
    #[serde(default)]
    pub source_representations: Vec<SourceRecord>,
}

impl ConceptRecord {
    fn property(&self, property: CanonicalProperty) -> Option<&str> {
        match property {
            CanonicalProperty::LeiCode => self.lei_code.as_deref(),
            CanonicalProperty::Iso31661 => self.iso31661.as_deref(),
            CanonicalProperty::IndustryIdentifier => self.industry_identifier.as_deref(),
        }
    }
}

/// A source-system node equivalent to a canonical concept
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub uuid: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub authority: Option<String>,
    #[serde(default)]
    pub authority_value: Option<String>,
}

/// A file holds either one concept or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConceptDocument {
    Many(Vec<ConceptRecord>),
    One(ConceptRecord),
}

impl ConceptDocument {
    fn into_records(self) -> Vec<ConceptRecord> {
        match self {
            Self::Many(records) => records,
            Self::One(record) => vec![record],
        }
    }
}

/// Errors loading concept documents
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse YAML concept document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON concept document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("canonical concept without prefUUID")]
    MissingPrefUuid,
    #[error("duplicate canonical concept {0}")]
    DuplicateConcept(String),
    #[error("source node {0} is equivalent to more than one canonical concept")]
    DuplicateSource(String),
}

/// Position of a source node: (canonical index, source index)
type SourcePos = (usize, usize);

/// A branch match: the canonical concept reached and the anchor source node, if any
#[derive(Debug, Clone, Copy)]
struct Matched {
    canonical: usize,
    source: Option<usize>,
}

/// In-memory `GraphStore`
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    concepts: Vec<ConceptRecord>,
    sources_by_uuid: HashMap<String, SourcePos>,
}

impl MemoryGraph {
    /// Build the graph from canonical concept records
    pub fn from_concepts(concepts: Vec<ConceptRecord>) -> Result<Self, FixtureError> {
        let mut seen_concepts = HashSet::new();
        let mut sources_by_uuid = HashMap::new();

        for (c_idx, concept) in concepts.iter().enumerate() {
            if concept.pref_uuid.is_empty() {
                return Err(FixtureError::MissingPrefUuid);
            }
            if !seen_concepts.insert(concept.pref_uuid.clone()) {
                return Err(FixtureError::DuplicateConcept(concept.pref_uuid.clone()));
            }
            for (s_idx, source) in concept.source_representations.iter().enumerate() {
                if sources_by_uuid
                    .insert(source.uuid.clone(), (c_idx, s_idx))
                    .is_some()
                {
                    return Err(FixtureError::DuplicateSource(source.uuid.clone()));
                }
            }
        }

        Ok(Self {
            concepts,
            sources_by_uuid,
        })
    }

    /// Build the graph from a YAML document (JSON is accepted too)
    pub fn from_yaml(content: &str) -> Result<Self, FixtureError> {
        let doc: ConceptDocument = serde_yaml::from_str(content)?;
        Self::from_concepts(doc.into_records())
    }

    /// Load a single concept file, or every `.yaml`/`.yml`/`.json` file in a
    /// directory (in file-name order)
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let io_err = |source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        };

        let files = if path.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(path).map_err(io_err)? {
                let file = entry.map_err(io_err)?.path();
                if is_concept_file(&file) {
                    files.push(file);
                }
            }
            files.sort();
            files
        } else {
            vec![path.to_path_buf()]
        };

        let mut concepts = Vec::new();
        for file in files {
            concepts.extend(read_concept_file(&file)?);
        }

        tracing::debug!(
            path = %path.display(),
            concepts = concepts.len(),
            "Loaded concept documents"
        );

        Self::from_concepts(concepts)
    }

    /// Number of canonical concepts held
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Number of source nodes held
    pub fn source_count(&self) -> usize {
        self.sources_by_uuid.len()
    }

    fn source(&self, canonical: usize, source: usize) -> &SourceRecord {
        &self.concepts[canonical].source_representations[source]
    }

    fn anchor_matches(&self, anchor: &Anchor) -> Vec<Matched> {
        match anchor {
            Anchor::SourceUuid { label, uuids } => {
                let mut seen = HashSet::new();
                uuids
                    .iter()
                    .filter(|uuid| seen.insert(uuid.as_str()))
                    .filter_map(|uuid| self.sources_by_uuid.get(uuid))
                    .filter(|(c, s)| has_label(&self.source(*c, *s).types, *label))
                    .map(|(c, s)| Matched {
                        canonical: *c,
                        source: Some(*s),
                    })
                    .collect()
            }
            Anchor::SourceAuthority { authority, values } => {
                let mut matched = Vec::new();
                for (c_idx, concept) in self.concepts.iter().enumerate() {
                    for (s_idx, source) in concept.source_representations.iter().enumerate() {
                        let stored = source.authority.as_deref() == Some(authority.as_str());
                        let listed = source
                            .authority_value
                            .as_ref()
                            .is_some_and(|value| values.contains(value));
                        if stored && listed {
                            matched.push(Matched {
                                canonical: c_idx,
                                source: Some(s_idx),
                            });
                        }
                    }
                }
                matched
            }
            Anchor::CanonicalProperty {
                label,
                property,
                values,
            } => self
                .concepts
                .iter()
                .enumerate()
                .filter(|(_, concept)| has_label(&concept.types, *label))
                .filter(|(_, concept)| {
                    concept
                        .property(*property)
                        .is_some_and(|value| values.iter().any(|v| v == value))
                })
                .map(|(c_idx, _)| Matched {
                    canonical: c_idx,
                    source: None,
                })
                .collect(),
        }
    }

    fn project(&self, matched: Matched, projection: &Projection, out: &mut RowSet) {
        let concept = &self.concepts[matched.canonical];
        let row = |authority: &str, value: &str| ConcordanceRow {
            canonical_uuid: concept.pref_uuid.clone(),
            types: concept.types.clone(),
            authority: authority.to_string(),
            authority_value: value.to_string(),
        };

        match projection {
            Projection::LeafAuthority => {
                for leaf in &concept.source_representations {
                    // leaves without a native authority only surface through their uuid
                    if let (Some(authority), Some(value)) = (&leaf.authority, &leaf.authority_value)
                    {
                        out.push(row(authority, value));
                    }
                }
            }
            Projection::LeafUuid { authority } => {
                for leaf in &concept.source_representations {
                    out.push(row(authority, &leaf.uuid));
                }
            }
            Projection::CanonicalProperty {
                property,
                authority,
            } => {
                if let Some(value) = concept.property(*property) {
                    out.push(row(authority, value));
                }
            }
            Projection::AnchorAuthority => {
                if let Some(s_idx) = matched.source {
                    let anchor = self.source(matched.canonical, s_idx);
                    if let (Some(authority), Some(value)) =
                        (&anchor.authority, &anchor.authority_value)
                    {
                        out.push(row(authority, value));
                    }
                }
            }
            Projection::AnchorUuid { authority } => {
                if let Some(s_idx) = matched.source {
                    let anchor = self.source(matched.canonical, s_idx);
                    out.push(row(authority, &anchor.uuid));
                }
            }
        }
    }

    fn run_branch(&self, branch: &QueryBranch, out: &mut RowSet) -> Result<(), GraphError> {
        if branch.projection.needs_source_anchor() && !branch.anchor.is_source() {
            return Err(GraphError::Query(format!(
                "projection {:?} requires a source-node anchor",
                branch.projection
            )));
        }

        for matched in self.anchor_matches(&branch.anchor) {
            self.project(matched, &branch.projection, out);
        }
        Ok(())
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn execute(&self, query: &GraphQuery) -> Result<Vec<ConcordanceRow>, GraphError> {
        let mut rows = RowSet::default();
        for branch in &query.branches {
            self.run_branch(branch, &mut rows)?;
        }

        if rows.is_empty() {
            return Err(GraphError::NoResults);
        }
        Ok(rows.into_rows())
    }

    async fn check_connectivity(&self) -> Result<(), GraphError> {
        if self.concepts.is_empty() {
            return Err(GraphError::Unavailable(
                "graph holds no concepts".to_string(),
            ));
        }
        Ok(())
    }
}

/// Insertion-ordered distinct rows
#[derive(Debug, Default)]
struct RowSet {
    rows: Vec<ConcordanceRow>,
    seen: HashSet<ConcordanceRow>,
}

impl RowSet {
    fn push(&mut self, row: ConcordanceRow) {
        if self.seen.insert(row.clone()) {
            self.rows.push(row);
        }
    }

    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn into_rows(self) -> Vec<ConcordanceRow> {
        self.rows
    }
}

fn has_label(types: &[String], label: Option<NodeLabel>) -> bool {
    match label {
        Some(label) => types.iter().any(|t| t == label.as_str()),
        None => true,
    }
}

fn is_concept_file(path: &Path) -> bool {
    path.is_file()
        && matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml" | "json")
        )
}

fn read_concept_file(path: &Path) -> Result<Vec<ConceptRecord>, FixtureError> {
    let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let doc: ConceptDocument = if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(doc.into_records())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAICS_FIXTURE: &str = r#"
prefUUID: 38ee195d-ebdd-48a9-af4b-c8a322e7b04d
types: [Thing, Concept, Classification, NAICSIndustryClassification]
industryIdentifier: "5111"
sourceRepresentations:
  - uuid: 38ee195d-ebdd-48a9-af4b-c8a322e7b04d
    types: [Thing, Concept, Classification, NAICSIndustryClassification]
    authority: Smartlogic
    authorityValue: 38ee195d-ebdd-48a9-af4b-c8a322e7b04d
"#;

    fn leaf_uuid_query(uuids: &[&str]) -> GraphQuery {
        GraphQuery::single(QueryBranch::new(
            Anchor::SourceUuid {
                label: None,
                uuids: uuids.iter().map(|s| s.to_string()).collect(),
            },
            Projection::LeafUuid {
                authority: "UPP".to_string(),
            },
        ))
    }

    #[test]
    fn test_parse_single_concept() {
        let graph = MemoryGraph::from_yaml(NAICS_FIXTURE).unwrap();
        assert_eq!(graph.concept_count(), 1);
        assert_eq!(graph.source_count(), 1);
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let yaml = r#"
- prefUUID: a
  sourceRepresentations:
    - uuid: shared
- prefUUID: b
  sourceRepresentations:
    - uuid: shared
"#;
        let err = MemoryGraph::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, FixtureError::DuplicateSource(uuid) if uuid == "shared"));
    }

    #[test]
    fn test_duplicate_concept_rejected() {
        let yaml = r#"
- prefUUID: a
- prefUUID: a
"#;
        let err = MemoryGraph::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, FixtureError::DuplicateConcept(_)));
    }

    #[tokio::test]
    async fn test_no_match_is_no_results() {
        let graph = MemoryGraph::from_yaml(NAICS_FIXTURE).unwrap();
        let err = graph
            .execute(&leaf_uuid_query(&["missing"]))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::NoResults));
    }

    #[tokio::test]
    async fn test_repeated_ids_yield_distinct_rows() {
        let graph = MemoryGraph::from_yaml(NAICS_FIXTURE).unwrap();
        let id = "38ee195d-ebdd-48a9-af4b-c8a322e7b04d";
        let rows = graph.execute(&leaf_uuid_query(&[id, id])).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].authority, "UPP");
        assert_eq!(rows[0].authority_value, id);
    }

    #[tokio::test]
    async fn test_label_scoped_canonical_anchor() {
        let graph = MemoryGraph::from_yaml(NAICS_FIXTURE).unwrap();
        let query = |label| {
            GraphQuery::single(QueryBranch::new(
                Anchor::CanonicalProperty {
                    label: Some(label),
                    property: CanonicalProperty::IndustryIdentifier,
                    values: vec!["5111".to_string()],
                },
                Projection::CanonicalProperty {
                    property: CanonicalProperty::IndustryIdentifier,
                    authority: "NAICS".to_string(),
                },
            ))
        };

        let rows = graph
            .execute(&query(NodeLabel::NaicsIndustryClassification))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].authority_value, "5111");

        let err = graph
            .execute(&query(NodeLabel::FtAnIIndustryClassification))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::NoResults));
    }

    #[tokio::test]
    async fn test_anchor_projection_on_canonical_anchor_is_rejected() {
        let graph = MemoryGraph::from_yaml(NAICS_FIXTURE).unwrap();
        let query = GraphQuery::single(QueryBranch::new(
            Anchor::CanonicalProperty {
                label: None,
                property: CanonicalProperty::IndustryIdentifier,
                values: vec!["5111".to_string()],
            },
            Projection::AnchorAuthority,
        ));
        let err = graph.execute(&query).await.unwrap_err();
        assert!(matches!(err, GraphError::Query(_)));
    }

    #[tokio::test]
    async fn test_empty_graph_is_unavailable() {
        let graph = MemoryGraph::default();
        assert!(matches!(
            graph.check_connectivity().await,
            Err(GraphError::Unavailable(_))
        ));

        let graph = MemoryGraph::from_yaml(NAICS_FIXTURE).unwrap();
        assert!(graph.check_connectivity().await.is_ok());
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("naics.yaml"), NAICS_FIXTURE).unwrap();
        std::fs::write(
            dir.path().join("brand.json"),
            r#"{"prefUUID": "b", "types": ["Brand"], "sourceRepresentations": [{"uuid": "b"}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let graph = MemoryGraph::load_path(dir.path()).unwrap();
        assert_eq!(graph.concept_count(), 2);
        assert_eq!(graph.source_count(), 2);
    }

    #[test]
    fn test_load_missing_path() {
        let err = MemoryGraph::load_path("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
