//! Traversal descriptors
//!
//! A `GraphQuery` is what the planner hands to a `GraphStore`: a union of
//! branches, each made of an anchor (which nodes to start from) and a
//! projection (which rows to emit once the canonical concept is reached).
//! Rows are distinct within a branch and the union collapses duplicates
//! across branches.

use std::fmt;

/// Node labels the planner scopes anchors by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeLabel {
    Location,
    NaicsIndustryClassification,
    FtAnIIndustryClassification,
}

impl NodeLabel {
    /// Label as stored on graph nodes
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::NaicsIndustryClassification => "NAICSIndustryClassification",
            Self::FtAnIIndustryClassification => "FTAnIIndustryClassification",
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar identifier properties carried by canonical concepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalProperty {
    LeiCode,
    Iso31661,
    IndustryIdentifier,
}

impl CanonicalProperty {
    /// Property name as stored on canonical nodes
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeiCode => "leiCode",
            Self::Iso31661 => "iso31661",
            Self::IndustryIdentifier => "industryIdentifier",
        }
    }
}

impl fmt::Display for CanonicalProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a branch starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Source nodes whose own uuid is listed, optionally restricted to a label
    SourceUuid {
        label: Option<NodeLabel>,
        uuids: Vec<String>,
    },
    /// Source nodes stored under `authority` with a listed authority value
    SourceAuthority {
        authority: String,
        values: Vec<String>,
    },
    /// Canonical nodes whose `property` holds a listed value
    CanonicalProperty {
        label: Option<NodeLabel>,
        property: CanonicalProperty,
        values: Vec<String>,
    },
}

impl Anchor {
    /// True when the anchor matches source nodes rather than canonical ones
    pub fn is_source(&self) -> bool {
        !matches!(self, Self::CanonicalProperty { .. })
    }
}

/// What a branch emits per matched canonical concept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Every equivalent leaf, under its own authority and value
    LeafAuthority,
    /// Every equivalent leaf's uuid, under a fixed authority
    LeafUuid { authority: String },
    /// A canonical property value under a fixed authority, when present
    CanonicalProperty {
        property: CanonicalProperty,
        authority: String,
    },
    /// The anchor node's own authority and value
    AnchorAuthority,
    /// The anchor node's own uuid, under a fixed authority
    AnchorUuid { authority: String },
}

impl Projection {
    /// Projections that read the anchor node itself need a source anchor
    pub fn needs_source_anchor(&self) -> bool {
        matches!(self, Self::AnchorAuthority | Self::AnchorUuid { .. })
    }
}

/// One anchor + projection pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBranch {
    pub anchor: Anchor,
    pub projection: Projection,
}

impl QueryBranch {
    pub fn new(anchor: Anchor, projection: Projection) -> Self {
        Self { anchor, projection }
    }
}

/// Union of branches handed to the graph store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQuery {
    pub branches: Vec<QueryBranch>,
}

impl GraphQuery {
    /// A query with exactly one shape
    pub fn single(branch: QueryBranch) -> Self {
        Self {
            branches: vec![branch],
        }
    }

    /// Set-union of several shapes
    pub fn union(branches: Vec<QueryBranch>) -> Self {
        Self { branches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_kinds() {
        let source = Anchor::SourceUuid {
            label: None,
            uuids: vec!["a".to_string()],
        };
        let canonical = Anchor::CanonicalProperty {
            label: Some(NodeLabel::Location),
            property: CanonicalProperty::Iso31661,
            values: vec!["RO".to_string()],
        };
        assert!(source.is_source());
        assert!(!canonical.is_source());
    }

    #[test]
    fn test_stored_names() {
        assert_eq!(NodeLabel::Location.as_str(), "Location");
        assert_eq!(
            NodeLabel::NaicsIndustryClassification.to_string(),
            "NAICSIndustryClassification"
        );
        assert_eq!(CanonicalProperty::LeiCode.as_str(), "leiCode");
        assert_eq!(CanonicalProperty::Iso31661.to_string(), "iso31661");
    }
}
