//! Concept type to public API URL mapping
//!
//! The API URL of a canonical concept depends on its node labels: an
//! organisation lives under `/organisations/`, a person under `/people/`,
//! and so on. Rules are checked in priority order and the first label match
//! wins; anything unmatched falls back to `/things/`.

/// Path segment used when no rule matches
pub const FALLBACK_PATH: &str = "things";

/// Errors building an API URL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiUrlError {
    #[error("empty canonical id")]
    EmptyId,
    #[error("no type labels for concept {0}")]
    NoTypes(String),
}

/// Builds the public API URL for a canonical concept
pub trait ApiUrlBuilder: Send + Sync {
    fn api_url(&self, uuid: &str, types: &[String], base_url: &str)
        -> Result<String, ApiUrlError>;
}

/// One label -> path segment rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePathRule {
    pub label: String,
    pub path: String,
}

impl TypePathRule {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Priority-ordered label rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePathRules {
    rules: Vec<TypePathRule>,
}

impl TypePathRules {
    pub fn new(rules: Vec<TypePathRule>) -> Self {
        Self { rules }
    }

    /// Path segment for a set of labels
    pub fn path_for(&self, types: &[String]) -> &str {
        self.rules
            .iter()
            .find(|rule| types.iter().any(|t| *t == rule.label))
            .map(|rule| rule.path.as_str())
            .unwrap_or(FALLBACK_PATH)
    }
}

impl Default for TypePathRules {
    fn default() -> Self {
        Self::new(vec![
            TypePathRule::new("Organisation", "organisations"),
            TypePathRule::new("Person", "people"),
            TypePathRule::new("Brand", "brands"),
            TypePathRule::new("Location", "things"),
            // concept-detail records have no dedicated endpoint of their own
            TypePathRule::new("FTAOrganisationDetails", "concepts"),
            TypePathRule::new("FTAPersonDetails", "concepts"),
            TypePathRule::new("SVProvision", "concepts"),
        ])
    }
}

impl ApiUrlBuilder for TypePathRules {
    fn api_url(
        &self,
        uuid: &str,
        types: &[String],
        base_url: &str,
    ) -> Result<String, ApiUrlError> {
        if uuid.is_empty() {
            return Err(ApiUrlError::EmptyId);
        }
        if types.is_empty() {
            return Err(ApiUrlError::NoTypes(uuid.to_string()));
        }

        Ok(format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.path_for(types),
            uuid
        ))
    }
}
