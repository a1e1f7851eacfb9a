//! Public concordance result model
//!
//! These are request-scoped values: built fresh by the assembler for every
//! lookup and serialized as-is by the HTTP layer.

use serde::{Deserialize, Serialize};

/// Prefix of every public concept ("thing") identifier
pub const THING_URI_PREFIX: &str = "http://api.ft.com/things/";

/// Build the public thing URI for a canonical concept uuid
pub fn thing_uri(uuid: &str) -> String {
    format!("{THING_URI_PREFIX}{uuid}")
}

/// Public identity of a canonical concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    #[serde(rename = "apiUrl")]
    pub api_url: String,
}

/// An identifier under a public authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    pub authority: String,
    pub identifier_value: String,
}

/// One equivalence fact: `concept` is known as `identifier`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concordance {
    pub concept: Concept,
    pub identifier: Identifier,
}

/// Ordered set of concordances for one lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concordances {
    pub concordances: Vec<Concordance>,
}

impl Concordances {
    pub fn len(&self) -> usize {
        self.concordances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concordances.is_empty()
    }
}

impl IntoIterator for Concordances {
    type Item = Concordance;
    type IntoIter = std::vec::IntoIter<Concordance>;

    fn into_iter(self) -> Self::IntoIter {
        self.concordances.into_iter()
    }
}

impl FromIterator<Concordance> for Concordances {
    fn from_iter<I: IntoIterator<Item = Concordance>>(iter: I) -> Self {
        Self {
            concordances: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let set: Concordances = vec![Concordance {
            concept: Concept {
                id: thing_uri("38ee195d-ebdd-48a9-af4b-c8a322e7b04d"),
                api_url: "http://api.ft.com/things/38ee195d-ebdd-48a9-af4b-c8a322e7b04d"
                    .to_string(),
            },
            identifier: Identifier {
                authority: "http://api.ft.com/system/NAICS".to_string(),
                identifier_value: "5111".to_string(),
            },
        }]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "concordances": [{
                    "concept": {
                        "id": "http://api.ft.com/things/38ee195d-ebdd-48a9-af4b-c8a322e7b04d",
                        "apiUrl": "http://api.ft.com/things/38ee195d-ebdd-48a9-af4b-c8a322e7b04d"
                    },
                    "identifier": {
                        "authority": "http://api.ft.com/system/NAICS",
                        "identifierValue": "5111"
                    }
                }]
            })
        );
    }

    #[test]
    fn test_empty_set_serializes_as_empty_list() {
        let json = serde_json::to_string(&Concordances::default()).unwrap();
        assert_eq!(json, r#"{"concordances":[]}"#);
    }
}
