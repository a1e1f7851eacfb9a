//! Authority registry
//!
//! Maps the internal authority names stored on source nodes (`"TME"`,
//! `"LEI"`, ...) to the public authority URIs exposed in concordance
//! results, and back. The table is closed: names outside it are valid graph
//! data but never appear in output, and URIs outside it are unknown.

/// Base of every public authority URI
pub const AUTHORITY_URI_BASE: &str = "http://api.ft.com/system/";

/// The platform's own concept identifiers
pub const UPP: &str = "UPP";
/// Legal Entity Identifier, stored as a canonical property
pub const LEI: &str = "LEI";
/// ISO 3166-1 country code, stored as a canonical property on locations
pub const ISO_3166_1: &str = "ISO-3166-1";
/// NAICS industry code, stored as a canonical property on classifications
pub const NAICS: &str = "NAICS";
/// FT-AnI industry code, stored as a canonical property on classifications
pub const FTANI: &str = "FTAnI";

/// A single name <-> URI pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorityEntry {
    pub name: &'static str,
    pub uri: &'static str,
}

const AUTHORITY_TABLE: &[AuthorityEntry] = &[
    AuthorityEntry {
        name: "TME",
        uri: "http://api.ft.com/system/FT-TME",
    },
    AuthorityEntry {
        name: "FACTSET",
        uri: "http://api.ft.com/system/FACTSET",
    },
    AuthorityEntry {
        name: UPP,
        uri: "http://api.ft.com/system/UPP",
    },
    AuthorityEntry {
        name: LEI,
        uri: "http://api.ft.com/system/LEI",
    },
    AuthorityEntry {
        name: "Smartlogic",
        uri: "http://api.ft.com/system/SMARTLOGIC",
    },
    AuthorityEntry {
        name: "ManagedLocation",
        uri: "http://api.ft.com/system/MANAGEDLOCATION",
    },
    AuthorityEntry {
        name: ISO_3166_1,
        uri: "http://api.ft.com/system/ISO-3166-1",
    },
    AuthorityEntry {
        name: "Geonames",
        uri: "http://api.ft.com/system/GEONAMES",
    },
    AuthorityEntry {
        name: "Wikidata",
        uri: "http://api.ft.com/system/WIKIDATA",
    },
    AuthorityEntry {
        name: "DBPedia",
        uri: "http://api.ft.com/system/DBPEDIA",
    },
    AuthorityEntry {
        name: NAICS,
        uri: "http://api.ft.com/system/NAICS",
    },
    AuthorityEntry {
        name: FTANI,
        uri: "http://api.ft.com/system/FT-AnI",
    },
];

/// Registry of supported concordance authorities
///
/// Read-only; copies are free and safe to share across tasks.
#[derive(Debug, Clone, Copy)]
pub struct AuthorityRegistry {
    entries: &'static [AuthorityEntry],
}

impl AuthorityRegistry {
    /// The fixed table of supported authorities
    pub const fn new() -> Self {
        Self {
            entries: AUTHORITY_TABLE,
        }
    }

    /// Public URI for an internal authority name (exact match)
    pub fn to_uri(&self, name: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.uri)
    }

    /// Internal authority name for a public URI (exact match)
    pub fn from_uri(&self, uri: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.uri == uri)
            .map(|entry| entry.name)
    }

    /// All entries in table order
    pub fn entries(&self) -> impl Iterator<Item = &AuthorityEntry> {
        self.entries.iter()
    }
}

impl Default for AuthorityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
