//! Contact data model and the paginated API envelope.

use serde::Deserialize;

/// A contact record as returned by the API. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contact {
    pub id: i64,
    /// Absent on malformed records; treated as a filter non-match, never an error.
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Country {
    pub name: String,
}

impl Contact {
    pub fn country_name(&self) -> Option<&str> {
        self.country.as_ref().map(|c| c.name.as_str())
    }
}

/// One page of the paginated collection. Only `results` is consumed;
/// the rest of the envelope (count, next/prev links) is ignored.
#[derive(Debug, Deserialize)]
pub struct ContactPage {
    #[serde(default)]
    pub results: Vec<Contact>,
}
