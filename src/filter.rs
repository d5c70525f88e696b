//! Client-side filter over the accumulated contact list.
//!
//! The filtered view is always derived fresh from its inputs (list, search
//! string, only-even flag) and holds indices into the accumulated list, so
//! relative order is preserved and nothing is mutated in place.

use crate::contact::Contact;

/// The active filter predicate: case-insensitive substring match on the
/// country name, optionally restricted to even identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub query: String,
    pub only_even: bool,
}

impl ContactFilter {
    /// Indices of contacts passing the filter, in original order.
    pub fn apply(&self, contacts: &[Contact]) -> Vec<usize> {
        let needle = self.query.to_lowercase();
        contacts
            .iter()
            .enumerate()
            .filter(|(_, c)| self.matches_with_needle(c, &needle))
            .map(|(i, _)| i)
            .collect()
    }

    fn matches_with_needle(&self, contact: &Contact, needle: &str) -> bool {
        // A missing country never matches; an empty query matches anything
        let country_ok = match contact.country_name() {
            Some(name) => name.to_lowercase().contains(needle),
            None => false,
        };
        let parity_ok = !self.only_even || contact.id % 2 == 0;
        country_ok && parity_ok
    }
}
