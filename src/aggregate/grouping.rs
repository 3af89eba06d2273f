//! In-memory grouping of record slices

use std::collections::BTreeMap;

/// Groups rows by key, preserving input order within each group.
/// Groups come out sorted by key.
pub fn group_by<'a, R, K, I, F>(rows: I, key: F) -> BTreeMap<K, Vec<&'a R>>
where
    R: 'a,
    K: Ord,
    I: IntoIterator<Item = &'a R>,
    F: Fn(&R) -> K,
{
    rows.into_iter().fold(BTreeMap::new(), |mut groups, row| {
        groups.entry(key(row)).or_insert_with(Vec::new).push(row);
        groups
    })
}

/// Grouping key for tables that carry both a country code and a name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountryKey {
    pub code: String,
    pub name: String,
}

impl CountryKey {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}
