//! Case-insensitive label name sets.
//!
//! GitHub treats label names case-insensitively: `Bug` and `bug` are the same label.
//! A [`LabelSet`] keys every name by its normalized (lowercase) form and remembers the
//! spelling it was first given, so results can be reported in the spelling the user or
//! the repository used.

use std::collections::BTreeMap;

#[cfg(test)]
#[path = "label_set_tests.rs"]
mod tests;

/// Returns the normalized form of a label name.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
}

/// A set of label names, compared case-insensitively.
///
/// Set operations return normalized names in sorted order. Use
/// [`LabelSet::original_names`] to map them back to the preserved spellings.
///
/// # Examples
///
/// ```
/// use label_bot_core::LabelSet;
///
/// let requested = LabelSet::new(["Bug", "kind/Feature"]);
/// let repository = LabelSet::new(["bug", "help wanted"]);
///
/// let shared = requested.intersection(&repository);
/// assert_eq!(shared, vec!["bug"]);
/// assert_eq!(requested.original_names(&shared), vec!["Bug"]);
/// assert_eq!(repository.original_names(&shared), vec!["bug"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: BTreeMap<String, String>,
}

impl LabelSet {
    /// Builds a set from raw names. The first spelling seen for a name is kept.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            labels
                .entry(normalize(name))
                .or_insert_with(|| name.to_string());
        }

        Self { labels }
    }

    /// Normalized names present in both sets.
    pub fn intersection(&self, other: &LabelSet) -> Vec<String> {
        self.labels
            .keys()
            .filter(|k| other.labels.contains_key(*k))
            .cloned()
            .collect()
    }

    /// Normalized names present in this set but not in `other`.
    pub fn difference(&self, other: &LabelSet) -> Vec<String> {
        self.labels
            .keys()
            .filter(|k| !other.labels.contains_key(*k))
            .cloned()
            .collect()
    }

    /// Maps normalized names to the spellings kept by this set.
    ///
    /// Names that are not in the set are dropped.
    pub fn original_names<I, S>(&self, normalized: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        normalized
            .into_iter()
            .filter_map(|k| self.labels.get(k.as_ref()).cloned())
            .collect()
    }

    /// Returns the spelling this set keeps for `name`, in any case.
    pub fn original_name(&self, name: &str) -> Option<&str> {
        self.labels.get(&normalize(name)).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All normalized names, sorted.
    pub fn normalized_names(&self) -> Vec<String> {
        self.labels.keys().cloned().collect()
    }

    /// Iterates over the preserved spellings, ordered by normalized name.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.values().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
