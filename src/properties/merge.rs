//! The property map and its override-wins merge.

use std::collections::BTreeMap;
use std::fmt;

use super::line::PropertyLine;

/// Mapping of unique property keys to values.
///
/// Backed by a [`BTreeMap`], so iteration and serialization are always in ascending
/// lexicographic key order no matter how the map was built. Inserting an existing key
/// replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: BTreeMap<String, String>,
}

impl PropertyMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text.
    ///
    /// Blank lines are skipped and every other line is parsed with
    /// [`PropertyLine::parse`]. When a key repeats, the last occurrence wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use presto_bootstrap::properties::PropertyMap;
    ///
    /// let map = PropertyMap::parse("a=1\n\n  \nb=2\na=3\n");
    /// assert_eq!(map.get("a"), Some("3"));
    /// assert_eq!(map.len(), 2);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        text.split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| PropertyLine::parse(line).into_pair())
            .collect()
    }

    /// Insert a pair, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as `key=value` lines sorted by key, joined with `\n`.
    ///
    /// There is no trailing newline. The same map always produces the same text, which
    /// keeps rendered files diff-stable between container restarts.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join("\n")
    }
}

impl FromIterator<(String, String)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl fmt::Display for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Merge operator overrides into template defaults.
///
/// Every key in `custom` replaces the same key in `defaults`; keys present on only one
/// side pass through unchanged. Merging with an empty `custom` returns `defaults`.
///
/// # Examples
///
/// ```rust
/// use presto_bootstrap::properties::{PropertyMap, merge};
///
/// let defaults = PropertyMap::parse("a=1\nb=2");
/// let custom = PropertyMap::parse("b=3\nc=4");
/// assert_eq!(merge(defaults, &custom).serialize(), "a=1\nb=3\nc=4");
/// ```
#[must_use]
pub fn merge(defaults: PropertyMap, custom: &PropertyMap) -> PropertyMap {
    let mut merged = defaults;
    for (key, value) in custom.iter() {
        merged.insert(key, value);
    }
    merged
}
