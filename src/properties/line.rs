//! Parsing of single `key=value` property lines.

/// One `key`/`value` pair extracted from a properties line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLine {
    /// Trimmed text before the first `=`
    pub key: String,
    /// Trimmed text after the first `=`, empty if the line has no `=`
    pub value: String,
}

impl PropertyLine {
    /// Parse a single line into a key/value pair.
    ///
    /// The line is split at the first `=` only, so values may themselves contain `=`.
    /// Both sides are trimmed. A line without `=` yields the whole trimmed line as the
    /// key and an empty value.
    ///
    /// Lines are taken literally: there is no escaping, no continuation lines and no
    /// comment syntax. Callers are expected to drop blank lines before parsing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use presto_bootstrap::properties::PropertyLine;
    ///
    /// let line = PropertyLine::parse(" query.max-memory = 50GB ");
    /// assert_eq!(line.key, "query.max-memory");
    /// assert_eq!(line.value, "50GB");
    ///
    /// let flag = PropertyLine::parse("coordinator");
    /// assert_eq!(flag.key, "coordinator");
    /// assert_eq!(flag.value, "");
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.split_once('=') {
            Some((key, value)) => Self {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            },
            None => Self {
                key: line.trim().to_string(),
                value: String::new(),
            },
        }
    }

    /// Consume the line into a `(key, value)` tuple.
    #[must_use]
    pub fn into_pair(self) -> (String, String) {
        (self.key, self.value)
    }
}
