use testmetry_types::MatchMode;

/// Session selection by tags.
///
/// A filter is a list of `(name, value)` constraints combined under a
/// [`MatchMode`]. A constraint with an empty value only requires the tag
/// to be present. An empty filter selects every session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    names: Vec<String>,
    values: Vec<String>,
    mode: MatchMode,
}

impl TagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the tag to be present, with any value.
    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self.values.push(String::new());
        self
    }

    /// Require the tag to carry exactly `value`.
    pub fn tag_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.names.push(name.into());
        self.values.push(value.into());
        self
    }

    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn match_mode(&self) -> MatchMode {
        self.mode
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Constraints as `(name, value)` pairs, empty value meaning
    /// presence only.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names().zip(self.values())
    }
}
