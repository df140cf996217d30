//! Zone name rewriting

/// Maps names qualified by the template zone onto the target zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRenamer {
    from: String,
    to: String,
}

impl ZoneRenamer {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Replace the first occurrence of the template zone with the target zone.
    ///
    /// Later occurrences are left as they are, so a name that embeds the
    /// template zone twice (`a.old.com.old.com`) is only partly rewritten.
    /// Names without the template zone, or an empty template zone, come back
    /// unchanged.
    pub fn rename(&self, name: &str) -> String {
        rewrite_name(name, &self.from, &self.to)
    }
}

/// First-occurrence literal replacement of `from` with `to` inside `name`
pub fn rewrite_name(name: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return name.to_string();
    }
    name.replacen(from, to, 1)
}
