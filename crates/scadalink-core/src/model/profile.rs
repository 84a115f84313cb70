use std::collections::BTreeSet;

/// Static description of one device group on a WebAccess node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupProfile {
    /// Stable identifier used in config files and on the command line.
    pub id: String,
    /// WebAccess project name, used as the command path segment.
    pub project: String,
    /// Final path segment of the query endpoint.
    pub query_suffix: String,
    /// Tags requested on every poll.
    pub tags: Vec<String>,
    /// Tags commands may target. `None` accepts any tag.
    pub controllable: Option<BTreeSet<String>>,
}

impl GroupProfile {
    pub fn new(
        id: impl Into<String>,
        project: impl Into<String>,
        query_suffix: impl Into<String>,
        tags: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            project: project.into(),
            query_suffix: query_suffix.into(),
            tags: tags.iter().map(|&t| t.to_owned()).collect(),
            controllable: None,
        }
    }

    /// Restrict commands to `tags`.
    pub fn with_controllable(mut self, tags: &[&str]) -> Self {
        self.controllable = Some(tags.iter().map(|&t| t.to_owned()).collect());
        self
    }

    pub fn with_query_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.query_suffix = suffix.into();
        self
    }

    /// Whether a command may target `tag`.
    pub fn is_controllable(&self, tag: &str) -> bool {
        self.controllable
            .as_ref()
            .is_none_or(|allowed| allowed.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_profile_accepts_any_tag() {
        let profile = GroupProfile::new("lab", "Lab", "express", &["a"]);
        assert!(profile.is_controllable("anything"));
    }

    #[test]
    fn allow_list_is_exact_and_case_sensitive() {
        let profile =
            GroupProfile::new("lab", "Lab", "express", &["Pump1_1"]).with_controllable(&["Pump1_1"]);
        assert!(profile.is_controllable("Pump1_1"));
        assert!(!profile.is_controllable("pump1_1"));
        assert!(!profile.is_controllable("Flow_1"));
    }
}
