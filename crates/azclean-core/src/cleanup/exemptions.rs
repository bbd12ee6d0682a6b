/// Ordered, case-insensitive list of resource id prefixes that are never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExemptionList {
    prefixes: Vec<String>,
}

impl ExemptionList {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// First prefix the lowercased `resource_id` starts with.
    pub fn matching_prefix(&self, resource_id: &str) -> Option<&str> {
        let resource_id = resource_id.to_lowercase();
        self.prefixes
            .iter()
            .find(|prefix| resource_id.starts_with(prefix.as_str()))
            .map(String::as_str)
    }

    pub fn is_exempt(&self, resource_id: &str) -> bool {
        self.matching_prefix(resource_id).is_some()
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_is_case_insensitive() {
        let list = ExemptionList::new(["/subscriptions/ABC/resourceGroups/Keep"]);
        assert!(list.is_exempt("/subscriptions/abc/resourcegroups/keep/providers/x/y/z"));
        assert!(list.is_exempt("/SUBSCRIPTIONS/ABC/RESOURCEGROUPS/KEEP"));
        assert!(!list.is_exempt("/subscriptions/abc/resourcegroups/other"));
    }

    #[test]
    fn test_first_match_wins() {
        let list = ExemptionList::new(["/subscriptions/a/resourcegroups/", "/subscriptions/a/"]);
        assert_eq!(
            list.matching_prefix("/subscriptions/a/resourcegroups/rg"),
            Some("/subscriptions/a/resourcegroups/")
        );
        assert_eq!(
            list.matching_prefix("/subscriptions/a/providers/x"),
            Some("/subscriptions/a/")
        );
    }

    #[test]
    fn test_prefix_match_is_not_substring_match() {
        let list = ExemptionList::new(["/subscriptions/a/resourcegroups/keep"]);
        assert!(!list.is_exempt("/subscriptions/b/resourcegroups/keep"));
        // Prefix semantics: a longer group name sharing the prefix is also protected
        assert!(list.is_exempt("/subscriptions/a/resourcegroups/keep-too"));
    }

    #[test]
    fn test_empty_list_exempts_nothing() {
        let list = ExemptionList::default();
        assert!(list.is_empty());
        assert!(!list.is_exempt("/subscriptions/a"));
    }
}
