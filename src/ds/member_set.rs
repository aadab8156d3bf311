//! Named bucket leaf: a deduplicated key set with a materialized export view.
//!
//! The live set is the single source of truth; [`MemberSet::prepare_export`]
//! recomputes the sorted export view from it, so the view can never drift
//! out of date as long as it is rebuilt before serialization.

use rustc_hash::FxHashSet;

/// One named bucket holding deduplicated member keys.
///
/// # Example
///
/// ```
/// use quantmap::ds::MemberSet;
///
/// let mut bucket = MemberSet::new("From 2 to 3");
/// bucket.insert("assets/a.png".to_string());
/// bucket.insert("assets/a.png".to_string());
/// assert_eq!(bucket.len(), 1);
///
/// bucket.prepare_export();
/// assert_eq!(bucket.exported(), ["assets/a.png"]);
/// ```
#[derive(Debug)]
pub struct MemberSet {
    name: String,
    members: FxHashSet<String>,
    exported: Vec<String>,
}

impl MemberSet {
    /// Creates an empty bucket with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: FxHashSet::default(),
            exported: Vec::new(),
        }
    }

    /// Display name of the numeric range this bucket represents.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds `key` to the set. Returns `false` if it was already present.
    pub fn insert(&mut self, key: String) -> bool {
        self.members.insert(key)
    }

    /// Removes `key` from the set. Returns `false` if it was not present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.members.remove(key)
    }

    /// Returns `true` if `key` is a member.
    pub fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    /// Number of member keys.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the bucket holds no keys.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over member keys in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(String::as_str)
    }

    /// Clears the member set and the export view.
    pub fn clear(&mut self) {
        self.members.clear();
        self.exported.clear();
    }

    /// Rebuilds the export view: the current members, sorted
    /// lexicographically. Safe to call repeatedly; always reflects the set
    /// at call time.
    pub fn prepare_export(&mut self) {
        self.exported = self.members.iter().cloned().collect();
        self.exported.sort_unstable();
    }

    /// The export view as of the last [`prepare_export`](Self::prepare_export).
    pub fn exported(&self) -> &[String] {
        &self.exported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_deduplicates() {
        let mut bucket = MemberSet::new("<= 1");
        assert!(bucket.insert("a".to_string()));
        assert!(!bucket.insert("a".to_string()));
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn remove_reports_presence() {
        let mut bucket = MemberSet::new("<= 1");
        bucket.insert("a".to_string());
        assert!(bucket.remove("a"));
        assert!(!bucket.remove("a"));
        assert!(bucket.is_empty());
    }

    #[test]
    fn name_is_fixed_at_construction() {
        let bucket = MemberSet::new("From 8 to 15");
        assert_eq!(bucket.name(), "From 8 to 15");
    }

    #[test]
    fn clear_empties_members_and_export_view() {
        let mut bucket = MemberSet::new("<= 1");
        bucket.insert("a".to_string());
        bucket.prepare_export();
        bucket.clear();
        assert!(bucket.is_empty());
        assert!(bucket.exported().is_empty());
    }

    #[test]
    fn export_view_is_sorted_and_current() {
        let mut bucket = MemberSet::new("<= 1");
        bucket.insert("c".to_string());
        bucket.insert("a".to_string());
        bucket.prepare_export();
        assert_eq!(bucket.exported(), ["a", "c"]);

        bucket.insert("b".to_string());
        bucket.prepare_export();
        assert_eq!(bucket.exported(), ["a", "b", "c"]);
    }
}
