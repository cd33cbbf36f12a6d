//! Most-recently-used search queries.

/// Ordered list of past queries, newest first.
///
/// Re-running a query (compared case-insensitively) moves the existing
/// entry to the front instead of adding a duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSearches {
    entries: Vec<String>,
    capacity: usize,
}

impl RecentSearches {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Seed from a persisted list, newest first
    pub fn from_entries(entries: impl IntoIterator<Item = String>, capacity: usize) -> Self {
        let mut recent = Self::new(capacity);
        for entry in entries {
            let entry = entry.trim();
            if !entry.is_empty() && recent.position(entry).is_none() {
                recent.entries.push(entry.to_string());
            }
        }
        recent.entries.truncate(capacity);
        recent
    }

    fn position(&self, query: &str) -> Option<usize> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .position(|entry| entry.to_lowercase() == query)
    }

    /// Put `query` at the front
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.capacity == 0 {
            return;
        }

        match self.position(query) {
            Some(index) => {
                let entry = self.entries.remove(index);
                self.entries.insert(0, entry);
            }
            None => {
                self.entries.insert(0, query.to_string());
                self.entries.truncate(self.capacity);
            }
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
