//! Capped, deduplicated, most-recent-first browsing history.

use crate::domain::product::ProductId;

use super::HISTORY_CAP;

/// Ordered most-recent-first. Re-viewing a product moves its id back to the
/// front, and the list is capped at [`HISTORY_CAP`] entries. Persisted as a
/// plain JSON array of ids by the storage layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BrowsingHistory {
    entries: Vec<ProductId>,
}

impl BrowsingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted id list (most-recent-first). Dedup and the
    /// cap are re-applied, so oversized or repetitive payloads normalize
    /// instead of being trusted.
    pub fn from_entries(entries: impl IntoIterator<Item = ProductId>) -> Self {
        let mut history = Self::default();
        let most_recent_first: Vec<ProductId> = entries.into_iter().collect();
        for id in most_recent_first.into_iter().rev() {
            history.record_view(id);
        }
        history
    }

    /// Record a view. Idempotent for an id already at the front.
    pub fn record_view(&mut self, id: ProductId) {
        self.entries.retain(|existing| *existing != id);
        self.entries.insert(0, id);
        self.entries.truncate(HISTORY_CAP);
    }

    pub fn entries(&self) -> &[ProductId] {
        &self.entries
    }

    /// The `n` most recent views, most recent first.
    pub fn recent(&self, n: usize) -> &[ProductId] {
        &self.entries[..self.entries.len().min(n)]
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.entries.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
