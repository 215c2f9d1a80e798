//! Insertion-ordered score accumulation for candidate products.

use std::collections::HashMap;

use crate::domain::product::ProductId;

/// Ephemeral `ProductId -> accumulated score` map, built fresh per call and
/// discarded after ranking.
///
/// Candidates keep the order in which they were first added. [`ranked`]
/// stable-sorts by score descending, so equal scores resolve to
/// first-added-wins; with strategies applied in a fixed order this makes
/// every result deterministic for identical snapshots.
///
/// [`ranked`]: ScoreBoard::ranked
#[derive(Clone, Debug, Default)]
pub struct ScoreBoard {
    order: Vec<ProductId>,
    scores: HashMap<ProductId, f64>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to the candidate's score, registering it on first sight.
    pub fn add(&mut self, id: ProductId, weight: f64) {
        if !self.scores.contains_key(&id) {
            self.order.push(id);
        }
        *self.scores.entry(id).or_insert(0.0) += weight;
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.scores.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Candidate ids by accumulated score descending; ties keep insertion
    /// order.
    pub fn ranked(&self) -> Vec<ProductId> {
        let mut ranked = self.order.clone();
        ranked.sort_by(|a, b| {
            self.scores[b].partial_cmp(&self.scores[a]).unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}
