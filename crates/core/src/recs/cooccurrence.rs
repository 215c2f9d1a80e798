//! Co-purchase index derived from order history.

use std::collections::HashMap;

use crate::domain::order::Order;
use crate::domain::product::ProductId;

/// Which products are frequently purchased alongside a given product.
///
/// Built once from the full order list. Per product, counters are kept in
/// first-observation order and stable-sorted by count descending, so ties
/// resolve deterministically for a given order list.
#[derive(Clone, Debug, Default)]
pub struct CoOccurrenceIndex {
    by_product: HashMap<ProductId, Vec<ProductId>>,
}

impl CoOccurrenceIndex {
    pub fn build(orders: &[Order]) -> Self {
        let mut counters: HashMap<ProductId, Counter> = HashMap::new();

        for order in orders {
            for line in &order.lines {
                for other in &order.lines {
                    if other.product_id == line.product_id {
                        continue;
                    }
                    counters.entry(line.product_id).or_default().bump(other.product_id);
                }
            }
        }

        let by_product =
            counters.into_iter().map(|(id, counter)| (id, counter.ranked())).collect();
        Self { by_product }
    }

    /// Co-purchased ids for `id`, most frequent first. Empty for unknown
    /// products and for products never purchased together with anything.
    pub fn co_occurring(&self, id: ProductId) -> &[ProductId] {
        self.by_product.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Insertion-ordered counter: one count per line item, quantity ignored.
#[derive(Default)]
struct Counter {
    slots: HashMap<ProductId, usize>,
    counts: Vec<(ProductId, u32)>,
}

impl Counter {
    fn bump(&mut self, id: ProductId) {
        match self.slots.get(&id) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.slots.insert(id, self.counts.len());
                self.counts.push((id, 1));
            }
        }
    }

    fn ranked(mut self) -> Vec<ProductId> {
        // Stable sort keeps first-observation order between equal counts.
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.into_iter().map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::domain::order::{Order, OrderId, OrderLine};
    use crate::domain::product::ProductId;

    use super::CoOccurrenceIndex;

    fn order(id: &str, product_ids: &[i64]) -> Order {
        Order {
            id: OrderId(id.to_string()),
            placed_at: Utc::now(),
            lines: product_ids
                .iter()
                .map(|&id| OrderLine { product_id: ProductId(id), quantity: 1 })
                .collect(),
        }
    }

    #[test]
    fn ranks_co_purchases_by_frequency() {
        let orders = vec![
            order("o1", &[1, 2, 3]),
            order("o2", &[1, 2]),
            order("o3", &[1, 3]),
            order("o4", &[1, 2]),
        ];

        let index = CoOccurrenceIndex::build(&orders);

        // Product 2 rode along three times, product 3 twice.
        assert_eq!(index.co_occurring(ProductId(1)), &[ProductId(2), ProductId(3)]);
    }

    #[test]
    fn ties_keep_first_observation_order() {
        let orders = vec![order("o1", &[1, 5, 4])];

        let index = CoOccurrenceIndex::build(&orders);

        assert_eq!(index.co_occurring(ProductId(1)), &[ProductId(5), ProductId(4)]);
    }

    #[test]
    fn unknown_or_solo_products_have_no_co_occurrences() {
        let orders = vec![order("o1", &[7])];

        let index = CoOccurrenceIndex::build(&orders);

        assert!(index.co_occurring(ProductId(7)).is_empty());
        assert!(index.co_occurring(ProductId(99)).is_empty());
    }

    #[test]
    fn never_lists_the_product_itself() {
        let orders = vec![order("o1", &[1, 1, 2])];

        let index = CoOccurrenceIndex::build(&orders);

        assert_eq!(index.co_occurring(ProductId(1)), &[ProductId(2)]);
    }
}
