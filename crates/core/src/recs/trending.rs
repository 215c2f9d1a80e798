//! Popularity-ranked fallback used to pad short recommendation lists.

use std::collections::HashSet;

use crate::domain::product::{Product, ProductId};

/// Popularity score: rating dampened by log review volume.
///
/// The natural log keeps very high review counts from dominating while
/// still rewarding volume. A product with zero reviews scores zero
/// regardless of rating, so unreviewed products never surface here.
pub fn trending_score(product: &Product) -> f64 {
    product.rating * (f64::from(product.review_count) + 1.0).ln()
}

/// In-stock products not in `exclude`, ranked by [`trending_score`]
/// descending. Stable sort: ties keep catalog order.
pub fn trending(catalog: &[Product], limit: usize, exclude: &HashSet<ProductId>) -> Vec<Product> {
    let mut ranked: Vec<&Product> =
        catalog.iter().filter(|p| p.in_stock() && !exclude.contains(&p.id)).collect();

    ranked.sort_by(|a, b| {
        trending_score(b).partial_cmp(&trending_score(a)).unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::domain::product::{Product, ProductId};

    use super::{trending, trending_score};

    fn product(id: i64, rating: f64, review_count: u32, stock: u32) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Product {id}"),
            category: "Electronics".to_string(),
            subcategory: format!("Sub{id}"),
            brand: "Acme".to_string(),
            price: 50.0,
            rating,
            review_count,
            stock,
        }
    }

    #[test]
    fn ranks_by_rating_times_log_review_volume() {
        let catalog = vec![
            product(1, 4.0, 100, 5),
            product(2, 5.0, 1, 5),
            product(3, 3.0, 1000, 5),
        ];

        let top = trending(&catalog, 2, &HashSet::new());
        let ids: Vec<i64> = top.iter().map(|p| p.id.0).collect();

        // P3 = 3*ln(1001) ~ 20.7 beats P1 = 4*ln(101) ~ 18.4; P2 ~ 3.47 misses the cut.
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn unreviewed_products_score_zero() {
        assert_eq!(trending_score(&product(1, 5.0, 0, 5)), 0.0);
    }

    #[test]
    fn filters_out_of_stock_and_excluded_ids() {
        let catalog = vec![
            product(1, 4.0, 100, 0),
            product(2, 4.0, 100, 5),
            product(3, 4.0, 100, 5),
        ];
        let exclude: HashSet<ProductId> = [ProductId(3)].into_iter().collect();

        let top = trending(&catalog, 10, &exclude);
        let ids: Vec<i64> = top.iter().map(|p| p.id.0).collect();

        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn equal_scores_keep_catalog_order() {
        let catalog = vec![product(9, 4.0, 50, 5), product(4, 4.0, 50, 5)];

        let top = trending(&catalog, 2, &HashSet::new());
        let ids: Vec<i64> = top.iter().map(|p| p.id.0).collect();

        assert_eq!(ids, vec![9, 4]);
    }
}
