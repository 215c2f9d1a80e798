//! Pairwise product similarity from static catalog attributes.

use crate::domain::product::Product;

pub const SAME_CATEGORY_POINTS: u32 = 40;
pub const SAME_SUBCATEGORY_POINTS: u32 = 20;
pub const SAME_BRAND_POINTS: u32 = 15;
pub const CLOSE_PRICE_POINTS: u32 = 15;
pub const NEAR_PRICE_POINTS: u32 = 10;
pub const CLOSE_RATING_POINTS: u32 = 10;
pub const NEAR_RATING_POINTS: u32 = 5;

/// Additive attribute similarity in `0..=100`.
///
/// Each factor contributes independently and all comparisons are
/// commutative, so the score is symmetric. Price closeness uses the
/// relative difference `|p1 - p2| / avg(p1, p2)`: under 10% earns the full
/// bonus, under 30% the reduced one. A pair whose average price is zero
/// earns no price points. Callers never compare a product to itself.
pub fn similarity(a: &Product, b: &Product) -> u32 {
    let mut score = 0;

    if a.category == b.category {
        score += SAME_CATEGORY_POINTS;
    }
    if a.subcategory == b.subcategory {
        score += SAME_SUBCATEGORY_POINTS;
    }
    if a.brand == b.brand {
        score += SAME_BRAND_POINTS;
    }

    let avg_price = (a.price + b.price) / 2.0;
    if avg_price > 0.0 {
        let variation = (a.price - b.price).abs() / avg_price;
        if variation < 0.10 {
            score += CLOSE_PRICE_POINTS;
        } else if variation < 0.30 {
            score += NEAR_PRICE_POINTS;
        }
    }

    let rating_diff = (a.rating - b.rating).abs();
    if rating_diff < 0.5 {
        score += CLOSE_RATING_POINTS;
    } else if rating_diff < 1.0 {
        score += NEAR_RATING_POINTS;
    }

    score
}
