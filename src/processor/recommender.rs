use crate::models::{Product, ProductLink, RecommendedProduct, Recommendations, UserInputs};
use std::cmp::Ordering;
use tracing::info;

/// Rows shown in the recommendation table.
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Products within budget and at or above the rating floor, best rated first.
/// Rows missing a price or rating never match.
pub fn recommend(products: &[Product], inputs: &UserInputs, limit: usize) -> Recommendations {
    let budget = inputs.max_budget as f64;

    let mut matches: Vec<&Product> = products
        .iter()
        .filter(|p| match (p.actual_price, p.ratings) {
            (Some(price), Some(rating)) => price <= budget && rating >= inputs.min_rating,
            _ => false,
        })
        .collect();

    info!(
        "{} products match budget {} and minimum rating {:.1}",
        matches.len(),
        inputs.max_budget,
        inputs.min_rating
    );

    if matches.is_empty() {
        return Recommendations::NoMatches;
    }

    // Stable sort: equal keys keep dataset order.
    matches.sort_by(|a, b| {
        descending(a.ratings, b.ratings).then_with(|| descending(a.discount_percent, b.discount_percent))
    });

    let rows = matches
        .into_iter()
        .take(limit)
        .map(|p| RecommendedProduct {
            name: p.name.clone(),
            actual_price: p.actual_price,
            discount_price: p.discount_price,
            ratings: p.ratings,
            discount_percent: p.discount_percent,
            link: ProductLink::from_raw(p.link.as_deref()),
        })
        .collect();

    Recommendations::Matches(rows)
}

/// Larger values first, nulls last.
fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, price: f64, rating: f64, discount: Option<f64>) -> Product {
        Product {
            name: Some(name.to_string()),
            main_category: None,
            sub_category: None,
            actual_price: Some(price),
            discount_price: None,
            ratings: Some(rating),
            link: None,
            discount_percent: discount,
            price_segment: None,
        }
    }

    fn names(recommendations: &Recommendations) -> Vec<&str> {
        recommendations
            .products()
            .iter()
            .filter_map(|p| p.name.as_deref())
            .collect()
    }

    #[test]
    fn test_budget_and_rating_filter() {
        let products = vec![
            listing("A", 40_000.0, 4.5, None),
            listing("B", 60_000.0, 4.8, None),
            listing("C", 30_000.0, 4.0, None),
        ];

        let result = recommend(&products, &UserInputs::new(50_000, 4.0), MAX_RECOMMENDATIONS);
        assert_eq!(names(&result), vec!["A", "C"]);
    }

    #[test]
    fn test_no_matches_is_explicit() {
        let products = vec![listing("A", 40_000.0, 4.5, None)];

        let result = recommend(&products, &UserInputs::new(100, 5.0), MAX_RECOMMENDATIONS);
        assert_eq!(result, Recommendations::NoMatches);
        assert!(result.is_empty());
    }

    #[test]
    fn test_discount_breaks_rating_ties() {
        let products = vec![
            listing("low", 20_000.0, 4.3, Some(5.0)),
            listing("none", 20_000.0, 4.3, None),
            listing("high", 20_000.0, 4.3, Some(35.0)),
            listing("best", 20_000.0, 4.9, Some(1.0)),
        ];

        let result = recommend(&products, &UserInputs::new(50_000, 1.0), MAX_RECOMMENDATIONS);
        assert_eq!(names(&result), vec!["best", "high", "low", "none"]);
    }

    #[test]
    fn test_rows_with_missing_values_never_match() {
        let mut unpriced = listing("unpriced", 0.0, 4.9, None);
        unpriced.actual_price = None;
        let mut unrated = listing("unrated", 1_000.0, 0.0, None);
        unrated.ratings = None;

        let result = recommend(&[unpriced, unrated], &UserInputs::new(50_000, 1.0), MAX_RECOMMENDATIONS);
        assert_eq!(result, Recommendations::NoMatches);
    }

    #[test]
    fn test_limit_and_link_projection() {
        let mut products: Vec<Product> = (0..12)
            .map(|i| listing(&format!("p{}", i), 10_000.0, 4.0 + i as f64 * 0.05, None))
            .collect();
        products[11].link = Some("https://example.com/p11".to_string());

        let result = recommend(&products, &UserInputs::new(50_000, 4.0), MAX_RECOMMENDATIONS);
        let rows = result.products();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].name.as_deref(), Some("p11"));
        assert_eq!(rows[0].link, ProductLink::View("https://example.com/p11".to_string()));
        assert_eq!(rows[1].link, ProductLink::NotAvailable);
    }
}
