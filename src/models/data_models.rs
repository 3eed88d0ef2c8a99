use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MAX_BUDGET: i64 = 50_000;
pub const DEFAULT_MIN_RATING: f64 = 4.0;
pub const MIN_RATING_FLOOR: f64 = 1.0;
pub const MIN_RATING_CEILING: f64 = 5.0;
/// Budget input granularity, counted from the observed minimum price.
pub const BUDGET_STEP: i64 = 5_000;

/// One catalog row after cleaning and derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: Option<String>,
    pub main_category: Option<String>,
    pub sub_category: Option<String>,
    pub actual_price: Option<f64>,
    pub discount_price: Option<f64>,
    pub ratings: Option<f64>,
    pub link: Option<String>,
    pub discount_percent: Option<f64>,
    pub price_segment: Option<PriceSegment>,
}

/// Fixed price buckets, declared in ascending price order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceSegment {
    Budget,
    #[serde(rename = "Mid-Range")]
    MidRange,
    Premium,
    Luxury,
}

impl PriceSegment {
    pub const ALL: [PriceSegment; 4] = [
        PriceSegment::Budget,
        PriceSegment::MidRange,
        PriceSegment::Premium,
        PriceSegment::Luxury,
    ];

    /// Bin edges; each segment covers `(edges[i], edges[i + 1]]`.
    pub const EDGES: [f64; 5] = [0.0, 30_000.0, 50_000.0, 80_000.0, 200_000.0];

    pub fn label(&self) -> &'static str {
        match self {
            PriceSegment::Budget => "Budget",
            PriceSegment::MidRange => "Mid-Range",
            PriceSegment::Premium => "Premium",
            PriceSegment::Luxury => "Luxury",
        }
    }

    /// Right-closed, left-open bucketing. Zero, negatives, prices above the
    /// last edge and nulls get no segment.
    pub fn from_price(price: Option<f64>) -> Option<Self> {
        let price = price?;
        Self::ALL
            .iter()
            .enumerate()
            .find(|(i, _)| price > Self::EDGES[*i] && price <= Self::EDGES[i + 1])
            .map(|(_, segment)| *segment)
    }
}

impl fmt::Display for PriceSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One summarized row per distinct group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub key: String,
    /// Absent for groupings that do not report price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<f64>,
    pub avg_rating: Option<f64>,
    pub product_count: usize,
}

/// Scalars supplied by the presentation layer on every interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserInputs {
    pub max_budget: i64,
    pub min_rating: f64,
}

impl Default for UserInputs {
    fn default() -> Self {
        Self {
            max_budget: DEFAULT_MAX_BUDGET,
            min_rating: DEFAULT_MIN_RATING,
        }
    }
}

impl UserInputs {
    pub fn new(max_budget: i64, min_rating: f64) -> Self {
        Self {
            max_budget,
            min_rating,
        }
    }

    /// Applies the input-boundary limits: budget within the observed price
    /// range (when one exists), rating within [1.0, 5.0].
    pub fn clamped(&self, bounds: Option<BudgetBounds>) -> Self {
        let max_budget = match bounds {
            Some(bounds) => self.max_budget.clamp(bounds.min, bounds.max),
            None => self.max_budget,
        };
        let min_rating = if self.min_rating.is_nan() {
            DEFAULT_MIN_RATING
        } else {
            self.min_rating.clamp(MIN_RATING_FLOOR, MIN_RATING_CEILING)
        };

        Self {
            max_budget,
            min_rating,
        }
    }

    /// Clamps, then moves user-entered values onto the input grid: the budget
    /// to the nearest `bounds.min + k * BUDGET_STEP` not above `bounds.max`,
    /// the rating to one decimal place.
    pub fn snapped(&self, bounds: Option<BudgetBounds>) -> Self {
        let clamped = self.clamped(bounds);

        let max_budget = match bounds {
            Some(bounds) => {
                let offset = (clamped.max_budget - bounds.min) as f64;
                let steps = (offset / BUDGET_STEP as f64).round() as i64;
                let on_grid = bounds.min + steps * BUDGET_STEP;
                if on_grid > bounds.max {
                    on_grid - BUDGET_STEP
                } else {
                    on_grid
                }
            }
            None => clamped.max_budget,
        };
        let min_rating = ((clamped.min_rating * 10.0).round() / 10.0).clamp(MIN_RATING_FLOOR, MIN_RATING_CEILING);

        Self {
            max_budget,
            min_rating,
        }
    }
}

/// Observed actual_price range, truncated to whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBounds {
    pub min: i64,
    pub max: i64,
}

impl BudgetBounds {
    pub fn from_prices<I>(prices: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut range: Option<(f64, f64)> = None;
        for price in prices.into_iter().flatten() {
            range = Some(match range {
                Some((lo, hi)) => (lo.min(price), hi.max(price)),
                None => (price, price),
            });
        }

        range.map(|(lo, hi)| BudgetBounds {
            min: lo.trunc() as i64,
            max: hi.trunc() as i64,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url")]
pub enum ProductLink {
    View(String),
    NotAvailable,
}

impl ProductLink {
    /// Any present value is a link, whitespace included; only a missing or
    /// empty cell is unavailable.
    pub fn from_raw(link: Option<&str>) -> Self {
        match link {
            Some(url) if !url.is_empty() => ProductLink::View(url.to_string()),
            _ => ProductLink::NotAvailable,
        }
    }
}

/// Percent-encodes the characters that would end a markdown link target.
fn link_target(url: &str) -> String {
    let mut target = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            ' ' | '\n' | '\r' | '\t' => target.push_str("%20"),
            '(' => target.push_str("%28"),
            ')' => target.push_str("%29"),
            '<' => target.push_str("%3C"),
            '>' => target.push_str("%3E"),
            other => target.push(other),
        }
    }
    target
}

impl fmt::Display for ProductLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductLink::View(url) => write!(f, "[View Product]({})", link_target(url)),
            ProductLink::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// Projection of a product shown in the recommendation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    pub name: Option<String>,
    pub actual_price: Option<f64>,
    pub discount_price: Option<f64>,
    pub ratings: Option<f64>,
    pub discount_percent: Option<f64>,
    pub link: ProductLink,
}

/// "No matches" is a valid outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "products")]
pub enum Recommendations {
    Matches(Vec<RecommendedProduct>),
    NoMatches,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        match self {
            Recommendations::Matches(products) => products.is_empty(),
            Recommendations::NoMatches => true,
        }
    }

    pub fn products(&self) -> &[RecommendedProduct] {
        match self {
            Recommendations::Matches(products) => products,
            Recommendations::NoMatches => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_segment_boundaries() {
        assert_eq!(PriceSegment::from_price(Some(30_000.0)), Some(PriceSegment::Budget));
        assert_eq!(PriceSegment::from_price(Some(30_001.0)), Some(PriceSegment::MidRange));
        assert_eq!(PriceSegment::from_price(Some(50_000.0)), Some(PriceSegment::MidRange));
        assert_eq!(PriceSegment::from_price(Some(80_000.5)), Some(PriceSegment::Luxury));
        assert_eq!(PriceSegment::from_price(Some(200_000.0)), Some(PriceSegment::Luxury));
        assert_eq!(PriceSegment::from_price(Some(0.0)), None);
        assert_eq!(PriceSegment::from_price(Some(200_001.0)), None);
        assert_eq!(PriceSegment::from_price(None), None);
    }

    #[test]
    fn test_segment_labels() {
        let labels: Vec<_> = PriceSegment::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["Budget", "Mid-Range", "Premium", "Luxury"]);
        assert_eq!(
            serde_json::to_string(&PriceSegment::MidRange).unwrap(),
            "\"Mid-Range\""
        );
    }

    #[test]
    fn test_inputs_clamping() {
        let bounds = Some(BudgetBounds { min: 12_000, max: 90_000 });

        let low = UserInputs::new(100, 0.2).clamped(bounds);
        assert_eq!(low, UserInputs::new(12_000, 1.0));

        let high = UserInputs::new(1_000_000, 7.5).clamped(bounds);
        assert_eq!(high, UserInputs::new(90_000, 5.0));

        let unbounded = UserInputs::new(100, 4.5).clamped(None);
        assert_eq!(unbounded, UserInputs::new(100, 4.5));
    }

    #[test]
    fn test_inputs_snap_to_grid() {
        let bounds = Some(BudgetBounds { min: 3_999, max: 245_000 });

        assert_eq!(UserInputs::new(51_000, 4.26).snapped(bounds), UserInputs::new(48_999, 4.3));
        assert_eq!(UserInputs::new(52_000, 4.24).snapped(bounds), UserInputs::new(53_999, 4.2));
        // the top of the range is only reachable on a whole step
        assert_eq!(UserInputs::new(245_000, 5.0).snapped(bounds), UserInputs::new(243_999, 5.0));
        assert_eq!(UserInputs::new(100, 0.0).snapped(bounds), UserInputs::new(3_999, 1.0));
        assert_eq!(UserInputs::new(12_345, 4.0).snapped(None), UserInputs::new(12_345, 4.0));
    }

    #[test]
    fn test_budget_bounds_truncate() {
        let bounds = BudgetBounds::from_prices(vec![Some(30_999.9), None, Some(12_499.5)]);
        assert_eq!(bounds, Some(BudgetBounds { min: 12_499, max: 30_999 }));
        assert_eq!(BudgetBounds::from_prices(vec![None, None]), None);
    }

    #[test]
    fn test_product_link_display() {
        let link = ProductLink::from_raw(Some("https://example.com/ac"));
        assert_eq!(link.to_string(), "[View Product](https://example.com/ac)");
        assert_eq!(ProductLink::from_raw(None).to_string(), "N/A");
        assert_eq!(ProductLink::from_raw(Some("")), ProductLink::NotAvailable);
        assert_eq!(ProductLink::from_raw(Some("  ")), ProductLink::View("  ".to_string()));
    }

    #[test]
    fn test_product_link_escapes_target() {
        let link = ProductLink::from_raw(Some("https://example.com/ac_(1.5 ton)"));
        assert_eq!(
            link.to_string(),
            "[View Product](https://example.com/ac_%281.5%20ton%29)"
        );
    }
}
