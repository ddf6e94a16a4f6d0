use super::Metric;
use crate::config::MAX_PRICE_BUCKETS;
use crate::model::MenuItem;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive as _;
use serde::Serialize;

/// Item count per category, in the order categories first appear.
pub fn menu_category_breakdown(items: &[MenuItem]) -> Vec<(String, usize)> {
    let mut breakdown: Vec<(String, usize)> = Vec::new();
    for item in items {
        match breakdown.iter_mut().find(|(c, _)| *c == item.category) {
            Some((_, count)) => *count += 1,
            None => breakdown.push((item.category.clone(), 1)),
        }
    }
    breakdown
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistogramBucket {
    pub lower: Decimal,
    pub upper: Decimal,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Histogram {
    pub buckets: Vec<HistogramBucket>,
}

impl Histogram {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Equal-width price histogram between the observed min and max.
///
/// The max price lands in the last bucket. Identical prices collapse into a
/// single bucket, as does a range too narrow to split into `buckets` non-zero
/// widths at decimal precision. At most [`MAX_PRICE_BUCKETS`] buckets are built.
pub fn price_distribution(items: &[MenuItem], buckets: usize) -> Histogram {
    let Some((min, max)) = price_bounds(items) else {
        return Histogram::default();
    };
    if buckets == 0 {
        return Histogram::default();
    }
    let buckets = buckets.min(MAX_PRICE_BUCKETS);

    let width = max
        .checked_sub(min)
        .and_then(|range| range.checked_div(Decimal::from(buckets)))
        .filter(|w| !w.is_zero());
    let Some(width) = width else {
        return Histogram {
            buckets: vec![HistogramBucket {
                lower: min,
                upper: max,
                count: items.len(),
            }],
        };
    };

    let last = buckets - 1;
    let mut counts = vec![0_usize; buckets];

    for item in items {
        let idx = (item.price - min)
            .checked_div(width)
            .and_then(|q| q.floor().to_usize())
            .unwrap_or(last)
            .min(last);
        if let Some(count) = counts.get_mut(idx) {
            *count += 1;
        }
    }

    let buckets = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lower = min + width * Decimal::from(i);
            let upper = if i == last {
                max
            } else {
                min + width * Decimal::from(i + 1)
            };
            HistogramBucket {
                lower,
                upper,
                count,
            }
        })
        .collect();

    Histogram { buckets }
}

fn price_bounds(items: &[MenuItem]) -> Option<(Decimal, Decimal)> {
    let mut prices = items.iter().map(|i| i.price);
    let first = prices.next()?;
    Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceSummary {
    pub count: usize,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub mean: Metric,
    pub median: Metric,
}

pub fn price_summary(items: &[MenuItem]) -> PriceSummary {
    let mut prices: Vec<Decimal> = items.iter().map(|i| i.price).collect();
    prices.sort_unstable();

    let mid = prices.len() / 2;
    let median = match (prices.len(), prices.get(mid)) {
        (0, _) | (_, None) => Metric::Undefined,
        (n, Some(upper)) if n % 2 == 0 => prices
            .get(mid - 1)
            .and_then(|lower| lower.checked_add(*upper))
            .map_or(Metric::Undefined, |sum| Metric::ratio(sum, Decimal::TWO)),
        (_, Some(m)) => Metric::Defined(*m),
    };

    PriceSummary {
        count: prices.len(),
        min: prices.first().copied(),
        max: prices.last().copied(),
        mean: Metric::mean(prices.iter().copied()),
        median,
    }
}

/// Per-category figures for the menu view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub items: usize,
    pub vegetarian: usize,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub average_price: Metric,
}

pub fn category_stats(items: &[MenuItem]) -> Vec<CategoryStats> {
    menu_category_breakdown(items)
        .into_iter()
        .filter_map(|(category, count)| {
            let in_category: Vec<&MenuItem> =
                items.iter().filter(|i| i.category == category).collect();
            let (min_price, max_price) = in_category.iter().map(|i| i.price).fold(
                None,
                |acc: Option<(Decimal, Decimal)>, p| match acc {
                    Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
                    None => Some((p, p)),
                },
            )?;

            Some(CategoryStats {
                items: count,
                vegetarian: in_category.iter().filter(|i| i.is_vegetarian).count(),
                min_price,
                max_price,
                average_price: Metric::mean(in_category.iter().map(|i| i.price)),
                category,
            })
        })
        .collect()
}

/// Percentage of items flagged vegetarian.
pub fn vegetarian_share(items: &[MenuItem]) -> Metric {
    let vegetarian = items.iter().filter(|i| i.is_vegetarian).count();
    Metric::percent(Decimal::from(vegetarian), Decimal::from(items.len()))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuMetrics {
    pub category_breakdown: Vec<(String, usize)>,
    pub categories: Vec<CategoryStats>,
    pub price_distribution: Histogram,
    pub prices: PriceSummary,
    pub vegetarian_share: Metric,
}

pub fn summarize(items: &[MenuItem], buckets: usize) -> MenuMetrics {
    MenuMetrics {
        category_breakdown: menu_category_breakdown(items),
        categories: category_stats(items),
        price_distribution: price_distribution(items, buckets),
        prices: price_summary(items),
        vegetarian_share: vegetarian_share(items),
    }
}
