//! Seller dashboard chart data.

use crate::api::Product;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Something that can be counted on the dashboard chart.
pub trait Categorized {
    /// Category the item is filed under, compared verbatim.
    fn category(&self) -> &str;
    fn description(&self) -> &str;
}

impl Categorized for Product {
    fn category(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Description counts for one dashboard category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryHistogram {
    pub category: String,
    /// Distinct descriptions in first-seen order.
    pub counts: IndexMap<String, usize>,
}

impl CategoryHistogram {
    /// Number of items filed under this category.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Build one histogram per category, in the order given.
///
/// An item belongs to a category only when its category string equals the
/// name exactly: case and surrounding whitespace both count, so `"Fruits "`
/// and `"Fruits"` are different categories. Categories with no items yield an
/// empty histogram, so the output always lines up with `categories`.
pub fn histogram_by_category<P, S>(items: &[P], categories: &[S]) -> Vec<CategoryHistogram>
where
    P: Categorized,
    S: AsRef<str>,
{
    categories
        .iter()
        .map(|category| {
            let category = category.as_ref();
            let mut counts: IndexMap<String, usize> = IndexMap::new();
            for item in items.iter().filter(|i| i.category() == category) {
                *counts.entry(item.description().to_string()).or_insert(0) += 1;
            }
            CategoryHistogram {
                category: category.to_string(),
                counts,
            }
        })
        .collect()
}

/// Distinct item categories that match none of `categories`, first-seen order.
///
/// These are the items that silently drop off the chart, e.g. a title with a
/// trailing space.
pub fn unmatched_categories<P, S>(items: &[P], categories: &[S]) -> Vec<String>
where
    P: Categorized,
    S: AsRef<str>,
{
    let known: IndexSet<&str> = categories.iter().map(|c| c.as_ref()).collect();
    let mut missing: IndexSet<&str> = IndexSet::new();
    for item in items {
        if !known.contains(item.category()) {
            missing.insert(item.category());
        }
    }
    missing.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests;
