use std::fmt;

use chrono::NaiveDate;

use crate::Purchase;

/// Aggregated figures over a list of purchases
///
/// An empty list of purchases results in [`Report::default`], all totals are
/// zero and there are no extrema.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    /// Number of purchases
    pub purchase_count: usize,
    /// Number of bought units over all purchases
    pub total_quantity: u64,
    /// Sum of the total costs, shipping included
    pub total_cost: f64,
    /// Sum of the total weights
    pub total_weight: f64,
    /// The purchase with the highest total cost, the first one on ties
    pub most_expensive: Option<Purchase>,
    /// The purchase with the highest total weight, the first one on ties
    pub heaviest: Option<Purchase>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.purchase_count == 0
    }

    /// The average total cost of a purchase
    pub fn average_per_purchase(&self) -> Option<f64> {
        match self.purchase_count {
            0 => None,
            count => Some(self.total_cost / count as f64),
        }
    }

    /// The average cost of a single unit
    pub fn average_per_item(&self) -> Option<f64> {
        match self.total_quantity {
            0 => None,
            quantity => Some(self.total_cost / quantity as f64),
        }
    }
}

/// A condition a purchase has to fulfill to be part of a filtered report
///
/// Names are compared exactly, including case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Criterion {
    Seller(String),
    Date(NaiveDate),
    ItemName(String),
}

impl Criterion {
    pub fn matches(&self, purchase: &Purchase) -> bool {
        match self {
            Self::Seller(seller) => purchase.seller() == seller,
            Self::Date(date) => purchase.date() == *date,
            Self::ItemName(item_name) => purchase.item_name() == item_name,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seller(seller) => write!(f, "seller = {seller}"),
            Self::Date(date) => write!(f, "date = {}", date.format("%d/%m/%Y")),
            Self::ItemName(item_name) => write!(f, "item = {item_name}"),
        }
    }
}

/// A report over all purchases matching a [`Criterion`]
#[derive(Clone, Debug, PartialEq)]
pub struct FilteredReport {
    pub criterion: Criterion,
    /// The matching purchases, in their original order
    pub matches: Vec<Purchase>,
    pub report: Report,
}

/// Summarizes all `purchases`
pub fn full_report(purchases: &[Purchase]) -> Report {
    summarize(purchases)
}

/// Summarizes the `purchases` that match `criterion`
pub fn filtered_report(purchases: &[Purchase], criterion: &Criterion) -> FilteredReport {
    let matches = purchases
        .iter()
        .filter(|purchase| criterion.matches(purchase))
        .cloned()
        .collect::<Vec<_>>();
    let report = summarize(&matches);

    FilteredReport {
        criterion: criterion.clone(),
        matches,
        report,
    }
}

/// Whether `total_cost` exceeds `limit`
///
/// A limit of zero counts as "no limit" and is never exceeded.
pub fn check_spending_limit(total_cost: f64, limit: f64) -> bool {
    limit > 0. && total_cost > limit
}

/// How the total spending relates to the spending limit
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LimitStatus {
    /// No limit is configured
    Unset,
    /// The amount that can still be spent
    Remaining(f64),
    /// The spending matches the limit exactly
    Reached,
    /// The amount by which the limit was exceeded
    Exceeded(f64),
}

impl LimitStatus {
    const TOLERANCE: f64 = 1e-9;

    pub fn evaluate(total_cost: f64, limit: f64) -> Self {
        if limit <= 0. {
            return Self::Unset;
        }

        let left = limit - total_cost;
        if left.abs() < Self::TOLERANCE {
            Self::Reached
        } else if left < 0. {
            Self::Exceeded(-left)
        } else {
            Self::Remaining(left)
        }
    }
}

fn summarize(purchases: &[Purchase]) -> Report {
    let mut report = Report::default();
    let mut most_expensive: Option<&Purchase> = None;
    let mut heaviest: Option<&Purchase> = None;

    for purchase in purchases {
        report.purchase_count += 1;
        report.total_quantity += u64::from(purchase.quantity());
        report.total_cost += purchase.total_cost();
        report.total_weight += purchase.total_weight();

        // strict comparisons keep the first of equal purchases
        if most_expensive.map_or(true, |max| purchase.total_cost() > max.total_cost()) {
            most_expensive = Some(purchase);
        }
        if heaviest.map_or(true, |max| purchase.total_weight() > max.total_weight()) {
            heaviest = Some(purchase);
        }
    }

    report.most_expensive = most_expensive.cloned();
    report.heaviest = heaviest.cloned();
    report
}
