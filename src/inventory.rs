//! Inventory
//!
//! Stock status classification against per-product reorder levels, and catalog-wide
//! inventory summaries.

use std::{fmt, str::FromStr};

use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::Catalog;

/// Errors parsing inventory options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// Stock status name not recognised.
    #[error("unknown stock status: {0} (expected critical, low, normal or high)")]
    UnknownStockStatus(String),
}

/// Reorder levels for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StockLevels {
    /// Minimum stock to hold before reordering
    pub min: u32,

    /// Maximum stock the warehouse holds
    pub max: u32,
}

impl StockLevels {
    /// Create new stock levels.
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Stock status of a product relative to its reorder levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// At or below the minimum level.
    Critical,

    /// Above the minimum but at or below one and a half times it.
    Low,

    /// Between the low band and the high band.
    Normal,

    /// At or above 80% of the maximum level.
    High,
}

impl StockStatus {
    /// Classify `current` units against `levels`.
    ///
    /// Bands are checked in order: critical, low, high, normal. Ratios are compared in
    /// integer space (`2 * current <= 3 * min`, `5 * current >= 4 * max`).
    pub fn classify(current: u32, levels: StockLevels) -> Self {
        let current = u64::from(current);
        let min = u64::from(levels.min);
        let max = u64::from(levels.max);

        if current <= min {
            Self::Critical
        } else if current * 2 <= min * 3 {
            Self::Low
        } else if current * 5 >= max * 4 {
            Self::High
        } else {
            Self::Normal
        }
    }

    /// Check whether a product in `status` is listed under this status when filtering.
    ///
    /// `Low` also takes in `Critical` products. Every other status matches only itself.
    pub fn covers(self, status: Self) -> bool {
        match self {
            Self::Low => matches!(status, Self::Critical | Self::Low),
            _ => self == status,
        }
    }

    /// Lower-case label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StockStatus {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(InventoryError::UnknownStockStatus(other.to_string())),
        }
    }
}

/// Aggregate inventory figures for a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventorySummary {
    /// Number of products
    pub products: usize,

    /// Units in stock across all products
    pub units: u64,

    /// Products at or below their minimum level
    pub below_minimum: usize,

    /// Products at or below half of their minimum level
    pub critical: usize,

    /// Products that cannot currently be ordered
    pub unavailable: usize,

    /// Distinct categories
    pub categories: usize,
}

impl InventorySummary {
    /// Summarise every product in `catalog`.
    pub fn from_catalog(catalog: &Catalog<'_>) -> Self {
        let mut summary = Self::default();
        let mut categories = FxHashSet::default();

        for (_, product) in catalog.iter() {
            summary.products += 1;
            summary.units += u64::from(product.stock);

            if !product.available {
                summary.unavailable += 1;
            }

            if let Some(levels) = product.stock_levels {
                let stock = u64::from(product.stock);
                let min = u64::from(levels.min);

                if stock <= min {
                    summary.below_minimum += 1;
                }

                if stock * 2 <= min {
                    summary.critical += 1;
                }
            }

            categories.insert(product.category.as_str());
        }

        summary.categories = categories.len();

        summary
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{products::Product, tiers::TierTable};

    use super::*;

    #[test]
    fn classify_bands() {
        let levels = StockLevels::new(50, 200);

        assert_eq!(StockStatus::classify(0, levels), StockStatus::Critical);
        assert_eq!(StockStatus::classify(50, levels), StockStatus::Critical);
        assert_eq!(StockStatus::classify(51, levels), StockStatus::Low);
        assert_eq!(StockStatus::classify(75, levels), StockStatus::Low);
        assert_eq!(StockStatus::classify(76, levels), StockStatus::Normal);
        assert_eq!(StockStatus::classify(159, levels), StockStatus::Normal);
        assert_eq!(StockStatus::classify(160, levels), StockStatus::High);
        assert_eq!(StockStatus::classify(500, levels), StockStatus::High);
    }

    #[test]
    fn classify_prefers_low_over_high_when_bands_overlap() {
        let levels = StockLevels::new(30, 40);

        assert_eq!(StockStatus::classify(40, levels), StockStatus::Low);
    }

    #[test]
    fn low_covers_critical_but_not_the_reverse() {
        assert!(StockStatus::Low.covers(StockStatus::Critical));
        assert!(StockStatus::Low.covers(StockStatus::Low));
        assert!(!StockStatus::Low.covers(StockStatus::Normal));
        assert!(!StockStatus::Critical.covers(StockStatus::Low));
        assert!(!StockStatus::Normal.covers(StockStatus::High));
        assert!(StockStatus::High.covers(StockStatus::High));
    }

    #[test]
    fn stock_status_round_trips_through_labels() {
        for status in [
            StockStatus::Critical,
            StockStatus::Low,
            StockStatus::Normal,
            StockStatus::High,
        ] {
            assert_eq!(status.to_string().parse(), Ok(status));
        }

        assert_eq!(
            "empty".parse::<StockStatus>(),
            Err(InventoryError::UnknownStockStatus("empty".to_string()))
        );
    }

    #[test]
    fn summary_counts_products() -> TestResult {
        let mut catalog = Catalog::new(USD);

        for (id, category, stock, available, levels) in [
            ("a", "Electronics", 12, true, Some(StockLevels::new(50, 200))),
            ("b", "Parts", 8, true, Some(StockLevels::new(25, 100))),
            ("c", "Electronics", 150, true, Some(StockLevels::new(100, 500))),
            ("d", "Tools", 0, false, None),
        ] {
            let tiers = TierTable::from_minor([(1, 1000), (10, 900), (50, 800)], USD)?;
            let mut product = Product::new(id, id, id, Money::from_minor(1100, USD), tiers)
                .with_category(category)
                .with_stock(stock, available);
            product.stock_levels = levels;

            catalog.insert(product)?;
        }

        let summary = InventorySummary::from_catalog(&catalog);

        assert_eq!(
            summary,
            InventorySummary {
                products: 4,
                units: 170,
                below_minimum: 2,
                critical: 2,
                unavailable: 1,
                categories: 3,
            }
        );

        Ok(())
    }
}
