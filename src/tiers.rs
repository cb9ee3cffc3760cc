//! Tiers
//!
//! A [`TierTable`] maps minimum order quantities to unit prices. Every table has exactly
//! three tiers: the base tier starts at a quantity of one, later tiers start at strictly
//! larger quantities and never cost more per unit than the tier before them.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Number of tiers in every pricing table.
pub const TIER_COUNT: usize = 3;

/// Errors raised when a tier table is misconfigured.
#[derive(Debug, Error, PartialEq)]
pub enum TierError {
    /// The table does not have exactly [`TIER_COUNT`] tiers.
    #[error("expected 3 pricing tiers, got {0}")]
    TierCount(usize),

    /// The base tier must start at a quantity of one.
    #[error("base tier must start at quantity 1, got {0}")]
    BaseMinimum(u32),

    /// Tier minimums must be strictly increasing (index, previous minimum, minimum).
    #[error("tier {0} minimum quantity {2} is not greater than previous minimum {1}")]
    MinimumNotIncreasing(usize, u32, u32),

    /// A tier is more expensive per unit than the tier before it (index).
    #[error("tier {0} unit price is higher than the previous tier")]
    PriceIncrease(usize),

    /// A tier has a negative unit price (index).
    #[error("tier {0} has a negative unit price")]
    NegativePrice(usize),

    /// A tier's currency differs from the base tier (index, tier currency, base currency).
    #[error("tier {0} has currency {1}, but base tier has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),
}

/// A single pricing tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingTier<'a> {
    minimum_quantity: u32,
    unit_price: Money<'a, Currency>,
}

impl<'a> PricingTier<'a> {
    /// Create a new tier starting at `minimum_quantity` units.
    pub fn new(minimum_quantity: u32, unit_price: Money<'a, Currency>) -> Self {
        Self {
            minimum_quantity,
            unit_price,
        }
    }

    /// Smallest order quantity this tier applies to.
    pub fn minimum_quantity(&self) -> u32 {
        self.minimum_quantity
    }

    /// Unit price charged within this tier.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }
}

/// A validated three-tier pricing table, sorted by ascending minimum quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable<'a> {
    tiers: [PricingTier<'a>; TIER_COUNT],
}

impl<'a> TierTable<'a> {
    /// Build a tier table, validating the tier invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`TierError`] if there are not exactly three tiers, the base tier does not
    /// start at one, minimums are not strictly increasing, a price is negative, a price
    /// increases with quantity, or currencies are mixed.
    pub fn new(tiers: impl Into<Vec<PricingTier<'a>>>) -> Result<Self, TierError> {
        let tiers: [PricingTier<'a>; TIER_COUNT] = tiers
            .into()
            .try_into()
            .map_err(|tiers: Vec<PricingTier<'a>>| TierError::TierCount(tiers.len()))?;

        let [base, _, _] = &tiers;

        if base.minimum_quantity != 1 {
            return Err(TierError::BaseMinimum(base.minimum_quantity));
        }

        let currency = base.unit_price.currency();

        for (idx, tier) in tiers.iter().enumerate() {
            if tier.unit_price.currency() != currency {
                return Err(TierError::CurrencyMismatch(
                    idx,
                    tier.unit_price.currency().iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if tier.unit_price.to_minor_units() < 0 {
                return Err(TierError::NegativePrice(idx));
            }
        }

        for (idx, pair) in tiers.windows(2).enumerate() {
            let [previous, tier] = pair else {
                continue;
            };

            if tier.minimum_quantity <= previous.minimum_quantity {
                return Err(TierError::MinimumNotIncreasing(
                    idx + 1,
                    previous.minimum_quantity,
                    tier.minimum_quantity,
                ));
            }

            if tier.unit_price.to_minor_units() > previous.unit_price.to_minor_units() {
                return Err(TierError::PriceIncrease(idx + 1));
            }
        }

        Ok(Self { tiers })
    }

    /// Build a table from `(minimum quantity, minor units)` pairs in a single currency.
    ///
    /// # Errors
    ///
    /// Returns a [`TierError`] under the same conditions as [`TierTable::new`].
    pub fn from_minor(
        tiers: [(u32, i64); TIER_COUNT],
        currency: &'a Currency,
    ) -> Result<Self, TierError> {
        Self::new(
            tiers
                .into_iter()
                .map(|(min, minor)| PricingTier::new(min, Money::from_minor(minor, currency)))
                .collect::<Vec<_>>(),
        )
    }

    /// The base tier, which applies from a quantity of one.
    pub fn base(&self) -> &PricingTier<'a> {
        let [base, _, _] = &self.tiers;

        base
    }

    /// Return the tier that applies to `quantity`, with its index.
    ///
    /// Scans from the highest minimum downwards; a boundary quantity belongs to the tier
    /// it starts. Quantities below one fall back to the base tier.
    pub fn tier_for(&self, quantity: u32) -> (usize, &PricingTier<'a>) {
        self.tiers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, tier)| tier.minimum_quantity <= quantity)
            .unwrap_or((0, self.base()))
    }

    /// Return the tiers in ascending order of minimum quantity.
    pub fn tiers(&self) -> &[PricingTier<'a>] {
        &self.tiers
    }

    /// Currency shared by every tier.
    pub fn currency(&self) -> &'a Currency {
        self.base().unit_price.currency()
    }
}
