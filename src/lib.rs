//! Bulkrate
//!
//! Bulkrate is the pricing and ordering core of a wholesale portal: quantity-tiered unit
//! pricing, a cart ledger that re-prices lines as quantities change, catalog search and
//! sorting, inventory stock classification and role-based access control.

pub mod access;
pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod inventory;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod tiers;
