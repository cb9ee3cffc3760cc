//! Bulkrate prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    access::{AccessError, Capabilities, Portal, Resource, Role, Session, can_access, navigation},
    cart::{BackorderPolicy, Cart, CartError, CartLine, CartPolicy},
    catalog::{Catalog, CatalogError, CatalogQuery, PriceRange, QueryError, SortKey},
    fixtures::{Fixture, FixtureError},
    inventory::{InventoryError, InventorySummary, StockLevels, StockStatus},
    pricing::{PriceBreak, PriceQuote, PricingError, next_price_break, quote, resolve_price},
    products::{Product, ProductKey},
    receipt::{Receipt, ReceiptError, ReceiptLine},
    tiers::{PricingTier, TierError, TierTable},
};
