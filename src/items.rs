//! Items

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use crate::stores::StoreKey;

/// Stable integer identifier for a catalog item (its row index at load time).
///
/// Saved lists and share links reference items by this identifier, so it
/// must not change for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stock level tag carried through from the catalog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    /// Normally stocked.
    InStock,
    /// Running low at the best-price store.
    Low,
    /// Not currently available.
    OutOfStock,
}

/// The winning price for an item and the store offering it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestPrice<'a> {
    /// Store offering the minimum price.
    pub store: StoreKey,

    /// The minimum price itself.
    pub price: Money<'a, Currency>,
}

/// A purchasable catalog item.
///
/// Invariant: `best.price` equals the minimum over all present per-store
/// prices, and `prices[best.store]` equals `best.price`. The loader derives
/// `best` from the price map, or treats explicit best-price/best-store
/// fields as authoritative when no map is available (in which case the map
/// holds that single entry).
#[derive(Debug, Clone)]
pub struct Item<'a> {
    id: ItemId,
    name: String,
    category: String,
    prices: FxHashMap<StoreKey, Money<'a, Currency>>,
    best: BestPrice<'a>,
    previous_best: Option<Money<'a, Currency>>,
    stock: Option<StockStatus>,
}

impl<'a> Item<'a> {
    /// Create a new item.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        category: impl Into<String>,
        prices: FxHashMap<StoreKey, Money<'a, Currency>>,
        best: BestPrice<'a>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            prices,
            best,
            previous_best: None,
            stock: None,
        }
    }

    /// Attach the previously recorded best price (for trend display).
    #[must_use]
    pub fn with_previous_best(mut self, price: Money<'a, Currency>) -> Self {
        self.previous_best = Some(price);
        self
    }

    /// Attach a stock status tag.
    #[must_use]
    pub fn with_stock(mut self, stock: StockStatus) -> Self {
        self.stock = Some(stock);
        self
    }

    /// The item's stable identifier.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// The item's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The item's category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Per-store prices. A store absent from this map does not carry the item.
    #[must_use]
    pub fn prices(&self) -> &FxHashMap<StoreKey, Money<'a, Currency>> {
        &self.prices
    }

    /// The item's price at a given store, if carried there.
    #[must_use]
    pub fn price_at(&self, store: StoreKey) -> Option<Money<'a, Currency>> {
        self.prices.get(&store).copied()
    }

    /// Whether the given store carries this item.
    #[must_use]
    pub fn carried_by(&self, store: StoreKey) -> bool {
        self.prices.contains_key(&store)
    }

    /// The minimum price and the store offering it.
    #[must_use]
    pub fn best(&self) -> BestPrice<'a> {
        self.best
    }

    /// The previously recorded best price, if known.
    #[must_use]
    pub fn previous_best(&self) -> Option<Money<'a, Currency>> {
        self.previous_best
    }

    /// The stock status tag, if known.
    #[must_use]
    pub fn stock(&self) -> Option<StockStatus> {
        self.stock
    }
}
