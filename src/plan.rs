//! Shopping plans

use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{catalog::Catalog, items::ItemId, selection::Selection, stores::StoreKey};

/// Errors that can occur while aggregating a selection into a plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A selected identifier does not exist in the catalog.
    #[error("Item {0} not found in catalog")]
    UnknownItem(ItemId),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Items in a selection assigned to the store offering each item's best price.
#[derive(Debug, Clone)]
pub struct StoreGroup<'a> {
    store: StoreKey,
    items: SmallVec<[ItemId; 10]>,
    subtotal: Money<'a, Currency>,
}

impl<'a> StoreGroup<'a> {
    /// The store to visit for this group.
    #[must_use]
    pub fn store(&self) -> StoreKey {
        self.store
    }

    /// Identifiers of the items to buy at this store, ascending.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Sum of best prices across the group's items.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }
}

/// A store-partitioned shopping plan for a selection.
#[derive(Debug, Clone)]
pub struct ShoppingPlan<'a> {
    groups: Vec<StoreGroup<'a>>,
    grand_total: Money<'a, Currency>,
    item_count: usize,
    currency: &'static Currency,
}

impl<'a> ShoppingPlan<'a> {
    /// Store groups in first-seen order of distinct best stores.
    #[must_use]
    pub fn groups(&self) -> &[StoreGroup<'a>] {
        &self.groups
    }

    /// Sum of all group subtotals.
    #[must_use]
    pub fn grand_total(&self) -> Money<'a, Currency> {
        self.grand_total
    }

    /// Number of distinct stores the plan visits.
    #[must_use]
    pub fn store_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of items across all groups.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Check if the plan is empty (nothing selected).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The currency of all plan totals.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

/// Partition a selection by best store and total it up.
///
/// The selection is visited in ascending identifier order; groups appear in
/// first-seen order of distinct best stores, so the result is identical
/// run-to-run for a fixed selection. An empty selection produces an empty
/// plan with a zero grand total, which is a valid state rather than an
/// error.
///
/// # Errors
///
/// - [`PlanError::UnknownItem`]: a selected identifier is not in the
///   catalog. The session layer drops stale identifiers before this point,
///   so hitting this indicates a selection built outside the session.
/// - [`PlanError::Money`]: money arithmetic failure (currency mismatch).
pub fn aggregate<'a>(
    catalog: &Catalog<'a>,
    selection: &Selection,
) -> Result<ShoppingPlan<'a>, PlanError> {
    let currency = catalog.currency();

    let mut groups: Vec<StoreGroup<'a>> = Vec::new();
    let mut group_index: FxHashMap<StoreKey, usize> = FxHashMap::default();
    let mut grand_total = Money::from_minor(0, currency);
    let mut item_count = 0usize;

    for id in selection.iter() {
        let item = catalog.item(id).ok_or(PlanError::UnknownItem(id))?;
        let best = item.best();

        let slot = match group_index.get(&best.store) {
            Some(slot) => *slot,
            None => {
                group_index.insert(best.store, groups.len());
                groups.push(StoreGroup {
                    store: best.store,
                    items: SmallVec::new(),
                    subtotal: Money::from_minor(0, currency),
                });

                groups.len() - 1
            }
        };

        if let Some(group) = groups.get_mut(slot) {
            group.items.push(id);
            group.subtotal = group.subtotal.add(best.price)?;
        }

        grand_total = grand_total.add(best.price)?;
        item_count += 1;
    }

    Ok(ShoppingPlan {
        groups,
        grand_total,
        item_count,
        currency,
    })
}
