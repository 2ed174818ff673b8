//! One-stop evaluation

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::Catalog, items::ItemId, plan::ShoppingPlan, selection::Selection, stores::StoreKey,
};

/// Errors that can occur during one-stop evaluation.
#[derive(Debug, Error)]
pub enum OneStopError {
    /// A selected identifier does not exist in the catalog.
    #[error("Item {0} not found in catalog")]
    UnknownItem(ItemId),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// The cost trade-off of buying an entire selection at a single store.
///
/// Pay `premium` more than the optimal multi-store total in exchange for
/// visiting one location instead of several; `missing` items would have to
/// be skipped or bought elsewhere.
#[derive(Debug, Clone)]
pub struct OneStopQuote<'a> {
    store: StoreKey,
    total: Money<'a, Currency>,
    carried: usize,
    missing: usize,
    premium: Money<'a, Currency>,
    premium_percent: Percentage,
}

impl<'a> OneStopQuote<'a> {
    /// The store being evaluated.
    #[must_use]
    pub fn store(&self) -> StoreKey {
        self.store
    }

    /// Cost of the selected items this store carries, at its own prices.
    /// Items the store does not carry are excluded, not counted as zero.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Number of selected items the store carries.
    #[must_use]
    pub fn carried(&self) -> usize {
        self.carried
    }

    /// Number of selected items the store does not carry.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.missing
    }

    /// Extra cost versus the optimal multi-store grand total.
    ///
    /// Non-negative whenever the baseline plan was computed from the same
    /// catalog's true per-item minimums.
    #[must_use]
    pub fn premium(&self) -> Money<'a, Currency> {
        self.premium
    }

    /// The premium as a fraction of the optimal grand total (zero when the
    /// baseline total is zero).
    #[must_use]
    pub fn premium_percent(&self) -> Percentage {
        self.premium_percent
    }
}

/// Evaluate buying the whole selection at each store in turn.
///
/// Quotes appear in store directory order. Only stores carrying at least
/// one selected item are reported; a store carrying nothing is omitted
/// entirely rather than quoted at zero. The baseline is the grand total of
/// the multi-store plan for the same selection.
///
/// # Errors
///
/// - [`OneStopError::UnknownItem`]: a selected identifier is not in the
///   catalog.
/// - [`OneStopError::Money`]: money arithmetic failure (currency mismatch).
pub fn evaluate<'a>(
    catalog: &Catalog<'a>,
    selection: &Selection,
    plan: &ShoppingPlan<'a>,
) -> Result<Vec<OneStopQuote<'a>>, OneStopError> {
    let currency = catalog.currency();
    let baseline = plan.grand_total();

    let mut quotes = Vec::new();

    for store in catalog.directory().keys() {
        let mut total = Money::from_minor(0, currency);
        let mut carried = 0usize;
        let mut missing = 0usize;

        for id in selection.iter() {
            let item = catalog.item(id).ok_or(OneStopError::UnknownItem(id))?;

            match item.price_at(store) {
                Some(price) => {
                    total = total.add(price)?;
                    carried += 1;
                }
                None => missing += 1,
            }
        }

        if carried == 0 {
            continue;
        }

        let premium = total.sub(baseline)?;

        quotes.push(OneStopQuote {
            store,
            total,
            carried,
            missing,
            premium,
            premium_percent: fraction_of(premium, baseline),
        });
    }

    Ok(quotes)
}

/// The ratio of `part` to `whole` as a fractional percentage.
///
/// Done in decimal space to avoid integer division truncation; a zero
/// baseline yields zero rather than dividing by it.
fn fraction_of(part: Money<'_, Currency>, whole: Money<'_, Currency>) -> Percentage {
    let whole_minor = whole.to_minor_units();

    if whole_minor == 0 {
        return Percentage::from(0.0);
    }

    let part_dec = Decimal::from_i64(part.to_minor_units()).unwrap_or(Decimal::ZERO);
    let whole_dec = Decimal::from_i64(whole_minor).unwrap_or(Decimal::ZERO);

    Percentage::from(part_dec / whole_dec)
}
