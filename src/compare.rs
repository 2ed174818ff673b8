//! Price comparison

use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;

use crate::{
    items::{BestPrice, Item},
    stores::{StoreDirectory, StoreKey},
};

/// A store that carries an item at some premium over its best price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alternative<'a> {
    /// The alternative store.
    pub store: StoreKey,

    /// The item's price at that store.
    pub price: Money<'a, Currency>,

    /// How much more that store charges than the best price. Zero for
    /// stores tied with the best price.
    pub premium: Money<'a, Currency>,
}

/// Find the minimum present price and the store offering it.
///
/// Stores are visited in directory registration order, and a strict
/// comparison keeps the first store seen on ties, so the winner is
/// deterministic for a fixed catalog source. Returns `None` when no store
/// in the directory carries the item.
pub fn best_of<'a>(
    prices: &FxHashMap<StoreKey, Money<'a, Currency>>,
    directory: &StoreDirectory,
) -> Option<BestPrice<'a>> {
    let mut best: Option<BestPrice<'a>> = None;

    for key in directory.keys() {
        let Some(price) = prices.get(&key) else {
            continue;
        };

        let beats_current = best
            .as_ref()
            .is_none_or(|current| price.to_minor_units() < current.price.to_minor_units());

        if beats_current {
            best = Some(BestPrice {
                store: key,
                price: *price,
            });
        }
    }

    best
}

/// List every other store carrying the item, with its price delta.
///
/// Entries appear in directory registration order. The chosen store is
/// excluded; stores without a price for the item yield no entry. Stores
/// tied with the best price appear with a zero premium.
///
/// # Errors
///
/// Returns a [`MoneyError`] if a premium subtraction fails (currency
/// mismatch within the price map, which a loaded catalog rules out).
pub fn alternatives<'a>(
    item: &Item<'a>,
    chosen: StoreKey,
    directory: &StoreDirectory,
) -> Result<SmallVec<[Alternative<'a>; 4]>, MoneyError> {
    let best = item.best();
    let mut out: SmallVec<[Alternative<'a>; 4]> = SmallVec::new();

    for key in directory.keys() {
        if key == chosen {
            continue;
        }

        let Some(price) = item.price_at(key) else {
            continue;
        };

        out.push(Alternative {
            store: key,
            price,
            premium: price.sub(best.price)?,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use crate::items::ItemId;

    use super::*;

    fn directory_with<const N: usize>(names: [&str; N]) -> (StoreDirectory, [StoreKey; N]) {
        let mut directory = StoreDirectory::new();
        let keys = names.map(|name| directory.intern(name));

        (directory, keys)
    }

    fn priced_item<'a>(name: &str, prices: FxHashMap<StoreKey, Money<'a, Currency>>, best: BestPrice<'a>) -> Item<'a> {
        Item::new(ItemId(0), name, "Groceries", prices, best)
    }

    #[test]
    fn best_of_finds_minimum_price() {
        let (directory, [tesco, dunnes, aldi]) = directory_with(["Tesco", "Dunnes", "Aldi"]);

        let mut prices = FxHashMap::default();
        prices.insert(tesco, Money::from_minor(350, EUR));
        prices.insert(dunnes, Money::from_minor(400, EUR));
        prices.insert(aldi, Money::from_minor(320, EUR));

        let best = best_of(&prices, &directory);

        assert_eq!(
            best,
            Some(BestPrice {
                store: aldi,
                price: Money::from_minor(320, EUR),
            })
        );
    }

    #[test]
    fn best_of_tie_goes_to_first_registered_store() {
        let (directory, [tesco, dunnes]) = directory_with(["Tesco", "Dunnes"]);

        let mut prices = FxHashMap::default();
        prices.insert(dunnes, Money::from_minor(200, EUR));
        prices.insert(tesco, Money::from_minor(200, EUR));

        let best = best_of(&prices, &directory);

        assert_eq!(best.map(|b| b.store), Some(tesco));
    }

    #[test]
    fn best_of_empty_price_map_is_none() {
        let (directory, _) = directory_with(["Tesco"]);

        assert_eq!(best_of(&FxHashMap::default(), &directory), None);
    }

    #[test]
    fn alternatives_exclude_chosen_store_and_gaps() -> TestResult {
        let (directory, [tesco, dunnes, _aldi]) = directory_with(["Tesco", "Dunnes", "Aldi"]);

        let mut prices = FxHashMap::default();
        prices.insert(tesco, Money::from_minor(350, EUR));
        prices.insert(dunnes, Money::from_minor(400, EUR));
        // Aldi does not carry the item.

        let item = priced_item(
            "Milk",
            prices,
            BestPrice {
                store: tesco,
                price: Money::from_minor(350, EUR),
            },
        );

        let alternatives = alternatives(&item, tesco, &directory)?;

        assert_eq!(
            alternatives.as_slice(),
            &[Alternative {
                store: dunnes,
                price: Money::from_minor(400, EUR),
                premium: Money::from_minor(50, EUR),
            }]
        );

        Ok(())
    }

    #[test]
    fn alternatives_tied_store_has_zero_premium() -> TestResult {
        let (directory, [tesco, dunnes]) = directory_with(["Tesco", "Dunnes"]);

        let mut prices = FxHashMap::default();
        prices.insert(tesco, Money::from_minor(200, EUR));
        prices.insert(dunnes, Money::from_minor(200, EUR));

        let item = priced_item(
            "Eggs",
            prices,
            BestPrice {
                store: tesco,
                price: Money::from_minor(200, EUR),
            },
        );

        let alternatives = alternatives(&item, tesco, &directory)?;

        assert_eq!(
            alternatives.as_slice(),
            &[Alternative {
                store: dunnes,
                price: Money::from_minor(200, EUR),
                premium: Money::from_minor(0, EUR),
            }]
        );

        Ok(())
    }

    #[test]
    fn alternatives_empty_when_only_one_store_carries_item() -> TestResult {
        let (directory, [tesco, _dunnes]) = directory_with(["Tesco", "Dunnes"]);

        let mut prices = FxHashMap::default();
        prices.insert(tesco, Money::from_minor(1000, EUR));

        let item = priced_item(
            "Saffron",
            prices,
            BestPrice {
                store: tesco,
                price: Money::from_minor(1000, EUR),
            },
        );

        assert!(alternatives(&item, tesco, &directory)?.is_empty());

        Ok(())
    }
}
