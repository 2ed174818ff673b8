//! Catalog loading

use std::{fs, path::Path};

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    catalog::Catalog,
    compare,
    items::{BestPrice, Item, ItemId, StockStatus},
    stores::{StoreDirectory, StoreKey},
};

/// Catalog loading errors.
///
/// Row-level data-quality problems are not errors: a bad row is dropped
/// with a warning and loading continues. Only problems that leave nothing
/// to compute against are fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading the catalog file.
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("Failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Every row was dropped, so no price data is available at all.
    #[error(
        "Catalog has no usable priced items; expected rows with `name` plus either a `prices` \
         map or `best_price` and `best_store` (found fields: {found})"
    )]
    NoPricedItems {
        /// Fields that were actually present across the source rows.
        found: String,
    },
}

/// Top-level catalog document.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    /// ISO currency code for every price in the file. Defaults to USD.
    #[serde(default)]
    currency: Option<String>,

    /// Known stores, in the order that settles best-price ties.
    #[serde(default)]
    stores: Vec<String>,

    /// Item rows.
    #[serde(default)]
    items: Vec<ItemRow>,
}

/// One item row as it appears on disk, before cleaning.
#[derive(Debug, Deserialize)]
struct ItemRow {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    category: Option<String>,

    /// Per-store prices. A store absent here does not carry the item.
    #[serde(default)]
    prices: FxHashMap<String, RawPrice>,

    /// Authoritative best price, used when no per-store map is given.
    #[serde(default)]
    best_price: Option<RawPrice>,

    /// Authoritative best store, used when no per-store map is given.
    #[serde(default)]
    best_store: Option<String>,

    #[serde(default)]
    previous_price: Option<RawPrice>,

    #[serde(default)]
    stock: Option<String>,
}

/// A price as written in the source file: either a bare number or a string
/// that may carry a currency symbol, a currency code, or thousands
/// separators.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

/// Load a catalog from a YAML file.
///
/// Loading happens once per session; the returned catalog is immutable.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read or parsed, the
/// currency code is unknown, or no usable priced rows remain after
/// cleaning.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog<'static>, LoadError> {
    let path = path.as_ref();

    info!(path = %path.display(), "loading catalog");

    let contents = fs::read_to_string(path)?;

    catalog_from_str(&contents)
}

/// Load a catalog from YAML text.
///
/// # Errors
///
/// Returns a [`LoadError`] if the text cannot be parsed, the currency code
/// is unknown, or no usable priced rows remain after cleaning.
pub fn catalog_from_str(contents: &str) -> Result<Catalog<'static>, LoadError> {
    let file: CatalogFile = serde_norway::from_str(contents)?;
    let currency = parse_currency(file.currency.as_deref())?;

    let mut directory = StoreDirectory::new();

    for store in &file.stores {
        if !store.trim().is_empty() {
            directory.intern(store);
        }
    }

    let mut items: Vec<Item<'static>> = Vec::new();
    let mut next_id = 0u32;
    let mut dropped = 0usize;

    for row in &file.items {
        match clean_row(row, &mut directory, currency) {
            Some(builder) => {
                items.push(builder.into_item(ItemId(next_id)));
                next_id += 1;
            }
            None => dropped += 1,
        }
    }

    if items.is_empty() {
        return Err(LoadError::NoPricedItems {
            found: seen_fields(&file.items),
        });
    }

    info!(
        items = items.len(),
        stores = directory.len(),
        dropped,
        "loaded catalog"
    );

    Ok(Catalog::new(directory, items, currency))
}

/// A cleaned row, pending only its identifier.
struct CleanRow<'a> {
    name: String,
    category: String,
    prices: FxHashMap<StoreKey, Money<'a, Currency>>,
    best: BestPrice<'a>,
    previous_best: Option<Money<'a, Currency>>,
    stock: Option<StockStatus>,
}

impl<'a> CleanRow<'a> {
    fn into_item(self, id: ItemId) -> Item<'a> {
        let mut item = Item::new(id, self.name, self.category, self.prices, self.best);

        if let Some(previous) = self.previous_best {
            item = item.with_previous_best(previous);
        }

        if let Some(stock) = self.stock {
            item = item.with_stock(stock);
        }

        item
    }
}

/// Clean one source row, or reject it.
///
/// Rejection reasons: no usable name, or no usable price data (neither a
/// parseable per-store price nor an authoritative best price and store).
fn clean_row(
    row: &ItemRow,
    directory: &mut StoreDirectory,
    currency: &'static Currency,
) -> Option<CleanRow<'static>> {
    let name = row.name.as_deref().map(str::trim).unwrap_or_default();

    if name.is_empty() {
        warn!("dropping row with no item name");
        return None;
    }

    let category = row
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .unwrap_or("Uncategorised")
        .to_string();

    let mut prices = FxHashMap::default();

    // Stores new to the directory are registered in sorted name order
    // within a row, keeping the directory identical across loads.
    let mut entries: Vec<(&String, &RawPrice)> = row.prices.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (store, raw) in entries {
        match parse_amount(raw) {
            Some(minor) => {
                let key = directory.intern(store);
                prices.insert(key, Money::from_minor(minor, currency));
            }
            None => {
                warn!(item = name, store = %store, value = ?raw, "unparseable price; treating as missing");
            }
        }
    }

    let best = if prices.is_empty() {
        // No per-store data: the explicit best-price/best-store fields are
        // authoritative, and become the row's single price entry.
        let minor = row.best_price.as_ref().and_then(parse_amount);
        let store = row
            .best_store
            .as_deref()
            .map(str::trim)
            .filter(|store| !store.is_empty());

        let (Some(minor), Some(store)) = (minor, store) else {
            warn!(item = name, "dropping row with no usable price data");
            return None;
        };

        let key = directory.intern(store);
        let price = Money::from_minor(minor, currency);

        prices.insert(key, price);

        BestPrice { store: key, price }
    } else {
        compare::best_of(&prices, directory)?
    };

    let previous_best = row
        .previous_price
        .as_ref()
        .and_then(parse_amount)
        .map(|minor| Money::from_minor(minor, currency));

    let stock = row.stock.as_deref().and_then(parse_stock);

    Some(CleanRow {
        name: name.to_string(),
        category,
        prices,
        best,
        previous_best,
        stock,
    })
}

/// Parse a source price into minor units.
///
/// String values may carry a currency symbol, a trailing currency code,
/// thousands separators, and surrounding whitespace; all are stripped
/// before parsing. Unparseable values yield `None` (missing), never an
/// error, per the row-drop data-quality policy.
fn parse_amount(raw: &RawPrice) -> Option<i64> {
    let amount = match raw {
        RawPrice::Number(value) => Decimal::from_f64(*value)?,
        RawPrice::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();

            if cleaned.is_empty() {
                return None;
            }

            cleaned.parse::<Decimal>().ok()?
        }
    };

    amount
        .checked_mul(Decimal::new(100, 0))
        .map(|value| value.round_dp(0))
        .and_then(|value| value.to_i64())
}

/// Map an ISO code to a supported currency. Defaults to USD when absent.
fn parse_currency(code: Option<&str>) -> Result<&'static Currency, LoadError> {
    match code.map(str::trim) {
        None => Ok(USD),
        Some("USD") => Ok(USD),
        Some("GBP") => Ok(GBP),
        Some("EUR") => Ok(EUR),
        Some(other) => Err(LoadError::UnknownCurrency(other.to_string())),
    }
}

/// Lenient stock status parsing; unrecognized tags are ignored.
fn parse_stock(raw: &str) -> Option<StockStatus> {
    let tag = raw.trim().to_ascii_lowercase();

    if tag.contains("out") {
        Some(StockStatus::OutOfStock)
    } else if tag.contains("low") {
        Some(StockStatus::Low)
    } else if tag.contains("in") {
        Some(StockStatus::InStock)
    } else {
        None
    }
}

/// Which fields were present anywhere in the source rows, for the fatal
/// no-priced-items report.
fn seen_fields(rows: &[ItemRow]) -> String {
    let mut found: Vec<&str> = Vec::new();

    let fields = [
        ("name", rows.iter().any(|row| row.name.is_some())),
        ("category", rows.iter().any(|row| row.category.is_some())),
        ("prices", rows.iter().any(|row| !row.prices.is_empty())),
        ("best_price", rows.iter().any(|row| row.best_price.is_some())),
        ("best_store", rows.iter().any(|row| row.best_store.is_some())),
        (
            "previous_price",
            rows.iter().any(|row| row.previous_price.is_some()),
        ),
        ("stock", rows.iter().any(|row| row.stock.is_some())),
    ];

    for (field, present) in fields {
        if present {
            found.push(field);
        }
    }

    if found.is_empty() {
        "none".to_string()
    } else {
        found.join(", ")
    }
}
