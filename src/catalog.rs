//! Catalog

use rusty_money::iso::Currency;

use crate::{
    items::{Item, ItemId},
    stores::StoreDirectory,
};

/// The read-only set of purchasable items with price metadata.
///
/// Loaded once per session and immutable afterwards. Item identifiers are
/// row indexes assigned at load time; they are unique and stable for the
/// lifetime of the catalog, which saved lists and share links rely on.
#[derive(Debug)]
pub struct Catalog<'a> {
    directory: StoreDirectory,
    items: Vec<Item<'a>>,
    categories: Vec<String>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create a catalog from a store directory and loaded items.
    ///
    /// Items must already carry identifiers matching their position, which
    /// the loader guarantees.
    pub fn new(
        directory: StoreDirectory,
        items: Vec<Item<'a>>,
        currency: &'static Currency,
    ) -> Self {
        debug_assert!(
            items
                .iter()
                .enumerate()
                .all(|(idx, item)| usize::try_from(item.id().0).is_ok_and(|id| id == idx)),
            "item identifiers must match their row position"
        );

        let mut categories: Vec<String> = Vec::new();

        for item in &items {
            if !categories.iter().any(|c| c == item.category()) {
                categories.push(item.category().to_string());
            }
        }

        Self {
            directory,
            items,
            categories,
            currency,
        }
    }

    /// Look up an item by identifier.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&Item<'a>> {
        self.items.get(usize::try_from(id.0).ok()?)
    }

    /// Whether the catalog contains an item with the given identifier.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.item(id).is_some()
    }

    /// Iterate over items in row order.
    pub fn iter(&self) -> impl Iterator<Item = &Item<'a>> {
        self.items.iter()
    }

    /// Iterate over items in one category, in row order.
    pub fn items_in_category<'c>(&'c self, category: &'c str) -> impl Iterator<Item = &'c Item<'a>> {
        self.items.iter().filter(move |i| i.category() == category)
    }

    /// Distinct categories in first-seen row order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The store directory backing this catalog.
    #[must_use]
    pub fn directory(&self) -> &StoreDirectory {
        &self.directory
    }

    /// The single currency all catalog prices are expressed in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Get the number of items in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
