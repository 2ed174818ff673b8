//! Share links and payloads

use std::fmt::Write;

use thiserror::Error;

use crate::{
    catalog::Catalog,
    items::ItemId,
    plan::ShoppingPlan,
    selection::Selection,
    stores::StoreKey,
};

/// Query parameter carrying the encoded selection.
const ITEMS_PARAM: &str = "items";

/// Errors that can occur while building share payloads.
#[derive(Debug, Error)]
pub enum ShareError {
    /// A plan identifier does not exist in the catalog.
    #[error("Item {0} not found in catalog")]
    UnknownItem(ItemId),

    /// A plan store key does not exist in the catalog's directory.
    #[error("Store {0:?} not found in directory")]
    UnknownStore(StoreKey),
}

/// Build a share link for a selection.
///
/// The selection is embedded canonically (ascending, comma-joined) as the
/// `items` query parameter; an empty selection yields the base URL
/// unchanged, matching the decode rule that an absent parameter means an
/// empty selection.
#[must_use]
pub fn share_url(base: &str, selection: &Selection) -> String {
    if selection.is_empty() {
        return base.to_string();
    }

    let separator = if base.contains('?') { '&' } else { '?' };

    format!("{base}{separator}{ITEMS_PARAM}={}", selection.encode())
}

/// Reconstruct a selection from a share link.
///
/// Deliberately lenient at this boundary: links are user-facing and may be
/// hand-edited or truncated by messaging apps. An absent `items` parameter,
/// an unparseable payload, or no query string at all each yield the empty
/// selection rather than an error. Percent-encoded payloads (e.g. commas
/// escaped by a messaging app) are decoded first.
#[must_use]
pub fn selection_from_url(url: &str) -> Selection {
    let Some((_, query)) = url.split_once('?') else {
        return Selection::new();
    };

    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };

        if key != ITEMS_PARAM {
            continue;
        }

        return match urlencoding::decode(value) {
            Ok(decoded) => Selection::decode(&decoded),
            Err(_) => Selection::decode(value),
        };
    }

    Selection::new()
}

/// Render a plan as plain shareable text: the list name, each store's
/// items with prices, per-store subtotals, and the grand total.
///
/// # Errors
///
/// Returns a [`ShareError`] if the plan references an item or store the
/// catalog does not know, which a plan aggregated from the same catalog
/// rules out.
pub fn plan_text(
    list_name: &str,
    plan: &ShoppingPlan<'_>,
    catalog: &Catalog<'_>,
) -> Result<String, ShareError> {
    let mut body = String::new();

    _ = writeln!(body, "{list_name}");

    for group in plan.groups() {
        let store = catalog
            .directory()
            .name(group.store())
            .ok_or(ShareError::UnknownStore(group.store()))?;

        _ = writeln!(body, "{store}: {}", group.subtotal());

        for id in group.items() {
            let item = catalog.item(*id).ok_or(ShareError::UnknownItem(*id))?;

            _ = writeln!(body, "- {}: {} ({store})", item.name(), item.best().price);
        }
    }

    _ = writeln!(body, "Total: {}", plan.grand_total());

    Ok(body)
}

/// Build an `sms:` deep link whose body is the rendered plan.
///
/// Reserved characters are percent-escaped; the payload is otherwise the
/// same text as [`plan_text`].
///
/// # Errors
///
/// Returns a [`ShareError`] if the plan text cannot be rendered.
pub fn sms_link(
    list_name: &str,
    plan: &ShoppingPlan<'_>,
    catalog: &Catalog<'_>,
) -> Result<String, ShareError> {
    let body = plan_text(list_name, plan, catalog)?;

    Ok(format!("sms:?&body={}", urlencoding::encode(&body)))
}

/// Build a `mailto:` deep link with a subject naming the list and the
/// rendered plan as the body.
///
/// # Errors
///
/// Returns a [`ShareError`] if the plan text cannot be rendered.
pub fn mailto_link(
    list_name: &str,
    plan: &ShoppingPlan<'_>,
    catalog: &Catalog<'_>,
) -> Result<String, ShareError> {
    let subject = format!("Shopping list: {list_name}");
    let body = plan_text(list_name, plan, catalog)?;

    Ok(format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    ))
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::{
        items::{BestPrice, Item},
        plan::aggregate,
        stores::StoreDirectory,
    };

    use super::*;

    fn test_catalog() -> Catalog<'static> {
        let mut directory = StoreDirectory::new();
        let tesco = directory.intern("Tesco");
        let dunnes = directory.intern("Dunnes");

        let mut milk_prices = FxHashMap::default();
        milk_prices.insert(tesco, Money::from_minor(350, GBP));
        milk_prices.insert(dunnes, Money::from_minor(400, GBP));

        let milk = Item::new(
            ItemId(0),
            "Milk",
            "Dairy",
            milk_prices,
            BestPrice {
                store: tesco,
                price: Money::from_minor(350, GBP),
            },
        );

        let mut eggs_prices = FxHashMap::default();
        eggs_prices.insert(dunnes, Money::from_minor(200, GBP));

        let eggs = Item::new(
            ItemId(1),
            "Eggs",
            "Dairy",
            eggs_prices,
            BestPrice {
                store: dunnes,
                price: Money::from_minor(200, GBP),
            },
        );

        Catalog::new(directory, vec![milk, eggs], GBP)
    }

    #[test]
    fn share_url_embeds_canonical_selection() {
        let selection = Selection::from_ids([ItemId(5), ItemId(1)]);

        assert_eq!(
            share_url("https://example.test/list", &selection),
            "https://example.test/list?items=1,5"
        );
    }

    #[test]
    fn share_url_appends_to_existing_query() {
        let selection = Selection::from_ids([ItemId(2)]);

        assert_eq!(
            share_url("https://example.test/list?lang=en", &selection),
            "https://example.test/list?lang=en&items=2"
        );
    }

    #[test]
    fn share_url_of_empty_selection_is_base_unchanged() {
        assert_eq!(
            share_url("https://example.test/list", &Selection::new()),
            "https://example.test/list"
        );
    }

    #[test]
    fn selection_round_trips_through_url() {
        let selection = Selection::from_ids([ItemId(0), ItemId(1), ItemId(7)]);

        let url = share_url("https://example.test/list", &selection);

        assert_eq!(selection_from_url(&url), selection);
    }

    #[test]
    fn absent_items_parameter_means_empty_selection() {
        assert!(selection_from_url("https://example.test/list").is_empty());
        assert!(selection_from_url("https://example.test/list?lang=en").is_empty());
    }

    #[test]
    fn malformed_payload_keeps_valid_tokens() {
        let selection = selection_from_url("https://example.test/list?items=abc,,3,x");

        assert_eq!(selection, Selection::from_ids([ItemId(3)]));
    }

    #[test]
    fn percent_encoded_commas_are_decoded() {
        let selection = selection_from_url("https://example.test/list?items=1%2C2%2C3");

        assert_eq!(
            selection,
            Selection::from_ids([ItemId(1), ItemId(2), ItemId(3)])
        );
    }

    #[test]
    fn plan_text_lists_stores_items_and_totals() -> TestResult {
        let catalog = test_catalog();
        let selection = Selection::from_ids([ItemId(0), ItemId(1)]);
        let plan = aggregate(&catalog, &selection)?;

        let text = plan_text("Weekly", &plan, &catalog)?;

        assert!(text.starts_with("Weekly\n"));
        assert!(text.contains("Tesco: £3.50"));
        assert!(text.contains("- Milk: £3.50 (Tesco)"));
        assert!(text.contains("Dunnes: £2.00"));
        assert!(text.contains("- Eggs: £2.00 (Dunnes)"));
        assert!(text.contains("Total: £5.50"));

        Ok(())
    }

    #[test]
    fn sms_link_percent_escapes_reserved_characters() -> TestResult {
        let catalog = test_catalog();
        let selection = Selection::from_ids([ItemId(0)]);
        let plan = aggregate(&catalog, &selection)?;

        let link = sms_link("Weekly", &plan, &catalog)?;

        assert!(link.starts_with("sms:?&body="));
        assert!(!link.contains(' '), "spaces must be escaped");
        assert!(!link.contains('\n'), "newlines must be escaped");
        assert!(link.contains("Weekly"));

        Ok(())
    }

    #[test]
    fn mailto_link_carries_subject_and_body() -> TestResult {
        let catalog = test_catalog();
        let selection = Selection::from_ids([ItemId(1)]);
        let plan = aggregate(&catalog, &selection)?;

        let link = mailto_link("Weekend", &plan, &catalog)?;

        assert!(link.starts_with("mailto:?subject="));
        assert!(link.contains("&body="));
        assert!(link.contains("Shopping%20list%3A%20Weekend"));

        Ok(())
    }
}
