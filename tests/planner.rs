//! Integration test for the full planning pipeline.
//!
//! Walks the documented two-store scenario end to end: a catalog where
//! milk is cheapest at StoreA and eggs at StoreB, a selection of both,
//! aggregation into a two-stop plan, and the one-stop quotes for each
//! store.
//!
//! Expected numbers:
//!
//! - Plan: StoreA gets Milk ($3.50), StoreB gets Eggs ($2.00), grand
//!   total $5.50 across two store visits.
//! - One stop at StoreA: $3.50 + $2.50 = $6.00, nothing missing, $0.50
//!   premium over the plan.
//! - One stop at StoreB: $4.00 + $2.00 = $6.00, nothing missing, $0.50
//!   premium over the plan.

use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use trolley::prelude::*;

const TWO_STORE_CATALOG: &str = "\
currency: USD
stores:
  - StoreA
  - StoreB
items:
  - name: Milk
    category: Dairy
    prices:
      StoreA: \"3.50\"
      StoreB: \"4.00\"
  - name: Eggs
    category: Dairy
    prices:
      StoreA: \"2.50\"
      StoreB: \"2.00\"
";

#[test]
fn two_store_scenario_aggregates_and_quotes_exactly() -> TestResult {
    let catalog = catalog_from_str(TWO_STORE_CATALOG)?;
    let store_a = catalog
        .directory()
        .key_of("StoreA")
        .ok_or("expected StoreA")?;
    let store_b = catalog
        .directory()
        .key_of("StoreB")
        .ok_or("expected StoreB")?;

    let mut session = Session::new();
    session.apply(&catalog, Command::Toggle(ItemId(0)))?;
    session.apply(&catalog, Command::Toggle(ItemId(1)))?;

    let plan = aggregate(&catalog, session.active())?;

    let groups: Vec<(StoreKey, &[ItemId], i64)> = plan
        .groups()
        .iter()
        .map(|group| {
            (
                group.store(),
                group.items(),
                group.subtotal().to_minor_units(),
            )
        })
        .collect();

    assert_eq!(
        groups,
        vec![
            (store_a, [ItemId(0)].as_slice(), 350),
            (store_b, [ItemId(1)].as_slice(), 200),
        ]
    );

    assert_eq!(plan.grand_total(), Money::from_minor(550, USD));
    assert_eq!(plan.store_count(), 2);

    let quotes = evaluate(&catalog, session.active(), &plan)?;

    assert_eq!(quotes.len(), 2);

    for quote in &quotes {
        assert_eq!(quote.total(), Money::from_minor(600, USD));
        assert_eq!(quote.missing(), 0);
        assert_eq!(quote.premium(), Money::from_minor(50, USD));
    }

    Ok(())
}

#[test]
fn aggregation_total_matches_sum_of_best_prices() -> TestResult {
    let catalog = load_catalog("fixtures/market.yml")?;

    let mut session = Session::new();

    for item in catalog.iter() {
        session.apply(&catalog, Command::Toggle(item.id()))?;
    }

    let plan = aggregate(&catalog, session.active())?;

    let best_sum: i64 = catalog
        .iter()
        .map(|item| item.best().price.to_minor_units())
        .sum();

    let subtotal_sum: i64 = plan
        .groups()
        .iter()
        .map(|group| group.subtotal().to_minor_units())
        .sum();

    assert_eq!(plan.grand_total().to_minor_units(), best_sum);
    assert_eq!(subtotal_sum, best_sum);
    assert_eq!(plan.item_count(), catalog.len());

    Ok(())
}

#[test]
fn one_stop_quotes_never_beat_the_plan() -> TestResult {
    let catalog = load_catalog("fixtures/market.yml")?;

    let mut session = Session::new();

    for item in catalog.iter() {
        session.apply(&catalog, Command::Toggle(item.id()))?;
    }

    let plan = aggregate(&catalog, session.active())?;
    let quotes = evaluate(&catalog, session.active(), &plan)?;

    assert!(!quotes.is_empty());

    for quote in &quotes {
        assert!(
            quote.premium().to_minor_units() >= 0,
            "a single store cannot beat the per-item minimum total"
        );
        assert!(quote.carried() >= 1, "zero-coverage stores must be omitted");
    }

    Ok(())
}

#[test]
fn best_price_invariant_holds_across_the_catalog() -> TestResult {
    let catalog = load_catalog("fixtures/market.yml")?;

    for item in catalog.iter() {
        let best = item.best();

        let min = item
            .prices()
            .values()
            .map(rusty_money::Money::to_minor_units)
            .min()
            .ok_or("every loaded item carries at least one price")?;

        assert_eq!(best.price.to_minor_units(), min);
        assert_eq!(item.price_at(best.store), Some(best.price));
    }

    Ok(())
}

#[test]
fn share_link_round_trips_a_session_selection() -> TestResult {
    let catalog = load_catalog("fixtures/market.yml")?;

    let mut session = Session::new();
    session.apply(&catalog, Command::Toggle(ItemId(2)))?;
    session.apply(&catalog, Command::Toggle(ItemId(0)))?;
    session.apply(&catalog, Command::Toggle(ItemId(7)))?;

    let url = share_url("https://trolley.example/list", session.active());

    assert!(url.ends_with("?items=0,2,7"), "encoding must be canonical");

    let restored = Session::with_selection(&catalog, selection_from_url(&url));

    assert_eq!(restored.active(), session.active());

    Ok(())
}

#[test]
fn rendered_plan_and_payloads_name_every_store_group() -> TestResult {
    let catalog = load_catalog("fixtures/market.yml")?;

    let mut session = Session::new();
    session.apply(&catalog, Command::Toggle(ItemId(0)))?;
    session.apply(&catalog, Command::Toggle(ItemId(3)))?;

    let plan = aggregate(&catalog, session.active())?;

    let mut out = Vec::new();
    render_plan(&mut out, &plan, &catalog)?;
    let rendered = String::from_utf8(out)?;

    let text = plan_text("Weekly", &plan, &catalog)?;
    let sms = sms_link("Weekly", &plan, &catalog)?;

    for group in plan.groups() {
        let store = catalog
            .directory()
            .name(group.store())
            .ok_or("expected a store name")?;

        assert!(rendered.contains(store));
        assert!(text.contains(store));
    }

    assert!(sms.starts_with("sms:?&body="));
    assert!(!sms.contains(' '));

    Ok(())
}
