//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::Catalog,
    compare::{Alternative, alternatives, best_of},
    display::{DisplayError, render_one_stop, render_plan},
    items::{BestPrice, Item, ItemId, StockStatus},
    loader::{LoadError, catalog_from_str, load_catalog},
    one_stop::{OneStopError, OneStopQuote, evaluate},
    plan::{PlanError, ShoppingPlan, StoreGroup, aggregate},
    selection::Selection,
    session::{Command, Session, SessionError},
    share::{ShareError, mailto_link, plan_text, selection_from_url, share_url, sms_link},
    stores::{Store, StoreDirectory, StoreKey},
};
