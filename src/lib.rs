//! Trolley
//!
//! Trolley is a store-aware shopping-list planner: given a catalog of
//! grocery items with per-store prices, it finds the best store for each
//! item, partitions a selection into per-store shopping trips with
//! subtotals and a grand total, compares that against buying everything at
//! a single store, and encodes selections as compact shareable links.

pub mod catalog;
pub mod compare;
pub mod display;
pub mod items;
pub mod loader;
pub mod one_stop;
pub mod plan;
pub mod prelude;
pub mod selection;
pub mod session;
pub mod share;
pub mod stores;
