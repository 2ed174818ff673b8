//! Saved Lists Demo
//!
//! Walks the saved-list registry through a session: build a selection,
//! save it, copy and rename it, then reactivate and share it.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trolley::prelude::*;

/// Arguments for the saved lists demo
#[derive(Debug, Parser)]
struct SavedListsArgs {
    /// Catalog file to load
    #[clap(short, long, default_value = "fixtures/market.yml")]
    catalog: String,
}

#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = SavedListsArgs::parse();
    let catalog = load_catalog(&args.catalog)?;

    let mut session = Session::new();

    for id in [0, 1, 2] {
        session.apply(&catalog, Command::Toggle(ItemId(id)))?;
    }

    session.apply(&catalog, Command::Save("Weekly Basics".to_string()))?;
    session.apply(
        &catalog,
        Command::Copy {
            name: "Weekly Basics".to_string(),
            force: false,
        },
    )?;
    session.apply(
        &catalog,
        Command::Rename {
            from: "Weekly Basics (Copy)".to_string(),
            to: "Weekend".to_string(),
            force: false,
        },
    )?;

    session.apply(&catalog, Command::Clear)?;
    session.apply(&catalog, Command::Activate("Weekend".to_string()))?;

    println!("Saved lists: {:?}", session.saved_names());
    println!(
        "Active after reactivation: {} items",
        session.active().len()
    );
    println!(
        "Share: {}",
        share_url("https://trolley.example/list", session.active())
    );

    Ok(())
}
