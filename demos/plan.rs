//! Plan Demo
//!
//! Loads a catalog, selects items, and prints the optimised shopping plan
//! with the one-stop comparison and a share link.
//!
//! Use `-c` to point at a catalog file
//! Use `-s` to select item identifiers (repeatable); omit to select everything
//! Use `--category` to restrict the selection to one category
//! Use `-b` to set the share link base URL

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trolley::prelude::*;

/// Arguments for the plan demo
#[derive(Debug, Parser)]
struct PlanArgs {
    /// Catalog file to load
    #[clap(short, long, default_value = "fixtures/market.yml")]
    catalog: String,

    /// Item identifiers to select; selects the whole catalog when omitted
    #[clap(short, long)]
    select: Vec<u32>,

    /// Only select items in this category
    #[clap(long)]
    category: Option<String>,

    /// Base URL for the share link
    #[clap(short, long, default_value = "https://trolley.example/list")]
    base_url: String,
}

#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = PlanArgs::parse();

    let catalog = load_catalog(&args.catalog)?;
    let mut session = Session::new();

    let wanted: Vec<ItemId> = if args.select.is_empty() {
        catalog
            .iter()
            .filter(|item| {
                args.category
                    .as_deref()
                    .is_none_or(|category| item.category() == category)
            })
            .map(Item::id)
            .collect()
    } else {
        args.select.iter().copied().map(ItemId).collect()
    };

    for id in wanted {
        session.apply(&catalog, Command::Toggle(id))?;
    }

    let plan = aggregate(&catalog, session.active())?;
    let quotes = evaluate(&catalog, session.active(), &plan)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    render_plan(&mut handle, &plan, &catalog)?;
    render_one_stop(&mut handle, &quotes, &catalog)?;

    println!("\nShare: {}", share_url(&args.base_url, session.active()));

    Ok(())
}
