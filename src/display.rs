//! Plan display

use std::{fmt::Write as _, io};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::MoneyError;
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::Catalog,
    compare,
    items::{Item, ItemId, StockStatus},
    one_stop::OneStopQuote,
    plan::ShoppingPlan,
    stores::StoreKey,
};

/// Errors that can occur when rendering a plan.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// A plan identifier does not exist in the catalog.
    #[error("Item {0} not found in catalog")]
    UnknownItem(ItemId),

    /// A plan store key does not exist in the catalog's directory.
    #[error("Store {0:?} not found in directory")]
    UnknownStore(StoreKey),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Render a shopping plan as a store-grouped table with a summary block.
///
/// One table section per store group, separated by horizontal rules, each
/// line annotated with the other stores carrying the item and their price
/// deltas. The summary lists per-store subtotals and the bold grand total.
///
/// # Errors
///
/// Returns a [`DisplayError`] if the plan references an unknown item or
/// store, or if the output cannot be written.
pub fn render_plan(
    mut out: impl io::Write,
    plan: &ShoppingPlan<'_>,
    catalog: &Catalog<'_>,
) -> Result<(), DisplayError> {
    if plan.is_empty() {
        return writeln!(out, "\nNothing selected yet; toggle some items to build a list.")
            .map_err(|_err| DisplayError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Category", "Price", "Also available"]);

    let mut group_boundary_rows: SmallVec<[usize; 8]> = smallvec![];
    let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = smallvec![];
    let mut current_row = 1; // header is row 0
    let mut position = 0usize;

    for group in plan.groups() {
        let store_name = catalog
            .directory()
            .name(group.store())
            .ok_or(DisplayError::UnknownStore(group.store()))?;

        group_boundary_rows.push(current_row);

        // Banner row naming the store and its subtotal, like the original
        // per-store section header.
        builder.push_record([
            store_name.to_string(),
            String::new(),
            String::new(),
            format!("{}", group.subtotal()),
            String::new(),
        ]);

        color_ops.push((current_row, 0, Color::BOLD));
        color_ops.push((current_row, 3, Color::BOLD));

        current_row += 1;

        for id in group.items() {
            let item = catalog.item(*id).ok_or(DisplayError::UnknownItem(*id))?;

            position += 1;

            builder.push_record([
                format!("#{position:<3}"),
                item_cell(item),
                item.category().to_string(),
                price_cell(item),
                alternatives_cell(item, group.store(), catalog)?,
            ]);

            color_ops.push((current_row, 2, color_dark_grey()));
            color_ops.push((current_row, 4, color_dark_grey()));

            current_row += 1;
        }
    }

    write_plan_table(&mut out, builder, &group_boundary_rows, color_ops)?;
    write_plan_summary(&mut out, plan, catalog)?;

    Ok(())
}

/// Render the one-stop comparison: what the whole selection would cost at
/// each single store, and the premium over the optimal plan.
///
/// # Errors
///
/// Returns a [`DisplayError`] if a quote references an unknown store or if
/// the output cannot be written.
pub fn render_one_stop(
    mut out: impl io::Write,
    quotes: &[OneStopQuote<'_>],
    catalog: &Catalog<'_>,
) -> Result<(), DisplayError> {
    if quotes.is_empty() {
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Store", "Items", "Missing", "Total", "Premium"]);

    let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = smallvec![];

    for (idx, quote) in quotes.iter().enumerate() {
        let store_name = catalog
            .directory()
            .name(quote.store())
            .ok_or(DisplayError::UnknownStore(quote.store()))?;

        let premium_minor = quote.premium().to_minor_units();

        let premium_display = if premium_minor == 0 {
            "matches best".to_string()
        } else {
            format!(
                "+{} ({}%)",
                quote.premium(),
                percent_points(quote.premium_percent())
            )
        };

        builder.push_record([
            store_name.to_string(),
            quote.carried().to_string(),
            quote.missing().to_string(),
            format!("{}", quote.total()),
            premium_display,
        ]);

        if premium_minor == 0 {
            color_ops.push((idx + 1, 4, Color::FG_GREEN));
        }
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..4), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| DisplayError::IO)
}

/// Item name plus a stock tag where one applies.
fn item_cell(item: &Item<'_>) -> String {
    match item.stock() {
        Some(StockStatus::Low) => format!("{} (low stock)", item.name()),
        Some(StockStatus::OutOfStock) => format!("{} (out of stock)", item.name()),
        _ => item.name().to_string(),
    }
}

/// Best price plus a trend arrow when the previous best price differs.
fn price_cell(item: &Item<'_>) -> String {
    let best = item.best().price;

    match item.previous_best() {
        Some(previous) if previous.to_minor_units() > best.to_minor_units() => {
            format!("{best} \u{2193}")
        }
        Some(previous) if previous.to_minor_units() < best.to_minor_units() => {
            format!("{best} \u{2191}")
        }
        _ => format!("{best}"),
    }
}

/// One line per other store carrying the item, with its premium.
fn alternatives_cell(
    item: &Item<'_>,
    chosen: StoreKey,
    catalog: &Catalog<'_>,
) -> Result<String, DisplayError> {
    let alternatives = compare::alternatives(item, chosen, catalog.directory())?;
    let mut cell = String::new();

    for (idx, alternative) in alternatives.iter().enumerate() {
        let name = catalog
            .directory()
            .name(alternative.store)
            .ok_or(DisplayError::UnknownStore(alternative.store))?;

        if idx > 0 {
            cell.push('\n');
        }

        if alternative.premium.to_minor_units() == 0 {
            _ = write!(cell, "same at {name}");
        } else {
            _ = write!(cell, "+{} at {name}", alternative.premium);
        }
    }

    Ok(cell)
}

fn write_plan_table(
    out: &mut impl io::Write,
    builder: Builder,
    group_boundary_rows: &[usize],
    color_ops: SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), DisplayError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for &row in group_boundary_rows {
        if row > 1 {
            theme.insert_horizontal_line(row, separator);
        }
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..4), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| DisplayError::IO)
}

fn write_plan_summary(
    out: &mut impl io::Write,
    plan: &ShoppingPlan<'_>,
    catalog: &Catalog<'_>,
) -> Result<(), DisplayError> {
    let mut lines: Vec<(String, String)> = Vec::new();

    for group in plan.groups() {
        let store_name = catalog
            .directory()
            .name(group.store())
            .ok_or(DisplayError::UnknownStore(group.store()))?;

        lines.push((
            format!(" {store_name}:"),
            format!("{}  ", group.subtotal()),
        ));
    }

    lines.push((
        " \x1b[1mTotal:\x1b[0m".to_string(),
        format!("\x1b[1m{}  \x1b[0m", plan.grand_total()),
    ));

    let label_width = lines
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or(0);

    let value_width = lines
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or(0);

    for (label, value) in &lines {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    let stores = plan.store_count();

    if stores > 1 {
        writeln!(out, "\n Best prices need {stores} store visits.").map_err(|_err| DisplayError::IO)?;
    }

    writeln!(out).map_err(|_err| DisplayError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::from_i64(100).unwrap_or(Decimal::ZERO)).round_dp(2)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F. This function
/// scans each character, grouping consecutive border characters and emitting a
/// single grey escape sequence around each run, leaving cell content untouched.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), DisplayError> {
    let label_vis = visible_width(label);
    let value_vis = visible_width(value);

    // 2 chars of spacing between label and value column.
    let label_pad = label_col_width.saturating_sub(label_vis);
    let value_pad = value_col_width.saturating_sub(value_vis);

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| DisplayError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
