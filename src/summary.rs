//! Summary
//!
//! Plain-text rendering of a cart for terminals.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    state::{CartLine, CartState},
    totals::{self, CartTotals, TotalsError},
};

const DIM: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Errors that can occur when writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The output could not be written.
    #[error("failed to write cart summary: {0}")]
    Io(#[from] io::Error),

    /// The cart cannot be totalled.
    #[error(transparent)]
    Totals(#[from] TotalsError),
}

/// Write the cart lines, favorites and totals of `state` to `out`.
///
/// Nothing is written when the cart cannot be totalled.
///
/// # Errors
///
/// Returns a [`SummaryError`] if the cart cannot be totalled or writing to
/// `out` fails.
pub fn write_summary(
    mut out: impl io::Write,
    state: &CartState,
    currency: &Currency,
) -> Result<(), SummaryError> {
    let cart_totals = CartTotals::from_state(state)?;

    if state.is_empty() {
        writeln!(out, "\nYour cart is empty.")?;
    } else {
        write_lines_table(&mut out, &state.items, currency)?;
    }

    if !state.saved_for_later.is_empty() {
        writeln!(out, " Saved for later: {}", state.saved_for_later.len())?;
    }

    write_totals(&mut out, state, cart_totals, currency)?;

    Ok(())
}

fn write_lines_table(
    out: &mut impl io::Write,
    lines: &[CartLine],
    currency: &Currency,
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Property", "Unit Price", "Qty", "Line Total"]);

    for (idx, line) in lines.iter().enumerate() {
        builder.push_record([
            format!("#{}", idx + 1),
            line_label(line),
            money(line.price(), currency),
            format!("{}/{}", line.quantity, line.max_units),
            money(totals::line_total(line)?, currency),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());

    let table_str = dim_borders(&table.to_string());

    writeln!(out, "\n{table_str}")?;

    Ok(())
}

fn write_totals(
    out: &mut impl io::Write,
    state: &CartState,
    cart_totals: CartTotals,
    currency: &Currency,
) -> Result<(), SummaryError> {
    let money_totals = cart_totals.in_currency(currency);

    let discount_label = match &state.coupon {
        Some(code) => format!(" Discount ({code}, {}%):", state.discount),
        None => " Discount:".to_string(),
    };

    let rows = [
        (" Items:".to_string(), format!("{}  ", cart_totals.total_items)),
        (" Subtotal:".to_string(), format!("{}  ", money_totals.subtotal)),
        (discount_label, format!("-{}  ", money_totals.discount)),
        (
            format!(" {BOLD}Total:{RESET}"),
            format!("{BOLD}{}  {RESET}", money_totals.total),
        ),
    ];

    let label_width = rows
        .iter()
        .map(|(label, _)| display_width(label))
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_, value)| display_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &rows {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out)?;

    Ok(())
}

/// Title of the listing, or its id when untitled.
fn line_label(line: &CartLine) -> String {
    line.property
        .title()
        .map_or_else(|| line.id().to_string(), str::to_string)
}

fn money(amount: Decimal, currency: &Currency) -> String {
    Money::from_decimal(amount, currency).to_string()
}

fn is_border(ch: char) -> bool {
    matches!(ch, '\u{2500}'..='\u{257F}')
}

/// Dims each run of box-drawing characters, leaving cell text as is.
fn dim_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() * 2);
    let mut rest = table;

    while let Some(start) = rest.find(is_border) {
        let (text, tail) = rest.split_at(start);
        let end = tail.find(|ch| !is_border(ch)).unwrap_or(tail.len());
        let (border, tail) = tail.split_at(end);

        out.push_str(text);
        out.push_str(DIM);
        out.push_str(border);
        out.push_str(RESET);

        rest = tail;
    }

    out.push_str(rest);

    out
}

/// Number of characters a terminal shows for `s`, skipping SGR sequences.
fn display_width(s: &str) -> usize {
    let mut parts = s.split('\x1b');
    let plain = parts.next().map_or(0, |head| head.chars().count());

    plain
        + parts
            .map(|part| {
                part.chars()
                    .skip_while(|ch| !ch.is_ascii_alphabetic())
                    .skip(1)
                    .count()
            })
            .sum::<usize>()
}

/// Writes a right-aligned label followed by a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), SummaryError> {
    let label_pad = label_col_width.saturating_sub(display_width(label));
    let value_pad = value_col_width.saturating_sub(display_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )?;

    Ok(())
}
