//! Totals

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    properties::PropertyId,
    state::{CartLine, CartState},
};

/// Errors from totalling a cart.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TotalsError {
    /// `price × quantity` for a line does not fit in a [`Decimal`].
    #[error("line total for property {0} overflowed")]
    LineOverflow(PropertyId),

    /// The sum of line totals does not fit in a [`Decimal`].
    #[error("cart subtotal overflowed")]
    SubtotalOverflow,
}

/// Values derived from a cart state. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of `price × quantity` over every line
    pub subtotal: Decimal,

    /// Amount taken off the subtotal by the applied coupon
    pub discount: Decimal,

    /// Subtotal less the discount
    pub total: Decimal,

    /// Sum of line quantities
    pub total_items: u64,
}

impl CartTotals {
    /// Compute the totals of a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] if a line total or the subtotal overflows.
    pub fn from_state(state: &CartState) -> Result<Self, TotalsError> {
        let subtotal = subtotal(state)?;
        let discount = discount_on(subtotal, state.discount);

        Ok(Self {
            subtotal,
            discount,
            total: subtotal
                .checked_sub(discount)
                .ok_or(TotalsError::SubtotalOverflow)?,
            total_items: total_items(state),
        })
    }

    /// Express the totals as money in `currency`.
    pub fn in_currency(self, currency: &Currency) -> MoneyTotals<'_> {
        MoneyTotals {
            subtotal: Money::from_decimal(self.subtotal, currency),
            discount: Money::from_decimal(self.discount, currency),
            total: Money::from_decimal(self.total, currency),
        }
    }
}

/// Cart totals in a display currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneyTotals<'a> {
    /// Subtotal
    pub subtotal: Money<'a, Currency>,

    /// Discount amount
    pub discount: Money<'a, Currency>,

    /// Total payable
    pub total: Money<'a, Currency>,
}

/// `price × quantity` for one line.
///
/// # Errors
///
/// Returns [`TotalsError::LineOverflow`] if the product does not fit.
pub fn line_total(line: &CartLine) -> Result<Decimal, TotalsError> {
    line.line_total()
        .ok_or_else(|| TotalsError::LineOverflow(line.id().clone()))
}

/// Sum of `price × quantity` over every line.
///
/// # Errors
///
/// Returns a [`TotalsError`] if a line total or the running sum overflows.
pub fn subtotal(state: &CartState) -> Result<Decimal, TotalsError> {
    state.items.iter().try_fold(Decimal::ZERO, |sum, line| {
        sum.checked_add(line_total(line)?)
            .ok_or(TotalsError::SubtotalOverflow)
    })
}

/// Sum of line quantities.
pub fn total_items(state: &CartState) -> u64 {
    state
        .items
        .iter()
        .fold(0, |sum: u64, line| sum.saturating_add(u64::from(line.quantity)))
}

/// Amount of `percent`% of `amount`.
fn discount_on(amount: Decimal, percent: u8) -> Decimal {
    if percent == 0 {
        return Decimal::ZERO;
    }

    let fraction = Percentage::from(Decimal::from(percent) / Decimal::ONE_HUNDRED);

    fraction * amount
}
