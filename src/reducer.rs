//! Cart Reducer
//!
//! Pure transitions from `(CartState, CartAction)` to the next [`CartState`].
//! Every action succeeds: unknown ids, capped quantities, invalid coupons and
//! prices too large to total all resolve to a valid state rather than an
//! error.

use crate::{
    actions::CartAction,
    coupons::{CouponTable, normalize},
    properties::{Property, PropertyId},
    state::{CartLine, CartState},
    totals,
};

/// Applies [`CartAction`]s to cart state using a fixed coupon table.
#[derive(Debug, Clone, Default)]
pub struct CartReducer {
    coupons: CouponTable,
}

impl CartReducer {
    /// Create a reducer that accepts the codes in `coupons`.
    pub fn new(coupons: CouponTable) -> Self {
        Self { coupons }
    }

    /// Coupon table used by [`CartAction::ApplyCoupon`].
    pub fn coupons(&self) -> &CouponTable {
        &self.coupons
    }

    /// Compute the state that follows `action`.
    pub fn reduce(&self, state: CartState, action: CartAction) -> CartState {
        match action {
            CartAction::AddToCart(property) => {
                keep_totallable(state, |state| add_to_cart(state, property))
            }
            CartAction::RemoveFromCart(id) => remove_from_cart(state, &id),
            CartAction::IncrementQuantity(id) => {
                keep_totallable(state, |state| increment_quantity(state, &id))
            }
            CartAction::DecrementQuantity(id) => decrement_quantity(state, &id),
            CartAction::ToggleFavorite(property) => toggle_favorite(state, property),
            CartAction::ApplyCoupon(code) => self.apply_coupon(state, &code),
            CartAction::ClearCoupon => clear_coupon(state),
            CartAction::ClearCart => CartState::default(),
        }
    }

    /// An unknown code also clears any coupon applied before it.
    fn apply_coupon(&self, state: CartState, code: &str) -> CartState {
        match self.coupons.lookup(code) {
            Some(discount) => CartState {
                coupon: Some(normalize(code)),
                discount,
                ..state
            },
            None => clear_coupon(state),
        }
    }
}

/// Apply `grow`, or keep `state` if the grown cart could not be totalled.
fn keep_totallable(state: CartState, grow: impl FnOnce(CartState) -> CartState) -> CartState {
    let next = grow(state.clone());

    if totals::subtotal(&next).is_ok() {
        next
    } else {
        state
    }
}

fn add_to_cart(mut state: CartState, property: Property) -> CartState {
    if let Some(line) = state.items.iter_mut().find(|line| *line.id() == property.id) {
        increment(line);
    } else {
        state.items.push(CartLine::new(property));
    }

    state
}

fn remove_from_cart(mut state: CartState, id: &PropertyId) -> CartState {
    state.items.retain(|line| line.id() != id);

    state
}

fn increment_quantity(mut state: CartState, id: &PropertyId) -> CartState {
    if let Some(line) = state.items.iter_mut().find(|line| line.id() == id) {
        increment(line);
    }

    state
}

fn decrement_quantity(mut state: CartState, id: &PropertyId) -> CartState {
    if let Some(line) = state.items.iter_mut().find(|line| line.id() == id) {
        line.quantity = line.quantity.saturating_sub(1);
    }

    state.items.retain(|line| line.quantity > 0);

    state
}

fn toggle_favorite(mut state: CartState, property: Property) -> CartState {
    let before = state.saved_for_later.len();

    state
        .saved_for_later
        .retain(|favorite| favorite.id != property.id);

    if state.saved_for_later.len() == before {
        state.saved_for_later.push(property);
    }

    state
}

fn clear_coupon(state: CartState) -> CartState {
    CartState {
        coupon: None,
        discount: 0,
        ..state
    }
}

/// Add a unit, holding at the line's cap.
fn increment(line: &mut CartLine) {
    line.quantity = line.quantity.saturating_add(1).min(line.max_units);
}
