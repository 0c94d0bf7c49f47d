//! Cart Actions

use crate::properties::{Property, PropertyId};

/// The complete set of transitions the cart accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add one unit of a property, creating its line if needed.
    AddToCart(Property),

    /// Drop the line for a property.
    RemoveFromCart(PropertyId),

    /// Request one more unit of a property already in the cart.
    IncrementQuantity(PropertyId),

    /// Request one fewer unit, dropping the line when it reaches zero.
    DecrementQuantity(PropertyId),

    /// Save or unsave a property as a favorite.
    ToggleFavorite(Property),

    /// Apply a coupon code.
    ApplyCoupon(String),

    /// Remove the applied coupon.
    ClearCoupon,

    /// Reset the cart, favorites and coupon.
    ClearCart,
}

impl CartAction {
    /// Stable name of the action, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CartAction::AddToCart(_) => "add_to_cart",
            CartAction::RemoveFromCart(_) => "remove_from_cart",
            CartAction::IncrementQuantity(_) => "increment_quantity",
            CartAction::DecrementQuantity(_) => "decrement_quantity",
            CartAction::ToggleFavorite(_) => "toggle_favorite",
            CartAction::ApplyCoupon(_) => "apply_coupon",
            CartAction::ClearCoupon => "clear_coupon",
            CartAction::ClearCart => "clear_cart",
        }
    }
}
