//! Cart State

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    properties::{Property, PropertyId},
    totals::{self, TotalsError},
};

/// Keys a line writes next to its property's fields.
const LINE_FIELDS: [&str; 2] = ["quantity", "maxUnits"];

/// Reasons a cart snapshot read back from storage cannot be trusted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateValidationError {
    /// Two cart lines share the same property id.
    #[error("cart contains more than one line for property {0}")]
    DuplicateLine(PropertyId),

    /// Two favorites share the same property id.
    #[error("favorites contain property {0} more than once")]
    DuplicateFavorite(PropertyId),

    /// A line has a unit cap of zero.
    #[error("line for property {0} has no available units")]
    ZeroMaxUnits(PropertyId),

    /// A line quantity is outside `1..=max_units`.
    #[error("line for property {id} has quantity {quantity}, expected 1..={max_units}")]
    QuantityOutOfRange {
        /// Property id of the offending line
        id: PropertyId,
        /// Stored quantity
        quantity: u32,
        /// Stored unit cap
        max_units: u32,
    },

    /// The stored discount is not a percentage.
    #[error("discount of {0}% is out of range")]
    DiscountOutOfRange(u8),

    /// A discount is stored without the coupon that grants it.
    #[error("discount of {0}% has no coupon")]
    DiscountWithoutCoupon(u8),

    /// The lines cannot be totalled.
    #[error(transparent)]
    Totals(#[from] TotalsError),
}

/// One property in the cart together with the number of units requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Snapshot of the property taken when it was first added. Its details
    /// never carry `quantity` or `maxUnits`; the line's own fields win.
    #[serde(flatten)]
    pub property: Property,

    /// Units requested, always within `1..=max_units`
    pub quantity: u32,

    /// Units available when the property was added
    pub max_units: u32,
}

impl CartLine {
    /// Start a new line with a single unit.
    ///
    /// The unit cap is the property's `units`, or 1 when the listing does not
    /// say. A listing advertising zero units is still capped at 1 so the new
    /// line is valid.
    ///
    /// Listing fields named like the line's own fields are dropped.
    pub fn new(mut property: Property) -> Self {
        let max_units = property.units.unwrap_or(1).max(1);

        for key in LINE_FIELDS {
            property.details.remove(key);
        }

        Self {
            property,
            quantity: 1,
            max_units,
        }
    }

    /// Property id of the line.
    pub fn id(&self) -> &PropertyId {
        &self.property.id
    }

    /// Unit price snapshot.
    pub fn price(&self) -> Decimal {
        self.property.price
    }

    /// Price of all requested units, or `None` if it overflows.
    pub fn line_total(&self) -> Option<Decimal> {
        self.property.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Whether the quantity has reached the unit cap.
    pub fn is_at_max(&self) -> bool {
        self.quantity >= self.max_units
    }
}

/// Complete cart state, persisted as a single JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Cart lines in the order they were added
    pub items: Vec<CartLine>,

    /// Favorites, independent of cart membership
    pub saved_for_later: Vec<Property>,

    /// Applied coupon code, uppercased
    pub coupon: Option<String>,

    /// Percentage granted by `coupon`
    pub discount: u8,
}

impl CartState {
    /// Find the line for a property.
    pub fn line(&self, id: &PropertyId) -> Option<&CartLine> {
        self.items.iter().find(|line| line.id() == id)
    }

    /// Check whether a property is in the cart.
    pub fn contains(&self, id: &PropertyId) -> bool {
        self.line(id).is_some()
    }

    /// Check whether a property is saved as a favorite.
    pub fn is_favorite(&self, id: &PropertyId) -> bool {
        self.saved_for_later.iter().any(|property| property.id == *id)
    }

    /// Check whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check the invariants every state produced by the reducer upholds.
    ///
    /// # Errors
    ///
    /// Returns the first [`StateValidationError`] found.
    pub fn validate(&self) -> Result<(), StateValidationError> {
        let mut line_ids = FxHashSet::default();

        for line in &self.items {
            if !line_ids.insert(line.id()) {
                return Err(StateValidationError::DuplicateLine(line.id().clone()));
            }

            if line.max_units == 0 {
                return Err(StateValidationError::ZeroMaxUnits(line.id().clone()));
            }

            if line.quantity == 0 || line.quantity > line.max_units {
                return Err(StateValidationError::QuantityOutOfRange {
                    id: line.id().clone(),
                    quantity: line.quantity,
                    max_units: line.max_units,
                });
            }
        }

        let mut favorite_ids = FxHashSet::default();

        for property in &self.saved_for_later {
            if !favorite_ids.insert(&property.id) {
                return Err(StateValidationError::DuplicateFavorite(property.id.clone()));
            }
        }

        if self.discount > 100 {
            return Err(StateValidationError::DiscountOutOfRange(self.discount));
        }

        if self.coupon.is_none() && self.discount != 0 {
            return Err(StateValidationError::DiscountWithoutCoupon(self.discount));
        }

        totals::subtotal(self)?;

        Ok(())
    }
}
