//! Cart
//!
//! The interface the rest of the application talks to. Each mutator runs the
//! reducer and then writes the resulting state through [`CartPersistence`]
//! before returning.

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    actions::CartAction,
    persistence::{CartPersistence, PersistenceError},
    properties::{Property, PropertyId},
    reducer::CartReducer,
    state::{CartLine, CartState},
    storage::KeyValueStore,
    totals::{self, CartTotals, TotalsError},
};

/// Persisted shopping cart.
#[derive(Debug)]
pub struct Cart<S: KeyValueStore> {
    state: CartState,
    reducer: CartReducer,
    persistence: CartPersistence<S>,
}

impl<S: KeyValueStore> Cart<S> {
    /// Open the cart stored in `persistence`, or an empty one if nothing
    /// usable is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the store cannot be read.
    pub fn open(
        reducer: CartReducer,
        persistence: CartPersistence<S>,
    ) -> Result<Self, PersistenceError> {
        let state = persistence.load()?;

        Ok(Self {
            state,
            reducer,
            persistence,
        })
    }

    /// Apply `action` and persist the resulting state.
    ///
    /// The in-memory state has already moved on when a persistence error is
    /// returned; the next successful dispatch writes it out.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the new state cannot be written.
    pub fn dispatch(&mut self, action: CartAction) -> Result<(), PersistenceError> {
        let kind = action.kind();
        let state = std::mem::take(&mut self.state);

        self.state = self.reducer.reduce(state, action);

        debug!(
            action = kind,
            lines = self.state.items.len(),
            total_items = self.total_items(),
            "applied cart action"
        );

        self.persistence.save(&self.state)
    }

    /// Add one unit of `property`.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the new state cannot be written.
    pub fn add_to_cart(&mut self, property: Property) -> Result<(), PersistenceError> {
        self.dispatch(CartAction::AddToCart(property))
    }

    /// Remove the line for `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the new state cannot be written.
    pub fn remove_from_cart(&mut self, id: impl Into<PropertyId>) -> Result<(), PersistenceError> {
        self.dispatch(CartAction::RemoveFromCart(id.into()))
    }

    /// Request one more unit of `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the new state cannot be written.
    pub fn increment_quantity(
        &mut self,
        id: impl Into<PropertyId>,
    ) -> Result<(), PersistenceError> {
        self.dispatch(CartAction::IncrementQuantity(id.into()))
    }

    /// Request one fewer unit of `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the new state cannot be written.
    pub fn decrement_quantity(
        &mut self,
        id: impl Into<PropertyId>,
    ) -> Result<(), PersistenceError> {
        self.dispatch(CartAction::DecrementQuantity(id.into()))
    }

    /// Save or unsave `property` as a favorite.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the new state cannot be written.
    pub fn toggle_favorite(&mut self, property: Property) -> Result<(), PersistenceError> {
        self.dispatch(CartAction::ToggleFavorite(property))
    }

    /// Apply `code` and report whether it was accepted.
    ///
    /// A rejected code also removes any coupon applied earlier.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the new state cannot be written.
    pub fn apply_coupon(&mut self, code: impl Into<String>) -> Result<bool, PersistenceError> {
        self.dispatch(CartAction::ApplyCoupon(code.into()))?;

        Ok(self.state.coupon.is_some())
    }

    /// Remove the applied coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the new state cannot be written.
    pub fn clear_coupon(&mut self) -> Result<(), PersistenceError> {
        self.dispatch(CartAction::ClearCoupon)
    }

    /// Empty the cart, favorites included.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the new state cannot be written.
    pub fn clear_cart(&mut self) -> Result<(), PersistenceError> {
        self.dispatch(CartAction::ClearCart)
    }

    /// Current state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Cart lines.
    pub fn items(&self) -> &[CartLine] {
        &self.state.items
    }

    /// Favorites.
    pub fn saved_for_later(&self) -> &[Property] {
        &self.state.saved_for_later
    }

    /// Applied coupon code.
    pub fn coupon(&self) -> Option<&str> {
        self.state.coupon.as_deref()
    }

    /// Percentage granted by the applied coupon.
    pub fn discount(&self) -> u8 {
        self.state.discount
    }

    /// Sum of `price × quantity` over every line.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] if the lines cannot be totalled.
    pub fn subtotal(&self) -> Result<Decimal, TotalsError> {
        totals::subtotal(&self.state)
    }

    /// Subtotal less the coupon discount.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] if the lines cannot be totalled.
    pub fn total(&self) -> Result<Decimal, TotalsError> {
        Ok(self.totals()?.total)
    }

    /// Number of units across all lines.
    pub fn total_items(&self) -> u64 {
        totals::total_items(&self.state)
    }

    /// All derived values at once.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] if the lines cannot be totalled.
    pub fn totals(&self) -> Result<CartTotals, TotalsError> {
        CartTotals::from_state(&self.state)
    }

    /// Line for `id`, if it is in the cart.
    pub fn line(&self, id: &PropertyId) -> Option<&CartLine> {
        self.state.line(id)
    }

    /// Check whether `id` is in the cart.
    pub fn is_in_cart(&self, id: &PropertyId) -> bool {
        self.state.contains(id)
    }

    /// Check whether `id` is a favorite.
    pub fn is_favorite(&self, id: &PropertyId) -> bool {
        self.state.is_favorite(id)
    }

    /// Check whether adding `id` again would be capped.
    ///
    /// Properties not in the cart are never at their cap.
    pub fn is_at_max(&self, id: &PropertyId) -> bool {
        self.line(id).is_some_and(CartLine::is_at_max)
    }

    /// Reducer in use.
    pub fn reducer(&self) -> &CartReducer {
        &self.reducer
    }

    /// Release the persistence layer, discarding the in-memory state.
    pub fn into_persistence(self) -> CartPersistence<S> {
        self.persistence
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{coupons::CouponTable, storage::MemoryStore};

    use super::*;

    fn open_empty() -> Result<Cart<MemoryStore>, PersistenceError> {
        Cart::open(
            CartReducer::default(),
            CartPersistence::new(MemoryStore::new()),
        )
    }

    fn listing(id: i64, price: i64, units: u32) -> Property {
        Property::new(id, Decimal::from(price)).with_units(units)
    }

    fn reopen(cart: Cart<MemoryStore>) -> Result<Cart<MemoryStore>, PersistenceError> {
        Cart::open(CartReducer::default(), cart.into_persistence())
    }

    #[test]
    fn opens_empty_without_stored_cart() -> TestResult {
        let cart = open_empty()?;

        assert_eq!(cart.state(), &CartState::default());
        assert_eq!(cart.total_items(), 0);

        Ok(())
    }

    #[test]
    fn every_mutation_is_persisted() -> TestResult {
        let mut cart = open_empty()?;

        cart.add_to_cart(listing(1, 100, 3))?;
        cart.increment_quantity(1)?;
        cart.toggle_favorite(listing(2, 50, 1))?;
        cart.apply_coupon("vigilo10")?;

        let expected = cart.state().clone();
        let reopened = reopen(cart)?;

        assert_eq!(reopened.state(), &expected);
        assert_eq!(reopened.line(&PropertyId::from(1)).map(|l| l.quantity), Some(2));

        Ok(())
    }

    #[test]
    fn exposes_derived_values() -> TestResult {
        let mut cart = open_empty()?;

        cart.add_to_cart(listing(1, 100, 2))?;
        cart.add_to_cart(listing(1, 100, 2))?;
        cart.add_to_cart(listing(2, 50, 1))?;
        cart.apply_coupon("VIGILO10")?;

        assert_eq!(cart.subtotal()?, Decimal::from(250));
        assert_eq!(cart.total()?, Decimal::from(225));
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.totals()?.discount, Decimal::from(25));

        Ok(())
    }

    #[test]
    fn apply_coupon_reports_acceptance() -> TestResult {
        let mut cart = open_empty()?;

        assert!(cart.apply_coupon("vigilo10")?);
        assert_eq!(cart.coupon(), Some("VIGILO10"));
        assert_eq!(cart.discount(), 10);

        assert!(!cart.apply_coupon("bogus")?);
        assert_eq!(cart.coupon(), None);
        assert_eq!(cart.discount(), 0);

        Ok(())
    }

    #[test]
    fn coupon_table_comes_from_reducer() -> TestResult {
        let reducer = CartReducer::new(CouponTable::empty());
        let mut cart = Cart::open(reducer, CartPersistence::new(MemoryStore::new()))?;

        assert!(!cart.apply_coupon("VIGILO10")?);
        assert!(cart.reducer().coupons().is_empty());

        Ok(())
    }

    #[test]
    fn membership_helpers() -> TestResult {
        let mut cart = open_empty()?;
        let one = PropertyId::from(1);
        let two = PropertyId::from(2);

        cart.add_to_cart(listing(1, 10, 2))?;
        cart.toggle_favorite(listing(2, 10, 1))?;

        assert!(cart.is_in_cart(&one));
        assert!(!cart.is_in_cart(&two));
        assert!(cart.is_favorite(&two));
        assert!(!cart.is_at_max(&one));
        assert!(!cart.is_at_max(&two));

        cart.increment_quantity(1)?;

        assert!(cart.is_at_max(&one));

        Ok(())
    }

    #[test]
    fn decrement_and_remove() -> TestResult {
        let mut cart = open_empty()?;

        cart.add_to_cart(listing(1, 10, 2))?;
        cart.add_to_cart(listing(2, 10, 2))?;
        cart.decrement_quantity(1)?;
        cart.remove_from_cart(2)?;

        assert!(cart.items().is_empty());
        assert!(reopen(cart)?.items().is_empty());

        Ok(())
    }

    #[test]
    fn clear_coupon_and_clear_cart() -> TestResult {
        let mut cart = open_empty()?;

        cart.add_to_cart(listing(1, 10, 1))?;
        cart.toggle_favorite(listing(9, 10, 1))?;
        cart.apply_coupon("vigilo10")?;
        cart.clear_coupon()?;

        assert_eq!(cart.coupon(), None);
        assert_eq!(cart.items().len(), 1);

        cart.clear_cart()?;

        assert_eq!(cart.state(), &CartState::default());
        assert!(cart.saved_for_later().is_empty());
        assert_eq!(reopen(cart)?.state(), &CartState::default());

        Ok(())
    }

    #[test]
    fn text_ids_work_through_the_facade() -> TestResult {
        let mut cart = open_empty()?;

        cart.add_to_cart(Property::new("lekki-4", Decimal::from(7)).with_units(2))?;
        cart.increment_quantity("lekki-4")?;

        assert_eq!(cart.total_items(), 2);

        Ok(())
    }
}
