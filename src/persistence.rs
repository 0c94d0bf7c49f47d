//! Persistence
//!
//! Binds a [`KeyValueStore`] to the key holding the cart document. The whole
//! state is written on every save; nothing is diffed or batched.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    state::CartState,
    storage::{KeyValueStore, StorageError},
};

/// Key the cart document is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "cart";

/// Persistence Errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Wrapped storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The state could not be encoded as JSON.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes the cart document in a store.
#[derive(Debug)]
pub struct CartPersistence<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Persist under [`DEFAULT_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Key the cart is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Read the stored cart.
    ///
    /// A missing document yields the empty cart. So does a document that is
    /// not valid JSON, does not have the cart's shape or breaks a cart
    /// invariant; those cases are logged and the stored value is left as is
    /// until the next save replaces it.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the store cannot be read.
    #[tracing::instrument(name = "cart.persistence.load", skip(self), fields(key = %self.key), err)]
    pub fn load(&self) -> Result<CartState, PersistenceError> {
        let Some(raw) = self.store.get(&self.key)? else {
            debug!("no stored cart, starting empty");

            return Ok(CartState::default());
        };

        let state = match serde_json::from_str::<CartState>(&raw) {
            Ok(state) => state,
            Err(error) => {
                warn!(%error, "stored cart is malformed, starting empty");

                return Ok(CartState::default());
            }
        };

        if let Err(error) = state.validate() {
            warn!(%error, "stored cart is inconsistent, starting empty");

            return Ok(CartState::default());
        }

        debug!(lines = state.items.len(), "loaded stored cart");

        Ok(state)
    }

    /// Overwrite the stored cart with `state`.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the state cannot be encoded or the
    /// store cannot be written.
    #[tracing::instrument(
        name = "cart.persistence.save",
        skip(self, state),
        fields(key = %self.key, lines = state.items.len()),
        err
    )]
    pub fn save(&mut self, state: &CartState) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(state)?;

        self.store.set(&self.key, &raw)?;

        Ok(())
    }

    /// Delete the stored cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the store cannot be written.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(&self.key)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        properties::Property,
        state::CartLine,
        storage::MemoryStore,
    };

    use super::*;

    fn populated() -> CartState {
        let mut line = CartLine::new(
            Property::new(12, Decimal::new(4_500_000, 0))
                .with_units(4)
                .with_detail("title", "Terrace, Lekki"),
        );
        line.quantity = 3;

        CartState {
            items: vec![line, CartLine::new(Property::new("plot-9", Decimal::new(1999, 1)))],
            saved_for_later: vec![Property::new(40, Decimal::from(80_000)).with_detail("beds", 3)],
            coupon: Some("VIGILO10".to_string()),
            discount: 10,
        }
    }

    #[test]
    fn load_without_document_is_empty() -> TestResult {
        let persistence = CartPersistence::new(MemoryStore::new());

        assert_eq!(persistence.load()?, CartState::default());

        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> TestResult {
        let state = populated();
        let mut persistence = CartPersistence::new(MemoryStore::new());

        persistence.save(&state)?;

        let reopened = CartPersistence::new(persistence.into_store());

        assert_eq!(reopened.load()?, state);

        Ok(())
    }

    #[test]
    fn save_writes_whole_document_under_key() -> TestResult {
        let mut persistence = CartPersistence::with_key(MemoryStore::new(), "vigilo-cart");

        persistence.save(&CartState::default())?;

        let raw = persistence.store().get("vigilo-cart")?.unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&raw)?;

        assert_eq!(
            value,
            json!({ "items": [], "savedForLater": [], "coupon": null, "discount": 0 })
        );
        assert_eq!(persistence.store().get(DEFAULT_STORAGE_KEY)?, None);

        Ok(())
    }

    #[test]
    fn load_accepts_document_written_by_web_client() -> TestResult {
        let mut store = MemoryStore::new();

        store.set(
            DEFAULT_STORAGE_KEY,
            r#"{
                "items": [
                    { "id": 3, "title": "Studio", "price": 250000, "units": 2, "quantity": 2, "maxUnits": 2 }
                ],
                "savedForLater": [ { "id": "x9", "price": 10 } ],
                "coupon": null,
                "discount": 0
            }"#,
        )?;

        let state = CartPersistence::new(store).load()?;

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items.first().map(|line| line.quantity), Some(2));
        assert_eq!(state.saved_for_later.len(), 1);

        Ok(())
    }

    #[test]
    fn load_malformed_json_falls_back_to_empty() -> TestResult {
        let mut store = MemoryStore::new();

        store.set(DEFAULT_STORAGE_KEY, "{not json")?;

        assert_eq!(CartPersistence::new(store).load()?, CartState::default());

        Ok(())
    }

    #[test]
    fn load_wrong_shape_falls_back_to_empty() -> TestResult {
        let mut store = MemoryStore::new();

        store.set(DEFAULT_STORAGE_KEY, r#"{ "items": "none" }"#)?;

        assert_eq!(CartPersistence::new(store).load()?, CartState::default());

        Ok(())
    }

    #[test]
    fn load_inconsistent_state_falls_back_to_empty() -> TestResult {
        let mut store = MemoryStore::new();

        store.set(
            DEFAULT_STORAGE_KEY,
            r#"{
                "items": [ { "id": 1, "price": 5, "quantity": 0, "maxUnits": 1 } ],
                "savedForLater": [],
                "coupon": null,
                "discount": 0
            }"#,
        )?;

        assert_eq!(CartPersistence::new(store).load()?, CartState::default());

        Ok(())
    }

    #[test]
    fn load_leaves_malformed_document_in_place() -> TestResult {
        let mut store = MemoryStore::new();

        store.set(DEFAULT_STORAGE_KEY, "[]")?;

        let persistence = CartPersistence::new(store);

        persistence.load()?;

        assert_eq!(
            persistence.store().get(DEFAULT_STORAGE_KEY)?.as_deref(),
            Some("[]")
        );

        Ok(())
    }

    #[test]
    fn clear_removes_document() -> TestResult {
        let mut persistence = CartPersistence::new(MemoryStore::new());

        persistence.save(&populated())?;
        persistence.clear()?;

        assert_eq!(persistence.store().get(DEFAULT_STORAGE_KEY)?, None);
        assert_eq!(persistence.load()?, CartState::default());

        Ok(())
    }
}
