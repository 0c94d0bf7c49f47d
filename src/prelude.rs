//! Vigilo Cart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    actions::CartAction,
    cart::Cart,
    coupons::{CouponTable, CouponTableError},
    persistence::{CartPersistence, DEFAULT_STORAGE_KEY, PersistenceError},
    properties::{Property, PropertyId},
    reducer::CartReducer,
    state::{CartLine, CartState, StateValidationError},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
    summary::{SummaryError, write_summary},
    totals::{CartTotals, MoneyTotals, TotalsError},
};
