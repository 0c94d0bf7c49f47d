//! Vigilo Cart
//!
//! Shopping cart state for the Vigilo property marketplace: cart lines capped
//! at each listing's available units, a favorites list and percentage coupons.
//! The state changes only through [`actions::CartAction`]s applied by a pure
//! [`reducer::CartReducer`], and [`cart::Cart`] writes the whole state to a
//! [`storage::KeyValueStore`] after every change.

pub mod actions;
pub mod cart;
pub mod coupons;
pub mod observability;
pub mod persistence;
pub mod prelude;
pub mod properties;
pub mod reducer;
pub mod state;
pub mod storage;
pub mod summary;
pub mod totals;
