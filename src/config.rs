//! CLI configuration

use std::path::PathBuf;

use clap::Args;
use vigilo_cart::{
    coupons::{CouponTable, CouponTableError},
    persistence::DEFAULT_STORAGE_KEY,
};

/// Where the cart document lives.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory holding the persisted cart
    #[arg(long, env = "VIGILO_CART_DIR", default_value = ".vigilo")]
    pub data_dir: PathBuf,

    /// Key the cart is stored under
    #[arg(long, env = "VIGILO_CART_KEY", default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,
}

/// Coupons and display currency.
#[derive(Debug, Args)]
pub(crate) struct PricingConfig {
    /// YAML file of extra coupon codes (`coupons: { CODE: percent }`)
    #[arg(long, env = "VIGILO_COUPONS")]
    pub coupons: Option<PathBuf>,

    /// ISO 4217 code used to display prices
    #[arg(long, env = "VIGILO_CURRENCY", default_value = "USD")]
    pub currency: String,
}

impl PricingConfig {
    /// Built-in coupons, extended by the configured file if any.
    pub(crate) fn coupon_table(&self) -> Result<CouponTable, CouponTableError> {
        match &self.coupons {
            Some(path) => Ok(CouponTable::load(path)?.with_defaults()),
            None => Ok(CouponTable::default()),
        }
    }
}
