//! Command-line interface
//!
//! Each invocation opens the stored cart, applies one command and prints the
//! resulting cart.

use std::{io, path::PathBuf};

use clap::{Parser, Subcommand};
use rusty_money::iso;
use thiserror::Error;
use vigilo_cart::{
    cart::Cart,
    coupons::CouponTableError,
    observability::LoggingConfig,
    persistence::{CartPersistence, PersistenceError},
    properties::PropertyId,
    reducer::CartReducer,
    state::CartState,
    storage::FileStore,
    summary::{SummaryError, write_summary},
};

use crate::config::{PricingConfig, StorageConfig};

mod coupon;
mod property;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Coupons(#[from] CouponTableError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("no property given; use --property or --file")]
    MissingProperty,

    #[error("failed to read property file {path}: {source}")]
    PropertyFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid property record: {0}")]
    Property(#[source] serde_json::Error),
}

#[derive(Debug, Parser)]
#[command(name = "vigilo-cart", about = "Vigilo cart CLI", long_about = None)]
pub(crate) struct Cli {
    /// Storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Coupon and currency settings.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the cart
    Show,

    /// Add one unit of a property
    Add(property::PropertyArgs),

    /// Remove a property from the cart
    Remove {
        /// Property id
        id: PropertyId,
    },

    /// Request one more unit of a property
    Increment {
        /// Property id
        id: PropertyId,
    },

    /// Request one fewer unit of a property
    Decrement {
        /// Property id
        id: PropertyId,
    },

    /// Save or unsave a property as a favorite
    Favorite(property::PropertyArgs),

    /// Apply or clear a coupon
    Coupon(coupon::CouponCommand),

    /// Empty the cart, favorites and coupon
    Clear,

    /// Delete the stored cart document
    Reset,
}

impl Cli {
    /// Run the selected command against the stored cart, then print the cart.
    pub(crate) fn run(self, mut out: impl io::Write) -> Result<(), CliError> {
        let currency = iso::find(&self.pricing.currency.to_uppercase())
            .ok_or_else(|| CliError::UnknownCurrency(self.pricing.currency.clone()))?;

        let reducer = CartReducer::new(self.pricing.coupon_table()?);
        let persistence = CartPersistence::with_key(
            FileStore::new(&self.storage.data_dir),
            self.storage.storage_key.as_str(),
        );

        let mut cart = Cart::open(reducer, persistence)?;

        match self.command {
            Commands::Show => {}
            Commands::Add(args) => {
                let property = args.into_property()?;

                if cart.is_at_max(&property.id) {
                    writeln!(
                        out,
                        "all available units of {} are already in the cart",
                        property.id
                    )?;
                }

                cart.add_to_cart(property)?;
            }
            Commands::Remove { id } => cart.remove_from_cart(id)?,
            Commands::Increment { id } => {
                if cart.is_at_max(&id) {
                    writeln!(out, "all available units of {id} are already in the cart")?;
                }

                cart.increment_quantity(id)?;
            }
            Commands::Decrement { id } => cart.decrement_quantity(id)?,
            Commands::Favorite(args) => cart.toggle_favorite(args.into_property()?)?,
            Commands::Coupon(command) => coupon::run(command, &mut cart, &mut out)?,
            Commands::Clear => cart.clear_cart()?,
            Commands::Reset => {
                cart.into_persistence().clear()?;

                write_summary(out, &CartState::default(), currency)?;

                return Ok(());
            }
        }

        write_summary(out, cart.state(), currency)?;

        Ok(())
    }
}
