//! `coupon` subcommands

use std::io::Write;

use clap::{Args, Subcommand};
use vigilo_cart::{cart::Cart, storage::KeyValueStore};

use crate::cli::CliError;

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Apply a coupon code
    Apply {
        /// Coupon code, any case
        code: String,
    },

    /// Remove the applied coupon
    Clear,
}

pub(crate) fn run<S: KeyValueStore>(
    command: CouponCommand,
    cart: &mut Cart<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command.command {
        CouponSubcommand::Apply { code } => {
            if cart.apply_coupon(code.as_str())? {
                writeln!(
                    out,
                    "applied coupon {} ({}% off)",
                    cart.coupon().unwrap_or_default(),
                    cart.discount()
                )?;
            } else {
                writeln!(out, "coupon {code} is not valid")?;
            }
        }
        CouponSubcommand::Clear => cart.clear_coupon()?,
    }

    Ok(())
}
