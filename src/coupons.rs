//! Coupons

use std::{collections::hash_map::Entry, fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

/// Code accepted by every cart.
pub const DEFAULT_COUPON: (&str, u8) = ("VIGILO10", 10);

/// Errors raised while loading a coupon table.
#[derive(Debug, Error)]
pub enum CouponTableError {
    /// IO error reading the coupon file
    #[error("Failed to read coupon file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A coupon grants more than 100%
    #[error("Coupon {code} grants {percent}%, which is more than 100%")]
    PercentOutOfRange {
        /// Offending code
        code: String,
        /// Configured percentage
        percent: u8,
    },

    /// Two keys name the same code once case is ignored
    #[error("Coupon {code} is defined more than once")]
    DuplicateCode {
        /// Normalized code
        code: String,
    },
}

/// Coupon file layout.
#[derive(Debug, Deserialize)]
struct CouponsFile {
    coupons: FxHashMap<String, u8>,
}

/// Fixed lookup from coupon code to percentage discount.
///
/// Codes are stored uppercased and matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponTable {
    codes: FxHashMap<String, u8>,
}

impl Default for CouponTable {
    fn default() -> Self {
        let (code, percent) = DEFAULT_COUPON;

        [(code, percent)].into_iter().collect()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u8)> for CouponTable {
    fn from_iter<I: IntoIterator<Item = (S, u8)>>(iter: I) -> Self {
        Self {
            codes: iter
                .into_iter()
                .map(|(code, percent)| (normalize(code.as_ref()), percent))
                .collect(),
        }
    }
}

impl CouponTable {
    /// Create a table with no valid codes.
    pub fn empty() -> Self {
        Self {
            codes: FxHashMap::default(),
        }
    }

    /// Parse a table from YAML of the form `coupons: { CODE: percent }`.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponTableError`] if the YAML is invalid, a code grants
    /// more than 100% or two keys differ only in case.
    pub fn from_yaml(yaml: &str) -> Result<Self, CouponTableError> {
        let file: CouponsFile = serde_norway::from_str(yaml)?;
        let mut codes = FxHashMap::default();

        for (code, percent) in file.coupons {
            if percent > 100 {
                return Err(CouponTableError::PercentOutOfRange { code, percent });
            }

            match codes.entry(normalize(&code)) {
                Entry::Occupied(entry) => {
                    return Err(CouponTableError::DuplicateCode {
                        code: entry.key().clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(percent);
                }
            }
        }

        Ok(Self { codes })
    }

    /// Load a table from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponTableError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CouponTableError> {
        let yaml = fs::read_to_string(path)?;

        Self::from_yaml(&yaml)
    }

    /// Merge this table over the built-in codes. Codes present in both keep
    /// this table's percentage.
    #[must_use]
    pub fn with_defaults(self) -> Self {
        let mut merged = Self::default();

        merged.codes.extend(self.codes);

        merged
    }

    /// Percentage granted by `code`, ignoring case.
    pub fn lookup(&self, code: &str) -> Option<u8> {
        self.codes.get(&normalize(code)).copied()
    }

    /// Number of valid codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if no codes are valid.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Canonical form of a coupon code.
pub fn normalize(code: &str) -> String {
    code.to_uppercase()
}
