//! Typed IDs for type-safe entity references.
//!
//! Every identifier in the ledger is a positive integer assigned either by the
//! caller (account numbers) or by the store (vouchers, line items). Wrapping
//! them prevents passing a `VoucherId` where an `AccountNo` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed integer ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an ID from a raw integer.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the inner integer.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Returns true if the ID is strictly positive.
            #[must_use]
            pub const fn is_positive(self) -> bool {
                self.0 > 0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(UserId, "Identifier of the authenticated caller.");
typed_id!(AccountNo, "Chart of accounts number (caller-assigned).");
typed_id!(VoucherId, "Store-assigned identifier for a voucher.");
typed_id!(LineItemId, "Store-assigned identifier for a voucher line item.");
typed_id!(ProjectId, "Optional project reference on a line item.");
typed_id!(CostCenterId, "Optional cost-center reference on a line item.");
