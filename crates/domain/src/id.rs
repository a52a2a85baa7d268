//! Typed identifier and position newtypes.
//!
//! Positions index the trigger-type catalogue and a type's sub-variants.
//! Both are 1-based; `0` is representable so that stale or corrupt values
//! coming back from the host can be carried around and rejected at
//! resolution time instead of at parse time.
//!
//! References are integer identities owned by the host (trigger uid, owning
//! rule, referenced device/feature). This crate never interprets them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_position {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw 1-based position.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Access the raw position.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }

            /// Zero-based index for this position, `None` when the position is `0`.
            #[must_use]
            pub fn index(self) -> Option<usize> {
                usize::try_from(self.0).ok()?.checked_sub(1)
            }

            /// Build the position addressing a zero-based index.
            ///
            /// Returns `None` when the index does not fit a `u32` position.
            #[must_use]
            pub fn from_index(index: usize) -> Option<Self> {
                u32::try_from(index).ok()?.checked_add(1).map(Self)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

macro_rules! define_ref {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw host identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Access the raw host identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

define_position!(
    /// 1-based position of a trigger type in the catalogue.
    TypePosition
);

define_position!(
    /// 1-based position of a sub-variant within a trigger type. `0` means "none selected".
    SubVariantPosition
);

impl SubVariantPosition {
    /// The "no sub-variant" position.
    pub const NONE: Self = Self(0);

    /// Whether a sub-variant is selected at all.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

define_ref!(
    /// Host-assigned unique identifier of a configured trigger.
    TriggerUid
);

define_ref!(
    /// Host reference to the automation rule that owns a trigger.
    OwnerRef
);

define_ref!(
    /// Host reference to an external device or feature a trigger may depend on.
    EntityRef
);
