//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` so map
//! ids coming from the environment can be wrapped directly.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an agent in the simulation.  Max ~4.3 billion agents.
    pub struct AgentId(u32);
}

typed_id! {
    /// Area of Interest: a discretized addressable zone of the map.
    pub struct AoiId(u32);
}

typed_id! {
    /// Point of Interest: a concrete venue located inside an AOI.
    pub struct PoiId(u32);
}

impl AoiId {
    /// `true` for ids that may be used as a travel destination.
    ///
    /// Zero is never issued by the map and the `INVALID` sentinel marks an
    /// unset field.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 != 0 && self != AoiId::INVALID
    }

    /// Wrap a raw id decoded from external text, rejecting non-positive and
    /// out-of-range values.
    pub fn from_raw(raw: i64) -> Option<AoiId> {
        u32::try_from(raw).ok().map(AoiId).filter(|id| id.is_valid())
    }
}
