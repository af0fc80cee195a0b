//! Typed ID wrappers providing compile-time safety for entity identifiers.
//!
//! Identifiers are generated by the database (`INTEGER PRIMARY KEY`), so each
//! ID type is a newtype over `i64` rather than a random UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generate a newtype ID wrapper over `i64`.
///
/// The macro produces a struct with:
/// - `get()` returning the raw row id
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`, `Serialize`, `Deserialize`
/// - `Display` and `FromStr` delegating to the inner integer
/// - `From<i64>` and `Into<i64>` conversions
macro_rules! typed_id {
    ($($(#[doc = $doc:expr])* $name:ident),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(i64);

            impl $name {
                /// Return the raw row id.
                #[must_use]
                pub fn get(&self) -> i64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = std::num::ParseIntError;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    s.trim().parse::<i64>().map(Self)
                }
            }

            impl From<i64> for $name {
                fn from(id: i64) -> Self {
                    Self(id)
                }
            }

            impl From<$name> for i64 {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

typed_id! {
    /// Unique identifier for a product listing.
    ProductId,
    /// Unique identifier for a stored product image.
    ImageId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_i64() {
        let id = ProductId::from(17);
        let back: i64 = id.into();
        assert_eq!(back, 17);
        assert_eq!(id.get(), 17);
    }

    #[test]
    fn display_and_from_str() {
        let id = ImageId::from(305);
        let s = id.to_string();
        assert_eq!(s, "305");
        let parsed: ImageId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn invalid_from_str() {
        assert!(ProductId::from_str("not-a-number").is_err());
        assert!(ProductId::from_str("").is_err());
    }

    #[test]
    fn serializes_as_plain_integer() {
        let id = ProductId::from(9);
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");
        let back: ProductId = serde_json::from_str("9").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn ordering_follows_row_id() {
        let mut ids = vec![ProductId::from(3), ProductId::from(1), ProductId::from(2)];
        ids.sort();
        assert_eq!(ids, vec![ProductId::from(1), ProductId::from(2), ProductId::from(3)]);
    }
}
