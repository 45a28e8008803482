//! Newtype IDs for type-safe entity references.
//!
//! Farms and products share the same integer id space in the backing store,
//! so a bare `i32` makes it easy to look a farm id up in the product list.
//! `define_id!` gives each entity its own type.

/// Macro to define a type-safe ID wrapper around `i32`.
///
/// The generated type is `Copy`, hashable, ordered, serializes as a bare
/// number (`#[serde(transparent)]`) and converts to and from `i32`.
///
/// # Example
///
/// ```rust
/// # use harvest_home_core::define_id;
/// define_id!(BasketId);
/// define_id!(ShelfId);
///
/// let basket = BasketId::new(7);
/// assert_eq!(basket.as_i32(), 7);
///
/// // Different types, so this won't compile:
/// // let _: ShelfId = basket;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(FarmId);
define_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_bare_number() {
        let json = serde_json::to_string(&ProductId::new(101)).unwrap_or_default();
        assert_eq!(json, "101");

        let parsed: FarmId = serde_json::from_str("3").unwrap_or(FarmId::new(0));
        assert_eq!(parsed, FarmId::new(3));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ProductId::new(9999).to_string(), "9999");
    }

    #[test]
    fn test_id_conversions() {
        let id: FarmId = 12.into();
        let raw: i32 = id.into();
        assert_eq!(raw, 12);
    }
}
