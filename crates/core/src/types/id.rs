//! Newtype IDs for type-safe entity references.
//!
//! The commerce backend uses two kinds of identifiers:
//! - numeric ids for locations, orders, categories, and tags (`define_id!`)
//! - opaque string keys for products, variants, and shops (`define_key!`)
//!
//! Both macros produce distinct types so that, for example, a `StateId`
//! can never be passed where a `CityId` is expected.

/// Macro to define a type-safe numeric ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>`, `Into<i64>`, `Display`, and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use orderain_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(ShelfId);
///
/// let warehouse = WarehouseId::new(1);
/// let shelf = ShelfId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = shelf;
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
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
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
    };
}

/// Macro to define a type-safe string key wrapper.
///
/// The backend hands out product and variant identifiers as opaque values;
/// they are compared by exact string equality and never parsed.
///
/// # Example
///
/// ```rust
/// # use orderain_core::define_key;
/// define_key!(SkuKey);
///
/// let sku = SkuKey::new("abc-123");
/// assert_eq!(sku.as_str(), "abc-123");
/// ```
#[macro_export]
macro_rules! define_key {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new key from anything string-like.
            #[must_use]
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the key and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Numeric backend identifiers
define_id!(CountryId);
define_id!(StateId);
define_id!(CityId);
define_id!(OrderId);
define_id!(CategoryId);
define_id!(TagId);

// Opaque backend keys
define_key!(ProductId);
define_key!(VariantId);
define_key!(ShopId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id_roundtrips_through_json_as_plain_number() {
        let id = CountryId::new(42);
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("42"));

        let parsed: CityId = serde_json::from_str("7").unwrap_or(CityId::new(0));
        assert_eq!(parsed.as_i64(), 7);
    }

    #[test]
    fn test_numeric_id_from_str_trims_whitespace() {
        assert_eq!(" 12 ".parse::<StateId>().ok(), Some(StateId::new(12)));
        assert!("twelve".parse::<StateId>().is_err());
    }

    #[test]
    fn test_string_key_serializes_transparently() {
        let product = ProductId::new("p-1");
        assert_eq!(
            serde_json::to_string(&product).ok().as_deref(),
            Some("\"p-1\"")
        );
        assert_eq!(product.to_string(), "p-1");
    }

    #[test]
    fn test_string_keys_compare_exactly() {
        assert_eq!(VariantId::from("v1"), VariantId::new(String::from("v1")));
        assert_ne!(VariantId::from("v1"), VariantId::from("V1"));
    }
}
