//! Newtype IDs for type-safe product references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing identifiers from different sources.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `Display` and `Borrow<str>` implementations
///
/// # Example
///
/// ```rust
/// # use cart_upsells_core::define_id;
/// define_id!(HandleId);
/// define_id!(VariantKey);
///
/// let handle = HandleId::new("socks");
/// let variant = VariantKey::new("socks");
///
/// // These are different types, so this won't compile:
/// // let _: HandleId = variant;
/// assert_eq!(handle.as_str(), variant.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
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
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
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

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::core::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// The `<identifier>` segment of a `/products/<identifier>` path. Cart markup
// tags line items with the same value.
define_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display_and_borrow() {
        let id = ProductId::new("wool-socks");
        assert_eq!(id.to_string(), "wool-socks");

        let set: std::collections::HashSet<ProductId> = [id.clone()].into_iter().collect();
        assert!(set.contains("wool-socks"));
    }

    #[test]
    fn test_product_id_serde_transparent() {
        let id = ProductId::from("123");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"123\"");
    }
}
