//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. All entities are
//! keyed by UUIDs; the short-lived device identity and the long-lived guest
//! identity get their own types so a handler cannot swap them silently.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use serde::{Deserialize, Serialize};

/// Length of the externally shared basket token.
const BASKET_TOKEN_LEN: usize = 22;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `Uuid` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `generate()`, `as_uuid()`
/// - `From<Uuid>` and `Into<Uuid>` implementations
/// - `FromStr` parsing from the hyphenated form
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use tadka_core::define_id;
/// define_id!(DeviceId);
/// define_id!(OrderId);
///
/// let device_id = DeviceId::generate();
/// let order_id = OrderId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: DeviceId = order_id;
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Create an ID from an existing UUID.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random (v4) ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Get the underlying UUID value.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Ok(Self(s.parse::<::uuid::Uuid>()?))
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <::uuid::Uuid as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <::uuid::Uuid as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Define standard entity IDs
define_id!(SessionId);
define_id!(DeviceId);
define_id!(GuestId);
define_id!(CartId);
define_id!(OrderId);
define_id!(ProfileId);
define_id!(MenuItemId);
define_id!(CategoryId);

/// Opaque handle for a cart, shared with the external checkout surface.
///
/// Derived once from the cart's UUID at creation time and stable for the
/// cart's lifetime. A cart deleted via the empty flag loses its token; the
/// next cart write mints a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasketId(String);

impl BasketId {
    /// Derive the basket token for a cart.
    ///
    /// Base64-encodes the hyphenated UUID string, strips the characters that
    /// are unsafe in URLs and cookies (`+`, `/`, `=`), and truncates to a
    /// fixed 22-character token.
    #[must_use]
    pub fn for_cart(cart_id: CartId) -> Self {
        let encoded = STANDARD_NO_PAD.encode(cart_id.as_uuid().to_string());
        let token: String = encoded
            .chars()
            .filter(|c| *c != '+' && *c != '/')
            .take(BASKET_TOKEN_LEN)
            .collect();
        Self(token)
    }

    /// Wrap a token received from a client.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BasketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for BasketId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for BasketId {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let token = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(token))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for BasketId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

/// Format a sequential counter value as a human-readable display ID.
///
/// The prefix identifies the entity type (`B` for orders, `S` for sessions,
/// `U` for customer profiles); the sequence is zero-padded to eight digits,
/// e.g. `B00000042`.
#[must_use]
pub fn display_id(prefix: char, seq: i64) -> String {
    format!("{prefix}{seq:08}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_types() {
        let device = DeviceId::generate();
        let round_trip: DeviceId = device.to_string().parse().unwrap();
        assert_eq!(device, round_trip);
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = OrderId::new(uuid::Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }

    #[test]
    fn test_basket_token_is_stable_and_fixed_length() {
        let cart_id = CartId::generate();
        let a = BasketId::for_cart(cart_id);
        let b = BasketId::for_cart(cart_id);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 22);
    }

    #[test]
    fn test_basket_token_has_no_unsafe_chars() {
        for _ in 0..64 {
            let token = BasketId::for_cart(CartId::generate());
            assert!(!token.as_str().contains('+'));
            assert!(!token.as_str().contains('/'));
            assert!(!token.as_str().contains('='));
        }
    }

    #[test]
    fn test_basket_tokens_differ_per_cart() {
        let a = BasketId::for_cart(CartId::generate());
        let b = BasketId::for_cart(CartId::generate());
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_id_padding() {
        assert_eq!(display_id('B', 1), "B00000001");
        assert_eq!(display_id('S', 42), "S00000042");
        assert_eq!(display_id('U', 123_456_789), "U123456789");
    }
}
