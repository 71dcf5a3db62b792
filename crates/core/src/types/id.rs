//! Typed entity identifiers.

/// Declares a newtype over the serial `i32` key of one database table.
///
/// Each generated type serializes transparently as its number, carries the
/// usual value-type derives, converts to and from `i32`, and (with the
/// `postgres` feature) binds directly in sqlx queries. Wrapping every key
/// in its own type keeps a `ProductId` from ever being passed where a
/// `UserId` belongs.
///
/// ```
/// # use sred_core::define_id;
/// define_id!(InvoiceId);
///
/// let id = InvoiceId::new(7);
/// assert_eq!(i32::from(id), 7);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);
define_id!(PromoId);
define_id!(StickerCatalogId);
define_id!(MessageId);
define_id!(SettingsId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_both_ways() {
        let id = ProductId::new(42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(ProductId::from(42), id);
    }

    #[test]
    fn test_displays_as_the_bare_number() {
        assert_eq!(UserId::new(7).to_string(), "7");
    }

    #[test]
    fn test_serde_is_transparent() {
        assert_eq!(serde_json::to_string(&MessageId::new(3)).unwrap(), "3");
        assert_eq!(
            serde_json::from_str::<MessageId>("3").unwrap(),
            MessageId::new(3)
        );
    }
}
