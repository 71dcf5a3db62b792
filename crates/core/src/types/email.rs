//! Email address parse type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Longest accepted address, per the RFC 5321 path limit.
const MAX_LEN: usize = 254;

/// Why a string failed to parse as an [`Email`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("email address is empty")]
    Empty,
    #[error("email address exceeds {MAX_LEN} characters")]
    TooLong,
    #[error("email address must look like local@domain")]
    Malformed,
}

/// A structurally plausible email address.
///
/// Validation is deliberately shallow: something before an `@`, something
/// after it, within the length limit. Whether the address actually receives
/// mail is the SMTP relay's concern, not a parsing one.
///
/// ```
/// use sred_core::Email;
///
/// assert!(Email::parse("contact@sred-emballages.tn").is_ok());
/// assert!(Email::parse("not-an-address").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an address, accepting it only when a non-empty local part and
    /// a non-empty domain surround a single leading `@` split.
    ///
    /// # Errors
    ///
    /// [`EmailError::Empty`] and [`EmailError::TooLong`] for the length
    /// checks, [`EmailError::Malformed`] for everything structural.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        if input.is_empty() {
            return Err(EmailError::Empty);
        }
        if input.len() > MAX_LEN {
            return Err(EmailError::TooLong);
        }

        match input.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(input.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// The users table stores addresses as TEXT; values coming back out of the
// database were validated on the way in and are trusted as-is.
#[cfg(feature = "postgres")]
mod pg {
    use super::Email;

    impl sqlx::Type<sqlx::Postgres> for Email {
        fn type_info() -> sqlx::postgres::PgTypeInfo {
            <String as sqlx::Type<sqlx::Postgres>>::type_info()
        }

        fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
            <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
        }
    }

    impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Email {
        fn decode(
            value: sqlx::postgres::PgValueRef<'r>,
        ) -> Result<Self, sqlx::error::BoxDynError> {
            <String as sqlx::Decode<sqlx::Postgres>>::decode(value).map(Email)
        }
    }

    impl sqlx::Encode<'_, sqlx::Postgres> for Email {
        fn encode_by_ref(
            &self,
            buf: &mut sqlx::postgres::PgArgumentBuffer,
        ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
            <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plausible_addresses() {
        for ok in [
            "amira@sred-emballages.tn",
            "first.last@example.com",
            "orders+march@shop.co.uk",
            "a@b",
        ] {
            assert!(Email::parse(ok).is_ok(), "{ok} should parse");
        }
    }

    #[test]
    fn test_rejects_structural_garbage() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("no-at-sign"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("@tail-only"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("head-only@"), Err(EmailError::Malformed));
    }

    #[test]
    fn test_rejects_over_length_addresses() {
        let local = "x".repeat(MAX_LEN);
        assert_eq!(
            Email::parse(&format!("{local}@example.com")),
            Err(EmailError::TooLong)
        );
    }

    #[test]
    fn test_serializes_as_the_bare_string() {
        let email: Email = "amira@sred-emballages.tn".parse().unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, r#""amira@sred-emballages.tn""#);

        let back: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(back, email);
    }
}
