//! Admin account roles.

use serde::{Deserialize, Serialize};

/// Account role with different permission levels.
///
/// Stored as plain text in the database (`"superadmin"` / `"admin"`); the
/// same spelling is used on the wire. Every account has a role - there is no
/// unset state - and it is assigned at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access including team management.
    Superadmin,
    /// Full access to catalog, messages and settings.
    #[default]
    Admin,
}

impl Role {
    /// Returns the canonical text spelling of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Self::Superadmin),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

// Roles live in a plain TEXT column, so the sqlx impls round-trip through
// the canonical spelling rather than a Postgres enum type.
#[cfg(feature = "postgres")]
mod pg {
    use super::Role;

    impl sqlx::Type<sqlx::Postgres> for Role {
        fn type_info() -> sqlx::postgres::PgTypeInfo {
            <String as sqlx::Type<sqlx::Postgres>>::type_info()
        }

        fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
            <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
        }
    }

    impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
        fn decode(
            value: sqlx::postgres::PgValueRef<'r>,
        ) -> Result<Self, sqlx::error::BoxDynError> {
            let text = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
            Ok(text.parse::<Role>()?)
        }
    }

    impl sqlx::Encode<'_, sqlx::Postgres> for Role {
        fn encode_by_ref(
            &self,
            buf: &mut sqlx::postgres::PgArgumentBuffer,
        ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
            <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!("superadmin".parse::<Role>().unwrap(), Role::Superadmin);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn test_parse_unknown_role() {
        assert!("viewer".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_matches_wire_spelling() {
        assert_eq!(Role::Superadmin.to_string(), "superadmin");
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_serde_spelling() {
        assert_eq!(
            serde_json::to_string(&Role::Superadmin).unwrap(),
            "\"superadmin\""
        );
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_default_is_admin() {
        assert_eq!(Role::default(), Role::Admin);
    }
}
