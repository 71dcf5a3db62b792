//! Database seeding commands.
//!
//! # Environment Variables (for `seed admins`)
//!
//! - `SEED_ADMIN_USERNAME` - Bootstrap account username (default: `admin`)
//! - `SEED_ADMIN_EMAIL` - Bootstrap account email (default: `admin@sred-emballages.tn`)
//! - `SEED_ADMIN_PASSWORD` - Bootstrap password; a default is used with a
//!   warning when unset - never rely on it in production
//! - `SEED_ADMIN_UPDATE_EXISTING` - `1`/`true` allows refreshing an
//!   existing account's password

use sred_core::{Email, Role};
use sred_server::db::products::NewProduct;
use sred_server::db::{ProductRepository, UserRepository};
use sred_server::services::password::hash_password;

use super::CliError;

/// Insert the starter product set when the catalog is empty.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or an insert fails.
pub async fn catalog() -> Result<(), CliError> {
    let pool = super::connect().await?;
    let products = ProductRepository::new(&pool);

    if !products.list_all().await?.is_empty() {
        tracing::info!("Catalog already seeded, nothing to do");
        return Ok(());
    }

    let starter_products = [
        NewProduct {
            name: "Bouquet de Roses Éternelles - Noir",
            description: "Un élégant bouquet de roses roses présenté dans un étui noir \
                          sophistiqué 'Best Wishes'. Parfait pour les cadeaux et la décoration \
                          haut de gamme.",
            image_url: "/assets/products/bouquet-noir.jpeg",
            category: "Cadeaux & Décor",
        },
        NewProduct {
            name: "Bouquet de Roses Passion - Rose",
            description: "Roses rouges vibrantes dans un étui rose délicat. Une alliance \
                          parfaite entre passion et douceur pour vos événements spéciaux.",
            image_url: "/assets/products/bouquet-passion.jpeg",
            category: "Cadeaux & Décor",
        },
        NewProduct {
            name: "Bouquet Lavande Sérénité - Rose",
            description: "Délicates roses lilas dans un étui rose, apportant une touche de \
                          calme et d'élégance à tout espace.",
            image_url: "/assets/products/bouquet-lavande.jpeg",
            category: "Cadeaux & Décor",
        },
        NewProduct {
            name: "Bouquet Azur Éclatant - Rose",
            description: "Roses bleues uniques dans un étui rose contrasté, pour une \
                          décoration audacieuse et mémorable.",
            image_url: "/assets/products/bouquet-azur.jpeg",
            category: "Cadeaux & Décor",
        },
        NewProduct {
            name: "Boîtes en Carton Sur Mesure",
            description: "Solutions d'emballage robustes et personnalisables pour tous vos \
                          besoins logistiques.",
            image_url: "/assets/products/boites-carton.jpeg",
            category: "Emballage Industriel",
        },
    ];

    for product in &starter_products {
        products.create(product).await?;
        tracing::info!(product = product.name, "seeded");
    }

    tracing::info!("Catalog seeding complete");
    Ok(())
}

/// Create or refresh the bootstrap superadmin account.
///
/// Idempotent: an existing account with an already-hashed password is left
/// alone unless `SEED_ADMIN_UPDATE_EXISTING` is set.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a write fails.
pub async fn admins() -> Result<(), CliError> {
    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    let username = std::env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_owned());
    let email = std::env::var("SEED_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@sred-emballages.tn".to_owned());
    let email = Email::parse(&email).map_err(|e| CliError::InvalidEmail(e.to_string()))?;

    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!(
            "SEED_ADMIN_PASSWORD is not set; using a default password. \
             Set SEED_ADMIN_PASSWORD for production."
        );
        "password123".to_owned()
    });

    let update_existing = std::env::var("SEED_ADMIN_UPDATE_EXISTING")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);
    if update_existing {
        tracing::warn!("SEED_ADMIN_UPDATE_EXISTING is enabled: the existing account may be updated");
    }

    match users.get_by_username(&username).await? {
        None => {
            let password_hash = hash_password(&password)?;
            users
                .create(&username, &email, &password_hash, Role::Superadmin)
                .await?;
            tracing::info!(account = %username, "superadmin created");
        }
        Some(existing) => {
            if update_existing || !looks_hashed(&existing.password_hash) {
                let password_hash = hash_password(&password)?;
                users.update_password(existing.id, &password_hash).await?;
                tracing::info!(account = %username, "superadmin password refreshed");
            } else {
                tracing::info!(account = %username, "superadmin already exists, skipping");
            }
        }
    }

    tracing::info!("Admin seeding complete");
    Ok(())
}

/// Heuristic for "this credential already went through the KDF":
/// a real record is `<128 hex>.<32 hex>`, far past this bar.
fn looks_hashed(stored: &str) -> bool {
    stored.contains('.') && stored.len() > 50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_hashed() {
        assert!(looks_hashed(&format!("{}.{}", "a".repeat(128), "b".repeat(32))));
        assert!(!looks_hashed("plaintext-password"));
        assert!(!looks_hashed("short.hash"));
    }
}
