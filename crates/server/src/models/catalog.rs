//! Catalog domain types: products, promos, sticker catalogs and settings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sred_core::{ProductId, PromoId, SettingsId, StickerCatalogId};

/// A showcased product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub category: String,
}

/// A promotional announcement. Only the image is mandatory; the text
/// fields overlay it when present.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Promo {
    pub id: PromoId,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// A page of the sticker catalog.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StickerCatalog {
    pub id: StickerCatalogId,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

/// Site-wide settings singleton (social reels, stickers page image).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: SettingsId,
    pub instagram_reel: Option<String>,
    pub facebook_reel: Option<String>,
    pub tiktok_reel: Option<String>,
    pub stickers_image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}
