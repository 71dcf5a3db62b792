//! Selection line-item types.

use serde::{Deserialize, Serialize};

/// Identifier of a selectable catalog entry.
///
/// Products use numeric database IDs while some promo surfaces use string
/// handles, so both spellings are accepted. A numeric ID and its string
/// spelling are distinct identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Numeric database ID.
    Number(i64),
    /// String handle.
    Text(String),
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Which catalog a selection entry references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Product,
    Promo,
}

/// A single line of the visitor's selection.
///
/// Two lines are the same entry exactly when both `id` and `kind` match;
/// the store never holds two lines with the same `(id, kind)` pair, and
/// `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Records persisted before quantities existed lack this field and are
    /// normalized to 1 on every read.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

impl SelectionItem {
    /// Create a new line with quantity 1.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            image_url: None,
            kind,
            quantity: 1,
        }
    }

    /// Set an explicit quantity (clamped to a minimum of 1).
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Set the description shown in cart surfaces.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the thumbnail URL shown in cart surfaces.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Whether this line refers to the given `(id, kind)` identity.
    #[must_use]
    pub fn matches(&self, id: &ItemId, kind: ItemKind) -> bool {
        self.id == *id && self.kind == kind
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_text_ids_are_distinct() {
        assert_ne!(ItemId::from(1), ItemId::from("1"));
    }

    #[test]
    fn test_legacy_record_without_quantity_defaults_to_one() {
        let raw = r#"{"id":3,"name":"Gift box","type":"product"}"#;
        let item: SelectionItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_with_quantity_clamps_to_one() {
        let item =
            SelectionItem::new(ItemId::from(1), "Gift box", ItemKind::Product).with_quantity(0);
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_kind_serialization_spelling() {
        let item = SelectionItem::new(ItemId::from(1), "Spring pack", ItemKind::Promo);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""type":"promo""#));
    }

    #[test]
    fn test_serde_roundtrip_preserves_identity() {
        let item = SelectionItem::new(ItemId::from("ribbon-roll"), "Ribbon", ItemKind::Product)
            .with_quantity(3)
            .with_image_url("/img/ribbon.jpg");
        let json = serde_json::to_string(&item).unwrap();
        let back: SelectionItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
