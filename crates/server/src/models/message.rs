//! Contact-form message domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sred_core::MessageId;

/// A contact-form submission.
///
/// `selected_items` is the opaque serialized selection snapshot the client
/// attaches when the visitor submits an order; the server never inspects it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub name: String,
    pub phone: String,
    pub message: String,
    pub selected_items: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
