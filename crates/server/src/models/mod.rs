//! Domain types for the showcase API.

pub mod catalog;
pub mod message;
pub mod session;
pub mod user;

pub use catalog::{Product, Promo, Settings, StickerCatalog};
pub use message::Message;
pub use session::{CurrentUser, session_keys};
pub use user::{User, UserView};
