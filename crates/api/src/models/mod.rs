//! Domain types for the API.
//!
//! These types represent validated domain objects separate from database row
//! types. Defaulting and validation for optional fields happen here, at the
//! write boundary, not at read sites.

pub mod shop;
pub mod user;

pub use shop::{Shop, ShopDraft, ShopDraftError, ShopPatch};
pub use user::User;
