//! meishi-cards: digital business cards
//!
//! This crate provides the card data model and its persistence.
//!
//! ## Features
//!
//! - `BusinessCard` with four contact lists capped at three entries each
//! - Stored record codec accepting several timestamp encodings
//! - SQLite card store with per-user listing and saved-card collections
//! - Anonymous accounts that can be linked to a provider later
//! - Photo storage and sharing helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meishi_cards::{CardManager, FieldKind};
//!
//! let manager = CardManager::new("data/meishi.db")?;
//! let account = manager.current_account().await?;
//!
//! let card = manager
//!     .create_draft(&account)
//!     .with_name("Jane Doe")
//!     .with_field_added(FieldKind::Phone, "mobile", "010-1234-5678");
//! let saved = manager.save(card, &account).await?;
//! ```

pub mod accounts;
pub mod manager;
pub mod models;
pub mod photos;
pub mod record;
pub mod share;
pub mod store;

pub use accounts::{Account, AccountStore};
pub use manager::CardManager;
pub use models::{
    BusinessCard, CardOptions, CardPreview, DynamicField, DynamicFieldList, FieldInput, FieldKind,
    FieldPart, MAX_DYNAMIC_FIELDS, Privacy,
};
pub use photos::PhotoStore;
pub use record::{CardRecord, CollectionEntry};
pub use store::CardStore;

/// Re-export the commonly used types
pub mod prelude {
    pub use super::{Account, BusinessCard, CardManager, DynamicField, FieldKind, FieldPart, Privacy};
}
