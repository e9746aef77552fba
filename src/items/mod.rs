//! Item listings and the availability tracker gating exchanges.

pub mod models;
pub mod repository;
pub mod service;

pub use models::{Category, Condition, Gender, Item, ItemStatus, ListingType, Size};
pub use repository::{ItemFilter, ItemPage, ItemRepository};
pub use service::ItemService;
