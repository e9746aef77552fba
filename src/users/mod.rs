//! User accounts and the cached point balance.

pub mod models;
pub mod repository;

pub use models::User;
pub use repository::UserRepository;
