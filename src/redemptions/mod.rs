//! Points-for-item redemptions with ship/receive confirmation.

pub mod models;
pub mod repository;
pub mod service;
pub mod state;

pub use models::Redemption;
pub use repository::RedemptionRepository;
pub use service::RedemptionService;
pub use state::RedemptionStatus;
