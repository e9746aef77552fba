//! Notifications: fire-and-forget side channel to the counterpart user.

pub mod emitter;
pub mod models;
pub mod repository;

pub use emitter::NotificationEmitter;
pub use models::{Notification, NotificationKind};
pub use repository::NotificationRepository;
