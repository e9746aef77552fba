//! rewear - Community Clothing Exchange
//!
//! Users list garments and acquire them either by proposing an
//! item-for-item swap or by spending points to redeem an item. A parallel
//! points ledger rewards signing up, listing, and completing exchanges.
//!
//! # Modules
//!
//! - [`items`] - Listings and the availability tracker gating exchanges
//! - [`swaps`] - Swap state machine with bilateral completion confirmation
//! - [`redemptions`] - Redemption state machine (points for items)
//! - [`points`] - Append-only ledger behind the cached balance
//! - [`notifications`] - Fire-and-forget side channel to the counterpart
//! - [`users`] - Accounts carrying the cached balance
//! - [`user_auth`] - Registration, login, JWT verification
//! - [`gateway`] - Axum HTTP surface
//! - [`error`] - The one exchange error taxonomy

pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod items;
pub mod logging;
pub mod notifications;
pub mod points;
pub mod redemptions;
pub mod swaps;
pub mod user_auth;
pub mod users;

// Convenient re-exports at crate root
pub use config::{AppConfig, RewardConfig};
pub use db::Database;
pub use error::ExchangeError;
pub use items::{Item, ItemRepository, ItemService, ItemStatus, ListingType};
pub use notifications::{NotificationEmitter, NotificationKind, NotificationRepository};
pub use points::{PointsLedger, PointsReason};
pub use redemptions::{Redemption, RedemptionService, RedemptionStatus};
pub use swaps::{Swap, SwapService, SwapStatus};
pub use users::{User, UserRepository};
