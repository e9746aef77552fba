//! Item-for-item swaps with bilateral completion confirmation.

pub mod models;
pub mod repository;
pub mod service;
pub mod state;

pub use models::{Swap, SwapRole};
pub use repository::SwapRepository;
pub use service::SwapService;
pub use state::SwapStatus;
