use std::sync::Arc;

use sqlx::PgPool;

use crate::config::RewardConfig;
use crate::db::Database;
use crate::user_auth::UserAuthService;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL database
    pub db: Arc<Database>,
    /// User authentication service
    pub user_auth: Arc<UserAuthService>,
    /// Reward amounts for milestone grants
    pub rewards: RewardConfig,
}

impl AppState {
    pub fn new(db: Arc<Database>, user_auth: Arc<UserAuthService>, rewards: RewardConfig) -> Self {
        Self {
            db,
            user_auth,
            rewards,
        }
    }

    /// Shorthand for the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        self.db.pool()
    }
}
