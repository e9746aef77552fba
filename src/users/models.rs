//! User account models

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A registered user.
///
/// `points` is a denormalized projection of the points ledger. It is only
/// ever mutated through the ledger contract (`PointsLedger`), never patched
/// directly by an exchange transition.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    pub fullname: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Cached point balance (ledger projection)
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, safe to embed in API responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub user_id: i64,
    pub email: String,
    pub fullname: String,
    pub points: i64,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.clone(),
            fullname: user.fullname.clone(),
            points: user.points,
        }
    }
}
