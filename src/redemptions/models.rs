//! Redemption record types

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::state::RedemptionStatus;

/// A points-for-item redemption
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Redemption {
    pub redemption_id: i64,
    /// The redeemer
    pub user_id: i64,
    pub item_id: i64,
    /// Item price snapshot at redemption time
    pub points_used: i64,
    pub status: RedemptionStatus,
    /// Item owner confirmed shipment
    pub confirmed_by_sender: bool,
    /// Redeemer confirmed receipt
    pub confirmed_by_receiver: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Redemption {
    /// A redemption blocks further redemptions of its item until cancelled
    #[inline]
    pub fn holds_item(&self) -> bool {
        self.status != RedemptionStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redemption(status: RedemptionStatus) -> Redemption {
        Redemption {
            redemption_id: 1,
            user_id: 10,
            item_id: 100,
            points_used: 30,
            status,
            confirmed_by_sender: false,
            confirmed_by_receiver: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_holds_item() {
        assert!(redemption(RedemptionStatus::Pending).holds_item());
        assert!(redemption(RedemptionStatus::Completed).holds_item());
        assert!(!redemption(RedemptionStatus::Cancelled).holds_item());
    }
}
