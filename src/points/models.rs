//! Points ledger entry types
//!
//! Kind and reason ids are stored as SMALLINT in PostgreSQL.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum PointsKind {
    Earned = 1,
    Spent = 2,
}

impl PointsKind {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(PointsKind::Earned),
            2 => Some(PointsKind::Spent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PointsKind::Earned => "earned",
            PointsKind::Spent => "spent",
        }
    }
}

/// Why an entry was posted.
///
/// `Registration` and `FirstListing` are one-shot bonuses: the ledger table
/// carries a partial unique index on `(user_id, reason)` restricted to these
/// two ids, so each can be granted at most once per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum PointsReason {
    Registration = 1,
    FirstListing = 2,
    Swap = 3,
    Redemption = 4,
}

impl PointsReason {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(PointsReason::Registration),
            2 => Some(PointsReason::FirstListing),
            3 => Some(PointsReason::Swap),
            4 => Some(PointsReason::Redemption),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PointsReason::Registration => "registration",
            PointsReason::FirstListing => "listing",
            PointsReason::Swap => "swap",
            PointsReason::Redemption => "redemption",
        }
    }

    /// Human-readable label used in notifications and history views
    pub fn label(&self) -> &'static str {
        match self {
            PointsReason::Registration => "Sign-up Bonus",
            PointsReason::FirstListing => "Reward for listing your first item",
            PointsReason::Swap => "Swap Completed",
            PointsReason::Redemption => "Item Redeemed",
        }
    }

    /// One-shot reasons may post at most one entry per user
    #[inline]
    pub fn is_one_shot(&self) -> bool {
        matches!(self, PointsReason::Registration | PointsReason::FirstListing)
    }
}

impl fmt::Display for PointsReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable ledger entry. Never updated or deleted once written.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PointsEntry {
    pub entry_id: i64,
    pub user_id: i64,
    pub kind: PointsKind,
    pub amount: i64,
    pub reason: PointsReason,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_id_roundtrip() {
        for kind in [PointsKind::Earned, PointsKind::Spent] {
            assert_eq!(PointsKind::from_id(kind.id()), Some(kind));
        }
        assert!(PointsKind::from_id(0).is_none());
    }

    #[test]
    fn test_reason_id_roundtrip() {
        let reasons = [
            PointsReason::Registration,
            PointsReason::FirstListing,
            PointsReason::Swap,
            PointsReason::Redemption,
        ];
        for reason in reasons {
            assert_eq!(PointsReason::from_id(reason.id()), Some(reason));
        }
        assert!(PointsReason::from_id(99).is_none());
    }

    #[test]
    fn test_one_shot_reasons() {
        assert!(PointsReason::Registration.is_one_shot());
        assert!(PointsReason::FirstListing.is_one_shot());
        assert!(!PointsReason::Swap.is_one_shot());
        assert!(!PointsReason::Redemption.is_one_shot());
    }

    #[test]
    fn test_labels() {
        assert_eq!(PointsReason::Registration.label(), "Sign-up Bonus");
        assert_eq!(PointsReason::Swap.as_str(), "swap");
    }
}
