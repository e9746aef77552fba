//! Notification types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// Event tag for a notification, stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PointsAwarded,
    ItemListed,
    SwapProposed,
    SwapAccepted,
    SwapRejected,
    SwapCancelled,
    SwapCompleted,
    ItemRedeemed,
    ItemShipped,
    ItemReceived,
    RedemptionCancelled,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::PointsAwarded => "points_awarded",
            NotificationKind::ItemListed => "item_listed",
            NotificationKind::SwapProposed => "swap_proposed",
            NotificationKind::SwapAccepted => "swap_accepted",
            NotificationKind::SwapRejected => "swap_rejected",
            NotificationKind::SwapCancelled => "swap_cancelled",
            NotificationKind::SwapCompleted => "swap_completed",
            NotificationKind::ItemRedeemed => "item_redeemed",
            NotificationKind::ItemShipped => "item_shipped",
            NotificationKind::ItemReceived => "item_received",
            NotificationKind::RedemptionCancelled => "redemption_cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "points_awarded" => Some(NotificationKind::PointsAwarded),
            "item_listed" => Some(NotificationKind::ItemListed),
            "swap_proposed" => Some(NotificationKind::SwapProposed),
            "swap_accepted" => Some(NotificationKind::SwapAccepted),
            "swap_rejected" => Some(NotificationKind::SwapRejected),
            "swap_cancelled" => Some(NotificationKind::SwapCancelled),
            "swap_completed" => Some(NotificationKind::SwapCompleted),
            "item_redeemed" => Some(NotificationKind::ItemRedeemed),
            "item_shipped" => Some(NotificationKind::ItemShipped),
            "item_received" => Some(NotificationKind::ItemReceived),
            "redemption_cancelled" => Some(NotificationKind::RedemptionCancelled),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A delivered notification. Mutated only by the receiving user
/// (mark read / delete).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Notification {
    pub notification_id: i64,
    pub receiver_id: i64,
    pub sender_id: Option<i64>,
    pub kind: NotificationKind,
    pub message: String,
    /// Back-reference to the swap/redemption/item that triggered the event
    pub resource_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_str_roundtrip() {
        let kinds = [
            NotificationKind::PointsAwarded,
            NotificationKind::ItemListed,
            NotificationKind::SwapProposed,
            NotificationKind::SwapAccepted,
            NotificationKind::SwapRejected,
            NotificationKind::SwapCancelled,
            NotificationKind::SwapCompleted,
            NotificationKind::ItemRedeemed,
            NotificationKind::ItemShipped,
            NotificationKind::ItemReceived,
            NotificationKind::RedemptionCancelled,
        ];
        for kind in kinds {
            assert_eq!(NotificationKind::from_str(kind.as_str()), Some(kind));
        }
        assert!(NotificationKind::from_str("no_such_event").is_none());
    }
}
