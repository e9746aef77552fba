//! Redemption State Definitions
//!
//! State ids are stored as SMALLINT in PostgreSQL. Both exits from PENDING
//! are terminal.

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// Redemption lifecycle states
///
/// Terminal states: COMPLETED (10), CANCELLED (-10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionStatus {
    /// Points debited, waiting on ship + receive confirmations
    Pending = 0,

    /// Terminal: redeemer confirmed receipt, owner rewarded
    Completed = 10,

    /// Terminal: redeemer backed out before shipment, points refunded
    Cancelled = -10,
}

impl RedemptionStatus {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RedemptionStatus::Completed | RedemptionStatus::Cancelled)
    }

    /// Transition table: pending -> completed, pending -> cancelled.
    pub fn can_transition(from: RedemptionStatus, to: RedemptionStatus) -> bool {
        matches!(
            (from, to),
            (RedemptionStatus::Pending, RedemptionStatus::Completed)
                | (RedemptionStatus::Pending, RedemptionStatus::Cancelled)
        )
    }

    /// Get the numeric state id for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from a PostgreSQL state id
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(RedemptionStatus::Pending),
            10 => Some(RedemptionStatus::Completed),
            -10 => Some(RedemptionStatus::Cancelled),
            _ => None,
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            RedemptionStatus::Pending => "pending",
            RedemptionStatus::Completed => "completed",
            RedemptionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RedemptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RedemptionStatus; 3] = [
        RedemptionStatus::Pending,
        RedemptionStatus::Completed,
        RedemptionStatus::Cancelled,
    ];

    #[test]
    fn test_terminal_states() {
        assert!(RedemptionStatus::Completed.is_terminal());
        assert!(RedemptionStatus::Cancelled.is_terminal());
        assert!(!RedemptionStatus::Pending.is_terminal());
    }

    #[test]
    fn test_transition_table() {
        assert!(RedemptionStatus::can_transition(
            RedemptionStatus::Pending,
            RedemptionStatus::Completed
        ));
        assert!(RedemptionStatus::can_transition(
            RedemptionStatus::Pending,
            RedemptionStatus::Cancelled
        ));

        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(!RedemptionStatus::can_transition(*from, to));
            }
        }
    }

    #[test]
    fn test_state_id_roundtrip() {
        for state in ALL {
            assert_eq!(RedemptionStatus::from_id(state.id()), Some(state));
        }
        assert!(RedemptionStatus::from_id(99).is_none());
    }
}
