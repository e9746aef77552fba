//! Swap State Definitions
//!
//! State ids are stored as SMALLINT in PostgreSQL. Negative ids are the
//! unwound terminals. Every transition a service performs must be an edge
//! of `can_transition`; anything else is rejected before a write happens.

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// Swap lifecycle states
///
/// Terminal states: COMPLETED (20), REJECTED (-10), CANCELLED (-20)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum SwapStatus {
    /// Proposed, waiting for the receiver to act
    Pending = 0,

    /// Receiver accepted - both items are locked (inactive)
    Accepted = 10,

    /// Terminal: both parties independently confirmed completion
    Completed = 20,

    /// Terminal: receiver declined the proposal
    Rejected = -10,

    /// Terminal: proposer withdrew the proposal
    Cancelled = -20,
}

impl SwapStatus {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SwapStatus::Completed | SwapStatus::Rejected | SwapStatus::Cancelled
        )
    }

    /// Transition table. The only valid edges are:
    /// pending -> accepted | rejected | cancelled, accepted -> completed.
    pub fn can_transition(from: SwapStatus, to: SwapStatus) -> bool {
        matches!(
            (from, to),
            (SwapStatus::Pending, SwapStatus::Accepted)
                | (SwapStatus::Pending, SwapStatus::Rejected)
                | (SwapStatus::Pending, SwapStatus::Cancelled)
                | (SwapStatus::Accepted, SwapStatus::Completed)
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
            0 => Some(SwapStatus::Pending),
            10 => Some(SwapStatus::Accepted),
            20 => Some(SwapStatus::Completed),
            -10 => Some(SwapStatus::Rejected),
            -20 => Some(SwapStatus::Cancelled),
            _ => None,
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Completed => "completed",
            SwapStatus::Rejected => "rejected",
            SwapStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SwapStatus; 5] = [
        SwapStatus::Pending,
        SwapStatus::Accepted,
        SwapStatus::Completed,
        SwapStatus::Rejected,
        SwapStatus::Cancelled,
    ];

    #[test]
    fn test_terminal_states() {
        assert!(SwapStatus::Completed.is_terminal());
        assert!(SwapStatus::Rejected.is_terminal());
        assert!(SwapStatus::Cancelled.is_terminal());

        assert!(!SwapStatus::Pending.is_terminal());
        assert!(!SwapStatus::Accepted.is_terminal());
    }

    #[test]
    fn test_transition_table_edges() {
        assert!(SwapStatus::can_transition(
            SwapStatus::Pending,
            SwapStatus::Accepted
        ));
        assert!(SwapStatus::can_transition(
            SwapStatus::Pending,
            SwapStatus::Rejected
        ));
        assert!(SwapStatus::can_transition(
            SwapStatus::Pending,
            SwapStatus::Cancelled
        ));
        assert!(SwapStatus::can_transition(
            SwapStatus::Accepted,
            SwapStatus::Completed
        ));
    }

    #[test]
    fn test_no_transitions_out_of_terminals() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(
                    !SwapStatus::can_transition(*from, to),
                    "{} -> {} must be rejected",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_pending_cannot_jump_to_completed() {
        assert!(!SwapStatus::can_transition(
            SwapStatus::Pending,
            SwapStatus::Completed
        ));
        assert!(!SwapStatus::can_transition(
            SwapStatus::Accepted,
            SwapStatus::Rejected
        ));
        assert!(!SwapStatus::can_transition(
            SwapStatus::Accepted,
            SwapStatus::Cancelled
        ));
    }

    #[test]
    fn test_state_id_roundtrip() {
        for state in ALL {
            assert_eq!(SwapStatus::from_id(state.id()), Some(state));
        }
        assert!(SwapStatus::from_id(999).is_none());
        assert!(SwapStatus::from_id(-999).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(SwapStatus::Pending.to_string(), "pending");
        assert_eq!(SwapStatus::Completed.to_string(), "completed");
        assert_eq!(SwapStatus::Cancelled.to_string(), "cancelled");
    }
}
