//! Swap record types

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::state::SwapStatus;

/// Which side of a swap an actor is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapRole {
    Proposer,
    Receiver,
}

/// A swap proposal between two users' items
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Swap {
    pub swap_id: i64,
    pub proposer_id: i64,
    pub proposed_item_id: i64,
    pub receiver_id: i64,
    pub received_item_id: i64,
    pub message: Option<String>,
    pub status: SwapStatus,
    pub proposer_completed: bool,
    pub receiver_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Swap {
    /// Role of `user_id` in this swap, if any
    pub fn role_of(&self, user_id: i64) -> Option<SwapRole> {
        if user_id == self.proposer_id {
            Some(SwapRole::Proposer)
        } else if user_id == self.receiver_id {
            Some(SwapRole::Receiver)
        } else {
            None
        }
    }

    /// Whether `user_id` is the proposer or the receiver
    #[inline]
    pub fn is_party(&self, user_id: i64) -> bool {
        self.role_of(user_id).is_some()
    }

    /// Completion flag for a given side
    pub fn completed_by(&self, role: SwapRole) -> bool {
        match role {
            SwapRole::Proposer => self.proposer_completed,
            SwapRole::Receiver => self.receiver_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap() -> Swap {
        Swap {
            swap_id: 1,
            proposer_id: 10,
            proposed_item_id: 100,
            receiver_id: 20,
            received_item_id: 200,
            message: None,
            status: SwapStatus::Pending,
            proposer_completed: false,
            receiver_completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_of() {
        let s = swap();
        assert_eq!(s.role_of(10), Some(SwapRole::Proposer));
        assert_eq!(s.role_of(20), Some(SwapRole::Receiver));
        assert_eq!(s.role_of(30), None);
    }

    #[test]
    fn test_is_party() {
        let s = swap();
        assert!(s.is_party(10));
        assert!(s.is_party(20));
        assert!(!s.is_party(999));
    }

    #[test]
    fn test_completed_by() {
        let mut s = swap();
        s.proposer_completed = true;
        assert!(s.completed_by(SwapRole::Proposer));
        assert!(!s.completed_by(SwapRole::Receiver));
    }
}
