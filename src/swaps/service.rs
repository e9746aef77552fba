//! Swap Orchestrator
//!
//! Each transition: read current state, validate actor and preconditions,
//! win the CAS on the swap row, then fan out item flips, ledger grants and
//! notifications. Side effects after the CAS are non-fatal: a failed grant
//! or notification is logged, never rolled back into the swap.

use sqlx::PgPool;
use tracing::{error, info, warn};

use super::models::{Swap, SwapRole};
use super::repository::SwapRepository;
use super::state::SwapStatus;
use crate::config::RewardConfig;
use crate::error::ExchangeError;
use crate::items::{Item, ItemRepository, ItemStatus};
use crate::notifications::{NotificationEmitter, NotificationKind};
use crate::points::{PointsLedger, PointsReason};
use crate::users::UserRepository;

/// Outcome of a completion confirmation
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct CompletionOutcome {
    pub swap: Swap,
    /// True only for the call that confirmed the second side and settled
    /// the exchange
    pub finalized: bool,
}

pub struct SwapService;

impl SwapService {
    /// Propose a swap: proposer's item for the receiver's item.
    pub async fn propose(
        pool: &PgPool,
        proposer_id: i64,
        proposed_item_id: i64,
        receiver_id: i64,
        received_item_id: i64,
        message: Option<String>,
    ) -> Result<Swap, ExchangeError> {
        if proposer_id == receiver_id {
            return Err(ExchangeError::validation("Cannot swap items with yourself"));
        }
        if proposed_item_id == received_item_id {
            return Err(ExchangeError::validation(
                "Cannot propose an item in exchange for itself",
            ));
        }

        let proposed = Self::fetch_item(pool, proposed_item_id).await?;
        let received = Self::fetch_item(pool, received_item_id).await?;

        if proposed.owner_id != proposer_id {
            return Err(ExchangeError::unauthorized(
                "Proposed item does not belong to the proposer",
            ));
        }
        if received.owner_id != receiver_id {
            return Err(ExchangeError::unauthorized(
                "Requested item does not belong to the receiver",
            ));
        }

        Self::ensure_swappable(&proposed)?;
        Self::ensure_swappable(&received)?;

        let swap = SwapRepository::create(
            pool,
            proposer_id,
            proposed_item_id,
            receiver_id,
            received_item_id,
            message.as_deref(),
        )
        .await?;

        info!(
            swap_id = swap.swap_id,
            proposer_id, receiver_id, "Swap proposed"
        );

        let proposer_name = Self::display_name(pool, proposer_id).await;
        NotificationEmitter::notify(
            pool,
            receiver_id,
            Some(proposer_id),
            NotificationKind::SwapProposed,
            format!(
                "{} proposed a swap for your item: {}",
                proposer_name, received.title
            ),
            Some(swap.swap_id),
        )
        .await;

        Ok(swap)
    }

    /// Accept a pending swap. Receiver only. Locks both items.
    pub async fn accept(
        pool: &PgPool,
        swap_id: i64,
        actor_id: i64,
    ) -> Result<Swap, ExchangeError> {
        let swap = Self::fetch(pool, swap_id).await?;

        if swap.role_of(actor_id) != Some(SwapRole::Receiver) {
            return Err(ExchangeError::unauthorized(
                "You are not authorized to accept this swap",
            ));
        }

        Self::transition(pool, &swap, SwapStatus::Accepted).await?;

        // Lock both items. A failed flip means another exchange grabbed the
        // item between proposal and acceptance; the swap stays accepted and
        // the contention is surfaced in the logs.
        for item_id in [swap.proposed_item_id, swap.received_item_id] {
            if !ItemRepository::set_status_if(pool, item_id, ItemStatus::Active, ItemStatus::Inactive)
                .await?
            {
                warn!(swap_id, item_id, "Item was not active at swap acceptance");
            }
        }

        info!(swap_id, actor_id, "Swap accepted");

        let receiver_name = Self::display_name(pool, actor_id).await;
        NotificationEmitter::notify(
            pool,
            swap.proposer_id,
            Some(actor_id),
            NotificationKind::SwapAccepted,
            format!("{} accepted your swap proposal", receiver_name),
            Some(swap_id),
        )
        .await;

        Self::fetch(pool, swap_id).await
    }

    /// Reject a pending swap. Receiver only. Items were never locked by a
    /// pending swap, so their status is left alone.
    pub async fn reject(
        pool: &PgPool,
        swap_id: i64,
        actor_id: i64,
    ) -> Result<Swap, ExchangeError> {
        let swap = Self::fetch(pool, swap_id).await?;

        if swap.role_of(actor_id) != Some(SwapRole::Receiver) {
            return Err(ExchangeError::unauthorized(
                "You are not authorized to reject this swap",
            ));
        }

        Self::transition(pool, &swap, SwapStatus::Rejected).await?;
        info!(swap_id, actor_id, "Swap rejected");

        let receiver_name = Self::display_name(pool, actor_id).await;
        NotificationEmitter::notify(
            pool,
            swap.proposer_id,
            Some(actor_id),
            NotificationKind::SwapRejected,
            format!("{} rejected your swap proposal", receiver_name),
            Some(swap_id),
        )
        .await;

        Self::fetch(pool, swap_id).await
    }

    /// Cancel a pending swap. Proposer only.
    pub async fn cancel(
        pool: &PgPool,
        swap_id: i64,
        actor_id: i64,
    ) -> Result<Swap, ExchangeError> {
        let swap = Self::fetch(pool, swap_id).await?;

        if swap.role_of(actor_id) != Some(SwapRole::Proposer) {
            return Err(ExchangeError::unauthorized(
                "You are not authorized to cancel this swap",
            ));
        }

        Self::transition(pool, &swap, SwapStatus::Cancelled).await?;
        info!(swap_id, actor_id, "Swap cancelled");

        let proposer_name = Self::display_name(pool, actor_id).await;
        NotificationEmitter::notify(
            pool,
            swap.receiver_id,
            Some(actor_id),
            NotificationKind::SwapCancelled,
            format!("{} cancelled their swap proposal", proposer_name),
            Some(swap_id),
        )
        .await;

        Self::fetch(pool, swap_id).await
    }

    /// Confirm completion for the calling party. When the second side
    /// confirms, the swap settles: items sold, both parties rewarded,
    /// both notified. Settlement fires exactly once.
    pub async fn complete(
        pool: &PgPool,
        rewards: &RewardConfig,
        swap_id: i64,
        actor_id: i64,
    ) -> Result<CompletionOutcome, ExchangeError> {
        let swap = Self::fetch(pool, swap_id).await?;

        let role = swap
            .role_of(actor_id)
            .ok_or_else(|| ExchangeError::unauthorized("You are not a party to this swap"))?;

        if !SwapRepository::set_completed_if(pool, swap_id, role).await? {
            // CAS lost: either the swap is no longer accepted, or this side
            // already confirmed. Read fresh state to say which.
            let fresh = Self::fetch(pool, swap_id).await?;
            return Err(if fresh.status != SwapStatus::Accepted {
                ExchangeError::invalid_state(format!("This swap is {}", fresh.status))
            } else {
                ExchangeError::AlreadyCompleted
            });
        }

        let finalized = SwapRepository::finalize_if_confirmed(pool, swap_id).await?;
        if finalized {
            Self::settle(pool, rewards, &swap).await;
        }

        let fresh = Self::fetch(pool, swap_id).await?;
        Ok(CompletionOutcome {
            swap: fresh,
            finalized,
        })
    }

    /// Swaps for a user: incoming, outgoing, or both
    pub async fn list(
        pool: &PgPool,
        user_id: i64,
        direction: Option<&str>,
    ) -> Result<Vec<Swap>, ExchangeError> {
        match direction {
            Some("incoming") => SwapRepository::list_incoming(pool, user_id).await,
            Some("outgoing") => SwapRepository::list_outgoing(pool, user_id).await,
            None | Some("all") => SwapRepository::list_for_user(pool, user_id).await,
            Some(other) => Err(ExchangeError::validation(format!(
                "Unknown swap direction: {}",
                other
            ))),
        }
    }

    /// Settlement fan-out after the finalize CAS won. Everything here is
    /// non-fatal: the swap is already completed.
    async fn settle(pool: &PgPool, rewards: &RewardConfig, swap: &Swap) {
        info!(swap_id = swap.swap_id, "Swap settled by bilateral confirmation");

        for item_id in [swap.proposed_item_id, swap.received_item_id] {
            match ItemRepository::set_status(pool, item_id, ItemStatus::Sold).await {
                Ok(()) => {}
                Err(e) => {
                    error!(
                        swap_id = swap.swap_id,
                        item_id,
                        error = %e,
                        "Failed to mark swapped item sold"
                    );
                }
            }
        }

        for user_id in [swap.proposer_id, swap.receiver_id] {
            if let Err(e) = PointsLedger::grant(
                pool,
                user_id,
                rewards.swap_completion_reward,
                PointsReason::Swap,
            )
            .await
            {
                error!(
                    swap_id = swap.swap_id,
                    user_id,
                    error = %e,
                    "Swap completion reward failed (swap stays completed)"
                );
            }

            NotificationEmitter::notify(
                pool,
                user_id,
                None,
                NotificationKind::SwapCompleted,
                format!(
                    "Your swap is complete. You earned {} points",
                    rewards.swap_completion_reward
                ),
                Some(swap.swap_id),
            )
            .await;
        }
    }

    /// Drive a table-validated CAS transition out of the swap's current
    /// status. Reports the fresh status when the CAS loses a race.
    async fn transition(
        pool: &PgPool,
        swap: &Swap,
        to: SwapStatus,
    ) -> Result<(), ExchangeError> {
        if !SwapStatus::can_transition(swap.status, to) {
            return Err(ExchangeError::invalid_state(format!(
                "This swap is already {}",
                swap.status
            )));
        }

        if !SwapRepository::update_status_if(pool, swap.swap_id, swap.status, to).await? {
            let fresh = Self::fetch(pool, swap.swap_id).await?;
            return Err(ExchangeError::invalid_state(format!(
                "This swap is already {}",
                fresh.status
            )));
        }

        Ok(())
    }

    fn ensure_swappable(item: &Item) -> Result<(), ExchangeError> {
        if !item.listing_type.allows_swap() {
            return Err(ExchangeError::invalid_state(format!(
                "Item '{}' is listed for {} and cannot be swapped",
                item.title, item.listing_type
            )));
        }
        if !item.is_actionable() {
            return Err(ExchangeError::invalid_state(format!(
                "Item '{}' is {} and cannot enter a swap",
                item.title, item.status
            )));
        }
        Ok(())
    }

    async fn fetch(pool: &PgPool, swap_id: i64) -> Result<Swap, ExchangeError> {
        SwapRepository::get(pool, swap_id)
            .await?
            .ok_or(ExchangeError::NotFound("Swap"))
    }

    async fn fetch_item(pool: &PgPool, item_id: i64) -> Result<Item, ExchangeError> {
        ItemRepository::get_by_id(pool, item_id)
            .await?
            .ok_or(ExchangeError::NotFound("Item"))
    }

    /// Best-effort display name for notification text
    async fn display_name(pool: &PgPool, user_id: i64) -> String {
        match UserRepository::get_by_id(pool, user_id).await {
            Ok(Some(user)) => user.fullname,
            _ => "A user".to_string(),
        }
    }
}
