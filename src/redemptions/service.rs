//! Redemption Orchestrator
//!
//! The create path is the one place two conditional writes must land
//! together: the redemption insert (keyed on the per-item partial unique
//! index) and the points debit (decrement-if-sufficient) share a short
//! transaction, so a loser on either guard leaves no trace. Everything
//! after the primary write is non-fatal fan-out.

use sqlx::PgPool;
use tracing::{error, info, warn};

use super::models::Redemption;
use super::repository::RedemptionRepository;
use super::state::RedemptionStatus;
use crate::error::ExchangeError;
use crate::items::{Item, ItemRepository, ItemStatus};
use crate::notifications::{NotificationEmitter, NotificationKind};
use crate::points::{PointsLedger, PointsReason};
use crate::users::UserRepository;

pub struct RedemptionService;

impl RedemptionService {
    /// Redeem an item with points.
    ///
    /// Items are locked by redemption the same way swap-acceptance locks
    /// them: the item moves to `inactive` while the redemption is pending.
    pub async fn redeem(
        pool: &PgPool,
        redeemer_id: i64,
        item_id: i64,
    ) -> Result<Redemption, ExchangeError> {
        let item = Self::fetch_item(pool, item_id).await?;

        if item.owner_id == redeemer_id {
            return Err(ExchangeError::validation("You cannot redeem your own item"));
        }
        if !item.listing_type.allows_redemption() {
            return Err(ExchangeError::invalid_state(format!(
                "Item '{}' is listed for {} and cannot be redeemed",
                item.title, item.listing_type
            )));
        }
        if !item.is_actionable() {
            // The item is locked or gone; say why when a redemption holds it
            if RedemptionRepository::get_active_for_item(pool, item_id)
                .await?
                .is_some()
            {
                return Err(ExchangeError::AlreadyRedeemed);
            }
            return Err(ExchangeError::invalid_state(format!(
                "Item '{}' is {} and cannot be redeemed",
                item.title, item.status
            )));
        }

        // Primary mutation: redemption insert + points debit, together.
        let mut tx = pool.begin().await?;

        let redemption =
            match RedemptionRepository::create_if_absent(&mut tx, redeemer_id, item_id, item.price)
                .await?
            {
                Some(redemption) => redemption,
                None => return Err(ExchangeError::AlreadyRedeemed),
            };

        PointsLedger::debit_in_tx(&mut tx, redeemer_id, item.price, PointsReason::Redemption)
            .await?;

        tx.commit().await?;

        info!(
            redemption_id = redemption.redemption_id,
            item_id,
            redeemer_id,
            points_used = redemption.points_used,
            "Item redeemed"
        );

        // Lock the item. The redemption row is the authority on the slot;
        // losing this CAS means a swap acceptance grabbed the item in the
        // same instant, which the logs need to surface.
        if !ItemRepository::set_status_if(pool, item_id, ItemStatus::Active, ItemStatus::Inactive)
            .await?
        {
            warn!(item_id, "Item was not active after winning the redemption slot");
        }

        let redeemer_name = Self::display_name(pool, redeemer_id).await;
        NotificationEmitter::notify(
            pool,
            item.owner_id,
            Some(redeemer_id),
            NotificationKind::ItemRedeemed,
            format!("{} has redeemed your item: {}", redeemer_name, item.title),
            Some(redemption.redemption_id),
        )
        .await;

        Ok(redemption)
    }

    /// The non-cancelled redemption holding an item, if any. The UI uses
    /// this to distinguish "yours pending" / "someone else's" / "available".
    pub async fn status_for_item(
        pool: &PgPool,
        item_id: i64,
    ) -> Result<Option<Redemption>, ExchangeError> {
        RedemptionRepository::get_active_for_item(pool, item_id).await
    }

    /// A user's redemptions, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<Redemption>, ExchangeError> {
        RedemptionRepository::list_for_user(pool, user_id).await
    }

    /// Item owner confirms shipment.
    pub async fn mark_shipped(
        pool: &PgPool,
        redemption_id: i64,
        actor_id: i64,
    ) -> Result<Redemption, ExchangeError> {
        let redemption = Self::fetch(pool, redemption_id).await?;
        let item = Self::fetch_item(pool, redemption.item_id).await?;

        if item.owner_id != actor_id {
            return Err(ExchangeError::unauthorized(
                "Only the item owner can mark the item as shipped",
            ));
        }

        if !RedemptionRepository::mark_shipped_if(pool, redemption_id).await? {
            let fresh = Self::fetch(pool, redemption_id).await?;
            return Err(if fresh.status != RedemptionStatus::Pending {
                ExchangeError::invalid_state(format!("This redemption is {}", fresh.status))
            } else {
                ExchangeError::invalid_state("Item already marked as shipped")
            });
        }

        info!(redemption_id, actor_id, "Redemption marked shipped");

        let owner_name = Self::display_name(pool, actor_id).await;
        NotificationEmitter::notify(
            pool,
            redemption.user_id,
            Some(actor_id),
            NotificationKind::ItemShipped,
            format!("{} has shipped your item", owner_name),
            Some(redemption_id),
        )
        .await;

        Self::fetch(pool, redemption_id).await
    }

    /// Redeemer confirms receipt. Completes the redemption, marks the item
    /// sold, and rewards the owner with the points the redeemer spent.
    pub async fn mark_received(
        pool: &PgPool,
        redemption_id: i64,
        actor_id: i64,
    ) -> Result<Redemption, ExchangeError> {
        let redemption = Self::fetch(pool, redemption_id).await?;

        if redemption.user_id != actor_id {
            return Err(ExchangeError::unauthorized(
                "Only the redeemer can confirm receipt",
            ));
        }

        // Table check before the CAS: terminal states fail here with a
        // specific reason, the shipped-flag guard stays in the CAS itself.
        if !RedemptionStatus::can_transition(redemption.status, RedemptionStatus::Completed) {
            return Err(match redemption.status {
                RedemptionStatus::Completed => {
                    ExchangeError::invalid_state("Already marked as received")
                }
                status => ExchangeError::invalid_state(format!("This redemption is {}", status)),
            });
        }

        if !RedemptionRepository::complete_if_shipped(pool, redemption_id).await? {
            let fresh = Self::fetch(pool, redemption_id).await?;
            return Err(match fresh.status {
                RedemptionStatus::Pending if !fresh.confirmed_by_sender => {
                    ExchangeError::invalid_state(
                        "Sender has not shipped the item so receiver cannot receive it",
                    )
                }
                RedemptionStatus::Completed => {
                    ExchangeError::invalid_state("Already marked as received")
                }
                status => ExchangeError::invalid_state(format!("This redemption is {}", status)),
            });
        }

        info!(redemption_id, actor_id, "Redemption completed");

        let item = Self::fetch_item(pool, redemption.item_id).await?;

        // The completed redemption owns the item lock; the sale is
        // unconditional from here.
        if let Err(e) = ItemRepository::set_status(pool, item.item_id, ItemStatus::Sold).await {
            error!(
                redemption_id,
                item_id = item.item_id,
                error = %e,
                "Failed to mark redeemed item sold"
            );
        }

        if let Err(e) = PointsLedger::grant(
            pool,
            item.owner_id,
            redemption.points_used,
            PointsReason::Redemption,
        )
        .await
        {
            error!(
                redemption_id,
                owner_id = item.owner_id,
                error = %e,
                "Owner reward failed (redemption stays completed)"
            );
        }

        let redeemer_name = Self::display_name(pool, actor_id).await;
        NotificationEmitter::notify(
            pool,
            item.owner_id,
            Some(actor_id),
            NotificationKind::ItemReceived,
            format!(
                "{} confirmed they received the item you shipped",
                redeemer_name
            ),
            Some(redemption_id),
        )
        .await;

        Self::fetch(pool, redemption_id).await
    }

    /// Redeemer backs out before shipment. Releases the item and refunds
    /// the debit.
    pub async fn cancel(
        pool: &PgPool,
        redemption_id: i64,
        actor_id: i64,
    ) -> Result<Redemption, ExchangeError> {
        let redemption = Self::fetch(pool, redemption_id).await?;

        if redemption.user_id != actor_id {
            return Err(ExchangeError::unauthorized(
                "User is not authorized to cancel this redemption",
            ));
        }

        if !RedemptionStatus::can_transition(redemption.status, RedemptionStatus::Cancelled) {
            return Err(match redemption.status {
                RedemptionStatus::Completed => {
                    ExchangeError::invalid_state("Cannot cancel a completed redemption")
                }
                status => ExchangeError::invalid_state(format!(
                    "This redemption is already {}",
                    status
                )),
            });
        }

        if !RedemptionRepository::cancel_if_unshipped(pool, redemption_id).await? {
            // The table allowed the edge, so the CAS can only have lost to
            // the shipment flag or a concurrent transition
            let fresh = Self::fetch(pool, redemption_id).await?;
            return Err(match fresh.status {
                RedemptionStatus::Pending => {
                    ExchangeError::invalid_state("Cannot cancel a shipped redemption")
                }
                RedemptionStatus::Completed => {
                    ExchangeError::invalid_state("Cannot cancel a completed redemption")
                }
                RedemptionStatus::Cancelled => {
                    ExchangeError::invalid_state("This redemption is already cancelled")
                }
            });
        }

        info!(redemption_id, actor_id, "Redemption cancelled");

        let item = Self::fetch_item(pool, redemption.item_id).await?;

        // Release the item lock taken at creation
        if !ItemRepository::set_status_if(
            pool,
            item.item_id,
            ItemStatus::Inactive,
            ItemStatus::Active,
        )
        .await?
        {
            warn!(
                redemption_id,
                item_id = item.item_id,
                "Item was not inactive at redemption cancel"
            );
        }

        // Refund the debit so the ledger and the balance stay consistent
        if let Err(e) = PointsLedger::grant(
            pool,
            redemption.user_id,
            redemption.points_used,
            PointsReason::Redemption,
        )
        .await
        {
            error!(
                redemption_id,
                user_id = redemption.user_id,
                error = %e,
                "Refund failed after cancel (redemption stays cancelled)"
            );
        }

        let redeemer_name = Self::display_name(pool, actor_id).await;
        NotificationEmitter::notify(
            pool,
            item.owner_id,
            Some(actor_id),
            NotificationKind::RedemptionCancelled,
            format!("{} cancelled their redemption order", redeemer_name),
            Some(redemption_id),
        )
        .await;

        Self::fetch(pool, redemption_id).await
    }

    async fn fetch(pool: &PgPool, redemption_id: i64) -> Result<Redemption, ExchangeError> {
        RedemptionRepository::get(pool, redemption_id)
            .await?
            .ok_or(ExchangeError::NotFound("Redemption"))
    }

    async fn fetch_item(pool: &PgPool, item_id: i64) -> Result<Item, ExchangeError> {
        ItemRepository::get_by_id(pool, item_id)
            .await?
            .ok_or(ExchangeError::NotFound("Item"))
    }

    async fn display_name(pool: &PgPool, user_id: i64) -> String {
        match UserRepository::get_by_id(pool, user_id).await {
            Ok(Some(user)) => user.fullname,
            _ => "A user".to_string(),
        }
    }
}
