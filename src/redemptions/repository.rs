//! Redemption persistence
//!
//! The "at most one non-cancelled redemption per item" invariant lives in
//! the database: a partial unique index on `(item_id) WHERE status <>
//! cancelled` backs the conditional insert, so two concurrent redeemers
//! cannot both pass a check-then-insert.

use sqlx::{PgPool, Row};

use super::models::Redemption;
use super::state::RedemptionStatus;
use crate::error::ExchangeError;

pub struct RedemptionRepository;

const REDEMPTION_COLUMNS: &str = r#"redemption_id, user_id, item_id, points_used, status,
    confirmed_by_sender, confirmed_by_receiver, created_at, updated_at"#;

impl RedemptionRepository {
    /// Conditional insert: create a PENDING redemption only if no
    /// non-cancelled redemption exists for the item. Returns `None` when the
    /// slot is already taken. Runs inside the caller's transaction so it
    /// commits or rolls back together with the points debit.
    pub async fn create_if_absent(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: i64,
        item_id: i64,
        points_used: i64,
    ) -> Result<Option<Redemption>, ExchangeError> {
        let sql = format!(
            r#"INSERT INTO redemptions_tb (user_id, item_id, points_used, status)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (item_id) WHERE status <> -10 DO NOTHING
               RETURNING {}"#,
            REDEMPTION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(item_id)
            .bind(points_used)
            .bind(RedemptionStatus::Pending.id())
            .fetch_optional(&mut **tx)
            .await?;

        row.as_ref().map(Self::row_to_redemption).transpose()
    }

    /// Get a redemption by id
    pub async fn get(
        pool: &PgPool,
        redemption_id: i64,
    ) -> Result<Option<Redemption>, ExchangeError> {
        let sql = format!(
            r#"SELECT {} FROM redemptions_tb WHERE redemption_id = $1"#,
            REDEMPTION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(redemption_id)
            .fetch_optional(pool)
            .await?;

        row.as_ref().map(Self::row_to_redemption).transpose()
    }

    /// The non-cancelled redemption holding an item, if any
    pub async fn get_active_for_item(
        pool: &PgPool,
        item_id: i64,
    ) -> Result<Option<Redemption>, ExchangeError> {
        let sql = format!(
            r#"SELECT {} FROM redemptions_tb
               WHERE item_id = $1 AND status <> $2"#,
            REDEMPTION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(item_id)
            .bind(RedemptionStatus::Cancelled.id())
            .fetch_optional(pool)
            .await?;

        row.as_ref().map(Self::row_to_redemption).transpose()
    }

    /// A user's redemptions, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<Redemption>, ExchangeError> {
        let sql = format!(
            r#"SELECT {} FROM redemptions_tb WHERE user_id = $1
               ORDER BY created_at DESC, redemption_id DESC"#,
            REDEMPTION_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(user_id).fetch_all(pool).await?;
        rows.iter().map(Self::row_to_redemption).collect()
    }

    /// CAS: record the owner's shipment while the redemption is still
    /// PENDING and unshipped.
    pub async fn mark_shipped_if(
        pool: &PgPool,
        redemption_id: i64,
    ) -> Result<bool, ExchangeError> {
        let result = sqlx::query(
            r#"UPDATE redemptions_tb SET confirmed_by_sender = TRUE, updated_at = NOW()
               WHERE redemption_id = $1 AND status = $2 AND confirmed_by_sender = FALSE"#,
        )
        .bind(redemption_id)
        .bind(RedemptionStatus::Pending.id())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// CAS: complete the redemption on receipt. Requires a prior shipment
    /// confirmation; fires at most once.
    pub async fn complete_if_shipped(
        pool: &PgPool,
        redemption_id: i64,
    ) -> Result<bool, ExchangeError> {
        let result = sqlx::query(
            r#"UPDATE redemptions_tb
               SET status = $1, confirmed_by_receiver = TRUE, updated_at = NOW()
               WHERE redemption_id = $2 AND status = $3
                 AND confirmed_by_sender = TRUE AND confirmed_by_receiver = FALSE"#,
        )
        .bind(RedemptionStatus::Completed.id())
        .bind(redemption_id)
        .bind(RedemptionStatus::Pending.id())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// CAS: cancel only while PENDING and unshipped.
    pub async fn cancel_if_unshipped(
        pool: &PgPool,
        redemption_id: i64,
    ) -> Result<bool, ExchangeError> {
        let result = sqlx::query(
            r#"UPDATE redemptions_tb SET status = $1, updated_at = NOW()
               WHERE redemption_id = $2 AND status = $3 AND confirmed_by_sender = FALSE"#,
        )
        .bind(RedemptionStatus::Cancelled.id())
        .bind(redemption_id)
        .bind(RedemptionStatus::Pending.id())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_redemption(row: &sqlx::postgres::PgRow) -> Result<Redemption, ExchangeError> {
        let status_id: i16 = row.get("status");
        let status = RedemptionStatus::from_id(status_id).ok_or_else(|| {
            ExchangeError::Internal(format!("Invalid redemption status: {}", status_id))
        })?;

        Ok(Redemption {
            redemption_id: row.get("redemption_id"),
            user_id: row.get("user_id"),
            item_id: row.get("item_id"),
            points_used: row.get("points_used"),
            status,
            confirmed_by_sender: row.get("confirmed_by_sender"),
            confirmed_by_receiver: row.get("confirmed_by_receiver"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
