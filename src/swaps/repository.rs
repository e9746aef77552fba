//! Swap persistence
//!
//! All state updates are atomic CAS operations keyed on the expected
//! status, so two concurrent transitions on the same swap cannot both win.

use sqlx::{PgPool, Row};

use super::models::{Swap, SwapRole};
use super::state::SwapStatus;
use crate::error::ExchangeError;

pub struct SwapRepository;

const SWAP_COLUMNS: &str = r#"swap_id, proposer_id, proposed_item_id, receiver_id,
    received_item_id, message, status, proposer_completed, receiver_completed,
    created_at, updated_at"#;

impl SwapRepository {
    /// Create a new swap in PENDING state
    pub async fn create(
        pool: &PgPool,
        proposer_id: i64,
        proposed_item_id: i64,
        receiver_id: i64,
        received_item_id: i64,
        message: Option<&str>,
    ) -> Result<Swap, ExchangeError> {
        let sql = format!(
            r#"INSERT INTO swaps_tb
                   (proposer_id, proposed_item_id, receiver_id, received_item_id, message, status)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {}"#,
            SWAP_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(proposer_id)
            .bind(proposed_item_id)
            .bind(receiver_id)
            .bind(received_item_id)
            .bind(message)
            .bind(SwapStatus::Pending.id())
            .fetch_one(pool)
            .await?;

        Self::row_to_swap(&row)
    }

    /// Get a swap by id
    pub async fn get(pool: &PgPool, swap_id: i64) -> Result<Option<Swap>, ExchangeError> {
        let sql = format!(r#"SELECT {} FROM swaps_tb WHERE swap_id = $1"#, SWAP_COLUMNS);
        let row = sqlx::query(&sql).bind(swap_id).fetch_optional(pool).await?;

        row.as_ref().map(Self::row_to_swap).transpose()
    }

    /// Atomic CAS: move status only if the current status matches.
    /// Returns false when another transition already moved the swap.
    pub async fn update_status_if(
        pool: &PgPool,
        swap_id: i64,
        expected: SwapStatus,
        new: SwapStatus,
    ) -> Result<bool, ExchangeError> {
        let result = sqlx::query(
            r#"UPDATE swaps_tb SET status = $1, updated_at = NOW()
               WHERE swap_id = $2 AND status = $3"#,
        )
        .bind(new.id())
        .bind(swap_id)
        .bind(expected.id())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Atomic CAS on one side's completion flag: set it only while the swap
    /// is ACCEPTED and the flag is still clear. Returns false when the actor
    /// already confirmed or the swap has left ACCEPTED.
    pub async fn set_completed_if(
        pool: &PgPool,
        swap_id: i64,
        role: SwapRole,
    ) -> Result<bool, ExchangeError> {
        let sql = match role {
            SwapRole::Proposer => {
                r#"UPDATE swaps_tb SET proposer_completed = TRUE, updated_at = NOW()
                   WHERE swap_id = $1 AND status = $2 AND proposer_completed = FALSE"#
            }
            SwapRole::Receiver => {
                r#"UPDATE swaps_tb SET receiver_completed = TRUE, updated_at = NOW()
                   WHERE swap_id = $1 AND status = $2 AND receiver_completed = FALSE"#
            }
        };

        let result = sqlx::query(sql)
            .bind(swap_id)
            .bind(SwapStatus::Accepted.id())
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Finalize CAS: move ACCEPTED -> COMPLETED only when both sides have
    /// confirmed. At most one caller ever sees true, so the completion
    /// rewards fire exactly once.
    pub async fn finalize_if_confirmed(
        pool: &PgPool,
        swap_id: i64,
    ) -> Result<bool, ExchangeError> {
        let result = sqlx::query(
            r#"UPDATE swaps_tb SET status = $1, updated_at = NOW()
               WHERE swap_id = $2 AND status = $3
                 AND proposer_completed = TRUE AND receiver_completed = TRUE"#,
        )
        .bind(SwapStatus::Completed.id())
        .bind(swap_id)
        .bind(SwapStatus::Accepted.id())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Swaps where the user is the receiver, newest first
    pub async fn list_incoming(pool: &PgPool, user_id: i64) -> Result<Vec<Swap>, ExchangeError> {
        let sql = format!(
            r#"SELECT {} FROM swaps_tb WHERE receiver_id = $1
               ORDER BY created_at DESC, swap_id DESC"#,
            SWAP_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(user_id).fetch_all(pool).await?;
        rows.iter().map(Self::row_to_swap).collect()
    }

    /// Swaps where the user is the proposer, newest first
    pub async fn list_outgoing(pool: &PgPool, user_id: i64) -> Result<Vec<Swap>, ExchangeError> {
        let sql = format!(
            r#"SELECT {} FROM swaps_tb WHERE proposer_id = $1
               ORDER BY created_at DESC, swap_id DESC"#,
            SWAP_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(user_id).fetch_all(pool).await?;
        rows.iter().map(Self::row_to_swap).collect()
    }

    /// All swaps the user is a party to, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Swap>, ExchangeError> {
        let sql = format!(
            r#"SELECT {} FROM swaps_tb WHERE proposer_id = $1 OR receiver_id = $1
               ORDER BY created_at DESC, swap_id DESC"#,
            SWAP_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(user_id).fetch_all(pool).await?;
        rows.iter().map(Self::row_to_swap).collect()
    }

    fn row_to_swap(row: &sqlx::postgres::PgRow) -> Result<Swap, ExchangeError> {
        let status_id: i16 = row.get("status");
        let status = SwapStatus::from_id(status_id)
            .ok_or_else(|| ExchangeError::Internal(format!("Invalid swap status: {}", status_id)))?;

        Ok(Swap {
            swap_id: row.get("swap_id"),
            proposer_id: row.get("proposer_id"),
            proposed_item_id: row.get("proposed_item_id"),
            receiver_id: row.get("receiver_id"),
            received_item_id: row.get("received_item_id"),
            message: row.get("message"),
            status,
            proposer_completed: row.get("proposer_completed"),
            receiver_completed: row.get("receiver_completed"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
