//! Notification Emitter
//!
//! Fire-and-forget: a failed emit is logged and swallowed. The primary
//! state mutation that triggered the event is never rolled back because the
//! counterpart could not be informed.

use sqlx::PgPool;
use tracing::{debug, warn};

use super::models::NotificationKind;
use super::repository::NotificationRepository;

pub struct NotificationEmitter;

impl NotificationEmitter {
    /// Emit a notification to `receiver_id`. Never fails.
    pub async fn notify(
        pool: &PgPool,
        receiver_id: i64,
        sender_id: Option<i64>,
        kind: NotificationKind,
        message: impl Into<String>,
        resource_id: Option<i64>,
    ) {
        let message = message.into();
        match NotificationRepository::create(
            pool,
            receiver_id,
            sender_id,
            kind,
            &message,
            resource_id,
        )
        .await
        {
            Ok(notification_id) => {
                debug!(notification_id, receiver_id, kind = %kind, "Notification emitted");
            }
            Err(e) => {
                warn!(
                    receiver_id,
                    kind = %kind,
                    error = %e,
                    "Failed to emit notification (primary operation unaffected)"
                );
            }
        }
    }
}
