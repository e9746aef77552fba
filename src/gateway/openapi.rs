//! OpenAPI documentation

use utoipa::OpenApi;

use crate::gateway::handlers;
use crate::user_auth;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "rewear API",
        description = "Community clothing exchange: swaps, point redemptions, and a points ledger",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        handlers::health::health_check,
        user_auth::handlers::register,
        user_auth::handlers::login,
        user_auth::handlers::me,
        handlers::items::create_item,
        handlers::items::list_items,
        handlers::items::get_item,
        handlers::items::my_items,
        handlers::items::update_item,
        handlers::items::delete_item,
        handlers::swaps::propose_swap,
        handlers::swaps::list_swaps,
        handlers::swaps::get_swap,
        handlers::swaps::accept_swap,
        handlers::swaps::reject_swap,
        handlers::swaps::cancel_swap,
        handlers::swaps::complete_swap,
        handlers::redemptions::redeem_item,
        handlers::redemptions::get_redemption_status,
        handlers::redemptions::list_redemptions,
        handlers::redemptions::mark_shipped,
        handlers::redemptions::mark_received,
        handlers::redemptions::cancel_redemption,
        handlers::notifications::list_notifications,
        handlers::notifications::list_unread,
        handlers::notifications::mark_notification_read,
        handlers::notifications::mark_many_read,
        handlers::notifications::delete_notification,
        handlers::points::get_balance,
        handlers::points::get_history,
        handlers::points::reconcile,
    ),
    components(schemas(
        crate::items::Item,
        crate::items::ItemStatus,
        crate::items::ListingType,
        crate::items::Category,
        crate::items::Condition,
        crate::items::Gender,
        crate::items::Size,
        crate::items::ItemPage,
        crate::swaps::Swap,
        crate::swaps::SwapStatus,
        crate::swaps::service::CompletionOutcome,
        crate::redemptions::Redemption,
        crate::redemptions::RedemptionStatus,
        crate::points::PointsEntry,
        crate::points::PointsKind,
        crate::points::PointsReason,
        crate::points::ledger::ReconcileReport,
        crate::notifications::Notification,
        crate::notifications::NotificationKind,
        crate::users::models::UserProfile,
        crate::user_auth::service::RegisterRequest,
        crate::user_auth::service::LoginRequest,
        crate::user_auth::service::AuthResponse,
        handlers::items::CreateItemRequest,
        handlers::items::UpdateItemRequest,
        handlers::swaps::ProposeSwapRequest,
        handlers::notifications::MarkManyReadRequest,
        handlers::points::BalanceData,
        handlers::health::HealthData,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Registration and login"),
        (name = "Items", description = "Item listings"),
        (name = "Swaps", description = "Item-for-item exchanges"),
        (name = "Redemptions", description = "Points-for-item exchanges"),
        (name = "Notifications", description = "User notifications"),
        (name = "Points", description = "Points ledger and balance"),
    )
)]
pub struct ApiDoc;
