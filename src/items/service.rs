//! Item listing service
//!
//! Listing is the one item operation with an exchange-core side effect: the
//! first listing ever made by a user fires a one-shot points bonus and a
//! welcome notification. The bonus guard lives in the ledger, not in a
//! count of prior items.

use sqlx::PgPool;
use tracing::{info, warn};

use super::models::Item;
use super::repository::{ItemRepository, NewItem};
use crate::config::RewardConfig;
use crate::error::ExchangeError;
use crate::notifications::{NotificationEmitter, NotificationKind};
use crate::points::{PointsLedger, PointsReason};

/// Maximum images per listing
pub const MAX_IMAGES: usize = 5;

pub struct ItemService;

impl ItemService {
    /// List a new item.
    ///
    /// Validates the payload, zeroes the price for non-redeemable listing
    /// types, and fires the first-listing bonus when this is the owner's
    /// first item. Bonus or notification failures never unwind the listing.
    pub async fn create_item(
        pool: &PgPool,
        rewards: &RewardConfig,
        item: NewItem,
    ) -> Result<Item, ExchangeError> {
        Self::validate(&item)?;

        let mut item = item;
        if !item.listing_type.carries_price() {
            item.price = 0;
        }

        let created = ItemRepository::create(pool, &item).await?;
        info!(
            item_id = created.item_id,
            owner_id = created.owner_id,
            listing_type = %created.listing_type,
            "Item listed"
        );

        // First-listing bonus: one-shot, ledger-guarded
        match PointsLedger::grant_once(
            pool,
            created.owner_id,
            rewards.first_listing_bonus,
            PointsReason::FirstListing,
        )
        .await
        {
            Ok(true) => {
                NotificationEmitter::notify(
                    pool,
                    created.owner_id,
                    None,
                    NotificationKind::PointsAwarded,
                    format!(
                        "{} (+{} points)",
                        PointsReason::FirstListing.label(),
                        rewards.first_listing_bonus
                    ),
                    Some(created.item_id),
                )
                .await;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(
                    owner_id = created.owner_id,
                    error = %e,
                    "First-listing bonus failed (listing kept)"
                );
            }
        }

        Ok(created)
    }

    /// Update the mutable fields of a listing. Owner only.
    pub async fn update_item(
        pool: &PgPool,
        actor_id: i64,
        item_id: i64,
        description: Option<String>,
        condition: Option<super::models::Condition>,
        size: Option<super::models::Size>,
        price: Option<i64>,
        images: Option<Vec<String>>,
    ) -> Result<Item, ExchangeError> {
        let existing = ItemRepository::get_by_id(pool, item_id)
            .await?
            .ok_or(ExchangeError::NotFound("Item"))?;

        if existing.owner_id != actor_id {
            return Err(ExchangeError::unauthorized(
                "User does not have the permission to update the item",
            ));
        }

        let images = images.unwrap_or_else(|| existing.images.clone());
        if images.is_empty() {
            return Err(ExchangeError::validation(
                "At least one image is required to create an item",
            ));
        }
        if images.len() > MAX_IMAGES {
            return Err(ExchangeError::validation(
                "You can upload a maximum of 5 images",
            ));
        }

        let price = if existing.listing_type.carries_price() {
            price.unwrap_or(existing.price)
        } else {
            0
        };
        if price < 0 {
            return Err(ExchangeError::validation("Price must be zero or more"));
        }

        ItemRepository::update(
            pool,
            item_id,
            description.as_deref().unwrap_or(&existing.description),
            condition.unwrap_or(existing.condition),
            size.unwrap_or(existing.size),
            price,
            &images,
        )
        .await
    }

    /// Delete a listing. Owner only, and only while still active; an item
    /// locked into an exchange cannot be deleted out from under it.
    pub async fn delete_item(
        pool: &PgPool,
        actor_id: i64,
        item_id: i64,
    ) -> Result<(), ExchangeError> {
        let existing = ItemRepository::get_by_id(pool, item_id)
            .await?
            .ok_or(ExchangeError::NotFound("Item"))?;

        if existing.owner_id != actor_id {
            return Err(ExchangeError::unauthorized(
                "User is not permitted to delete the item",
            ));
        }

        if !ItemRepository::delete_if_active(pool, item_id).await? {
            return Err(ExchangeError::invalid_state(format!(
                "Cannot delete an item that is {}",
                existing.status
            )));
        }

        info!(item_id, owner_id = actor_id, "Item deleted");
        Ok(())
    }

    fn validate(item: &NewItem) -> Result<(), ExchangeError> {
        if item.title.trim().len() < 3 {
            return Err(ExchangeError::validation(
                "Title must be at least 3 characters",
            ));
        }
        if item.description.trim().len() < 3 {
            return Err(ExchangeError::validation(
                "Description must be at least 3 characters",
            ));
        }
        if item.images.is_empty() {
            return Err(ExchangeError::validation(
                "At least one image is required to create an item",
            ));
        }
        if item.images.len() > MAX_IMAGES {
            return Err(ExchangeError::validation(
                "You can upload a maximum of 5 images",
            ));
        }
        if item.price < 0 {
            return Err(ExchangeError::validation("Price must be zero or more"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::models::{Category, Condition, ListingType, Size};

    fn new_item(listing_type: ListingType, price: i64, images: usize) -> NewItem {
        NewItem {
            owner_id: 1,
            title: "Denim jacket".to_string(),
            description: "Lightly worn".to_string(),
            category: Category::Jacket,
            gender: None,
            size: Size::Medium,
            condition: Condition::GentlyUsed,
            tags: vec![],
            price,
            images: (0..images).map(|i| format!("https://img/{}.jpg", i)).collect(),
            listing_type,
            color: None,
            brand: None,
        }
    }

    #[test]
    fn test_validate_requires_image() {
        let item = new_item(ListingType::Swap, 0, 0);
        let err = ItemService::validate(&item).unwrap_err();
        assert!(matches!(err, ExchangeError::Validation(_)));
    }

    #[test]
    fn test_validate_caps_images_at_five() {
        assert!(ItemService::validate(&new_item(ListingType::Swap, 0, 5)).is_ok());
        let err = ItemService::validate(&new_item(ListingType::Swap, 0, 6)).unwrap_err();
        assert!(matches!(err, ExchangeError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_short_title() {
        let mut item = new_item(ListingType::Redeem, 30, 1);
        item.title = "ab".to_string();
        assert!(ItemService::validate(&item).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let item = new_item(ListingType::Redeem, -5, 1);
        assert!(ItemService::validate(&item).is_err());
    }
}
