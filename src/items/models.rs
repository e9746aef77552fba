//! Item models
//!
//! Status ids are stored as SMALLINT; taxonomy enums are stored as text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Item lifecycle status.
///
/// `Active` items can enter an exchange; `Inactive` items are locked into a
/// pending/accepted exchange; `Sold` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active = 1,
    Inactive = 2,
    Sold = 3,
}

impl ItemStatus {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(ItemStatus::Active),
            2 => Some(ItemStatus::Inactive),
            3 => Some(ItemStatus::Sold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
            ItemStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            pub fn from_str(s: &str) -> Option<Self> {
                match s {
                    $($text => Some(Self::$variant)),+,
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

text_enum!(Category {
    Shirt => "shirt",
    Tshirt => "tshirt",
    Pant => "pant",
    Jacket => "jacket",
    Dress => "dress",
    Accessories => "accessories",
    Footwear => "footwear",
});

text_enum!(Gender {
    Male => "male",
    Female => "female",
    Unisex => "unisex",
});

text_enum!(Size {
    Small => "small",
    Medium => "medium",
    Large => "large",
    Xlarge => "xlarge",
});

text_enum!(Condition {
    NewWithTags => "new_with_tags",
    NewWithoutTags => "new_without_tags",
    LikeNew => "like_new",
    Used => "used",
    GentlyUsed => "gently_used",
    Good => "good",
    Fair => "fair",
    Poor => "poor",
});

text_enum!(ListingType {
    Swap => "swap",
    Redeem => "redeem",
    Giveaway => "giveaway",
});

impl ListingType {
    /// Whether this listing can be the subject of a swap proposal
    #[inline]
    pub fn allows_swap(&self) -> bool {
        matches!(self, ListingType::Swap | ListingType::Giveaway)
    }

    /// Whether this listing can be redeemed with points.
    /// Giveaways are redeemable at zero cost.
    #[inline]
    pub fn allows_redemption(&self) -> bool {
        matches!(self, ListingType::Redeem | ListingType::Giveaway)
    }

    /// Only redeemable listings carry a point price
    #[inline]
    pub fn carries_price(&self) -> bool {
        matches!(self, ListingType::Redeem)
    }
}

/// A listed garment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Item {
    pub item_id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub gender: Option<Gender>,
    pub size: Size,
    pub condition: Condition,
    pub tags: Vec<String>,
    /// Point cost; zero for non-redeemable listing types
    pub price: i64,
    pub images: Vec<String>,
    pub listing_type: ListingType,
    pub status: ItemStatus,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Whether a new exchange may be proposed against this item.
    /// Must be re-checked at write time, not just at render time.
    #[inline]
    pub fn is_actionable(&self) -> bool {
        self.status == ItemStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_id_roundtrip() {
        for status in [ItemStatus::Active, ItemStatus::Inactive, ItemStatus::Sold] {
            assert_eq!(ItemStatus::from_id(status.id()), Some(status));
        }
        assert!(ItemStatus::from_id(0).is_none());
        assert!(ItemStatus::from_id(99).is_none());
    }

    #[test]
    fn test_listing_type_gates() {
        assert!(ListingType::Swap.allows_swap());
        assert!(!ListingType::Swap.allows_redemption());

        assert!(ListingType::Redeem.allows_redemption());
        assert!(!ListingType::Redeem.allows_swap());
        assert!(ListingType::Redeem.carries_price());

        // Giveaways travel either path, always at zero cost
        assert!(ListingType::Giveaway.allows_swap());
        assert!(ListingType::Giveaway.allows_redemption());
        assert!(!ListingType::Giveaway.carries_price());
    }

    #[test]
    fn test_text_enum_roundtrip() {
        assert_eq!(Category::from_str("footwear"), Some(Category::Footwear));
        assert_eq!(
            Condition::from_str("new_with_tags"),
            Some(Condition::NewWithTags)
        );
        assert_eq!(ListingType::from_str("giveaway"), Some(ListingType::Giveaway));
        assert!(Size::from_str("xxl").is_none());
    }
}
