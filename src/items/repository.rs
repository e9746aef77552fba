//! Item persistence and the availability tracker.
//!
//! `set_status_if` is the CAS every exchange path uses to lock or release an
//! item; it is the authority on "was this item still available when the
//! write landed", not whatever a caller read earlier.

use sqlx::{PgPool, Row};

use super::models::{Category, Condition, Gender, Item, ItemStatus, ListingType, Size};
use crate::error::ExchangeError;

/// New item payload as the service hands it to storage
#[derive(Debug, Clone)]
pub struct NewItem {
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub gender: Option<Gender>,
    pub size: Size,
    pub condition: Condition,
    pub tags: Vec<String>,
    pub price: i64,
    pub images: Vec<String>,
    pub listing_type: ListingType,
    pub color: Option<String>,
    pub brand: Option<String>,
}

/// Listing filters; all optional, combined with AND
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<Category>,
    pub condition: Option<Condition>,
    pub size: Option<Size>,
    pub gender: Option<Gender>,
    pub tags: Vec<String>,
    pub search: Option<String>,
}

/// One page of active listings
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
}

pub struct ItemRepository;

impl ItemRepository {
    /// Insert a new item in `Active` status
    pub async fn create(pool: &PgPool, item: &NewItem) -> Result<Item, ExchangeError> {
        let row = sqlx::query(
            r#"INSERT INTO items_tb
                   (owner_id, title, description, category, gender, size, condition,
                    tags, price, images, listing_type, status, color, brand)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
               RETURNING item_id, owner_id, title, description, category, gender, size,
                         condition, tags, price, images, listing_type, status, color,
                         brand, created_at, updated_at"#,
        )
        .bind(item.owner_id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.category.as_str())
        .bind(item.gender.map(|g| g.as_str()))
        .bind(item.size.as_str())
        .bind(item.condition.as_str())
        .bind(&item.tags)
        .bind(item.price)
        .bind(&item.images)
        .bind(item.listing_type.as_str())
        .bind(ItemStatus::Active.id())
        .bind(item.color.as_deref())
        .bind(item.brand.as_deref())
        .fetch_one(pool)
        .await?;

        Self::row_to_item(&row)
    }

    /// Get an item by id
    pub async fn get_by_id(pool: &PgPool, item_id: i64) -> Result<Option<Item>, ExchangeError> {
        let row = sqlx::query(
            r#"SELECT item_id, owner_id, title, description, category, gender, size,
                      condition, tags, price, images, listing_type, status, color,
                      brand, created_at, updated_at
               FROM items_tb WHERE item_id = $1"#,
        )
        .bind(item_id)
        .fetch_optional(pool)
        .await?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    /// Unconditional status write. Only for transitions that already own the
    /// item's lock (e.g. marking a redeemed item sold after the redemption
    /// CAS won).
    pub async fn set_status(
        pool: &PgPool,
        item_id: i64,
        status: ItemStatus,
    ) -> Result<(), ExchangeError> {
        let result = sqlx::query(
            r#"UPDATE items_tb SET status = $1, updated_at = NOW() WHERE item_id = $2"#,
        )
        .bind(status.id())
        .bind(item_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ExchangeError::NotFound("Item"));
        }
        Ok(())
    }

    /// Atomic CAS: move the item's status only if it currently matches.
    /// Returns false when another transition got there first.
    pub async fn set_status_if(
        pool: &PgPool,
        item_id: i64,
        expected: ItemStatus,
        new: ItemStatus,
    ) -> Result<bool, ExchangeError> {
        let result = sqlx::query(
            r#"UPDATE items_tb SET status = $1, updated_at = NOW()
               WHERE item_id = $2 AND status = $3"#,
        )
        .bind(new.id())
        .bind(item_id)
        .bind(expected.id())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Filtered, paginated page of active listings, newest first
    pub async fn list_active(
        pool: &PgPool,
        filter: &ItemFilter,
        page: i64,
        limit: i64,
    ) -> Result<ItemPage, ExchangeError> {
        if page < 1 || limit < 1 {
            return Err(ExchangeError::validation("Invalid page or limit"));
        }

        let (where_clause, binds) = Self::build_filter(filter);

        let count_sql = format!("SELECT COUNT(*) FROM items_tb WHERE {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind.clone());
        }
        let total_items = count_query.fetch_one(pool).await?;

        let list_sql = format!(
            r#"SELECT item_id, owner_id, title, description, category, gender, size,
                      condition, tags, price, images, listing_type, status, color,
                      brand, created_at, updated_at
               FROM items_tb WHERE {}
               ORDER BY created_at DESC, item_id DESC
               LIMIT {} OFFSET {}"#,
            where_clause,
            limit,
            (page - 1) * limit
        );
        let mut list_query = sqlx::query(&list_sql);
        for bind in &binds {
            list_query = list_query.bind(bind.clone());
        }
        let rows = list_query.fetch_all(pool).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(Self::row_to_item(row)?);
        }

        Ok(ItemPage {
            items,
            total_items,
            total_pages: (total_items + limit - 1) / limit,
            current_page: page,
            limit,
        })
    }

    /// Items owned by a user, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Item>, ExchangeError> {
        let rows = sqlx::query(
            r#"SELECT item_id, owner_id, title, description, category, gender, size,
                      condition, tags, price, images, listing_type, status, color,
                      brand, created_at, updated_at
               FROM items_tb WHERE owner_id = $1
               ORDER BY created_at DESC, item_id DESC"#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        rows.iter().map(Self::row_to_item).collect()
    }

    /// Update the mutable listing fields
    pub async fn update(
        pool: &PgPool,
        item_id: i64,
        description: &str,
        condition: Condition,
        size: Size,
        price: i64,
        images: &[String],
    ) -> Result<Item, ExchangeError> {
        let row = sqlx::query(
            r#"UPDATE items_tb
               SET description = $1, condition = $2, size = $3, price = $4,
                   images = $5, updated_at = NOW()
               WHERE item_id = $6
               RETURNING item_id, owner_id, title, description, category, gender, size,
                         condition, tags, price, images, listing_type, status, color,
                         brand, created_at, updated_at"#,
        )
        .bind(description)
        .bind(condition.as_str())
        .bind(size.as_str())
        .bind(price)
        .bind(images)
        .bind(item_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ExchangeError::NotFound("Item"))?;

        Self::row_to_item(&row)
    }

    /// Delete an item only while it is still active (not locked into an
    /// exchange). Returns false when the guard did not match.
    pub async fn delete_if_active(pool: &PgPool, item_id: i64) -> Result<bool, ExchangeError> {
        let result = sqlx::query(r#"DELETE FROM items_tb WHERE item_id = $1 AND status = $2"#)
            .bind(item_id)
            .bind(ItemStatus::Active.id())
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn build_filter(filter: &ItemFilter) -> (String, Vec<String>) {
        let mut clauses = vec![format!("status = {}", ItemStatus::Active.id())];
        let mut binds: Vec<String> = Vec::new();

        let mut push_bind = |binds: &mut Vec<String>, value: String| -> usize {
            binds.push(value);
            binds.len()
        };

        if let Some(category) = filter.category {
            let n = push_bind(&mut binds, category.as_str().to_string());
            clauses.push(format!("category = ${}", n));
        }
        if let Some(condition) = filter.condition {
            let n = push_bind(&mut binds, condition.as_str().to_string());
            clauses.push(format!("condition = ${}", n));
        }
        if let Some(size) = filter.size {
            let n = push_bind(&mut binds, size.as_str().to_string());
            clauses.push(format!("size = ${}", n));
        }
        if let Some(gender) = filter.gender {
            let n = push_bind(&mut binds, gender.as_str().to_string());
            clauses.push(format!("gender = ${}", n));
        }
        for tag in &filter.tags {
            let n = push_bind(&mut binds, tag.clone());
            clauses.push(format!("${} = ANY(tags)", n));
        }
        if let Some(search) = &filter.search {
            let n = push_bind(&mut binds, format!("%{}%", search));
            if filter.tags.is_empty() {
                let m = push_bind(&mut binds, search.clone());
                clauses.push(format!("(title ILIKE ${} OR ${} = ANY(tags))", n, m));
            } else {
                clauses.push(format!("title ILIKE ${}", n));
            }
        }

        (clauses.join(" AND "), binds)
    }

    fn row_to_item(row: &sqlx::postgres::PgRow) -> Result<Item, ExchangeError> {
        let status_id: i16 = row.get("status");
        let status = ItemStatus::from_id(status_id)
            .ok_or_else(|| ExchangeError::Internal(format!("Invalid item status: {}", status_id)))?;

        let category_str: String = row.get("category");
        let category = Category::from_str(&category_str)
            .ok_or_else(|| ExchangeError::Internal(format!("Invalid category: {}", category_str)))?;

        let size_str: String = row.get("size");
        let size = Size::from_str(&size_str)
            .ok_or_else(|| ExchangeError::Internal(format!("Invalid size: {}", size_str)))?;

        let condition_str: String = row.get("condition");
        let condition = Condition::from_str(&condition_str).ok_or_else(|| {
            ExchangeError::Internal(format!("Invalid condition: {}", condition_str))
        })?;

        let listing_type_str: String = row.get("listing_type");
        let listing_type = ListingType::from_str(&listing_type_str).ok_or_else(|| {
            ExchangeError::Internal(format!("Invalid listing type: {}", listing_type_str))
        })?;

        let gender = row
            .get::<Option<String>, _>("gender")
            .map(|g| {
                Gender::from_str(&g)
                    .ok_or_else(|| ExchangeError::Internal(format!("Invalid gender: {}", g)))
            })
            .transpose()?;

        Ok(Item {
            item_id: row.get("item_id"),
            owner_id: row.get("owner_id"),
            title: row.get("title"),
            description: row.get("description"),
            category,
            gender,
            size,
            condition,
            tags: row.get("tags"),
            price: row.get("price"),
            images: row.get("images"),
            listing_type,
            status,
            color: row.get("color"),
            brand: row.get("brand"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_default_is_active_only() {
        let (where_clause, binds) = ItemRepository::build_filter(&ItemFilter::default());
        assert_eq!(where_clause, "status = 1");
        assert!(binds.is_empty());
    }

    #[test]
    fn test_build_filter_combines_clauses() {
        let filter = ItemFilter {
            category: Some(Category::Jacket),
            size: Some(Size::Medium),
            search: Some("denim".to_string()),
            ..Default::default()
        };
        let (where_clause, binds) = ItemRepository::build_filter(&filter);
        assert!(where_clause.contains("category = $1"));
        assert!(where_clause.contains("size = $2"));
        assert!(where_clause.contains("title ILIKE $3"));
        assert!(where_clause.contains("$4 = ANY(tags)"));
        assert_eq!(binds, vec!["jacket", "medium", "%denim%", "denim"]);
    }

    #[test]
    fn test_build_filter_search_skips_tag_match_when_tags_given() {
        let filter = ItemFilter {
            tags: vec!["vintage".to_string()],
            search: Some("coat".to_string()),
            ..Default::default()
        };
        let (where_clause, _) = ItemRepository::build_filter(&filter);
        assert!(where_clause.contains("$1 = ANY(tags)"));
        assert!(where_clause.contains("title ILIKE $2"));
        assert!(!where_clause.contains("$2 = ANY(tags)"));
    }
}
