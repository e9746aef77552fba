//! Item listing handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::ExchangeError;
use crate::gateway::{state::AppState, types::ApiResponse};
use crate::items::repository::NewItem;
use crate::items::{
    Category, Condition, Gender, Item, ItemFilter, ItemPage, ItemRepository, ItemService, Size,
};
use crate::user_auth::Claims;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 3, message = "Description must be at least 3 characters"))]
    pub description: String,
    pub category: Category,
    pub gender: Option<Gender>,
    pub size: Size,
    pub condition: Condition,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub price: i64,
    /// Already-uploaded image URLs, 1 to 5 of them
    pub images: Vec<String>,
    pub listing_type: crate::items::ListingType,
    pub color: Option<String>,
    pub brand: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub description: Option<String>,
    pub condition: Option<Condition>,
    pub size: Option<Size>,
    pub price: Option<i64>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListItemsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub gender: Option<String>,
    /// Comma-separated tag list
    pub tags: Option<String>,
    pub search: Option<String>,
}

/// List a new item
///
/// POST /api/v1/items
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item listed", body = ApiResponse<Item>),
        (status = 400, description = "Invalid input")
    ),
    tag = "Items"
)]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Item>>), ExchangeError> {
    req.validate()
        .map_err(|e| ExchangeError::validation(e.to_string()))?;

    let owner_id = claims.user_id()?;
    let item = ItemService::create_item(
        state.pool(),
        &state.rewards,
        NewItem {
            owner_id,
            title: req.title,
            description: req.description,
            category: req.category,
            gender: req.gender,
            size: req.size,
            condition: req.condition,
            tags: req.tags,
            price: req.price,
            images: req.images,
            listing_type: req.listing_type,
            color: req.color,
            brand: req.brand,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_msg("Item listed successfully", item)),
    ))
}

/// Browse active listings with filters and pagination
///
/// GET /api/v1/items
#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(ListItemsQuery),
    responses((status = 200, description = "One page of items", body = ApiResponse<ItemPage>)),
    tag = "Items"
)]
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ApiResponse<ItemPage>>, ExchangeError> {
    let filter = ItemFilter {
        category: parse_filter(query.category.as_deref(), Category::from_str, "category")?,
        condition: parse_filter(query.condition.as_deref(), Condition::from_str, "condition")?,
        size: parse_filter(query.size.as_deref(), Size::from_str, "size")?,
        gender: parse_filter(query.gender.as_deref(), Gender::from_str, "gender")?,
        tags: query
            .tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        search: query.search,
    };

    let page = ItemRepository::list_active(
        state.pool(),
        &filter,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(10),
    )
    .await?;

    Ok(Json(ApiResponse::success(page)))
}

/// Fetch one item
///
/// GET /api/v1/items/{item_id}
#[utoipa::path(
    get,
    path = "/api/v1/items/{item_id}",
    params(("item_id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = ApiResponse<Item>),
        (status = 404, description = "Item not found")
    ),
    tag = "Items"
)]
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> Result<Json<ApiResponse<Item>>, ExchangeError> {
    let item = ItemRepository::get_by_id(state.pool(), item_id)
        .await?
        .ok_or(ExchangeError::NotFound("Item"))?;

    Ok(Json(ApiResponse::success(item)))
}

/// The caller's own listings
///
/// GET /api/v1/items/mine
#[utoipa::path(
    get,
    path = "/api/v1/items/mine",
    responses((status = 200, description = "The caller's items", body = ApiResponse<Vec<Item>>)),
    tag = "Items"
)]
pub async fn my_items(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<Item>>>, ExchangeError> {
    let items = ItemRepository::list_by_owner(state.pool(), claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Update a listing (owner only)
///
/// PUT /api/v1/items/{item_id}
#[utoipa::path(
    put,
    path = "/api/v1/items/{item_id}",
    params(("item_id" = i64, Path, description = "Item id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated item", body = ApiResponse<Item>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Item not found")
    ),
    tag = "Items"
)]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(item_id): Path<i64>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<Item>>, ExchangeError> {
    let item = ItemService::update_item(
        state.pool(),
        claims.user_id()?,
        item_id,
        req.description,
        req.condition,
        req.size,
        req.price,
        req.images,
    )
    .await?;

    Ok(Json(ApiResponse::success_with_msg(
        "Item updated successfully",
        item,
    )))
}

/// Delete a listing (owner only, active items only)
///
/// DELETE /api/v1/items/{item_id}
#[utoipa::path(
    delete,
    path = "/api/v1/items/{item_id}",
    params(("item_id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 403, description = "Not the owner"),
        (status = 409, description = "Item is locked into an exchange")
    ),
    tag = "Items"
)]
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(item_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ExchangeError> {
    ItemService::delete_item(state.pool(), claims.user_id()?, item_id).await?;
    Ok(Json(ApiResponse::success_with_msg(
        "Item deleted successfully",
        (),
    )))
}

fn parse_filter<T>(
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
    name: &str,
) -> Result<Option<T>, ExchangeError> {
    match value {
        None => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .ok_or_else(|| ExchangeError::validation(format!("Unknown {}: {}", name, raw))),
    }
}
