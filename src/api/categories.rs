// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{Category, CreateCategoryRequest, UpdateCategoryRequest},
    state::AppState,
    storage::CategoryRepository,
};

#[utoipa::path(
    get,
    path = "/v1/categories",
    tag = "Categories",
    security(("bearer" = [])),
    responses((status = 200, body = [Category]))
)]
pub async fn list_categories(
    Auth(_caller): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let storage = state.storage.read().await;
    Ok(Json(CategoryRepository::new(&storage).list_all()?))
}

#[utoipa::path(
    get,
    path = "/v1/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    tag = "Categories",
    security(("bearer" = [])),
    responses((status = 200, body = Category), (status = 404))
)]
pub async fn get_category(
    Auth(_caller): Auth,
    Path(category_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Category>, ApiError> {
    let storage = state.storage.read().await;
    Ok(Json(CategoryRepository::new(&storage).get(category_id)?))
}

#[utoipa::path(
    get,
    path = "/v1/categories/description/{description}",
    params(("description" = String, Path, description = "Case-insensitive fragment to search for")),
    tag = "Categories",
    security(("bearer" = [])),
    responses((status = 200, body = [Category]))
)]
pub async fn search_categories(
    Auth(_caller): Auth,
    Path(description): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let storage = state.storage.read().await;
    Ok(Json(
        CategoryRepository::new(&storage).search_by_description(&description)?,
    ))
}

#[utoipa::path(
    post,
    path = "/v1/categories",
    request_body = CreateCategoryRequest,
    tag = "Categories",
    security(("bearer" = [])),
    responses((status = 201, body = Category), (status = 400))
)]
pub async fn create_category(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    request.validate()?;
    let storage = state.storage.write().await;
    let category = CategoryRepository::new(&storage).create(request.description)?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/v1/categories",
    request_body = UpdateCategoryRequest,
    tag = "Categories",
    security(("bearer" = [])),
    responses((status = 200, body = Category), (status = 400), (status = 404))
)]
pub async fn update_category(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    request.validate()?;
    let category = Category {
        id: request.id,
        description: request.description,
    };
    let storage = state.storage.write().await;
    CategoryRepository::new(&storage).update(&category)?;
    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/v1/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    tag = "Categories",
    security(("bearer" = [])),
    responses(
        (status = 204),
        (status = 404),
        (status = 409, description = "Products still belong to this category")
    )
)]
pub async fn delete_category(
    Auth(_caller): Auth,
    Path(category_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let storage = state.storage.write().await;
    CategoryRepository::new(&storage).delete(category_id)?;
    Ok(StatusCode::NO_CONTENT)
}
