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
    models::{CreateProductRequest, Product, ProductFields, UpdateProductRequest},
    state::AppState,
    storage::{CategoryRepository, JsonStorage, ProductRepository},
};

fn require_category(storage: &JsonStorage, fields: &ProductFields) -> Result<(), ApiError> {
    if !CategoryRepository::new(storage).exists(fields.category_id) {
        return Err(ApiError::bad_request(format!(
            "Category {} does not exist",
            fields.category_id
        )));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/v1/products",
    tag = "Products",
    security(("bearer" = [])),
    responses((status = 200, body = [Product]))
)]
pub async fn list_products(
    Auth(_caller): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let storage = state.storage.read().await;
    let products = ProductRepository::new(&storage);
    Ok(Json(products.resolve_all(products.list_all()?)))
}

#[utoipa::path(
    get,
    path = "/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    tag = "Products",
    security(("bearer" = [])),
    responses((status = 200, body = Product), (status = 404))
)]
pub async fn get_product(
    Auth(_caller): Auth,
    Path(product_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Product>, ApiError> {
    let storage = state.storage.read().await;
    let products = ProductRepository::new(&storage);
    Ok(Json(products.resolve(products.get(product_id)?)))
}

#[utoipa::path(
    get,
    path = "/v1/products/description/{description}",
    params(("description" = String, Path, description = "Case-insensitive fragment to search for")),
    tag = "Products",
    security(("bearer" = [])),
    responses((status = 200, body = [Product]))
)]
pub async fn search_products(
    Auth(_caller): Auth,
    Path(description): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let storage = state.storage.read().await;
    let products = ProductRepository::new(&storage);
    Ok(Json(
        products.resolve_all(products.search_by_description(&description)?),
    ))
}

#[utoipa::path(
    post,
    path = "/v1/products",
    request_body = CreateProductRequest,
    tag = "Products",
    security(("bearer" = [])),
    responses(
        (status = 201, body = Product),
        (status = 400, description = "Invalid input or unknown category")
    )
)]
pub async fn create_product(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    request.fields.validate()?;

    let storage = state.storage.write().await;
    require_category(&storage, &request.fields)?;

    let products = ProductRepository::new(&storage);
    let product = products.create(request.fields)?;
    Ok((StatusCode::CREATED, Json(products.resolve(product))))
}

#[utoipa::path(
    put,
    path = "/v1/products",
    request_body = UpdateProductRequest,
    tag = "Products",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Product),
        (status = 400, description = "Invalid input or unknown category"),
        (status = 404)
    )
)]
pub async fn update_product(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    request.fields.validate()?;

    let storage = state.storage.write().await;
    let products = ProductRepository::new(&storage);
    if !products.exists(request.id) {
        return Err(ApiError::not_found(format!("Product {} not found", request.id)));
    }
    require_category(&storage, &request.fields)?;

    let product = products.update(request.id, request.fields)?;
    Ok(Json(products.resolve(product)))
}

#[utoipa::path(
    delete,
    path = "/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    tag = "Products",
    security(("bearer" = [])),
    responses((status = 204), (status = 404))
)]
pub async fn delete_product(
    Auth(_caller): Auth,
    Path(product_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let storage = state.storage.write().await;
    ProductRepository::new(&storage).delete(product_id)?;
    Ok(StatusCode::NO_CONTENT)
}
