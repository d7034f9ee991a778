// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::AuthenticatedUser,
    models::{
        Category, CreateCategoryRequest, CreateProductRequest, LoginRequest, LoginResponse,
        Product, ProductFields, RegisterUserRequest, UpdateCategoryRequest, UpdateProductRequest,
        UpdateUserRequest, User,
    },
    state::AppState,
};

pub mod categories;
pub mod health;
pub mod products;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/users/login", post(users::login))
        .route("/users/register", post(users::register))
        .route("/users/update", put(users::update_user))
        .route("/users/all", get(users::list_users))
        .route("/users/me", get(users::get_current_user))
        .route("/users/{id}", get(users::get_user))
        .route(
            "/categories",
            get(categories::list_categories)
                .post(categories::create_category)
                .put(categories::update_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category).delete(categories::delete_category),
        )
        .route(
            "/categories/description/{description}",
            get(categories::search_categories),
        )
        .route(
            "/products",
            get(products::list_products)
                .post(products::create_product)
                .put(products::update_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product).delete(products::delete_product),
        )
        .route(
            "/products/description/{description}",
            get(products::search_products),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the `bearer` scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        users::login,
        users::register,
        users::update_user,
        users::list_users,
        users::get_user,
        users::get_current_user,
        categories::list_categories,
        categories::get_category,
        categories::search_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        products::list_products,
        products::get_product,
        products::search_products,
        products::create_product,
        products::update_product,
        products::delete_product
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            AuthenticatedUser,
            User,
            LoginRequest,
            LoginResponse,
            RegisterUserRequest,
            UpdateUserRequest,
            Category,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            Product,
            ProductFields,
            CreateProductRequest,
            UpdateProductRequest
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Users", description = "Registration, login and accounts"),
        (name = "Categories", description = "Product categories"),
        (name = "Products", description = "Catalog products")
    )
)]
struct ApiDoc;
