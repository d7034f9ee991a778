// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Model Categories
//!
//! - **Categories**: product groupings described by free text
//! - **Products**: catalog entries, each belonging to one category
//! - **Users**: accounts that can log in and receive a bearer token

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

const CATEGORY_DESCRIPTION_MIN: usize = 3;
const CATEGORY_DESCRIPTION_MAX: usize = 1000;
const PRODUCT_TEXT_MAX: usize = 255;
const PASSWORD_MIN: usize = 8;

fn require_text(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(ApiError::bad_request(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

// =============================================================================
// Category Models
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier for this category.
    pub id: i64,
    /// Free-text description, e.g. "Analgesics".
    pub description: String,
}

/// Request to create a category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub description: String,
}

/// Request to replace an existing category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub id: i64,
    pub description: String,
}

fn validate_category_description(description: &str) -> Result<(), ApiError> {
    require_text("description", description, CATEGORY_DESCRIPTION_MAX)?;
    if description.chars().count() < CATEGORY_DESCRIPTION_MIN {
        return Err(ApiError::bad_request(format!(
            "description must be between {CATEGORY_DESCRIPTION_MIN} and {CATEGORY_DESCRIPTION_MAX} characters"
        )));
    }
    Ok(())
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_category_description(&self.description)
    }
}

impl UpdateCategoryRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_category_description(&self.description)
    }
}

// =============================================================================
// Product Models
// =============================================================================

/// A catalog product with its category resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Unit price; never negative.
    pub price: f64,
    /// Photo URL.
    pub photo: String,
    /// Owning category. `None` only if the category file has gone missing.
    pub category: Option<Category>,
}

/// Product fields shared by create and update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub photo: String,
    /// Category the product belongs to; must exist.
    pub category_id: i64,
}

impl ProductFields {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name, PRODUCT_TEXT_MAX)?;
        require_text("description", &self.description, PRODUCT_TEXT_MAX)?;
        require_text("photo", &self.photo, usize::MAX)?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ApiError::bad_request("price must be zero or positive"));
        }
        Ok(())
    }
}

/// Request to create a product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    #[serde(flatten)]
    pub fields: ProductFields,
}

/// Request to replace an existing product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub id: i64,
    #[serde(flatten)]
    pub fields: ProductFields,
}

// =============================================================================
// User Models
// =============================================================================

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique login name.
    pub username: String,
    /// Photo URL.
    #[serde(default)]
    pub photo: String,
}

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub photo: String,
}

/// Request to replace an existing account. The password is re-hashed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub photo: String,
}

fn validate_account(name: &str, username: &str, password: &str) -> Result<(), ApiError> {
    require_text("name", name, PRODUCT_TEXT_MAX)?;
    require_text("username", username, PRODUCT_TEXT_MAX)?;
    if password.chars().count() < PASSWORD_MIN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

impl RegisterUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_account(&self.name, &self.username, &self.password)
    }
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_account(&self.name, &self.username, &self.password)
    }
}

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login: profile fields plus a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LoginResponse {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub photo: String,
    /// Always empty.
    pub password: String,
    /// `Bearer <token>`, ready for the Authorization header.
    pub token: String,
}
