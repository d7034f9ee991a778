// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pharmacy Catalog - product catalog backend with bearer-token auth
//!
//! Users register and log in with a username and password, receive a
//! one-hour HMAC-signed JWT, and present it to manage categories and
//! products.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, token issuance and verification
//! - `config` - Environment and signing-secret resolution
//! - `storage` - File-backed JSON repositories

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
