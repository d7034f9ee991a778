// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::Path;
use std::process::ExitCode;

use pharmacy_catalog_server::{
    api::router,
    auth::{Argon2Hasher, TokenService},
    config::{apply_dotenv, dev_files_allowed, load_signing_secret, ServerConfig, DOTENV_FILE},
    logging::init_logging,
    state::AppState,
    storage::{JsonStorage, StoragePaths},
};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_result = if dev_files_allowed() {
        apply_dotenv(Path::new(DOTENV_FILE))
    } else {
        Ok(())
    };

    let config = ServerConfig::from_env();
    init_logging(config.log_format);

    if let Err(e) = dotenv_result {
        tracing::error!(error = %e, "failed to load env file");
        return ExitCode::FAILURE;
    }

    // The signing key is mandatory: refuse to start without it.
    let tokens = match load_signing_secret().and_then(|secret| TokenService::new(&secret)) {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!(error = %e, "signing secret unavailable");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(algorithm = ?tokens.algorithm(), "token service ready");

    let mut storage = JsonStorage::new(StoragePaths::new(&config.data_dir));
    if let Err(e) = storage.initialize() {
        tracing::error!(error = %e, data_dir = %config.data_dir.display(), "failed to initialize storage");
        return ExitCode::FAILURE;
    }

    let state = AppState::new(storage, tokens, Argon2Hasher::new());
    let app = router(state);

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, "pharmacy catalog listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
