//! REST endpoint handlers organized by resource.

pub mod account;
pub mod draw;
pub mod entry;
pub mod history;
pub mod pool;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(account::routes())
        .merge(pool::routes())
        .merge(entry::routes())
        .merge(draw::routes())
        .merge(history::routes())
}
