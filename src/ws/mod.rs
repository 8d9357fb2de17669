//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams pool events to subscribed
//! clients and answers read-only queries. Contract calls go through REST,
//! where the caller identity header is required.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
