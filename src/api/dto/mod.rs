//! Data Transfer Objects for REST request/response serialization.
//!
//! All wei amounts are serialized as JSON strings to prevent precision
//! loss on u128 values.

pub mod account_dto;
pub mod common_dto;
pub mod entry_dto;
pub mod event_dto;
pub mod pool_dto;

pub use account_dto::*;
pub use common_dto::*;
pub use entry_dto::*;
pub use event_dto::*;
pub use pool_dto::*;
