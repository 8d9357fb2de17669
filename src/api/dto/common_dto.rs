//! Shared DTO types and helpers used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::units::parse_ether;
use crate::error::GatewayError;

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

const fn default_page() -> u32 {
    1
}

const fn default_per_page() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Clamps `page` to at least 1 and `per_page` to `1..=100`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Returns the page of `items` selected by these parameters, with its
    /// metadata.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> (Vec<T>, PaginationMeta) {
        let params = self.clamped();
        let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let total_pages = total.div_ceil(params.per_page);
        let start = (params.page - 1).saturating_mul(params.per_page) as usize;
        let data = items
            .into_iter()
            .skip(start)
            .take(params.per_page as usize)
            .collect();
        (
            data,
            PaginationMeta {
                page: params.page,
                per_page: params.per_page,
                total,
                total_pages,
            },
        )
    }
}

/// Parses a wei amount from a request field.
///
/// Accepts a plain integer (`"2000000000000000000"`) or a decimal ether
/// amount with an `ether` suffix (`"2 ether"`, `"0.01 ether"`).
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming `field` if the value
/// cannot be parsed.
pub fn parse_wei(field: &str, raw: &str) -> Result<u128, GatewayError> {
    let raw = raw.trim();
    let parsed = match raw.strip_suffix("ether") {
        Some(amount) => parse_ether(amount.trim()).map_err(|e| e.to_string()),
        None => raw.parse::<u128>().map_err(|e| e.to_string()),
    };
    parsed.map_err(|e| GatewayError::InvalidRequest(format!("invalid {field} '{raw}': {e}")))
}
