//! Response DTOs for pricing API endpoints.

use serde::Serialize;

use crate::cache::CacheStats;

use super::models::{Calculation, UkCalculation};

/// Response for an international preview or archive
#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    pub calculation: Calculation,
}

/// Response for a UK preview or archive
#[derive(Debug, Serialize)]
pub struct UkCalculationResponse {
    pub calculation: UkCalculation,
}

/// Response for a delete request
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted_count: u64,
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FenceTypesResponse {
    pub fence_types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: CacheStats,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
