//! Request DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::models::GroundFixingMethod;

/// Request to price an international installation
#[derive(Debug, Clone, Deserialize)]
pub struct CalculationRequest {
    pub user_name: String,
    pub project_name: String,
    pub country: String,
    pub fence_type: String,
    pub meters: Decimal,
    pub gates: u32,
    #[serde(default, deserialize_with = "GroundFixingMethod::deserialize_or_default")]
    pub ground_fixing_method: GroundFixingMethod,
    /// Meters per day for the whole crew, replacing the fence type rate
    #[serde(default)]
    pub custom_daily_rate: Option<Decimal>,
    /// Daily rate per person, replacing the wage-derived rate
    #[serde(default)]
    pub manual_daily_labor_rate: Option<Decimal>,
}

/// Request to price a UK installation
#[derive(Debug, Clone, Deserialize)]
pub struct UkCalculationRequest {
    pub user_name: String,
    pub project_name: String,
    pub fence_type: String,
    pub meters: Decimal,
    pub gates: u32,
    #[serde(default)]
    pub is_time_sensitive: bool,
    #[serde(default)]
    pub days_available: Option<u32>,
    #[serde(default)]
    pub num_labourers: Option<u32>,
    #[serde(default)]
    pub delivery_lead: Option<String>,
    #[serde(default)]
    pub delivery_copilot: Option<String>,
    #[serde(default)]
    pub custom_daily_rate: Option<Decimal>,
}

/// Request to delete archived calculations
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub ids: Vec<String>,
}

/// Query parameters for calculation listings
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}
