//! Pricing route handlers

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::engine::PricingEngine;
use super::international::InternationalEngine;
use super::models::{Calculation, UkCalculation};
use super::requests::{CalculationRequest, DeleteRequest, ListQuery, UkCalculationRequest};
use super::responses::{
    CalculationResponse, CountriesResponse, DeleteResponse, FenceTypesResponse, HealthResponse,
    MessageResponse, UkCalculationResponse,
};
use super::services;
use super::uk::UkEngine;

/// Routes for both pricing markets plus the health probe
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/", get(root))
        .route("/api/countries", get(countries))
        .route("/api/calculate-preview", post(calculate_preview))
        .route("/api/archive", post(archive))
        .route("/api/delete-calculations", post(delete_calculations))
        .route("/api/calculations", get(list_calculations))
        .route("/api/uk/", get(uk_root))
        .route("/api/uk/fence-types", get(uk_fence_types))
        .route("/api/uk/calculate-preview", post(uk_calculate_preview))
        .route("/api/uk/archive", post(uk_archive))
        .route("/api/uk/delete-calculations", post(uk_delete_calculations))
        .route("/api/uk/calculations", get(uk_list_calculations))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        cache: state.cache.stats(),
    })
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Racing Fence Installation Pricing API",
    })
}

async fn countries(State(state): State<AppState>) -> Json<CountriesResponse> {
    Json(CountriesResponse {
        countries: state.reference.countries(),
    })
}

/// Price an international job without saving it
async fn calculate_preview(
    State(state): State<AppState>,
    Json(request): Json<CalculationRequest>,
) -> Result<Json<CalculationResponse>> {
    let calculation = InternationalEngine::new(&state.reference).calculate(&request)?;
    Ok(Json(CalculationResponse { calculation }))
}

async fn archive(
    State(state): State<AppState>,
    Json(calculation): Json<Calculation>,
) -> Result<Json<CalculationResponse>> {
    let calculation = services::archive(state.store.as_ref(), &state.cache, calculation).await?;
    Ok(Json(CalculationResponse { calculation }))
}

async fn delete_calculations(
    State(state): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>> {
    let deleted_count =
        services::delete::<Calculation>(state.store.as_ref(), &state.cache, &request.ids).await?;
    Ok(Json(DeleteResponse {
        deleted_count,
        ids: request.ids,
    }))
}

async fn list_calculations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Calculation>>> {
    let limit = services::listing_limit(query.limit, state.listing_limit);
    let records =
        services::list_recent::<Calculation>(state.store.as_ref(), &state.cache, limit).await?;
    Ok(Json((*records).clone()))
}

async fn uk_root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "UK Racing Fence Installation Pricing API",
    })
}

async fn uk_fence_types(State(state): State<AppState>) -> Json<FenceTypesResponse> {
    Json(FenceTypesResponse {
        fence_types: state.reference.uk_fence_types(),
    })
}

/// Price a UK job without saving it
async fn uk_calculate_preview(
    State(state): State<AppState>,
    Json(request): Json<UkCalculationRequest>,
) -> Result<Json<UkCalculationResponse>> {
    let calculation = UkEngine::new(&state.reference).calculate(&request)?;
    Ok(Json(UkCalculationResponse { calculation }))
}

async fn uk_archive(
    State(state): State<AppState>,
    Json(calculation): Json<UkCalculation>,
) -> Result<Json<UkCalculationResponse>> {
    let calculation = services::archive(state.store.as_ref(), &state.cache, calculation).await?;
    Ok(Json(UkCalculationResponse { calculation }))
}

async fn uk_delete_calculations(
    State(state): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>> {
    let deleted_count =
        services::delete::<UkCalculation>(state.store.as_ref(), &state.cache, &request.ids)
            .await?;
    Ok(Json(DeleteResponse {
        deleted_count,
        ids: request.ids,
    }))
}

async fn uk_list_calculations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<UkCalculation>>> {
    let limit = services::listing_limit(query.limit, state.listing_limit);
    let records =
        services::list_recent::<UkCalculation>(state.store.as_ref(), &state.cache, limit).await?;
    Ok(Json((*records).clone()))
}
