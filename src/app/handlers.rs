use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::app::dto::{
    ConnectRequest, DashboardList, HealthResponse, MessageResponse, UpdateDashboardRequest,
    UpdateResponse,
};
use crate::app::error::ApiError;
use crate::app::state::AppState;
use crate::utils::json::document_to_json;
use crate::validation;

type ApiResult<T> = Result<Json<T>, ApiError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn connect(
    State(state): State<AppState>,
    payload: Result<Json<ConnectRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let request = body(payload)?;
    let uri = validation::connection_uri(request.uri.as_deref())?;

    state
        .connections
        .connect(uri)
        .await
        .map_err(ApiError::upstream("Failed to connect to MongoDB"))?;

    Ok(Json(MessageResponse::ok("Connected to MongoDB successfully")))
}

pub async fn list_dashboards(State(state): State<AppState>) -> ApiResult<DashboardList> {
    let store = state.connections.current().await.ok_or(ApiError::NotConnected)?;

    let records = store
        .list_dashboards()
        .await
        .map_err(ApiError::upstream("Failed to fetch dashboards"))?;

    let dashboards: Vec<_> = records.into_iter().map(document_to_json).collect();
    Ok(Json(DashboardList {
        success: true,
        count: dashboards.len(),
        dashboards,
    }))
}

pub async fn update_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDashboardRequest>, JsonRejection>,
) -> ApiResult<UpdateResponse> {
    let store = state.connections.current().await.ok_or(ApiError::NotConnected)?;

    let id = validation::dashboard_id(&id)?;
    let request = body(payload)?;
    let patch = validation::dashboard_patch(
        request.guild_id.as_ref(),
        request.url.as_ref(),
        request.port.as_ref(),
    )?;

    let outcome = store
        .update_dashboard(id, &patch)
        .await
        .map_err(ApiError::upstream("Failed to update dashboard"))?;

    if outcome.matched == 0 {
        return Err(ApiError::NotFound);
    }

    info!(dashboard = %id, modified = outcome.modified, "dashboard updated");
    Ok(Json(UpdateResponse {
        success: true,
        message: "Dashboard updated successfully",
        modified_count: outcome.modified,
    }))
}

pub async fn disconnect(State(state): State<AppState>) -> Json<MessageResponse> {
    state.connections.disconnect().await;
    Json(MessageResponse::ok("Disconnected from MongoDB"))
}
