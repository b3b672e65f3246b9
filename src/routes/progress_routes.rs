use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::progress_controller::ProgressController;
use crate::dto::progress_dto::{
    ApiResponse, BuildRouteRequest, BuildRouteResponse, ProgressResponse, ProjectRequest,
    RouteSummary, SnapshotRequest,
};
use crate::models::RouteDefinition;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_progress_router() -> Router<AppState> {
    Router::new()
        .route("/progress/project", post(project))
        .route("/routes", get(list_routes))
        .route("/routes/build", post(build_route))
        .route("/routes/:id", put(register_route).delete(remove_route))
        .route("/routes/:id/snapshot", put(replace_snapshot))
        .route("/routes/:id/progress", get(get_progress))
}

async fn project(
    State(state): State<AppState>,
    Json(request): Json<ProjectRequest>,
) -> Result<Json<ApiResponse<ProgressResponse>>, AppError> {
    let controller = ProgressController::new(state);
    let response = controller.project(request)?;
    Ok(Json(response))
}

async fn build_route(
    State(state): State<AppState>,
    Json(request): Json<BuildRouteRequest>,
) -> Result<Json<ApiResponse<BuildRouteResponse>>, AppError> {
    let controller = ProgressController::new(state);
    let response = controller.build(request)?;
    Ok(Json(response))
}

async fn list_routes(State(state): State<AppState>) -> Json<ApiResponse<Vec<RouteSummary>>> {
    let controller = ProgressController::new(state);
    Json(controller.list().await)
}

async fn register_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(definition): Json<RouteDefinition>,
) -> Result<Json<ApiResponse<RouteSummary>>, AppError> {
    let controller = ProgressController::new(state);
    let response = controller.register(&id, definition).await?;
    Ok(Json(response))
}

async fn replace_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SnapshotRequest>,
) -> Result<Json<ApiResponse<ProgressResponse>>, AppError> {
    let controller = ProgressController::new(state);
    let response = controller.replace_snapshot(&id, request).await?;
    Ok(Json(response))
}

async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProgressResponse>>, AppError> {
    let controller = ProgressController::new(state);
    let response = controller.progress(&id).await?;
    Ok(Json(response))
}

async fn remove_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let controller = ProgressController::new(state);
    let response = controller.remove(&id).await?;
    Ok(Json(response))
}
