use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::progress_dto::{
    ApiResponse, BuildRouteRequest, BuildRouteResponse, ProgressResponse, ProjectRequest,
    RouteSummary, SnapshotRequest,
};
use crate::models::{Route, RouteDefinition};
use crate::services::route_builder::build_route_steps;
use crate::services::step_projector::project_route;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};

pub struct ProgressController {
    state: AppState,
}

impl ProgressController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Proyecta una ruta sin registrarla
    pub fn project(&self, request: ProjectRequest) -> AppResult<ApiResponse<ProgressResponse>> {
        let route = Route::from_definition(request.route)?;
        let now = request.now.unwrap_or_else(Utc::now);
        let progress = project_route(&route, &request.events, now);
        Ok(ApiResponse::success(ProgressResponse::from(progress)))
    }

    /// Arma los pasos de una ruta a partir de las geocercas del editor
    pub fn build(&self, request: BuildRouteRequest) -> AppResult<ApiResponse<BuildRouteResponse>> {
        request.validate()?;
        let steps = build_route_steps(&request.stops, request.thresholds)?;
        Ok(ApiResponse::success(BuildRouteResponse::new(request, steps)))
    }

    pub async fn register(
        &self,
        route_id: &str,
        definition: RouteDefinition,
    ) -> AppResult<ApiResponse<RouteSummary>> {
        if definition.id.to_string() != route_id {
            warn!("⚠️ Id de ruta '{}' no coincide con el cuerpo '{}'", route_id, definition.id);
            return Err(bad_request_error("El id de la ruta no coincide con el de la URL"));
        }

        let route = Route::from_definition(definition)?;
        let replaced = self.state.upsert_route(route).await;
        let entry = self
            .state
            .get_route(route_id)
            .await
            .ok_or_else(|| AppError::Internal(format!("Ruta '{}' no quedó registrada", route_id)))?;

        let message = if replaced { "Ruta actualizada" } else { "Ruta registrada" };
        Ok(ApiResponse::success_with_message(
            RouteSummary::from(&entry),
            message.to_string(),
        ))
    }

    pub async fn list(&self) -> ApiResponse<Vec<RouteSummary>> {
        let routes = self.state.list_routes().await;
        ApiResponse::success(routes.iter().map(RouteSummary::from).collect())
    }

    /// Reemplaza la foto de vehículos y proyecta de inmediato
    pub async fn replace_snapshot(
        &self,
        route_id: &str,
        request: SnapshotRequest,
    ) -> AppResult<ApiResponse<ProgressResponse>> {
        let now = Utc::now();
        let route = self
            .state
            .replace_snapshot(route_id, request.events.clone(), now)
            .await
            .ok_or_else(|| not_found_error("Route", route_id))?;

        let progress = project_route(&route, &request.events, now);
        info!(
            "📍 Ruta '{}': {} unidades ubicadas de {}",
            route_id,
            progress.placed_vehicles(),
            request.events.len()
        );
        self.state.store_progress(progress.clone()).await;

        Ok(ApiResponse::success(ProgressResponse::from(progress)))
    }

    /// Última proyección; si el monitor aún no corrió se calcula al momento
    pub async fn progress(&self, route_id: &str) -> AppResult<ApiResponse<ProgressResponse>> {
        let entry = self
            .state
            .get_route(route_id)
            .await
            .ok_or_else(|| not_found_error("Route", route_id))?;

        let progress = match entry.progress {
            Some(progress) => progress,
            None => {
                let progress = project_route(&entry.route, &entry.events, Utc::now());
                self.state.store_progress(progress.clone()).await;
                progress
            }
        };

        Ok(ApiResponse::success(ProgressResponse::from(progress)))
    }

    pub async fn remove(&self, route_id: &str) -> AppResult<ApiResponse<String>> {
        if !self.state.remove_route(route_id).await {
            return Err(not_found_error("Route", route_id));
        }
        Ok(ApiResponse::success_with_message(
            route_id.to_string(),
            "Ruta eliminada".to_string(),
        ))
    }
}
