//! DTOs del API de progreso
//!
//! Cuerpos de petición y vistas de respuesta del tablero de rutas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    ExternalId, RouteDefinition, RouteProgress, RouteStepDefinition, StepProgress, VehicleEvent,
};
use crate::services::route_builder::{GeofenceStop, StepThresholds};
use crate::state::RouteEntry;
use crate::utils::lenient::skip_invalid;
use crate::utils::status_format::{badge_for, format_signed_minutes, StatusBadge};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

/// Proyección sin estado: ruta + foto, con hora opcional
#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub route: RouteDefinition,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub events: Vec<VehicleEvent>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Foto completa de vehículos para una ruta registrada
#[derive(Debug, Deserialize)]
pub struct SnapshotRequest {
    #[serde(default, deserialize_with = "skip_invalid")]
    pub events: Vec<VehicleEvent>,
}

/// Geocercas del editor para armar los pasos de una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct BuildRouteRequest {
    pub id: ExternalId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub stops: Vec<GeofenceStop>,
    #[serde(default)]
    pub thresholds: StepThresholds,
}

/// Definición lista para registrar con `PUT /api/routes/:id`
#[derive(Debug, Serialize)]
pub struct BuildRouteResponse {
    pub route: RouteDefinition,
    pub steps_count: usize,
}

impl BuildRouteResponse {
    pub fn new(request: BuildRouteRequest, steps: Vec<RouteStepDefinition>) -> Self {
        Self {
            steps_count: steps.len(),
            route: RouteDefinition {
                id: request.id,
                name: request.name,
                description: request.description,
                steps,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteSummary {
    pub id: ExternalId,
    pub name: String,
    pub steps_count: usize,
    pub vehicles_count: usize,
    pub snapshot_received_at: Option<DateTime<Utc>>,
    pub last_computed_at: Option<DateTime<Utc>>,
}

impl From<&RouteEntry> for RouteSummary {
    fn from(entry: &RouteEntry) -> Self {
        Self {
            id: entry.route.id.clone(),
            name: entry.route.name.clone(),
            steps_count: entry.route.steps.len(),
            vehicles_count: entry.events.len(),
            snapshot_received_at: entry.snapshot_received_at,
            last_computed_at: entry.progress.as_ref().map(|p| p.computed_at),
        }
    }
}

/// Indicadores de un paso para pintar la tarjeta de ruta
#[derive(Debug, Serialize)]
pub struct StepBadges {
    pub short_name: String,
    pub vehicles_in_step: usize,
    pub vehicles_in_transit: usize,
    pub step_badge: Option<StatusBadge>,
    pub transit_badge: Option<StatusBadge>,
}

impl From<&StepProgress> for StepBadges {
    fn from(step: &StepProgress) -> Self {
        Self {
            short_name: step.occupancy.step.short_name.clone(),
            vehicles_in_step: step.occupancy.vehicles_in_step.len(),
            vehicles_in_transit: step.occupancy.vehicles_in_transit.len(),
            step_badge: step.step_status.map(badge_for),
            transit_badge: step.transit_status.map(badge_for),
        }
    }
}

/// Renglón de la lista de unidades con tiempo excedido
#[derive(Debug, Serialize)]
pub struct ExceededTimeRow {
    pub display_name: String,
    pub step_label: String,
    pub exceeded_minutes: f64,
    /// Retraso a destino con signo, p. ej. "+7"
    pub delay_text: Option<String>,
    pub badge: StatusBadge,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: RouteProgress,
    pub badges: Vec<StepBadges>,
    pub exceeded: Vec<ExceededTimeRow>,
}

impl From<RouteProgress> for ProgressResponse {
    fn from(progress: RouteProgress) -> Self {
        let badges = progress.steps.iter().map(StepBadges::from).collect();
        let exceeded = progress
            .vehicles_with_exceeded_time
            .iter()
            .map(|v| ExceededTimeRow {
                display_name: v.display_name.clone(),
                step_label: v.step_label.clone(),
                exceeded_minutes: v.exceeded_time,
                delay_text: v
                    .classification
                    .delay_to_destination_minutes
                    .map(format_signed_minutes),
                badge: badge_for(v.classification.status),
            })
            .collect();

        Self {
            progress,
            badges,
            exceeded,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub routes: usize,
    pub timestamp: DateTime<Utc>,
}
