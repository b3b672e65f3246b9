//! Ocupación de pasos
//!
//! Estructuras derivadas que produce el motor en cada ciclo, listas para
//! que el tablero las pinte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::route::{ExternalId, RouteStep};
use super::status::{IconColor, RouteStatus};

/// Resultado del clasificador para una unidad frente a un paso
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Minutos de retraso contra el destino; `None` si la ETA es desconocida
    pub delay_to_destination_minutes: Option<i64>,
    pub status: RouteStatus,
    pub icon_color: IconColor,
    /// `true` cuando el estado viene del rastreo y no de los umbrales
    pub reported: bool,
}

/// Unidad ubicada en un paso o en su tramo de traslado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedVehicle {
    pub unit_key: String,
    pub imei: Option<ExternalId>,
    pub display_name: String,
    /// Etiqueta cruda del rastreo
    pub route_status_label: Option<String>,
    pub step_short_name: String,
    pub exceeded_time: Option<f64>,
    pub classification: Classification,
}

impl ClassifiedVehicle {
    pub fn status(&self) -> RouteStatus {
        self.classification.status
    }
}

/// Ocupación de un paso: unidades dentro y unidades en traslado desde él
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOccupancy {
    pub step: RouteStep,
    pub vehicles_in_step: Vec<ClassifiedVehicle>,
    pub vehicles_in_transit: Vec<ClassifiedVehicle>,
}

impl StepOccupancy {
    pub fn empty(step: RouteStep) -> Self {
        Self {
            step,
            vehicles_in_step: Vec::new(),
            vehicles_in_transit: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles_in_step.is_empty() && self.vehicles_in_transit.is_empty()
    }
}

/// Unidad que excedió el tiempo de su sección actual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceededTimeVehicle {
    pub unit_key: String,
    pub display_name: String,
    pub route_status_label: Option<String>,
    /// Paso donde está, o "Traslado a ..." si no coincide con ninguno
    pub step_label: String,
    pub exceeded_time: f64,
    pub classification: Classification,
}

/// Ocupación de un paso con el estado representativo de cada lista
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepProgress {
    #[serde(flatten)]
    pub occupancy: StepOccupancy,
    pub step_status: Option<RouteStatus>,
    pub transit_status: Option<RouteStatus>,
}

/// Proyección completa de una ruta en un instante
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteProgress {
    pub route_id: ExternalId,
    pub route_name: String,
    pub computed_at: DateTime<Utc>,
    pub steps: Vec<StepProgress>,
    pub vehicles_with_exceeded_time: Vec<ExceededTimeVehicle>,
}

impl RouteProgress {
    /// Total de apariciones en pasos y traslados
    pub fn placed_vehicles(&self) -> usize {
        self.steps
            .iter()
            .map(|s| s.occupancy.vehicles_in_step.len() + s.occupancy.vehicles_in_transit.len())
            .sum()
    }
}
