//! Proyector de ocupación de pasos
//!
//! Ubica cada unidad de la ruta en la lista "en el paso" o "en traslado"
//! de cada paso según su última transición. Cada paso se evalúa por
//! separado: no se busca la mejor coincidencia, así que con datos
//! inconsistentes una unidad puede quedar en cero o en varios pasos.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::{
    transit_label, ClassifiedVehicle, ExceededTimeVehicle, Route, RouteProgress, RouteStep,
    StepOccupancy, StepProgress, TransitionType, VehicleEvent,
};
use crate::services::delay_classifier::classify;
use crate::services::worst_status::worst_status;
use crate::utils::normalize::{normalize_name, normalize_optional};

/// Lugar que ocupa una unidad respecto a un paso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    InStep,
    InTransit,
}

/// Decide si la unidad está dentro del paso, en traslado desde él, o fuera.
///
/// - última transición ENTRY y paso actual igual al paso: dentro;
/// - última transición EXIT desde este paso: en traslado (el tramo se
///   indexa por el paso de salida);
/// - sin transiciones: dentro si el paso actual coincide.
pub fn placement_for(event: &VehicleEvent, step: &RouteStep) -> Option<Placement> {
    let step_key = normalize_name(&step.short_name);
    let current_key = normalize_optional(event.status.current_step.as_deref());

    match event.last_transition() {
        Some(last) => match last.transition_type {
            TransitionType::Entry if current_key == step_key => Some(Placement::InStep),
            TransitionType::Exit
                if step_key == normalize_optional(last.geofence_short_name.as_deref()) =>
            {
                Some(Placement::InTransit)
            }
            _ => None,
        },
        None if current_key == step_key => Some(Placement::InStep),
        None => None,
    }
}

fn occupant(event: &VehicleEvent, step: &RouteStep, now: DateTime<Utc>) -> ClassifiedVehicle {
    ClassifiedVehicle {
        unit_key: event.unit_key(),
        imei: event.imei.clone(),
        display_name: event.display_name(),
        route_status_label: event.status.route_status.clone(),
        step_short_name: step.short_name.clone(),
        exceeded_time: event.status.exceeded_time,
        classification: classify(event, step.transit.as_ref(), now),
    }
}

/// Ocupación de cada paso, en el mismo orden que `route.steps`
pub fn project_steps(route: &Route, events: &[VehicleEvent], now: DateTime<Utc>) -> Vec<StepOccupancy> {
    let route_events: Vec<&VehicleEvent> = events.iter().filter(|e| e.belongs_to(&route.id)).collect();

    route
        .steps
        .iter()
        .map(|step| {
            let mut occupancy = StepOccupancy::empty(step.clone());
            for event in &route_events {
                match placement_for(event, step) {
                    Some(Placement::InStep) => occupancy.vehicles_in_step.push(occupant(event, step, now)),
                    Some(Placement::InTransit) => {
                        occupancy.vehicles_in_transit.push(occupant(event, step, now))
                    }
                    None => {}
                }
            }
            occupancy
        })
        .collect()
}

/// Unidades de la ruta que excedieron el tiempo de su sección
pub fn vehicles_with_exceeded_time(
    route: &Route,
    events: &[VehicleEvent],
    now: DateTime<Utc>,
) -> Vec<ExceededTimeVehicle> {
    events
        .iter()
        .filter(|e| e.route_id.as_ref() == Some(&route.id))
        .filter_map(|event| {
            let exceeded_time = event.exceeded_minutes()?;
            let current = event.status.current_step.as_deref().unwrap_or_default();
            let step = route.step_by_short_name(current);

            let step_label = match step {
                Some(step) => step.short_name.clone(),
                // sin paso actual ni siguiente no hay destino que nombrar
                None => event
                    .status
                    .next_step
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .or(Some(current.trim()).filter(|c| !c.is_empty()))
                    .map(transit_label)
                    .unwrap_or_default(),
            };

            Some(ExceededTimeVehicle {
                unit_key: event.unit_key(),
                display_name: event.display_name(),
                route_status_label: event.status.route_status.clone(),
                step_label,
                exceeded_time,
                classification: classify(event, step.and_then(|s| s.transit.as_ref()), now),
            })
        })
        .collect()
}

/// Proyección completa de la ruta: ocupación, peor estado y excedidos
pub fn project_route(route: &Route, events: &[VehicleEvent], now: DateTime<Utc>) -> RouteProgress {
    let steps: Vec<StepProgress> = project_steps(route, events, now)
        .into_iter()
        .map(|occupancy| StepProgress {
            step_status: worst_status(&occupancy.vehicles_in_step),
            transit_status: worst_status(&occupancy.vehicles_in_transit),
            occupancy,
        })
        .collect();
    let exceeded = vehicles_with_exceeded_time(route, events, now);

    let progress = RouteProgress {
        route_id: route.id.clone(),
        route_name: route.name.clone(),
        computed_at: now,
        steps,
        vehicles_with_exceeded_time: exceeded,
    };

    debug!(
        "🧭 Ruta {} proyectada: {} ubicaciones, {} con tiempo excedido",
        route.id,
        progress.placed_vehicles(),
        progress.vehicles_with_exceeded_time.len()
    );
    progress
}
