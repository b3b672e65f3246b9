//! Construcción de rutas
//!
//! Arma la lista de pasos que guarda el editor de rutas a partir de las
//! geocercas ordenadas: marca el paso final, nombra los tramos de traslado
//! y calcula los minutos a destino de cada paso.

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::models::{
    transit_label, ExternalId, Route, RouteDefinition, RouteStepDefinition,
    SectionToleranceDefinition, StepConfigDefinition, TransitDefinition,
    TransitToleranceDefinition,
};
use crate::utils::errors::{bad_request_error, validation_error, AppResult};

/// Geocerca seleccionada en el editor, en orden de recorrido
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeofenceStop {
    pub id: ExternalId,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    pub short_name: Option<String>,

    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub section_time: Option<f64>,

    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub transit_section_time: Option<f64>,
}

impl GeofenceStop {
    pub fn new(
        id: i64,
        name: &str,
        short_name: &str,
        section_time: f64,
        transit_section_time: f64,
    ) -> Self {
        Self {
            id: ExternalId::Number(id),
            name: name.to_string(),
            short_name: Some(short_name.to_string()),
            section_time: Some(section_time),
            transit_section_time: Some(transit_section_time),
        }
    }

    fn effective_short_name(&self) -> String {
        match &self.short_name {
            Some(short) if !short.trim().is_empty() => short.clone(),
            _ => self.name.clone(),
        }
    }
}

/// Umbrales de clasificación que se copian a cada tramo
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepThresholds {
    pub on_time: Option<f64>,
    pub delay: Option<f64>,
}

/// Minutos desde entrar al paso `index` hasta llegar al destino
fn minutes_to_destination(stops: &[GeofenceStop], index: usize) -> f64 {
    let last = stops.len().saturating_sub(1);
    stops
        .iter()
        .enumerate()
        .skip(index)
        .filter(|(i, _)| *i != last)
        .map(|(_, s)| s.section_time.unwrap_or(0.0) + s.transit_section_time.unwrap_or(0.0))
        .sum()
}

fn has_time(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v > 0.0)
}

/// Convierte las geocercas ordenadas en los pasos que se guardan con la ruta
pub fn build_route_steps(
    stops: &[GeofenceStop],
    thresholds: StepThresholds,
) -> AppResult<Vec<RouteStepDefinition>> {
    if stops.len() < 2 {
        return Err(validation_error("steps", "Debes tener como mínimo 2 paradas"));
    }

    for stop in stops {
        stop.validate()?;
    }

    let last = stops.len() - 1;
    if stops[..last]
        .iter()
        .any(|s| !has_time(s.section_time) || !has_time(s.transit_section_time))
    {
        return Err(validation_error(
            "steps",
            "Los tiempos de sección o traslado no pueden ser 0",
        ));
    }

    let steps = stops
        .iter()
        .enumerate()
        .map(|(index, stop)| {
            let is_final = index == last;
            let minutes = minutes_to_destination(stops, index);
            let section_time = if is_final { 0.0 } else { stop.section_time.unwrap_or(0.0) };

            let transit = if is_final {
                TransitDefinition::default()
            } else {
                let next = &stops[index + 1];
                TransitDefinition {
                    name: Some(transit_label(&next.name)),
                    short_name: Some(transit_label(&next.effective_short_name())),
                    minutes_to_destination: Some(minutes - section_time),
                    tolerance: Some(TransitToleranceDefinition {
                        section_time: stop.transit_section_time,
                        on_time: thresholds.on_time,
                        delay: thresholds.delay,
                    }),
                }
            };

            RouteStepDefinition {
                idgeo: stop.id.clone(),
                step_type: Some("Step".to_string()),
                name: stop.name.clone(),
                short_name: Some(stop.effective_short_name()),
                is_final,
                config: Some(StepConfigDefinition {
                    minutes_to_destination: Some(minutes),
                    tolerance: Some(SectionToleranceDefinition {
                        section_time: Some(section_time),
                    }),
                }),
                transit: Some(transit),
            }
        })
        .collect();

    Ok(steps)
}

/// Arma y valida una ruta completa a partir de sus geocercas
pub fn build_route(id: ExternalId, name: &str, stops: Vec<GeofenceStop>) -> AppResult<Route> {
    build_route_with_thresholds(id, name, stops, StepThresholds::default())
}

pub fn build_route_with_thresholds(
    id: ExternalId,
    name: &str,
    stops: Vec<GeofenceStop>,
    thresholds: StepThresholds,
) -> AppResult<Route> {
    let steps = build_route_steps(&stops, thresholds)?;
    info!("🛣️ Ruta '{}' armada con {} paradas", name, steps.len());
    Route::from_definition(RouteDefinition {
        id,
        name: name.to_string(),
        description: None,
        steps,
    })
}

fn resolve_index(index: isize, len: usize) -> Option<usize> {
    let resolved = if index < 0 { len as isize + index } else { index };
    (0..len as isize).contains(&resolved).then_some(resolved as usize)
}

/// Mueve una parada a otra posición sin modificar la lista original.
///
/// Los índices negativos cuentan desde el final.
pub fn move_stop<T: Clone>(stops: &[T], from: isize, to: isize) -> AppResult<Vec<T>> {
    let len = stops.len();
    let (from, to) = match (resolve_index(from, len), resolve_index(to, len)) {
        (Some(from), Some(to)) => (from, to),
        _ => return Err(bad_request_error("Índice de parada fuera de rango")),
    };

    let mut moved = stops.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Ok(moved)
}
