//! Clasificador de retraso y estado
//!
//! Calcula el retraso contra el destino final a partir de la ETA de la
//! unidad y clasifica su estado. Si el rastreo reporta un estado
//! reconocido, ese estado manda; si no, se usan los umbrales del tramo.

use chrono::{DateTime, Utc};

use crate::models::{
    Classification, IconColor, RouteStatus, TransitSegment, TransitTolerance, VehicleEvent,
};

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Minutos de retraso contra el destino, redondeados (mitad se aleja de cero).
///
/// El objetivo es `now + minutes_to_destination` del tramo, o `now` si el
/// tramo no lo define. Positivo es tarde. `None` si no hay ETA.
pub fn delay_to_destination(
    eta: Option<DateTime<Utc>>,
    transit: Option<&TransitSegment>,
    now: DateTime<Utc>,
) -> Option<i64> {
    let eta = eta?;
    let offset_ms = transit
        .and_then(|t| t.minutes_to_destination)
        .map(|minutes| minutes * MILLIS_PER_MINUTE)
        .unwrap_or(0.0);
    let target_ms = now.timestamp_millis() as f64 + offset_ms;
    let delta_ms = eta.timestamp_millis() as f64 - target_ms;
    let minutes = (delta_ms / MILLIS_PER_MINUTE).round();

    minutes.is_finite().then_some(minutes as i64)
}

/// Clasificación por umbrales (límite inferior incluido)
pub fn classify_by_thresholds(delay: Option<i64>, tolerance: Option<&TransitTolerance>) -> RouteStatus {
    let Some(delay) = delay else {
        return RouteStatus::Unknown;
    };
    let defaults = TransitTolerance::default();
    let tolerance = tolerance.unwrap_or(&defaults);
    let delay = delay as f64;

    if delay <= tolerance.on_time_threshold() {
        RouteStatus::OnTime
    } else if delay <= tolerance.delay_threshold() {
        RouteStatus::Delay
    } else {
        RouteStatus::Late
    }
}

/// Clasifica una unidad frente al tramo de un paso
pub fn classify(
    event: &VehicleEvent,
    transit: Option<&TransitSegment>,
    now: DateTime<Utc>,
) -> Classification {
    let delay = delay_to_destination(event.eta(), transit, now);

    let reported = event
        .status
        .route_status
        .as_deref()
        .and_then(RouteStatus::from_label);

    match reported {
        Some(status) => Classification {
            delay_to_destination_minutes: delay,
            status,
            icon_color: status.reported_icon_color(),
            reported: true,
        },
        None => Classification {
            delay_to_destination_minutes: delay,
            status: classify_by_thresholds(delay, transit.map(|t| &t.tolerance)),
            icon_color: IconColor::Blue,
            reported: false,
        },
    }
}
