//! Formato de estados para el tablero
//!
//! Traduce los códigos crudos del rastreo (y sus etiquetas en español) a
//! texto y color de indicador.

use serde::Serialize;

use crate::models::RouteStatus;

pub const COLOR_GREY: &str = "grey";
pub const COLOR_LATE: &str = "#F14854";
pub const COLOR_DELAY: &str = "#F3BF14";
pub const COLOR_ON_TIME: &str = "#008000";

/// Texto y color de un indicador
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub color: String,
    pub text: String,
}

impl StatusBadge {
    fn new(color: &str, text: &str) -> Self {
        Self {
            color: color.to_string(),
            text: text.to_string(),
        }
    }
}

/// Estado de ruta; códigos desconocidos quedan en gris con el texto crudo
pub fn format_route_status(raw: &str) -> StatusBadge {
    match raw {
        "withoutroute" => StatusBadge::new(COLOR_GREY, "Sin ruta"),
        "onhold" | "En espera" => StatusBadge::new(COLOR_GREY, "En espera"),
        "late" | "Tarde" => StatusBadge::new(COLOR_LATE, "Tarde"),
        "delay" | "Retraso" => StatusBadge::new(COLOR_DELAY, "Retraso"),
        "ontime" | "A tiempo" => StatusBadge::new(COLOR_ON_TIME, "A tiempo"),
        "arrivedtodestination" => StatusBadge::new(COLOR_ON_TIME, "Llego a destino"),
        other => StatusBadge::new(COLOR_GREY, other),
    }
}

/// Indicador para un estado ya clasificado
pub fn badge_for(status: RouteStatus) -> StatusBadge {
    match status {
        RouteStatus::Waiting => format_route_status("onhold"),
        RouteStatus::NoRoute => format_route_status("withoutroute"),
        RouteStatus::Unknown => StatusBadge::new(COLOR_GREY, "Sin datos"),
        other => format_route_status(other.code()),
    }
}

/// Minutos con signo explícito: `+3`, `0`, `-2`
pub fn format_signed_minutes(minutes: i64) -> String {
    if minutes > 0 {
        format!("+{}", minutes)
    } else {
        minutes.to_string()
    }
}
