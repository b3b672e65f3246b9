//! Estados de ruta y colores de icono
//!
//! Vocabulario cerrado de estados que el motor asigna a cada vehículo,
//! con la tabla de precedencia usada para elegir el "peor" estado.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado de un vehículo respecto a su ruta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Arrived,
    OnTime,
    Delay,
    Late,
    Waiting,
    NoRoute,
    /// Sin estado reportado y sin ETA utilizable
    Unknown,
}

impl RouteStatus {
    /// Reconoce las etiquetas en español que reporta el rastreo.
    ///
    /// La comparación ignora mayúsculas y espacios alrededor. Devuelve
    /// `None` para cualquier texto fuera del vocabulario.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "en espera" => Some(RouteStatus::Waiting),
            "sin ruta" => Some(RouteStatus::NoRoute),
            "llegó a destino" => Some(RouteStatus::Arrived),
            "a tiempo" => Some(RouteStatus::OnTime),
            "retraso" => Some(RouteStatus::Delay),
            "tarde" => Some(RouteStatus::Late),
            _ => None,
        }
    }

    /// Rango de severidad, de mejor (0) a peor
    pub fn precedence(self) -> u8 {
        match self {
            RouteStatus::Arrived => 0,
            RouteStatus::OnTime => 1,
            RouteStatus::Delay => 2,
            RouteStatus::Late => 3,
            RouteStatus::Waiting => 4,
            RouteStatus::NoRoute => 5,
            RouteStatus::Unknown => 6,
        }
    }

    /// Color del icono cuando el estado viene reportado por el rastreo
    pub fn reported_icon_color(self) -> IconColor {
        match self {
            RouteStatus::Waiting => IconColor::Blue,
            RouteStatus::NoRoute => IconColor::Gray,
            RouteStatus::Arrived | RouteStatus::OnTime => IconColor::Green,
            RouteStatus::Delay => IconColor::Yellow,
            RouteStatus::Late => IconColor::Red,
            RouteStatus::Unknown => IconColor::Gray,
        }
    }

    /// Código corto usado por el front (clases CSS del tablero)
    pub fn code(self) -> &'static str {
        match self {
            RouteStatus::Arrived => "arrivedtodestination",
            RouteStatus::OnTime => "ontime",
            RouteStatus::Delay => "delay",
            RouteStatus::Late => "late",
            RouteStatus::Waiting => "waiting",
            RouteStatus::NoRoute => "noRoute",
            RouteStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Color del icono del vehículo en el tablero
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IconColor {
    Blue,
    Gray,
    Green,
    Yellow,
    Red,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_vocabulary() {
        assert_eq!(RouteStatus::from_label("En espera"), Some(RouteStatus::Waiting));
        assert_eq!(RouteStatus::from_label("SIN RUTA"), Some(RouteStatus::NoRoute));
        assert_eq!(RouteStatus::from_label("Llegó a destino"), Some(RouteStatus::Arrived));
        assert_eq!(RouteStatus::from_label(" a tiempo "), Some(RouteStatus::OnTime));
        assert_eq!(RouteStatus::from_label("Retraso"), Some(RouteStatus::Delay));
        assert_eq!(RouteStatus::from_label("Tarde"), Some(RouteStatus::Late));
        assert_eq!(RouteStatus::from_label("ontime"), None);
        assert_eq!(RouteStatus::from_label(""), None);
    }

    #[test]
    fn test_precedence_order() {
        let ordered = [
            RouteStatus::Arrived,
            RouteStatus::OnTime,
            RouteStatus::Delay,
            RouteStatus::Late,
            RouteStatus::Waiting,
            RouteStatus::NoRoute,
            RouteStatus::Unknown,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].precedence() < pair[1].precedence());
        }
    }

    #[test]
    fn test_reported_icon_colors() {
        assert_eq!(RouteStatus::Waiting.reported_icon_color(), IconColor::Blue);
        assert_eq!(RouteStatus::NoRoute.reported_icon_color(), IconColor::Gray);
        assert_eq!(RouteStatus::Arrived.reported_icon_color(), IconColor::Green);
        assert_eq!(RouteStatus::Delay.reported_icon_color(), IconColor::Yellow);
        assert_eq!(RouteStatus::Late.reported_icon_color(), IconColor::Red);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&RouteStatus::OnTime).unwrap(), "\"on_time\"");
        assert_eq!(serde_json::to_string(&IconColor::Yellow).unwrap(), "\"yellow\"");
    }
}
