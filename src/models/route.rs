//! Modelo de Route
//!
//! Este módulo contiene la definición de ruta tal como llega del backend
//! (claves en PascalCase) y el modelo normalizado que consume el motor:
//! pasos ordenados, tolerancias por sección y tramo de traslado.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::utils::errors::{validation_error, AppResult};
use crate::utils::normalize::{names_match, normalize_name};

/// Prefijo del nombre de un tramo de traslado
pub const TRANSIT_PREFIX: &str = "Traslado a";

/// Umbral "a tiempo" cuando el tramo no define tolerancia
pub const DEFAULT_ON_TIME_THRESHOLD: f64 = -5.0;

/// Umbral "retraso" cuando el tramo no define tolerancia
pub const DEFAULT_DELAY_THRESHOLD: f64 = 5.0;

/// Identificador externo: el backend mezcla enteros y cadenas.
///
/// La igualdad es estricta por tipo: `12` y `"12"` son distintos.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Number(n) => write!(f, "{}", n),
            ExternalId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ExternalId {
    fn from(value: i64) -> Self {
        ExternalId::Number(value)
    }
}

impl From<&str> for ExternalId {
    fn from(value: &str) -> Self {
        ExternalId::Text(value.to_string())
    }
}

/// Nombre del tramo hacia `next_name`
pub fn transit_label(next_name: &str) -> String {
    format!("{} {}", TRANSIT_PREFIX, next_name)
}

// ---------------------------------------------------------------------------
// Formato de entrada (backend)
// ---------------------------------------------------------------------------

/// Definición de ruta tal como la guarda el editor de rutas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub id: ExternalId,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<RouteStepDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionToleranceDefinition {
    #[serde(rename = "SectionTime", default, skip_serializing_if = "Option::is_none")]
    pub section_time: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepConfigDefinition {
    #[serde(rename = "MinutesToDestination", default, skip_serializing_if = "Option::is_none")]
    pub minutes_to_destination: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<SectionToleranceDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitToleranceDefinition {
    #[serde(rename = "SectionTime", default, skip_serializing_if = "Option::is_none")]
    pub section_time: Option<f64>,
    #[serde(rename = "OnTime", default, skip_serializing_if = "Option::is_none")]
    pub on_time: Option<f64>,
    #[serde(rename = "Delay", default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
}

/// Tramo de traslado; el paso final lo envía como `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitDefinition {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "ShortName", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "MinutesToDestination", default, skip_serializing_if = "Option::is_none")]
    pub minutes_to_destination: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<TransitToleranceDefinition>,
}

impl TransitDefinition {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.short_name.is_none()
            && self.minutes_to_destination.is_none()
            && self.tolerance.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStepDefinition {
    pub idgeo: ExternalId,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub step_type: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "ShortName", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "IsFinal", default)]
    pub is_final: bool,
    #[serde(rename = "Config", default, skip_serializing_if = "Option::is_none")]
    pub config: Option<StepConfigDefinition>,
    #[serde(rename = "Transit", default, skip_serializing_if = "Option::is_none")]
    pub transit: Option<TransitDefinition>,
}

impl RouteStepDefinition {
    fn section_time(&self) -> Option<f64> {
        self.config
            .as_ref()
            .and_then(|c| c.tolerance.as_ref())
            .and_then(|t| t.section_time)
    }

    fn transit_section_time(&self) -> Option<f64> {
        self.transit
            .as_ref()
            .and_then(|t| t.tolerance.as_ref())
            .and_then(|t| t.section_time)
    }

    fn display_short_name(&self) -> String {
        match &self.short_name {
            Some(short) if !short.trim().is_empty() => short.clone(),
            _ => self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Modelo normalizado
// ---------------------------------------------------------------------------

/// Tolerancias del tramo de traslado (minutos)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitTolerance {
    pub section_time: Option<f64>,
    pub on_time: Option<f64>,
    pub delay: Option<f64>,
}

impl TransitTolerance {
    pub fn on_time_threshold(&self) -> f64 {
        self.on_time.unwrap_or(DEFAULT_ON_TIME_THRESHOLD)
    }

    pub fn delay_threshold(&self) -> f64 {
        self.delay.unwrap_or(DEFAULT_DELAY_THRESHOLD)
    }
}

/// Tramo entre un paso y el siguiente
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitSegment {
    pub name: String,
    pub minutes_to_destination: Option<f64>,
    pub tolerance: TransitTolerance,
}

/// Paso de una ruta (geocerca)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub id: ExternalId,
    pub name: String,
    pub short_name: String,
    pub is_final: bool,
    /// Permanencia máxima en el paso; `None` solo en el paso final
    pub section_time: Option<f64>,
    /// Tiempo máximo de traslado al siguiente paso; `None` en el paso final
    pub transit_section_time: Option<f64>,
    pub transit_target_name: String,
    pub index: usize,
    pub minutes_to_destination: Option<f64>,
    pub transit: Option<TransitSegment>,
}

/// Ruta normalizada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: ExternalId,
    pub name: String,
    pub description: Option<String>,
    pub steps: Vec<RouteStep>,
}

impl Route {
    /// Convierte la definición del backend en el modelo normalizado.
    ///
    /// Falla si se rompen los invariantes: un único paso final y en última
    /// posición, tiempos de sección y traslado en todo paso no final, y
    /// nombres cortos únicos tras normalizar. Una ruta sin pasos es válida.
    pub fn from_definition(definition: RouteDefinition) -> AppResult<Self> {
        let total = definition.steps.len();

        if total > 0 {
            let finals = definition.steps.iter().filter(|s| s.is_final).count();
            if finals != 1 {
                return Err(validation_error(
                    "steps",
                    &format!("La ruta debe tener exactamente un paso final (tiene {})", finals),
                ));
            }
            if !definition.steps[total - 1].is_final {
                return Err(validation_error("steps", "El paso final debe ser el último de la ruta"));
            }
        }

        let mut seen = HashSet::new();
        for step in &definition.steps {
            let key = normalize_name(&step.display_short_name());
            if key.is_empty() {
                return Err(validation_error(
                    "steps",
                    &format!("La geocerca '{}' no tiene un nombre utilizable", step.idgeo),
                ));
            }
            if !seen.insert(key) {
                return Err(validation_error(
                    "steps",
                    &format!("Nombre corto repetido en la ruta: '{}'", step.display_short_name()),
                ));
            }
        }

        let mut steps = Vec::with_capacity(total);
        for (index, step) in definition.steps.iter().enumerate() {
            if step.is_final {
                steps.push(RouteStep {
                    id: step.idgeo.clone(),
                    name: step.name.clone(),
                    short_name: step.display_short_name(),
                    is_final: true,
                    section_time: None,
                    transit_section_time: None,
                    transit_target_name: String::new(),
                    index,
                    minutes_to_destination: step
                        .config
                        .as_ref()
                        .and_then(|c| c.minutes_to_destination),
                    transit: None,
                });
                continue;
            }

            let section_time = step.section_time().ok_or_else(|| {
                validation_error(
                    "steps",
                    &format!("La geocerca '{}' no tiene tiempo de sección", step.name),
                )
            })?;
            let transit_section_time = step.transit_section_time().ok_or_else(|| {
                validation_error(
                    "steps",
                    &format!("La geocerca '{}' no tiene tiempo de traslado", step.name),
                )
            })?;

            let transit_target_name = transit_label(&definition.steps[index + 1].name);
            let transit = step
                .transit
                .as_ref()
                .filter(|t| !t.is_empty())
                .map(|t| {
                    let tolerance = t.tolerance.clone().unwrap_or_default();
                    TransitSegment {
                        name: t.name.clone().unwrap_or_else(|| transit_target_name.clone()),
                        minutes_to_destination: t.minutes_to_destination,
                        tolerance: TransitTolerance {
                            section_time: tolerance.section_time,
                            on_time: tolerance.on_time,
                            delay: tolerance.delay,
                        },
                    }
                });

            steps.push(RouteStep {
                id: step.idgeo.clone(),
                name: step.name.clone(),
                short_name: step.display_short_name(),
                is_final: false,
                section_time: Some(section_time),
                transit_section_time: Some(transit_section_time),
                transit_target_name,
                index,
                minutes_to_destination: step
                    .config
                    .as_ref()
                    .and_then(|c| c.minutes_to_destination),
                transit,
            });
        }

        Ok(Self {
            id: definition.id,
            name: definition.name,
            description: definition.description,
            steps,
        })
    }

    pub fn final_step(&self) -> Option<&RouteStep> {
        self.steps.iter().find(|s| s.is_final)
    }

    /// Busca un paso por nombre corto usando la regla de normalización
    pub fn step_by_short_name(&self, name: &str) -> Option<&RouteStep> {
        if normalize_name(name).is_empty() {
            return None;
        }
        self.steps.iter().find(|s| names_match(&s.short_name, name))
    }
}
