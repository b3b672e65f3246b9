//! Eventos de vehículo
//!
//! Foto instantánea del estado de cada unidad tal como la entrega el
//! servicio de rastreo. Se pide de nuevo en cada ciclo y nunca se compara
//! contra la foto anterior.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::route::ExternalId;
use crate::utils::lenient::{or_default, skip_invalid};

/// Marca de tiempo del rastreo: epoch en milisegundos o texto ISO-8601
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(f64),
    Text(String),
}

impl Timestamp {
    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Timestamp::Millis(value.timestamp_millis() as f64)
    }

    /// Devuelve `None` si el valor no se puede interpretar
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) if ms.is_finite() => DateTime::from_timestamp_millis(ms.round() as i64),
            Timestamp::Millis(_) => None,
            Timestamp::Text(raw) => parse_text_timestamp(raw),
        }
    }
}

fn parse_text_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // ISO sin zona horaria: se asume UTC
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Tipo de transición de geocerca
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransitionType {
    Entry,
    Exit,
    /// Tipo desconocido o ausente
    #[default]
    #[serde(other)]
    Other,
}

/// Transición reciente de una unidad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEvent {
    #[serde(rename = "type", default, deserialize_with = "or_default")]
    pub transition_type: TransitionType,
    #[serde(default, deserialize_with = "or_default")]
    pub geofence_short_name: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub timestamp: Option<Timestamp>,
}

/// Estado reportado por el rastreo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStatusData {
    #[serde(default, deserialize_with = "or_default")]
    pub current_step: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub next_step: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub route_status: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub eta: Option<Timestamp>,
    /// Minutos excedidos en la sección actual
    #[serde(default, deserialize_with = "or_default")]
    pub exceeded_time: Option<f64>,
    /// Minutos transcurridos en la sección actual
    #[serde(default, deserialize_with = "or_default")]
    pub section_time: Option<f64>,
    #[serde(default, deserialize_with = "or_default")]
    pub last_update: Option<Timestamp>,
}

/// Foto de una unidad en un ciclo de consulta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleEvent {
    #[serde(default, deserialize_with = "or_default")]
    pub imei: Option<ExternalId>,
    #[serde(rename = "routeId", default, deserialize_with = "or_default")]
    pub route_id: Option<ExternalId>,
    #[serde(default, deserialize_with = "or_default")]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub status: VehicleStatusData,
    #[serde(rename = "recentEvents", default, deserialize_with = "skip_invalid")]
    pub recent_events: Vec<TransitionEvent>,
}

impl VehicleEvent {
    /// Última transición conocida, si existe
    pub fn last_transition(&self) -> Option<&TransitionEvent> {
        self.recent_events.last()
    }

    pub fn eta(&self) -> Option<DateTime<Utc>> {
        self.status.eta.as_ref().and_then(Timestamp::to_datetime)
    }

    /// La unidad está asignada a la ruta y tiene IMEI
    pub fn belongs_to(&self, route_id: &ExternalId) -> bool {
        self.imei.is_some() && self.route_id.as_ref() == Some(route_id)
    }

    /// Minutos excedidos, solo si son positivos
    pub fn exceeded_minutes(&self) -> Option<f64> {
        self.status.exceeded_time.filter(|t| *t > 0.0)
    }

    /// Nombre para mostrar: nombre corto o, en su defecto, el IMEI
    pub fn display_name(&self) -> String {
        match (&self.short_name, &self.imei) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(imei)) => imei.to_string(),
            _ => String::new(),
        }
    }

    /// Clave estable del vehículo en el tablero
    pub fn unit_key(&self) -> String {
        match &self.imei {
            Some(imei) => format!("UNIT#{}", imei),
            None => "UNIT#".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_deserialize_backend_snapshot() {
        let event: VehicleEvent = serde_json::from_value(json!({
            "imei": "860000000000001",
            "routeId": 7,
            "short_name": "ECO-15",
            "status": {
                "currentStep": "Planta",
                "nextStep": "Caseta",
                "routeStatus": "A tiempo",
                "eta": 1700000000000i64,
                "exceededTime": 3,
                "sectionTime": 12,
                "lastUpdate": "2023-11-14T22:13:20Z"
            },
            "recentEvents": [
                { "type": "EXIT", "geofenceShortName": "Base", "timestamp": "2023-11-14T21:00:00Z" },
                { "type": "ENTRY", "geofenceShortName": "Planta", "timestamp": "2023-11-14T21:30:00Z" }
            ]
        }))
        .unwrap();

        assert!(event.belongs_to(&ExternalId::Number(7)));
        assert!(!event.belongs_to(&ExternalId::Text("7".to_string())));
        assert_eq!(event.last_transition().unwrap().transition_type, TransitionType::Entry);
        assert_eq!(event.exceeded_minutes(), Some(3.0));
        assert_eq!(event.eta(), Utc.timestamp_millis_opt(1_700_000_000_000).single());
        assert_eq!(event.display_name(), "ECO-15");
        assert_eq!(event.unit_key(), "UNIT#860000000000001");
    }

    #[test]
    fn test_missing_fields_degrade_to_defaults() {
        let event: VehicleEvent = serde_json::from_value(json!({ "imei": 1 })).unwrap();
        assert!(event.last_transition().is_none());
        assert!(event.eta().is_none());
        assert!(event.exceeded_minutes().is_none());
        assert!(!event.belongs_to(&ExternalId::Number(1)));
    }

    #[test]
    fn test_unknown_transition_type() {
        let transition: TransitionEvent =
            serde_json::from_value(json!({ "type": "SPEEDING", "geofenceShortName": "P1" })).unwrap();
        assert_eq!(transition.transition_type, TransitionType::Other);
    }

    #[test]
    fn test_timestamp_parsing() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).single();
        assert_eq!(Timestamp::Text("2024-03-01T12:30:00Z".into()).to_datetime(), expected);
        assert_eq!(Timestamp::Text("2024-03-01T06:30:00-06:00".into()).to_datetime(), expected);
        assert_eq!(Timestamp::Text("2024-03-01T12:30:00.000".into()).to_datetime(), expected);
        assert_eq!(Timestamp::Text("not a date".into()).to_datetime(), None);
        assert_eq!(Timestamp::Text(String::new()).to_datetime(), None);
        assert_eq!(Timestamp::Millis(f64::NAN).to_datetime(), None);
    }

    #[test]
    fn test_null_collections_and_status_default() {
        let event: VehicleEvent = serde_json::from_value(json!({
            "imei": 5, "routeId": 7, "status": null, "recentEvents": null
        }))
        .unwrap();
        assert_eq!(event.status, VehicleStatusData::default());
        assert!(event.recent_events.is_empty());
        assert!(event.belongs_to(&ExternalId::Number(7)));
    }

    #[test]
    fn test_transition_without_type_is_other() {
        let event: VehicleEvent = serde_json::from_value(json!({
            "imei": 5,
            "recentEvents": [ { "geofenceShortName": "P1" }, null, { "type": 3 } ]
        }))
        .unwrap();
        assert_eq!(event.recent_events.len(), 2);
        assert!(event
            .recent_events
            .iter()
            .all(|t| t.transition_type == TransitionType::Other));
    }

    #[test]
    fn test_wrong_typed_status_fields_become_none() {
        let event: VehicleEvent = serde_json::from_value(json!({
            "imei": 5,
            "status": {
                "currentStep": "P1",
                "eta": true,
                "exceededTime": "3",
                "sectionTime": [1],
                "routeStatus": 12
            }
        }))
        .unwrap();
        assert_eq!(event.status.current_step.as_deref(), Some("P1"));
        assert!(event.eta().is_none());
        assert!(event.exceeded_minutes().is_none());
        assert!(event.status.section_time.is_none());
        assert!(event.status.route_status.is_none());
    }

    #[test]
    fn test_bad_unit_does_not_break_the_batch() {
        let events: Vec<VehicleEvent> = serde_json::from_value(json!([
            { "imei": 1, "routeId": 7, "status": { "currentStep": "P1" } },
            { "imei": 2, "routeId": 7, "status": null, "recentEvents": null },
            { "imei": { "nested": true }, "routeId": [7], "short_name": 99 }
        ]))
        .unwrap();
        assert_eq!(events.len(), 3);
        assert!(events[2].imei.is_none());
        assert!(events[2].route_id.is_none());
        assert!(events[2].short_name.is_none());
    }

    #[test]
    fn test_exceeded_time_zero_is_ignored() {
        let mut event = VehicleEvent::default();
        event.status.exceeded_time = Some(0.0);
        assert!(event.exceeded_minutes().is_none());
    }
}
