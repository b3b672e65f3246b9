//! Agregador de peor estado
//!
//! Cuando varias unidades comparten paso o tramo el tablero muestra un solo
//! indicador. Se elige por la tabla de precedencia de [`RouteStatus`].

use crate::models::{ClassifiedVehicle, RouteStatus};

/// Peor estado entre varios; `None` si no hay ninguno
pub fn worst_of<I>(statuses: I) -> Option<RouteStatus>
where
    I: IntoIterator<Item = RouteStatus>,
{
    statuses.into_iter().max_by_key(|s| s.precedence())
}

/// Peor estado entre las unidades de un paso o tramo
pub fn worst_status(vehicles: &[ClassifiedVehicle]) -> Option<RouteStatus> {
    worst_of(vehicles.iter().map(ClassifiedVehicle::status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, IconColor};

    fn vehicle(status: RouteStatus) -> ClassifiedVehicle {
        ClassifiedVehicle {
            unit_key: format!("UNIT#{}", status),
            imei: None,
            display_name: status.to_string(),
            route_status_label: None,
            step_short_name: "P1".to_string(),
            exceeded_time: None,
            classification: Classification {
                delay_to_destination_minutes: Some(0),
                status,
                icon_color: IconColor::Blue,
                reported: false,
            },
        }
    }

    #[test]
    fn test_late_beats_delay_and_on_time() {
        let vehicles = [
            vehicle(RouteStatus::OnTime),
            vehicle(RouteStatus::Late),
            vehicle(RouteStatus::Delay),
        ];
        assert_eq!(worst_status(&vehicles), Some(RouteStatus::Late));
    }

    #[test]
    fn test_on_time_is_worse_than_arrived() {
        let vehicles = [vehicle(RouteStatus::Arrived), vehicle(RouteStatus::OnTime)];
        assert_eq!(worst_status(&vehicles), Some(RouteStatus::OnTime));
    }

    #[test]
    fn test_waiting_and_no_route_rank_last() {
        assert_eq!(
            worst_of([RouteStatus::Late, RouteStatus::Waiting]),
            Some(RouteStatus::Waiting)
        );
        assert_eq!(
            worst_of([RouteStatus::NoRoute, RouteStatus::Waiting]),
            Some(RouteStatus::NoRoute)
        );
        assert_eq!(
            worst_of([RouteStatus::NoRoute, RouteStatus::Unknown]),
            Some(RouteStatus::Unknown)
        );
    }

    #[test]
    fn test_not_string_length() {
        // "late" es más corto que "ontime", pero la precedencia manda
        assert_eq!(worst_of([RouteStatus::Late, RouteStatus::OnTime]), Some(RouteStatus::Late));
        assert_eq!(worst_of([RouteStatus::OnTime, RouteStatus::Delay]), Some(RouteStatus::Delay));
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(worst_status(&[]), None);
        assert_eq!(worst_status(&[vehicle(RouteStatus::Delay)]), Some(RouteStatus::Delay));
    }
}
