//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos del motor de progreso:
//! rutas, eventos de vehículo, estados y ocupación derivada.

pub mod occupancy;
pub mod route;
pub mod status;
pub mod vehicle_event;

pub use occupancy::*;
pub use route::*;
pub use status::*;
pub use vehicle_event::*;
