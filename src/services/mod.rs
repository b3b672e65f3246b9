//! Services module
//!
//! Este módulo contiene la lógica de negocio del motor de progreso:
//! clasificación de retraso, proyección de ocupación por paso, peor
//! estado, construcción de rutas y el monitor periódico.

pub mod delay_classifier;
pub mod progress_monitor;
pub mod route_builder;
pub mod step_projector;
pub mod worst_status;

pub use delay_classifier::classify;
pub use progress_monitor::{Clock, FixedClock, ProgressMonitor, SnapshotSource, SystemClock};
pub use step_projector::{project_route, project_steps, vehicles_with_exceeded_time};
pub use worst_status::worst_status;
