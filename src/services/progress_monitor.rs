//! Monitor de progreso
//!
//! Tarea periódica que vuelve a proyectar cada ruta registrada con la
//! última foto de vehículos. El retraso depende de la hora actual, así que
//! la proyección cambia en cada ciclo aunque la foto no cambie.
//!
//! El reloj es inyectable y la tarea termina cuando el canal de apagado
//! cambia a `true`. Cada ciclo reemplaza por completo el resultado anterior.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::models::{Route, RouteProgress, VehicleEvent};
use crate::services::step_projector::project_route;

/// Fuente de la hora actual
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reloj del sistema
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Reloj fijo y ajustable, para pruebas
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// De dónde salen las rutas a proyectar y a dónde van los resultados
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Rutas registradas con su última foto de vehículos
    async fn snapshots(&self) -> Vec<(Route, Vec<VehicleEvent>)>;

    /// Guarda la proyección más reciente de una ruta
    async fn publish(&self, progress: RouteProgress);
}

/// Tarea periódica de reproyección
pub struct ProgressMonitor<S: SnapshotSource, C: Clock> {
    source: Arc<S>,
    clock: C,
    interval: Duration,
}

impl<S: SnapshotSource, C: Clock> ProgressMonitor<S, C> {
    pub fn new(source: Arc<S>, clock: C, interval: Duration) -> Self {
        Self {
            source,
            clock,
            interval,
        }
    }

    /// Un ciclo: proyecta todas las rutas con la misma hora y publica.
    ///
    /// Devuelve cuántas rutas se proyectaron.
    pub async fn tick(&self) -> usize {
        let now = self.clock.now();
        let snapshots = self.source.snapshots().await;
        let count = snapshots.len();

        for (route, events) in snapshots {
            let progress = project_route(&route, &events, now);
            self.source.publish(progress).await;
        }

        debug!("🔄 Ciclo de monitor: {} rutas proyectadas", count);
        count
    }

    /// Corre hasta que `shutdown` pase a `true` o se cierre el canal
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("⏱️ Monitor de progreso iniciado (cada {:?})", self.interval);

        let mut interval = tokio::time::interval(self.interval);
        // si un ciclo se atrasa no se acumulan ticks
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("🛑 Monitor de progreso detenido");
    }
}
