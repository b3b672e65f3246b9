//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: rutas registradas, la última foto de
//! vehículos de cada una y su última proyección.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::environment::EnvironmentConfig;
use crate::models::{Route, RouteProgress, VehicleEvent};
use crate::services::progress_monitor::SnapshotSource;

/// Ruta registrada con su última foto y proyección
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub route: Route,
    pub events: Vec<VehicleEvent>,
    pub progress: Option<RouteProgress>,
    pub snapshot_received_at: Option<DateTime<Utc>>,
}

impl RouteEntry {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            events: Vec::new(),
            progress: None,
            snapshot_received_at: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub routes: Arc<RwLock<HashMap<String, RouteEntry>>>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            config,
            routes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registra o reemplaza una ruta; conserva la foto si ya existía
    pub async fn upsert_route(&self, route: Route) -> bool {
        let key = route.id.to_string();
        let mut routes = self.routes.write().await;

        let replaced = match routes.get_mut(&key) {
            Some(entry) => {
                entry.route = route;
                entry.progress = None;
                true
            }
            None => {
                routes.insert(key.clone(), RouteEntry::new(route));
                false
            }
        };

        info!("💾 Ruta '{}' registrada (reemplazo: {}). Total: {}", key, replaced, routes.len());
        replaced
    }

    pub async fn remove_route(&self, route_id: &str) -> bool {
        let removed = self.routes.write().await.remove(route_id).is_some();
        if removed {
            info!("🗑️ Ruta '{}' eliminada", route_id);
        }
        removed
    }

    pub async fn get_route(&self, route_id: &str) -> Option<RouteEntry> {
        self.routes.read().await.get(route_id).cloned()
    }

    /// Rutas registradas ordenadas por id
    pub async fn list_routes(&self) -> Vec<RouteEntry> {
        let routes = self.routes.read().await;
        let mut entries: Vec<RouteEntry> = routes.values().cloned().collect();
        entries.sort_by(|a, b| a.route.id.to_string().cmp(&b.route.id.to_string()));
        entries
    }

    /// Reemplaza por completo la foto de vehículos de una ruta.
    ///
    /// Devuelve la ruta para proyectarla, o `None` si no está registrada.
    pub async fn replace_snapshot(
        &self,
        route_id: &str,
        events: Vec<VehicleEvent>,
        received_at: DateTime<Utc>,
    ) -> Option<Route> {
        let mut routes = self.routes.write().await;
        let entry = routes.get_mut(route_id)?;
        debug!("📥 Foto de {} unidades para la ruta '{}'", events.len(), route_id);
        entry.events = events;
        entry.snapshot_received_at = Some(received_at);
        Some(entry.route.clone())
    }

    /// Guarda una proyección; gana la más reciente
    pub async fn store_progress(&self, progress: RouteProgress) {
        let key = progress.route_id.to_string();
        let mut routes = self.routes.write().await;
        if let Some(entry) = routes.get_mut(&key) {
            let is_newer = entry
                .progress
                .as_ref()
                .map_or(true, |current| current.computed_at <= progress.computed_at);
            if is_newer {
                entry.progress = Some(progress);
            }
        }
    }
}

#[async_trait]
impl SnapshotSource for AppState {
    async fn snapshots(&self) -> Vec<(Route, Vec<VehicleEvent>)> {
        self.routes
            .read()
            .await
            .values()
            .map(|entry| (entry.route.clone(), entry.events.clone()))
            .collect()
    }

    async fn publish(&self, progress: RouteProgress) {
        self.store_progress(progress).await;
    }
}
