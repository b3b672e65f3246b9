use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use route_progress::config::environment::EnvironmentConfig;
use route_progress::create_app;
use route_progress::services::progress_monitor::{ProgressMonitor, SystemClock};
use route_progress::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚚 Route Progress - Motor de estado de rutas");
    info!("================================================");
    info!("⚙️ Entorno: {} | monitor cada {:?}", config.environment, config.poll_interval());

    let addr: SocketAddr = config.server_url().parse()?;
    let state = AppState::new(config.clone());

    // Monitor de reproyección
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor = ProgressMonitor::new(Arc::new(state.clone()), SystemClock, config.poll_interval());
    let monitor_handle = tokio::spawn(monitor.run(shutdown_rx));

    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Estado del servicio");
    info!("   POST   /api/progress/project - Proyección sin registrar la ruta");
    info!("   POST   /api/routes/build - Armar pasos desde geocercas");
    info!("   GET    /api/routes - Listar rutas registradas");
    info!("   PUT    /api/routes/:id - Registrar o reemplazar ruta");
    info!("   DELETE /api/routes/:id - Eliminar ruta");
    info!("   PUT    /api/routes/:id/snapshot - Reemplazar foto de vehículos");
    info!("   GET    /api/routes/:id/progress - Última proyección");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // El servidor ya terminó; detener el monitor
    let _ = shutdown_tx.send(true);
    if let Err(e) = monitor_handle.await {
        error!("❌ El monitor terminó con error: {}", e);
    }

    if let Err(e) = served {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
