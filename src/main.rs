use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use fleet_routing::config::database::{run_migrations, DatabaseConfig};
use fleet_routing::config::environment::EnvironmentConfig;
use fleet_routing::repositories::{InMemoryJobRepository, JobRepository, PgJobRepository};
use fleet_routing::services::{HttpSolverClient, JobOrchestrator};
use fleet_routing::{create_app_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env().context("invalid environment configuration")?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚚 Fleet Routing - Optimización de rutas");
    info!("========================================");
    info!("🌍 Entorno: {}", config.environment);

    let repository: Arc<dyn JobRepository> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = DatabaseConfig::new(url)
                .create_pool()
                .await
                .context("error conectando a PostgreSQL")?;
            run_migrations(&pool)
                .await
                .context("error ejecutando migraciones")?;
            info!("✅ PostgreSQL conectado, migraciones aplicadas");
            Arc::new(PgJobRepository::new(pool))
        }
        None => {
            warn!("⚠️ DATABASE_URL no definido, los jobs se guardan en memoria");
            Arc::new(InMemoryJobRepository::new())
        }
    };

    if config.solver_api_url.is_none() {
        warn!("⚠️ SOLVER_API_URL no definido, todos los jobs fallarán como SolverUnavailable");
    }
    let solver = HttpSolverClient::new(config.solver_api_url.clone(), config.solver_timeout)
        .context("error creando el cliente del solver")?;

    let orchestrator = Arc::new(
        JobOrchestrator::new(repository, Arc::new(solver))
            .with_solver_timeout(config.solver_timeout)
            .with_fuel_price(config.fuel_price_per_liter),
    );

    // Cierra también los jobs que quedaron en `running` en un arranque anterior
    let sweeper = orchestrator.spawn_stale_job_sweeper(config.stale_job_grace);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("dirección inválida: {}", config.server_url()))?;
    let app = create_app_router(AppState::new(config, orchestrator));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   GET  /api/fuel-price - Precio de combustible por defecto");
    info!("   POST /api/optimize - Optimización síncrona");
    info!("   POST /api/optimize/jobs - Crear job de optimización");
    info!("   GET  /api/optimize/jobs/:id - Estado del job");
    info!("   POST /api/optimize/jobs/:id/dispatch - Despachar job pendiente");
    info!("   POST /api/routes/assemble - Ensamblar rutas");
    info!("   POST /api/routes/validate - Validar restricciones de una ruta");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    sweeper.abort();
    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
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
