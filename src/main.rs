use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use garage_manager::{
    build_router, config::environment::EnvironmentConfig, database::connect_store, state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG, por defecto info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🔧 Garage Manager - API + UI");
    info!("============================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;
    info!("⚙️ Entorno: {} ({:?})", config.environment, config.storage_backend);
    info!("🔄 Política de actualización API: {:?}", config.api_update_policy);

    let store = match connect_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("❌ Error inicializando el almacenamiento: {}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = config.server_url().parse().context("HOST/PORT inválidos")?;
    let app = build_router(AppState::new(store, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   POST /api/auth/register | /api/auth/login | /api/auth/logout");
    info!("   GET|POST /services/ - GET|PUT|DELETE /services/:id");
    info!("   GET|POST /vehicles/ - GET|PUT|DELETE /vehicles/:id");
    info!("   /api/customers, /api/mechanics/, /api/invoices/");
    info!("🖥️ UI: /login, /, /customers, /vehicles, /services, /mechanics, /invoices");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
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
