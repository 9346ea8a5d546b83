mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Car Rental Marketplace - API");
    info!("================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();
    let config = EnvironmentConfig::default();
    let addr: SocketAddr = config.server_addr().parse()?;

    // Crear router de la API
    let app_state = AppState::new(pool, config);
    info!("   Entorno: {}", app_state.config.environment);

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/cars", routes::car_routes::create_car_router())
        .nest("/api/bookings", routes::booking_routes::create_booking_router())
        .nest("/api/reviews", routes::review_routes::create_review_router())
        .nest("/api/favorites", routes::favorite_routes::create_favorite_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚙 Anuncios:");
    info!("   POST   /api/cars - Crear anuncio");
    info!("   GET    /api/cars - Listar anuncios (search, limit, offset)");
    info!("   GET    /api/cars/:id - Obtener anuncio con reseñas");
    info!("   PUT    /api/cars/:id - Actualizar anuncio");
    info!("   DELETE /api/cars/:id - Eliminar anuncio");
    info!("📅 Reservas:");
    info!("   GET  /api/bookings/availability - Consultar disponibilidad");
    info!("   POST /api/bookings - Crear reserva");
    info!("   GET  /api/bookings - Listar reservas (car_id, limit, offset)");
    info!("   PUT  /api/bookings/:id - Actualizar reserva");
    info!("⭐ Reseñas:");
    info!("   POST /api/reviews - Crear reseña");
    info!("❤️ Favoritos:");
    info!("   GET    /api/favorites - Listar favoritos");
    info!("   POST   /api/favorites - Añadir favorito (idempotente)");
    info!("   DELETE /api/favorites?car_id= - Quitar favorito");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "car-rental-backend",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
