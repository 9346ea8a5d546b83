//! Modelo de Favorite
//!
//! Como máximo existe una fila de favorito por coche; el POST
//! duplicado es idempotente.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Favorite principal - mapea a la tabla favorites
#[derive(Debug, Clone, FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub car_id: Uuid,
    pub added_at: DateTime<Utc>,
}
