//! Modelo de Review
//!
//! Las reseñas son independientes de las reservas: cualquiera puede
//! reseñar cualquier coche.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Rango válido de puntuación (inclusive)
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Review principal - mapea a la tabla reviews
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub car_id: Uuid,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Datos saneados para insertar una nueva reseña
#[derive(Debug)]
pub struct NewReview {
    pub car_id: Uuid,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
}
