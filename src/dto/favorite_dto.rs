use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::car_dto::CarResponse;
use crate::models::favorite::Favorite;

// Request para marcar un coche como favorito
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFavoriteRequest {
    pub car_id: Option<String>,
}

// Query para quitar un favorito
#[derive(Debug, Deserialize)]
pub struct DeleteFavoriteQuery {
    pub car_id: Option<String>,
}

// Response de favorito
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub id: Uuid,
    pub car_id: Uuid,
    pub added_at: DateTime<Utc>,
}

impl From<Favorite> for FavoriteResponse {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id,
            car_id: favorite.car_id,
            added_at: favorite.added_at,
        }
    }
}

// Favorito con los datos del coche embebidos (null si el coche desapareció)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteWithCarResponse {
    pub id: Uuid,
    pub car_id: Uuid,
    pub added_at: DateTime<Utc>,
    pub car: Option<CarResponse>,
}

// Response de borrado
#[derive(Debug, Serialize)]
pub struct DeleteFavoriteResponse {
    pub message: String,
    pub deleted: FavoriteResponse,
}
