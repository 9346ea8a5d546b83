//! Controller de Favorites
//!
//! Como máximo un favorito por coche; el alta repetida devuelve la fila
//! existente en lugar de fallar o duplicar.

use sqlx::PgPool;

use crate::dto::car_dto::CarResponse;
use crate::dto::favorite_dto::{
    CreateFavoriteRequest, DeleteFavoriteQuery, DeleteFavoriteResponse, FavoriteResponse,
    FavoriteWithCarResponse,
};
use crate::repositories::car_repository::CarRepository;
use crate::repositories::favorite_repository::FavoriteRepository;
use crate::utils::errors::{bad_request, not_found, AppError};
use crate::utils::validation::validate_uuid;

/// Resultado del alta idempotente
pub struct FavoriteCreation {
    pub favorite: FavoriteResponse,
    pub created: bool,
}

pub struct FavoriteController {
    favorites: FavoriteRepository,
    cars: CarRepository,
}

impl FavoriteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            favorites: FavoriteRepository::new(pool.clone()),
            cars: CarRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<FavoriteWithCarResponse>, AppError> {
        let favorites = self.favorites.find_all().await?;

        let mut result = Vec::with_capacity(favorites.len());
        for favorite in favorites {
            let car = self.cars.find_by_id(favorite.car_id).await?;
            result.push(FavoriteWithCarResponse {
                id: favorite.id,
                car_id: favorite.car_id,
                added_at: favorite.added_at,
                car: car.map(CarResponse::from),
            });
        }

        Ok(result)
    }

    pub async fn create(
        &self,
        request: CreateFavoriteRequest,
    ) -> Result<FavoriteCreation, AppError> {
        let car_id_raw = request
            .car_id
            .ok_or_else(|| bad_request("MISSING_REQUIRED_FIELD", "carId is required"))?;

        let car_id = validate_uuid(&car_id_raw)
            .map_err(|_| bad_request("INVALID_CAR_ID", "carId must be a valid UUID"))?;

        if self.cars.find_by_id(car_id).await?.is_none() {
            return Err(not_found("CAR_NOT_FOUND", "Car listing not found"));
        }

        let (favorite, created) = self.favorites.create(car_id).await?;
        Ok(FavoriteCreation {
            favorite: FavoriteResponse::from(favorite),
            created,
        })
    }

    pub async fn delete(
        &self,
        query: DeleteFavoriteQuery,
    ) -> Result<DeleteFavoriteResponse, AppError> {
        let car_id_raw = query
            .car_id
            .ok_or_else(|| bad_request("MISSING_CAR_ID", "car_id query parameter is required"))?;

        let car_id = validate_uuid(&car_id_raw)
            .map_err(|_| bad_request("INVALID_CAR_ID", "car_id must be a valid UUID"))?;

        let deleted = self
            .favorites
            .delete_by_car(car_id)
            .await?
            .ok_or_else(|| not_found("FAVORITE_NOT_FOUND", "Favorite not found"))?;

        Ok(DeleteFavoriteResponse {
            message: "Favorite removed successfully".to_string(),
            deleted: FavoriteResponse::from(deleted),
        })
    }
}
