use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::favorite::Favorite;
use crate::utils::errors::AppError;

pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Favorite>, AppError> {
        let favorites =
            sqlx::query_as::<_, Favorite>("SELECT * FROM favorites ORDER BY added_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(favorites)
    }

    pub async fn find_by_car(&self, car_id: Uuid) -> Result<Option<Favorite>, AppError> {
        let favorite = sqlx::query_as::<_, Favorite>("SELECT * FROM favorites WHERE car_id = $1")
            .bind(car_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(favorite)
    }

    /// Alta idempotente: si ya existe un favorito para el coche se devuelve
    /// esa fila en vez de crear una segunda.
    pub async fn create(&self, car_id: Uuid) -> Result<(Favorite, bool), AppError> {
        if let Some(existing) = self.find_by_car(car_id).await? {
            return Ok((existing, false));
        }

        let favorite = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (id, car_id, added_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (car_id) DO UPDATE SET car_id = EXCLUDED.car_id
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(car_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok((favorite, true))
    }

    pub async fn delete_by_car(&self, car_id: Uuid) -> Result<Option<Favorite>, AppError> {
        let favorite =
            sqlx::query_as::<_, Favorite>("DELETE FROM favorites WHERE car_id = $1 RETURNING *")
                .bind(car_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(favorite)
    }
}
