use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::review::{NewReview, Review};
use crate::utils::errors::AppError;

pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewReview) -> Result<Review, AppError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, car_id, reviewer_name, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.car_id)
        .bind(new.reviewer_name)
        .bind(new.rating)
        .bind(new.comment)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn find_by_car(&self, car_id: Uuid) -> Result<Vec<Review>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE car_id = $1 ORDER BY created_at DESC",
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Reseñas de un conjunto de coches en una sola consulta (para los
    /// listados con reseñas embebidas).
    pub async fn find_for_cars(&self, car_ids: &[Uuid]) -> Result<Vec<Review>, AppError> {
        if car_ids.is_empty() {
            return Ok(Vec::new());
        }

        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE car_id = ANY($1) ORDER BY created_at DESC",
        )
        .bind(car_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
