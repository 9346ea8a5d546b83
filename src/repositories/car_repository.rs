use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::car::{CarListing, CarListingChanges, NewCarListing};
use crate::utils::errors::{bad_request, AppError};

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewCarListing) -> Result<CarListing, AppError> {
        let car = sqlx::query_as::<_, CarListing>(
            r#"
            INSERT INTO car_listings (
                id, car_name, car_model, number_plate, rc_number, fuel_type,
                price_per_hour, insurance, driving_notes, owner_name,
                owner_contact, owner_email, owner_license, car_image, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.car_name)
        .bind(new.car_model)
        .bind(new.number_plate)
        .bind(new.rc_number)
        .bind(new.fuel_type)
        .bind(new.price_per_hour)
        .bind(new.insurance)
        .bind(new.driving_notes)
        .bind(new.owner_name)
        .bind(new.owner_contact)
        .bind(new.owner_email)
        .bind(new.owner_license)
        .bind(new.car_image)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_plate_violation)?;

        Ok(car)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CarListing>, AppError> {
        let car = sqlx::query_as::<_, CarListing>("SELECT * FROM car_listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
        search: Option<&str>,
    ) -> Result<Vec<CarListing>, AppError> {
        let cars = match search {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_as::<_, CarListing>(
                    r#"
                    SELECT * FROM car_listings
                    WHERE car_name ILIKE $1 OR car_model ILIKE $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CarListing>(
                    "SELECT * FROM car_listings ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(cars)
    }

    /// Comprobar si una matrícula ya está registrada, opcionalmente
    /// excluyendo un anuncio (para updates de matrícula).
    pub async fn plate_exists(
        &self,
        number_plate: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM car_listings
                WHERE number_plate = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(number_plate)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: CarListingChanges,
    ) -> Result<CarListing, AppError> {
        let car = sqlx::query_as::<_, CarListing>(
            r#"
            UPDATE car_listings SET
                car_name = COALESCE($2, car_name),
                car_model = COALESCE($3, car_model),
                number_plate = COALESCE($4, number_plate),
                rc_number = COALESCE($5, rc_number),
                fuel_type = COALESCE($6, fuel_type),
                price_per_hour = COALESCE($7, price_per_hour),
                insurance = COALESCE($8, insurance),
                driving_notes = COALESCE($9, driving_notes),
                owner_name = COALESCE($10, owner_name),
                owner_contact = COALESCE($11, owner_contact),
                owner_email = COALESCE($12, owner_email),
                owner_license = COALESCE($13, owner_license),
                car_image = COALESCE($14, car_image)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.car_name)
        .bind(changes.car_model)
        .bind(changes.number_plate)
        .bind(changes.rc_number)
        .bind(changes.fuel_type)
        .bind(changes.price_per_hour)
        .bind(changes.insurance)
        .bind(changes.driving_notes)
        .bind(changes.owner_name)
        .bind(changes.owner_contact)
        .bind(changes.owner_email)
        .bind(changes.owner_license)
        .bind(changes.car_image)
        .fetch_one(&self.pool)
        .await
        .map_err(map_plate_violation)?;

        Ok(car)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<CarListing>, AppError> {
        let car =
            sqlx::query_as::<_, CarListing>("DELETE FROM car_listings WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(car)
    }
}

/// La constraint UNIQUE de la matrícula es la fuente autoritativa del error
/// de duplicado; el pre-check del controller es solo el camino rápido.
fn map_plate_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.constraint() == Some("car_listings_number_plate_key") {
            return bad_request(
                "DUPLICATE_NUMBER_PLATE",
                "A car with this number plate already exists",
            );
        }
    }
    AppError::Database(e)
}
