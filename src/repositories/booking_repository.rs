use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingChanges, NewBooking};
use crate::services::availability;
use crate::utils::errors::AppError;

/// Resultado del alta transaccional de una reserva
pub enum BookingCreateOutcome {
    Created(Booking),
    /// La recomprobación dentro de la transacción encontró solapes
    Conflicts(Vec<Booking>),
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar una reserva recomprobando los conflictos dentro de la misma
    /// transacción. El lock advisory por coche serializa los intentos
    /// concurrentes sobre el mismo vehículo: dos peticiones solapadas no
    /// pueden pasar las dos el chequeo y commitear las dos.
    pub async fn create_checked(
        &self,
        new: NewBooking,
    ) -> Result<BookingCreateOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
            .bind(new.car_id.to_string())
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE car_id = $1 AND status <> 'cancelled'",
        )
        .bind(new.car_id)
        .fetch_all(&mut *tx)
        .await?;

        let conflicts = availability::find_conflicts(&existing, new.start_date, new.end_date);
        if !conflicts.is_empty() {
            tx.rollback().await?;
            return Ok(BookingCreateOutcome::Conflicts(conflicts));
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, car_id, car_name, renter_name, renter_email, renter_phone,
                start_date, end_date, total_hours, total_price, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.car_id)
        .bind(new.car_name)
        .bind(new.renter_name)
        .bind(new.renter_email)
        .bind(new.renter_phone)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.total_hours)
        .bind(new.total_price)
        .bind(new.status.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(BookingCreateOutcome::Created(booking))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn list(
        &self,
        car_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, AppError> {
        let bookings = match car_id {
            Some(car_id) => {
                sqlx::query_as::<_, Booking>(
                    r#"
                    SELECT * FROM bookings WHERE car_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(car_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Booking>(
                    "SELECT * FROM bookings ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(bookings)
    }

    /// Snapshot de reservas activas de un coche para el motor de
    /// disponibilidad (todo lo que no está cancelado ocupa calendario).
    pub async fn find_active_by_car(&self, car_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE car_id = $1 AND status <> 'cancelled'",
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn update(&self, id: Uuid, changes: BookingChanges) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET
                status = COALESCE($2, status),
                car_name = COALESCE($3, car_name),
                renter_name = COALESCE($4, renter_name),
                renter_email = COALESCE($5, renter_email),
                renter_phone = COALESCE($6, renter_phone),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                total_hours = COALESCE($9, total_hours),
                total_price = COALESCE($10, total_price)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.status)
        .bind(changes.car_name)
        .bind(changes.renter_name)
        .bind(changes.renter_email)
        .bind(changes.renter_phone)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.total_hours)
        .bind(changes.total_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }
}
