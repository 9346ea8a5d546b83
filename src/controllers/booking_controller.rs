//! Controller de Bookings
//!
//! Alta de reservas, actualización de estado y consulta de disponibilidad.
//! El alta recomprueba los conflictos dentro de la transacción del insert,
//! así dos peticiones concurrentes solapadas no pueden commitear las dos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::booking_dto::{
    AvailabilityQuery, AvailabilityResponse, BookingListQuery, BookingResponse,
    CreateBookingRequest, UpdateBookingRequest,
};
use crate::models::booking::{BookingChanges, BookingStatus, NewBooking};
use crate::repositories::booking_repository::{BookingCreateOutcome, BookingRepository};
use crate::repositories::car_repository::CarRepository;
use crate::services::availability;
use crate::utils::errors::{bad_request, booking_conflict, missing_field, not_found, AppError};
use crate::utils::validation::{is_valid_email, validate_datetime, validate_uuid};

pub struct BookingController {
    bookings: BookingRepository,
    cars: CarRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            cars: CarRepository::new(pool),
        }
    }

    /// Consulta de disponibilidad: lectura sin locks sobre el snapshot
    /// actual de reservas, recalculada en cada llamada.
    pub async fn check_availability(
        &self,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityResponse, AppError> {
        let (car_id, start, end) = parse_availability_query(query)?;

        let snapshot = self.bookings.find_active_by_car(car_id).await?;
        let result = availability::check_availability(&snapshot, start, end);

        if result.available {
            Ok(AvailabilityResponse {
                available: true,
                message: "Car is available".to_string(),
                conflicts: None,
            })
        } else {
            Ok(AvailabilityResponse {
                available: false,
                message: "Car is not available".to_string(),
                conflicts: Some(
                    result
                        .conflicts
                        .into_iter()
                        .map(BookingResponse::from)
                        .collect(),
                ),
            })
        }
    }

    pub async fn create(&self, request: CreateBookingRequest) -> Result<BookingResponse, AppError> {
        let new = parse_create_request(request)?;

        // Verificación referencial: el coche tiene que existir
        if self.cars.find_by_id(new.car_id).await?.is_none() {
            return Err(not_found("CAR_NOT_FOUND", "Car listing not found"));
        }

        match self.bookings.create_checked(new).await? {
            BookingCreateOutcome::Created(booking) => Ok(BookingResponse::from(booking)),
            BookingCreateOutcome::Conflicts(conflicts) => {
                let conflicts: Vec<BookingResponse> =
                    conflicts.into_iter().map(BookingResponse::from).collect();
                Err(booking_conflict(serde_json::json!(conflicts)))
            }
        }
    }

    pub async fn list(&self, query: BookingListQuery) -> Result<Vec<BookingResponse>, AppError> {
        let car_id = match query.car_id {
            Some(raw) => Some(validate_uuid(&raw).map_err(|_| {
                bad_request("INVALID_CAR_ID", "car_id must be a valid UUID")
            })?),
            None => None,
        };
        let limit = query.limit.unwrap_or(10).min(100);
        let offset = query.offset.unwrap_or(0);

        let bookings = self.bookings.list(car_id, limit, offset).await?;
        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }

    pub async fn update(
        &self,
        id_raw: &str,
        request: UpdateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        let id = validate_uuid(id_raw)
            .map_err(|_| bad_request("INVALID_ID", "Valid ID is required"))?;

        let changes = parse_update_request(request)?;

        let existing = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found("NOT_FOUND", "Booking not found"))?;

        if changes.is_empty() {
            return Err(bad_request("NO_UPDATE_FIELDS", "No fields to update"));
        }

        // El intervalo resultante tiene que seguir siendo válido aunque
        // solo cambie uno de los dos extremos
        validate_effective_range(&changes, existing.start_date, existing.end_date)?;

        let booking = self.bookings.update(id, changes).await?;
        Ok(BookingResponse::from(booking))
    }
}

fn parse_availability_query(
    query: AvailabilityQuery,
) -> Result<(Uuid, DateTime<Utc>, DateTime<Utc>), AppError> {
    let car_id_raw = query
        .car_id
        .ok_or_else(|| missing_field("MISSING_CAR_ID", "car_id"))?;
    let start_raw = query
        .start_date
        .ok_or_else(|| missing_field("MISSING_START_DATE", "start_date"))?;
    let end_raw = query
        .end_date
        .ok_or_else(|| missing_field("MISSING_END_DATE", "end_date"))?;

    let car_id = validate_uuid(&car_id_raw)
        .map_err(|_| bad_request("INVALID_CAR_ID", "car_id must be a valid UUID"))?;
    let start = validate_datetime(&start_raw).map_err(|_| {
        bad_request("INVALID_START_DATE", "start_date must be a valid ISO date string")
    })?;
    let end = validate_datetime(&end_raw).map_err(|_| {
        bad_request("INVALID_END_DATE", "end_date must be a valid ISO date string")
    })?;

    // Un rango invertido o vacío es un error del caller, no "no disponible"
    if start >= end {
        return Err(bad_request(
            "INVALID_DATE_RANGE",
            "start_date must be before end_date",
        ));
    }

    Ok((car_id, start, end))
}

/// Validación del alta en orden de precedencia: presencia de cada campo,
/// identificador, horas, precio, status, email y por último las fechas.
/// El primer fallo gana. El chequeo referencial del coche queda en el
/// controller porque necesita el repositorio.
fn parse_create_request(request: CreateBookingRequest) -> Result<NewBooking, AppError> {
    let car_id_raw = request
        .car_id
        .ok_or_else(|| missing_field("MISSING_CAR_ID", "carId"))?;
    let car_name = request
        .car_name
        .ok_or_else(|| missing_field("MISSING_CAR_NAME", "carName"))?;
    let renter_name = request
        .renter_name
        .ok_or_else(|| missing_field("MISSING_RENTER_NAME", "renterName"))?;
    let renter_email = request
        .renter_email
        .ok_or_else(|| missing_field("MISSING_RENTER_EMAIL", "renterEmail"))?;
    let renter_phone = request
        .renter_phone
        .ok_or_else(|| missing_field("MISSING_RENTER_PHONE", "renterPhone"))?;
    let start_raw = request
        .start_date
        .ok_or_else(|| missing_field("MISSING_START_DATE", "startDate"))?;
    let end_raw = request
        .end_date
        .ok_or_else(|| missing_field("MISSING_END_DATE", "endDate"))?;
    let total_hours = request
        .total_hours
        .ok_or_else(|| missing_field("MISSING_TOTAL_HOURS", "totalHours"))?;
    let total_price = request
        .total_price
        .ok_or_else(|| missing_field("MISSING_TOTAL_PRICE", "totalPrice"))?;

    let car_id = validate_uuid(&car_id_raw)
        .map_err(|_| bad_request("INVALID_CAR_ID", "carId must be a valid UUID"))?;

    if total_hours <= 0 || total_hours > i32::MAX as i64 {
        return Err(bad_request(
            "INVALID_TOTAL_HOURS",
            "totalHours must be a positive number",
        ));
    }

    if total_price <= Decimal::ZERO {
        return Err(bad_request(
            "INVALID_TOTAL_PRICE",
            "totalPrice must be a positive number",
        ));
    }

    let status = match request.status.as_deref() {
        Some(raw) => BookingStatus::parse(raw).ok_or_else(|| {
            bad_request(
                "INVALID_STATUS",
                format!("status must be one of: {}", BookingStatus::VALID_VALUES),
            )
        })?,
        None => BookingStatus::Pending,
    };

    if !is_valid_email(renter_email.trim()) {
        return Err(bad_request(
            "INVALID_EMAIL",
            "renterEmail must be a valid email address",
        ));
    }

    let start_date = validate_datetime(&start_raw).map_err(|_| {
        bad_request("INVALID_START_DATE", "startDate must be a valid ISO date string")
    })?;
    let end_date = validate_datetime(&end_raw).map_err(|_| {
        bad_request("INVALID_END_DATE", "endDate must be a valid ISO date string")
    })?;

    if start_date >= end_date {
        return Err(bad_request(
            "INVALID_DATE_RANGE",
            "startDate must be before endDate",
        ));
    }

    Ok(NewBooking {
        car_id,
        car_name: car_name.trim().to_string(),
        renter_name: renter_name.trim().to_string(),
        renter_email: renter_email.trim().to_lowercase(),
        renter_phone: renter_phone.trim().to_string(),
        start_date,
        end_date,
        total_hours: total_hours as i32,
        total_price,
        status,
    })
}

/// Comprobar que el intervalo que quedaría almacenado tras aplicar los
/// cambios sigue cumpliendo start < end. Un rango invertido es un error
/// del cliente, no un fallo interno del storage.
fn validate_effective_range(
    changes: &BookingChanges,
    current_start: DateTime<Utc>,
    current_end: DateTime<Utc>,
) -> Result<(), AppError> {
    let start = changes.start_date.unwrap_or(current_start);
    let end = changes.end_date.unwrap_or(current_end);

    if start >= end {
        return Err(bad_request(
            "INVALID_DATE_RANGE",
            "startDate must be before endDate",
        ));
    }

    Ok(())
}

fn parse_update_request(request: UpdateBookingRequest) -> Result<BookingChanges, AppError> {
    let status = match request.status {
        Some(raw) => {
            let status = BookingStatus::parse(&raw).ok_or_else(|| {
                bad_request(
                    "INVALID_STATUS",
                    format!(
                        "Invalid status. Must be one of: {}",
                        BookingStatus::VALID_VALUES
                    ),
                )
            })?;
            // Modelo permisivo: cualquier status puede pasar a cualquier otro
            Some(status.as_str().to_string())
        }
        None => None,
    };

    let start_date = match request.start_date {
        Some(raw) => Some(validate_datetime(&raw).map_err(|_| {
            bad_request("INVALID_START_DATE", "startDate must be a valid ISO date string")
        })?),
        None => None,
    };
    let end_date = match request.end_date {
        Some(raw) => Some(validate_datetime(&raw).map_err(|_| {
            bad_request("INVALID_END_DATE", "endDate must be a valid ISO date string")
        })?),
        None => None,
    };

    let total_hours = match request.total_hours {
        Some(h) if h <= 0 || h > i32::MAX as i64 => {
            return Err(bad_request(
                "INVALID_TOTAL_HOURS",
                "totalHours must be a positive number",
            ));
        }
        Some(h) => Some(h as i32),
        None => None,
    };

    let total_price = match request.total_price {
        Some(p) if p <= Decimal::ZERO => {
            return Err(bad_request(
                "INVALID_TOTAL_PRICE",
                "totalPrice must be a positive number",
            ));
        }
        other => other,
    };

    Ok(BookingChanges {
        status,
        car_name: request.car_name.map(|v| v.trim().to_string()),
        renter_name: request.renter_name.map(|v| v.trim().to_string()),
        renter_email: request.renter_email.map(|v| v.trim().to_lowercase()),
        renter_phone: request.renter_phone.map(|v| v.trim().to_string()),
        start_date,
        end_date,
        total_hours,
        total_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateBookingRequest {
        CreateBookingRequest {
            car_id: Some("550e8400-e29b-41d4-a716-446655440000".to_string()),
            car_name: Some("  Seat Ibiza  ".to_string()),
            renter_name: Some("Laura".to_string()),
            renter_email: Some("Laura@Example.COM".to_string()),
            renter_phone: Some(" +34600111222 ".to_string()),
            start_date: Some("2025-08-18T10:00:00Z".to_string()),
            end_date: Some("2025-08-18T12:00:00Z".to_string()),
            total_hours: Some(2),
            total_price: Some(Decimal::new(3000, 2)),
            status: None,
        }
    }

    fn code_of(err: AppError) -> &'static str {
        match err {
            AppError::BadRequest { code, .. } => code,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_request_is_sanitized() {
        let new = parse_create_request(valid_request()).unwrap();
        assert_eq!(new.car_name, "Seat Ibiza");
        assert_eq!(new.renter_email, "laura@example.com");
        assert_eq!(new.renter_phone, "+34600111222");
        assert_eq!(new.status, BookingStatus::Pending);
        assert_eq!(new.total_hours, 2);
    }

    #[test]
    fn test_missing_fields_fail_in_order() {
        let mut request = valid_request();
        request.car_id = None;
        request.renter_email = None;
        // carId tiene precedencia sobre renterEmail
        assert_eq!(code_of(parse_create_request(request).unwrap_err()), "MISSING_CAR_ID");

        let mut request = valid_request();
        request.total_price = None;
        assert_eq!(
            code_of(parse_create_request(request).unwrap_err()),
            "MISSING_TOTAL_PRICE"
        );
    }

    #[test]
    fn test_invalid_car_id() {
        let mut request = valid_request();
        request.car_id = Some("42".to_string());
        assert_eq!(code_of(parse_create_request(request).unwrap_err()), "INVALID_CAR_ID");
    }

    #[test]
    fn test_non_positive_hours_rejected() {
        for hours in [0, -3] {
            let mut request = valid_request();
            request.total_hours = Some(hours);
            assert_eq!(
                code_of(parse_create_request(request).unwrap_err()),
                "INVALID_TOTAL_HOURS"
            );
        }
    }

    #[test]
    fn test_non_positive_price_rejected() {
        for price in [Decimal::ZERO, Decimal::new(-500, 2)] {
            let mut request = valid_request();
            request.total_price = Some(price);
            assert_eq!(
                code_of(parse_create_request(request).unwrap_err()),
                "INVALID_TOTAL_PRICE"
            );
        }
    }

    #[test]
    fn test_invalid_status_rejected_and_default_applied() {
        let mut request = valid_request();
        request.status = Some("rejected".to_string());
        assert_eq!(code_of(parse_create_request(request).unwrap_err()), "INVALID_STATUS");

        let mut request = valid_request();
        request.status = Some("confirmed".to_string());
        let new = parse_create_request(request).unwrap();
        assert_eq!(new.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut request = valid_request();
        request.renter_email = Some("sin-arroba".to_string());
        assert_eq!(code_of(parse_create_request(request).unwrap_err()), "INVALID_EMAIL");
    }

    #[test]
    fn test_inverted_or_empty_range_rejected() {
        let mut request = valid_request();
        request.start_date = Some("2025-08-18T12:00:00Z".to_string());
        request.end_date = Some("2025-08-18T12:00:00Z".to_string());
        assert_eq!(
            code_of(parse_create_request(request).unwrap_err()),
            "INVALID_DATE_RANGE"
        );

        let mut request = valid_request();
        request.start_date = Some("2025-08-18T14:00:00Z".to_string());
        request.end_date = Some("2025-08-18T12:00:00Z".to_string());
        assert_eq!(
            code_of(parse_create_request(request).unwrap_err()),
            "INVALID_DATE_RANGE"
        );
    }

    #[test]
    fn test_availability_query_validation() {
        let query = AvailabilityQuery {
            car_id: None,
            start_date: Some("2025-08-18T10:00:00Z".to_string()),
            end_date: Some("2025-08-18T12:00:00Z".to_string()),
        };
        assert_eq!(code_of(parse_availability_query(query).unwrap_err()), "MISSING_CAR_ID");

        let query = AvailabilityQuery {
            car_id: Some("550e8400-e29b-41d4-a716-446655440000".to_string()),
            start_date: Some("2025-08-18T12:00:00Z".to_string()),
            end_date: Some("2025-08-18T10:00:00Z".to_string()),
        };
        assert_eq!(
            code_of(parse_availability_query(query).unwrap_err()),
            "INVALID_DATE_RANGE"
        );
    }

    #[test]
    fn test_update_request_empty_is_detected() {
        let request = UpdateBookingRequest {
            status: None,
            car_name: None,
            renter_name: None,
            renter_email: None,
            renter_phone: None,
            start_date: None,
            end_date: None,
            total_hours: None,
            total_price: None,
        };
        let changes = parse_update_request(request).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_update_cannot_invert_stored_range() {
        let current_start = validate_datetime("2025-08-18T10:00:00Z").unwrap();
        let current_end = validate_datetime("2025-08-18T12:00:00Z").unwrap();

        // Mover solo el inicio más allá del fin almacenado
        let changes = BookingChanges {
            start_date: Some(validate_datetime("2025-08-18T14:00:00Z").unwrap()),
            ..Default::default()
        };
        assert_eq!(
            code_of(validate_effective_range(&changes, current_start, current_end).unwrap_err()),
            "INVALID_DATE_RANGE"
        );

        // Mover solo el fin por delante del inicio almacenado
        let changes = BookingChanges {
            end_date: Some(validate_datetime("2025-08-18T09:00:00Z").unwrap()),
            ..Default::default()
        };
        assert_eq!(
            code_of(validate_effective_range(&changes, current_start, current_end).unwrap_err()),
            "INVALID_DATE_RANGE"
        );

        // Colapsar el intervalo a vacío tampoco vale
        let changes = BookingChanges {
            start_date: Some(current_end),
            ..Default::default()
        };
        assert_eq!(
            code_of(validate_effective_range(&changes, current_start, current_end).unwrap_err()),
            "INVALID_DATE_RANGE"
        );
    }

    #[test]
    fn test_update_consistent_range_accepted() {
        let current_start = validate_datetime("2025-08-18T10:00:00Z").unwrap();
        let current_end = validate_datetime("2025-08-18T12:00:00Z").unwrap();

        // Sin tocar fechas el intervalo almacenado sigue siendo válido
        let changes = BookingChanges {
            status: Some("confirmed".to_string()),
            ..Default::default()
        };
        assert!(validate_effective_range(&changes, current_start, current_end).is_ok());

        // Cambiar los dos extremos a un rango bien formado
        let changes = BookingChanges {
            start_date: Some(validate_datetime("2025-08-19T10:00:00Z").unwrap()),
            end_date: Some(validate_datetime("2025-08-19T15:00:00Z").unwrap()),
            ..Default::default()
        };
        assert!(validate_effective_range(&changes, current_start, current_end).is_ok());
    }

    #[test]
    fn test_update_request_permissive_transitions() {
        // completed puede volver a pending: no hay tabla de transiciones
        let request = UpdateBookingRequest {
            status: Some("pending".to_string()),
            car_name: None,
            renter_name: None,
            renter_email: Some("  USER@Example.com ".to_string()),
            renter_phone: None,
            start_date: None,
            end_date: None,
            total_hours: None,
            total_price: None,
        };
        let changes = parse_update_request(request).unwrap();
        assert_eq!(changes.status.as_deref(), Some("pending"));
        assert_eq!(changes.renter_email.as_deref(), Some("user@example.com"));
    }
}
