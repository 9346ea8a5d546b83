use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::booking::Booking;

// Request para crear una reserva. Campos opcionales para poder devolver
// el código MISSING_* de cada campo en orden de precedencia.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub car_id: Option<String>,
    pub car_name: Option<String>,
    pub renter_name: Option<String>,
    pub renter_email: Option<String>,
    pub renter_phone: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_hours: Option<i64>,
    pub total_price: Option<Decimal>,
    pub status: Option<String>,
}

// Request de actualización parcial (acción de aceptar/rechazar del dueño)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub status: Option<String>,
    pub car_name: Option<String>,
    pub renter_name: Option<String>,
    pub renter_email: Option<String>,
    pub renter_phone: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_hours: Option<i64>,
    pub total_price: Option<Decimal>,
}

// Filtros de listado
#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub car_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// Query de disponibilidad: los tres parámetros son obligatorios pero llegan
// opcionales para poder señalar cuál falta.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub car_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// Response de reserva
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub car_id: Uuid,
    pub car_name: String,
    pub renter_name: String,
    pub renter_email: String,
    pub renter_phone: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_hours: i32,
    pub total_price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        use rust_decimal::prelude::ToPrimitive;
        Self {
            id: booking.id,
            car_id: booking.car_id,
            car_name: booking.car_name,
            renter_name: booking.renter_name,
            renter_email: booking.renter_email,
            renter_phone: booking.renter_phone,
            start_date: booking.start_date,
            end_date: booking.end_date,
            total_hours: booking.total_hours,
            total_price: booking.total_price.to_f64().unwrap_or(0.0),
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}

// Response de disponibilidad
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<BookingResponse>>,
}
