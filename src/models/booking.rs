//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking y el ciclo de vida de estados.
//! Una reserva nunca se borra; su status se muta in situ.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de la reserva. Toda reserva que no esté cancelada
/// ocupa el calendario del coche.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const VALID_VALUES: &'static str = "pending, confirmed, completed, cancelled";

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Booking principal - mapea a la tabla bookings
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub car_id: Uuid,
    pub car_name: String,
    pub renter_name: String,
    pub renter_email: String,
    pub renter_phone: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_hours: i32,
    pub total_price: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Una reserva cancelada no bloquea el calendario
    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled.as_str()
    }
}

/// Datos saneados para insertar una nueva reserva
#[derive(Debug)]
pub struct NewBooking {
    pub car_id: Uuid,
    pub car_name: String,
    pub renter_name: String,
    pub renter_email: String,
    pub renter_phone: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_hours: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
}

/// Cambios parciales sobre una reserva existente
#[derive(Debug, Default)]
pub struct BookingChanges {
    pub status: Option<String>,
    pub car_name: Option<String>,
    pub renter_name: Option<String>,
    pub renter_email: Option<String>,
    pub renter_phone: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub total_hours: Option<i32>,
    pub total_price: Option<Decimal>,
}

impl BookingChanges {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.car_name.is_none()
            && self.renter_name.is_none()
            && self.renter_email.is_none()
            && self.renter_phone.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.total_hours.is_none()
            && self.total_price.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(BookingStatus::parse("pending"), Some(BookingStatus::Pending));
        assert_eq!(BookingStatus::parse("cancelled"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::parse("Pending"), None);
        assert_eq!(BookingStatus::parse("rejected"), None);
    }

    #[test]
    fn test_status_roundtrip() {
        for value in ["pending", "confirmed", "completed", "cancelled"] {
            assert_eq!(BookingStatus::parse(value).unwrap().as_str(), value);
        }
    }
}
