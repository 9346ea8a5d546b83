//! Modelo de CarListing
//!
//! Este módulo contiene el struct CarListing y el enum FuelType.
//! Mapea exactamente a la tabla car_listings con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Tipos de combustible aceptados para un anuncio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub const VALID_VALUES: &'static str = "Petrol, Diesel, Electric, Hybrid";

    /// Parsear el valor tal como llega del cliente (case-sensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Petrol" => Some(Self::Petrol),
            "Diesel" => Some(Self::Diesel),
            "Electric" => Some(Self::Electric),
            "Hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Petrol => "Petrol",
            Self::Diesel => "Diesel",
            Self::Electric => "Electric",
            Self::Hybrid => "Hybrid",
        }
    }
}

/// CarListing principal - mapea a la tabla car_listings
#[derive(Debug, Clone, FromRow)]
pub struct CarListing {
    pub id: Uuid,
    pub car_name: String,
    pub car_model: String,
    pub number_plate: String,
    pub rc_number: String,
    pub fuel_type: String,
    pub price_per_hour: Decimal,
    pub insurance: String,
    pub driving_notes: Option<String>,
    pub owner_name: String,
    pub owner_contact: String,
    pub owner_email: String,
    pub owner_license: String,
    pub car_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Datos saneados para insertar un nuevo anuncio
#[derive(Debug)]
pub struct NewCarListing {
    pub car_name: String,
    pub car_model: String,
    pub number_plate: String,
    pub rc_number: String,
    pub fuel_type: String,
    pub price_per_hour: Decimal,
    pub insurance: String,
    pub driving_notes: Option<String>,
    pub owner_name: String,
    pub owner_contact: String,
    pub owner_email: String,
    pub owner_license: String,
    pub car_image: Option<String>,
}

/// Cambios parciales sobre un anuncio existente
#[derive(Debug, Default)]
pub struct CarListingChanges {
    pub car_name: Option<String>,
    pub car_model: Option<String>,
    pub number_plate: Option<String>,
    pub rc_number: Option<String>,
    pub fuel_type: Option<String>,
    pub price_per_hour: Option<Decimal>,
    pub insurance: Option<String>,
    pub driving_notes: Option<String>,
    pub owner_name: Option<String>,
    pub owner_contact: Option<String>,
    pub owner_license: Option<String>,
    pub owner_email: Option<String>,
    pub car_image: Option<String>,
}

impl CarListingChanges {
    pub fn is_empty(&self) -> bool {
        self.car_name.is_none()
            && self.car_model.is_none()
            && self.number_plate.is_none()
            && self.rc_number.is_none()
            && self.fuel_type.is_none()
            && self.price_per_hour.is_none()
            && self.insurance.is_none()
            && self.driving_notes.is_none()
            && self.owner_name.is_none()
            && self.owner_contact.is_none()
            && self.owner_license.is_none()
            && self.owner_email.is_none()
            && self.car_image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_type_parse() {
        assert_eq!(FuelType::parse("Petrol"), Some(FuelType::Petrol));
        assert_eq!(FuelType::parse("Hybrid"), Some(FuelType::Hybrid));
        // El enum es case-sensitive, igual que el catálogo original
        assert_eq!(FuelType::parse("petrol"), None);
        assert_eq!(FuelType::parse("Gasoline"), None);
        assert_eq!(FuelType::parse(""), None);
    }

    #[test]
    fn test_fuel_type_roundtrip() {
        for value in ["Petrol", "Diesel", "Electric", "Hybrid"] {
            assert_eq!(FuelType::parse(value).unwrap().as_str(), value);
        }
    }
}
