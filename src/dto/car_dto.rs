use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::review_dto::ReviewResponse;
use crate::models::car::CarListing;

// Request para crear un anuncio. Todos los campos llegan opcionales para
// poder responder con el código MISSING_* específico de cada uno.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
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
    pub owner_email: Option<String>,
    pub owner_license: Option<String>,
    pub car_image: Option<String>,
}

// Request para actualizar un anuncio (solo los campos presentes cambian)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
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
    pub owner_email: Option<String>,
    pub owner_license: Option<String>,
    pub car_image: Option<String>,
}

// Filtros de listado
#[derive(Debug, Deserialize)]
pub struct CarListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
}

// Response de anuncio
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarResponse {
    pub id: Uuid,
    pub car_name: String,
    pub car_model: String,
    pub number_plate: String,
    pub rc_number: String,
    pub fuel_type: String,
    pub price_per_hour: f64,
    pub insurance: String,
    pub driving_notes: Option<String>,
    pub owner_name: String,
    pub owner_contact: String,
    pub owner_email: String,
    pub owner_license: String,
    pub car_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CarListing> for CarResponse {
    fn from(car: CarListing) -> Self {
        use rust_decimal::prelude::ToPrimitive;
        Self {
            id: car.id,
            car_name: car.car_name,
            car_model: car.car_model,
            number_plate: car.number_plate,
            rc_number: car.rc_number,
            fuel_type: car.fuel_type,
            price_per_hour: car.price_per_hour.to_f64().unwrap_or(0.0),
            insurance: car.insurance,
            driving_notes: car.driving_notes,
            owner_name: car.owner_name,
            owner_contact: car.owner_contact,
            owner_email: car.owner_email,
            owner_license: car.owner_license,
            car_image: car.car_image,
            created_at: car.created_at,
        }
    }
}

// Anuncio con sus reseñas embebidas
#[derive(Debug, Serialize)]
pub struct CarWithReviewsResponse {
    #[serde(flatten)]
    pub car: CarResponse,
    pub reviews: Vec<ReviewResponse>,
}

// Response de borrado
#[derive(Debug, Serialize)]
pub struct DeleteCarResponse {
    pub message: String,
    pub deleted: CarResponse,
}
