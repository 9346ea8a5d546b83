//! Controller de CarListings
//!
//! CRUD de anuncios. La unicidad de matrícula se pre-chequea aquí para dar
//! un mensaje amable, pero la constraint UNIQUE del schema es la que manda.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::car_dto::{
    CarListQuery, CarResponse, CarWithReviewsResponse, CreateCarRequest, DeleteCarResponse,
    UpdateCarRequest,
};
use crate::dto::review_dto::ReviewResponse;
use crate::models::car::{CarListingChanges, FuelType, NewCarListing};
use crate::repositories::car_repository::CarRepository;
use crate::repositories::review_repository::ReviewRepository;
use crate::utils::errors::{bad_request, not_found, AppError};
use crate::utils::validation::validate_uuid;

pub struct CarController {
    cars: CarRepository,
    reviews: ReviewRepository,
}

impl CarController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            cars: CarRepository::new(pool.clone()),
            reviews: ReviewRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateCarRequest) -> Result<CarResponse, AppError> {
        let new = parse_create_request(request)?;

        // Camino rápido para el mensaje de duplicado; la constraint decide
        if self.cars.plate_exists(&new.number_plate, None).await? {
            return Err(bad_request(
                "DUPLICATE_NUMBER_PLATE",
                "A car with this number plate already exists",
            ));
        }

        let car = self.cars.create(new).await?;
        Ok(CarResponse::from(car))
    }

    pub async fn get_by_id(&self, id_raw: &str) -> Result<CarWithReviewsResponse, AppError> {
        let id = validate_uuid(id_raw)
            .map_err(|_| bad_request("INVALID_ID", "Valid ID is required"))?;

        let car = self
            .cars
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found("NOT_FOUND", "Car listing not found"))?;

        let reviews = self.reviews.find_by_car(id).await?;

        Ok(CarWithReviewsResponse {
            car: CarResponse::from(car),
            reviews: reviews.into_iter().map(ReviewResponse::from).collect(),
        })
    }

    pub async fn list(&self, query: CarListQuery) -> Result<Vec<CarWithReviewsResponse>, AppError> {
        let limit = query.limit.unwrap_or(10).min(100);
        let offset = query.offset.unwrap_or(0);

        let cars = self.cars.list(limit, offset, query.search.as_deref()).await?;

        let car_ids: Vec<Uuid> = cars.iter().map(|c| c.id).collect();
        let reviews = self.reviews.find_for_cars(&car_ids).await?;

        let mut reviews_by_car: HashMap<Uuid, Vec<ReviewResponse>> = HashMap::new();
        for review in reviews {
            reviews_by_car
                .entry(review.car_id)
                .or_default()
                .push(ReviewResponse::from(review));
        }

        Ok(cars
            .into_iter()
            .map(|car| {
                let reviews = reviews_by_car.remove(&car.id).unwrap_or_default();
                CarWithReviewsResponse {
                    car: CarResponse::from(car),
                    reviews,
                }
            })
            .collect())
    }

    pub async fn update(
        &self,
        id_raw: &str,
        request: UpdateCarRequest,
    ) -> Result<CarResponse, AppError> {
        let id = validate_uuid(id_raw)
            .map_err(|_| bad_request("INVALID_ID", "Valid ID is required"))?;

        let existing = self
            .cars
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found("NOT_FOUND", "Car listing not found"))?;

        let changes = parse_update_request(request)?;

        // Si la matrícula cambia, no puede chocar con la de otro anuncio
        if let Some(plate) = &changes.number_plate {
            if *plate != existing.number_plate && self.cars.plate_exists(plate, Some(id)).await? {
                return Err(bad_request(
                    "DUPLICATE_NUMBER_PLATE",
                    "A car with this number plate already exists",
                ));
            }
        }

        if changes.is_empty() {
            return Ok(CarResponse::from(existing));
        }

        let car = self.cars.update(id, changes).await?;
        Ok(CarResponse::from(car))
    }

    pub async fn delete(&self, id_raw: &str) -> Result<DeleteCarResponse, AppError> {
        let id = validate_uuid(id_raw)
            .map_err(|_| bad_request("INVALID_ID", "Valid ID is required"))?;

        let deleted = self
            .cars
            .delete(id)
            .await?
            .ok_or_else(|| not_found("NOT_FOUND", "Car listing not found"))?;

        Ok(DeleteCarResponse {
            message: "Car listing deleted successfully".to_string(),
            deleted: CarResponse::from(deleted),
        })
    }
}

/// Validación del alta: presencia de cada campo requerido en orden, luego
/// catálogo de combustible y precio positivo. El pre-check de matrícula
/// queda en el controller porque necesita el repositorio.
fn parse_create_request(request: CreateCarRequest) -> Result<NewCarListing, AppError> {
    let car_name = request
        .car_name
        .ok_or_else(|| bad_request("MISSING_CAR_NAME", "Car name is required"))?;
    let car_model = request
        .car_model
        .ok_or_else(|| bad_request("MISSING_CAR_MODEL", "Car model is required"))?;
    let number_plate = request
        .number_plate
        .ok_or_else(|| bad_request("MISSING_NUMBER_PLATE", "Number plate is required"))?;
    let rc_number = request
        .rc_number
        .ok_or_else(|| bad_request("MISSING_RC_NUMBER", "RC number is required"))?;
    let fuel_type_raw = request
        .fuel_type
        .ok_or_else(|| bad_request("MISSING_FUEL_TYPE", "Fuel type is required"))?;
    let price_per_hour = request
        .price_per_hour
        .ok_or_else(|| bad_request("MISSING_PRICE_PER_HOUR", "Price per hour is required"))?;
    let insurance = request
        .insurance
        .ok_or_else(|| bad_request("MISSING_INSURANCE", "Insurance is required"))?;
    let owner_name = request
        .owner_name
        .ok_or_else(|| bad_request("MISSING_OWNER_NAME", "Owner name is required"))?;
    let owner_contact = request
        .owner_contact
        .ok_or_else(|| bad_request("MISSING_OWNER_CONTACT", "Owner contact is required"))?;
    let owner_email = request
        .owner_email
        .ok_or_else(|| bad_request("MISSING_OWNER_EMAIL", "Owner email is required"))?;
    let owner_license = request
        .owner_license
        .ok_or_else(|| bad_request("MISSING_OWNER_LICENSE", "Owner license is required"))?;

    let fuel_type = FuelType::parse(&fuel_type_raw).ok_or_else(|| {
        bad_request(
            "INVALID_FUEL_TYPE",
            format!("Fuel type must be one of: {}", FuelType::VALID_VALUES),
        )
    })?;

    if price_per_hour <= Decimal::ZERO {
        return Err(bad_request(
            "INVALID_PRICE_PER_HOUR",
            "Price per hour must be a positive number",
        ));
    }

    Ok(NewCarListing {
        car_name: car_name.trim().to_string(),
        car_model: car_model.trim().to_string(),
        number_plate: number_plate.trim().to_string(),
        rc_number: rc_number.trim().to_string(),
        fuel_type: fuel_type.as_str().to_string(),
        price_per_hour,
        insurance: insurance.trim().to_string(),
        driving_notes: non_empty_trimmed(request.driving_notes),
        owner_name: owner_name.trim().to_string(),
        owner_contact: owner_contact.trim().to_string(),
        owner_email: owner_email.trim().to_lowercase(),
        owner_license: owner_license.trim().to_string(),
        car_image: non_empty_trimmed(request.car_image),
    })
}

fn parse_update_request(request: UpdateCarRequest) -> Result<CarListingChanges, AppError> {
    if let Some(raw) = &request.fuel_type {
        if FuelType::parse(raw).is_none() {
            return Err(bad_request(
                "INVALID_FUEL_TYPE",
                format!("Fuel type must be one of: {}", FuelType::VALID_VALUES),
            ));
        }
    }

    if let Some(price) = request.price_per_hour {
        if price <= Decimal::ZERO {
            return Err(bad_request(
                "INVALID_PRICE_PER_HOUR",
                "Price per hour must be a positive number",
            ));
        }
    }

    Ok(CarListingChanges {
        car_name: request.car_name.map(|v| v.trim().to_string()),
        car_model: request.car_model.map(|v| v.trim().to_string()),
        number_plate: request.number_plate.map(|v| v.trim().to_string()),
        rc_number: request.rc_number.map(|v| v.trim().to_string()),
        fuel_type: request.fuel_type,
        price_per_hour: request.price_per_hour,
        insurance: request.insurance.map(|v| v.trim().to_string()),
        driving_notes: non_empty_trimmed(request.driving_notes),
        owner_name: request.owner_name.map(|v| v.trim().to_string()),
        owner_contact: request.owner_contact.map(|v| v.trim().to_string()),
        owner_email: request.owner_email.map(|v| v.trim().to_lowercase()),
        owner_license: request.owner_license.map(|v| v.trim().to_string()),
        car_image: non_empty_trimmed(request.car_image),
    })
}

fn non_empty_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateCarRequest {
        CreateCarRequest {
            car_name: Some("Seat Ibiza".to_string()),
            car_model: Some("2021 FR".to_string()),
            number_plate: Some("  1234-ABC  ".to_string()),
            rc_number: Some("RC-9987".to_string()),
            fuel_type: Some("Petrol".to_string()),
            price_per_hour: Some(Decimal::new(1500, 2)),
            insurance: Some("Mapfre full".to_string()),
            driving_notes: Some("   ".to_string()),
            owner_name: Some("Carlos".to_string()),
            owner_contact: Some("+34600999888".to_string()),
            owner_email: Some("Carlos@Example.com".to_string()),
            owner_license: Some("B-123456".to_string()),
            car_image: None,
        }
    }

    fn code_of(err: AppError) -> &'static str {
        match err {
            AppError::BadRequest { code, .. } => code,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_create_request_sanitized() {
        let new = parse_create_request(valid_request()).unwrap();
        assert_eq!(new.number_plate, "1234-ABC");
        assert_eq!(new.owner_email, "carlos@example.com");
        // Las notas en blanco se normalizan a NULL
        assert_eq!(new.driving_notes, None);
        assert_eq!(new.fuel_type, "Petrol");
    }

    #[test]
    fn test_missing_fields_in_order() {
        let mut request = valid_request();
        request.car_name = None;
        request.owner_license = None;
        assert_eq!(code_of(parse_create_request(request).unwrap_err()), "MISSING_CAR_NAME");

        let mut request = valid_request();
        request.owner_license = None;
        assert_eq!(
            code_of(parse_create_request(request).unwrap_err()),
            "MISSING_OWNER_LICENSE"
        );
    }

    #[test]
    fn test_invalid_fuel_type() {
        let mut request = valid_request();
        request.fuel_type = Some("Gasoline".to_string());
        assert_eq!(code_of(parse_create_request(request).unwrap_err()), "INVALID_FUEL_TYPE");
    }

    #[test]
    fn test_non_positive_price() {
        for price in [Decimal::ZERO, Decimal::new(-100, 2)] {
            let mut request = valid_request();
            request.price_per_hour = Some(price);
            assert_eq!(
                code_of(parse_create_request(request).unwrap_err()),
                "INVALID_PRICE_PER_HOUR"
            );
        }
    }

    #[test]
    fn test_update_revalidates_fuel_and_price() {
        let request = UpdateCarRequest {
            car_name: None,
            car_model: None,
            number_plate: None,
            rc_number: None,
            fuel_type: Some("Nuclear".to_string()),
            price_per_hour: None,
            insurance: None,
            driving_notes: None,
            owner_name: None,
            owner_contact: None,
            owner_email: None,
            owner_license: None,
            car_image: None,
        };
        assert_eq!(code_of(parse_update_request(request).unwrap_err()), "INVALID_FUEL_TYPE");
    }

    #[test]
    fn test_update_trims_plate() {
        let request = UpdateCarRequest {
            car_name: None,
            car_model: None,
            number_plate: Some(" 9999-ZZZ ".to_string()),
            rc_number: None,
            fuel_type: None,
            price_per_hour: None,
            insurance: None,
            driving_notes: None,
            owner_name: None,
            owner_contact: None,
            owner_email: None,
            owner_license: None,
            car_image: None,
        };
        let changes = parse_update_request(request).unwrap();
        assert_eq!(changes.number_plate.as_deref(), Some("9999-ZZZ"));
        assert!(!changes.is_empty());
    }
}
