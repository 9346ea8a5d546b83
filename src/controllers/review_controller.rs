//! Controller de Reviews
//!
//! Las reseñas son independientes de las reservas: no se exige que el
//! autor haya alquilado el coche.

use sqlx::PgPool;

use crate::dto::review_dto::{CreateReviewRequest, ReviewResponse};
use crate::models::review::{NewReview, MAX_RATING, MIN_RATING};
use crate::repositories::car_repository::CarRepository;
use crate::repositories::review_repository::ReviewRepository;
use crate::utils::errors::{bad_request, missing_field, not_found, AppError};
use crate::utils::validation::validate_uuid;

pub struct ReviewController {
    reviews: ReviewRepository,
    cars: CarRepository,
}

impl ReviewController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reviews: ReviewRepository::new(pool.clone()),
            cars: CarRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateReviewRequest) -> Result<ReviewResponse, AppError> {
        let new = parse_create_request(request)?;

        if self.cars.find_by_id(new.car_id).await?.is_none() {
            return Err(not_found("CAR_NOT_FOUND", "Car listing not found"));
        }

        let review = self.reviews.create(new).await?;
        Ok(ReviewResponse::from(review))
    }
}

fn parse_create_request(request: CreateReviewRequest) -> Result<NewReview, AppError> {
    let car_id_raw = request
        .car_id
        .ok_or_else(|| missing_field("MISSING_CAR_ID", "carId"))?;
    let reviewer_name = request
        .reviewer_name
        .ok_or_else(|| missing_field("MISSING_REVIEWER_NAME", "reviewerName"))?;
    let rating = request
        .rating
        .ok_or_else(|| missing_field("MISSING_RATING", "rating"))?;
    let comment = request
        .comment
        .ok_or_else(|| missing_field("MISSING_COMMENT", "comment"))?;

    let car_id = validate_uuid(&car_id_raw)
        .map_err(|_| bad_request("INVALID_CAR_ID", "carId must be a valid UUID"))?;

    if rating < MIN_RATING as i64 || rating > MAX_RATING as i64 {
        return Err(bad_request(
            "INVALID_RATING",
            format!("rating must be an integer between {} and {}", MIN_RATING, MAX_RATING),
        ));
    }

    let reviewer_name = reviewer_name.trim().to_string();
    if reviewer_name.is_empty() {
        return Err(bad_request("EMPTY_REVIEWER_NAME", "reviewerName cannot be empty"));
    }

    let comment = comment.trim().to_string();
    if comment.is_empty() {
        return Err(bad_request("EMPTY_COMMENT", "comment cannot be empty"));
    }

    Ok(NewReview {
        car_id,
        reviewer_name,
        rating: rating as i32,
        comment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateReviewRequest {
        CreateReviewRequest {
            car_id: Some("550e8400-e29b-41d4-a716-446655440000".to_string()),
            reviewer_name: Some(" Marta ".to_string()),
            rating: Some(4),
            comment: Some("Muy limpio y puntual".to_string()),
        }
    }

    fn code_of(err: AppError) -> &'static str {
        match err {
            AppError::BadRequest { code, .. } => code,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_review_is_trimmed() {
        let new = parse_create_request(valid_request()).unwrap();
        assert_eq!(new.reviewer_name, "Marta");
        assert_eq!(new.rating, 4);
    }

    #[test]
    fn test_rating_bounds() {
        for rating in [0, 6, -1] {
            let mut request = valid_request();
            request.rating = Some(rating);
            assert_eq!(code_of(parse_create_request(request).unwrap_err()), "INVALID_RATING");
        }
        for rating in [1, 5] {
            let mut request = valid_request();
            request.rating = Some(rating);
            assert!(parse_create_request(request).is_ok());
        }
    }

    #[test]
    fn test_blank_comment_rejected() {
        let mut request = valid_request();
        request.comment = Some("   ".to_string());
        assert_eq!(code_of(parse_create_request(request).unwrap_err()), "EMPTY_COMMENT");
    }

    #[test]
    fn test_blank_reviewer_rejected() {
        let mut request = valid_request();
        request.reviewer_name = Some("".to_string());
        assert_eq!(
            code_of(parse_create_request(request).unwrap_err()),
            "EMPTY_REVIEWER_NAME"
        );
    }

    #[test]
    fn test_missing_rating() {
        let mut request = valid_request();
        request.rating = None;
        assert_eq!(code_of(parse_create_request(request).unwrap_err()), "MISSING_RATING");
    }
}
