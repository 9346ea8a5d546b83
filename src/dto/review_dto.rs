use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::review::Review;

// Request para crear una reseña
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub car_id: Option<String>,
    pub reviewer_name: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

// Response de reseña
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub car_id: Uuid,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            car_id: review.car_id,
            reviewer_name: review.reviewer_name,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}
