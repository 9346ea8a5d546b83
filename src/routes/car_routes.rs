use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::car_controller::CarController;
use crate::dto::car_dto::{
    CarListQuery, CarResponse, CarWithReviewsResponse, CreateCarRequest, DeleteCarResponse,
    UpdateCarRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_car))
        .route("/", get(list_cars))
        .route("/:id", get(get_car))
        .route("/:id", put(update_car))
        .route("/:id", delete(delete_car))
}

async fn create_car(
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<CarResponse>), AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<CarListQuery>,
) -> Result<Json<Vec<CarWithReviewsResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CarWithReviewsResponse>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.get_by_id(&id).await?;
    Ok(Json(response))
}

async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<CarResponse>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.update(&id, request).await?;
    Ok(Json(response))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteCarResponse>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.delete(&id).await?;
    Ok(Json(response))
}
