use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use crate::controllers::favorite_controller::FavoriteController;
use crate::dto::favorite_dto::{
    CreateFavoriteRequest, DeleteFavoriteQuery, DeleteFavoriteResponse, FavoriteResponse,
    FavoriteWithCarResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_favorite_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/", post(create_favorite))
        .route("/", delete(delete_favorite))
}

async fn list_favorites(
    State(state): State<AppState>,
) -> Result<Json<Vec<FavoriteWithCarResponse>>, AppError> {
    let controller = FavoriteController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn create_favorite(
    State(state): State<AppState>,
    Json(request): Json<CreateFavoriteRequest>,
) -> Result<(StatusCode, Json<FavoriteResponse>), AppError> {
    let controller = FavoriteController::new(state.pool.clone());
    let creation = controller.create(request).await?;

    // Alta idempotente: 201 solo si la fila es nueva
    let status = if creation.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(creation.favorite)))
}

async fn delete_favorite(
    State(state): State<AppState>,
    Query(query): Query<DeleteFavoriteQuery>,
) -> Result<Json<DeleteFavoriteResponse>, AppError> {
    let controller = FavoriteController::new(state.pool.clone());
    let response = controller.delete(query).await?;
    Ok(Json(response))
}
