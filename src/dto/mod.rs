//! DTOs de la API
//!
//! Requests y responses de la capa HTTP. Los bodies usan camelCase y los
//! query params snake_case, siguiendo el contrato público de la API.

pub mod booking_dto;
pub mod car_dto;
pub mod favorite_dto;
pub mod review_dto;
