//! Repositorios de acceso a datos
//!
//! Todo el SQL vive aquí; los controllers no conocen la base de datos.

pub mod booking_repository;
pub mod car_repository;
pub mod favorite_repository;
pub mod review_repository;
