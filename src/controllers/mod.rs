//! Controllers del sistema
//!
//! Validación de entrada (con códigos estables por campo) y orquestación
//! entre repositorios. Ninguna mutación se intenta hasta que toda la
//! validación ha pasado.

pub mod booking_controller;
pub mod car_controller;
pub mod favorite_controller;
pub mod review_controller;
