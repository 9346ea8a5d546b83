//! Servicios del sistema
//!
//! Lógica de dominio pura, separada de los controllers y del acceso a datos.

pub mod availability;
