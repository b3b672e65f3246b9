//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, lectura tolerante de datos del
//! rastreo, normalización
//! de nombres de geocercas y formato de estados.

pub mod errors;
pub mod lenient;
pub mod normalize;
pub mod status_format;
