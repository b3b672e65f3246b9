//! Middleware del sistema
//!
//! Este módulo contiene el middleware HTTP del servicio.

pub mod cors;

pub use cors::*;
