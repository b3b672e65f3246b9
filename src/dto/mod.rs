//! Data Transfer Objects
//!
//! Estructuras de entrada y salida del API HTTP.

pub mod progress_dto;

pub use progress_dto::*;
