//! Configuración del proyecto
//!
//! Este módulo contiene la configuración del servicio leída del entorno.

pub mod environment;

pub use environment::*;
