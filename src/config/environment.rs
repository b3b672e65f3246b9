//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables
//! tienen un valor por defecto; un valor presente pero inválido es error.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// Intervalo de reproyección del monitor
    pub poll_interval_ms: u64,
    pub log_level: tracing::Level,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            poll_interval_ms: 1000,
            log_level: tracing::Level::INFO,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid value, got '{}'", name, raw))),
        _ => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Lee la configuración desde el entorno (usar después de `dotenv()`)
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let config = Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins,
            poll_interval_ms: parse_var("POLL_INTERVAL_MS", defaults.poll_interval_ms)?,
            log_level: parse_var("LOG_LEVEL", defaults.log_level)?,
        };

        if config.poll_interval_ms == 0 {
            return Err(AppError::Config("POLL_INTERVAL_MS must be greater than 0".to_string()));
        }

        Ok(config)
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("ROUTE_PROGRESS_TEST_PORT", "not-a-port");
        let parsed: AppResult<u16> = parse_var("ROUTE_PROGRESS_TEST_PORT", 3000);
        assert!(matches!(parsed, Err(AppError::Config(_))));
        env::remove_var("ROUTE_PROGRESS_TEST_PORT");

        let missing: AppResult<u16> = parse_var("ROUTE_PROGRESS_TEST_MISSING", 8080);
        assert_eq!(missing.unwrap(), 8080);
    }

    #[test]
    fn test_parse_log_level() {
        env::set_var("ROUTE_PROGRESS_TEST_LEVEL", "debug");
        let level = parse_var("ROUTE_PROGRESS_TEST_LEVEL", tracing::Level::INFO).unwrap();
        assert_eq!(level, tracing::Level::DEBUG);
        env::remove_var("ROUTE_PROGRESS_TEST_LEVEL");
    }
}
