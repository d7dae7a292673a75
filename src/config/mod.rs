use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub refresh_cookie: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment defaults first, specific env vars override.
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORTAL_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("PORTAL_ENABLE_CORS") {
            self.server.enable_cors = v.parse().unwrap_or(self.server.enable_cors);
        }
        if let Ok(v) = env::var("PORTAL_CORS_ORIGINS") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("PORTAL_BACKEND_URL") {
            self.backend.base_url = v;
        }
        if let Ok(v) = env::var("PORTAL_BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = v.parse().unwrap_or(self.backend.timeout_secs);
        }
        if let Ok(v) = env::var("PORTAL_REFRESH_COOKIE") {
            self.session.refresh_cookie = v;
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            backend: BackendConfig {
                base_url: "http://localhost:8080/api".to_string(),
                timeout_secs: 30,
            },
            session: SessionConfig {
                refresh_cookie: "refresh_token".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            backend: BackendConfig {
                base_url: "https://api-staging.example.com/api".to_string(),
                timeout_secs: 15,
            },
            session: SessionConfig {
                refresh_cookie: "refresh_token".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                enable_cors: false,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            backend: BackendConfig {
                base_url: "https://api.example.com/api".to_string(),
                timeout_secs: 10,
            },
            session: SessionConfig {
                refresh_cookie: "refresh_token".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.server.enable_cors);
        assert_eq!(config.backend.base_url, "http://localhost:8080/api");
        assert_eq!(config.session.refresh_cookie, "refresh_token");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.server.enable_cors);
        assert_eq!(config.backend.timeout_secs, 10);
    }
}
