/// Environment-driven configuration. Listen address and port come from
/// Rocket's own figment (`ROCKET_ADDRESS` / `ROCKET_PORT`).
pub struct AppConfig {
    pub database_url: String,
    pub allowed_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
            Err(e) => tracing::debug!("Could not load .env file: {}", e),
        }

        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite::memory:".to_string()),
            allowed_origin: std::env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string()),
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            allowed_origin: "*".to_string(),
        }
    }
}
