use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub environment: String,
    /// Key used to sign the session cookie
    pub secret_key: String,
    pub nyt_api_key: String,
    pub nyt_api_base_url: String,
    pub api_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://bestseller_shelf.db".to_string());

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let secret_key =
            env::var("SECRET_KEY").map_err(|_| "SECRET_KEY must be set for session signing")?;
        if secret_key.len() < 16 {
            return Err("SECRET_KEY must be at least 16 characters".to_string());
        }

        let nyt_api_key = env::var("NYT_API_KEY").map_err(|_| "NYT_API_KEY must be set")?;

        let nyt_api_base_url = env::var("NYT_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.nytimes.com/svc/books/v3".to_string())
            .trim_end_matches('/')
            .to_string();

        let api_timeout_secs = env::var("API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| "Invalid API_TIMEOUT_SECS")?;

        Ok(Config {
            server_host,
            server_port,
            database_url,
            environment,
            secret_key,
            nyt_api_key,
            nyt_api_base_url,
            api_timeout_secs,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Session cookies are only marked `Secure` when served over TLS in production
    pub fn secure_cookies(&self) -> bool {
        self.environment == "production"
    }
}
