use std::{env, sync::Arc, time::Duration};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// This struct holds all the necessary configuration parameters
/// required to initialize and run the server.
/// It includes database connection details, JWT configuration,
/// server host and port, number of worker threads, CORS settings,
/// logging preferences, the outbound email provider settings
/// and the local upload storage settings.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to. `memory://` selects the in-memory store.
    pub database_url: String,
    /// Configuration for JWT (JSON Web Token) authentication.
    pub jwt_config: JwtConfig,
    /// Configuration for the transactional email provider.
    pub email_config: EmailConfig,
    /// Configuration for uploaded and generated files.
    pub storage_config: StorageConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Creates the default admin account on startup when no users exist.
    pub seed_default_user: bool,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) authentication.
///
/// This struct contains the secret key used to sign JWTs and
/// the expiration time in hours for issued tokens.
pub struct JwtConfig {
    /// The secret key used to sign and verify JWTs.
    pub secret: String,
    /// The expiration time for JWTs in hours.
    pub expiration_hours: i64,
}

#[derive(Clone, Debug)]
/// Settings for the Brevo transactional email API.
pub struct EmailConfig {
    pub api_key: String,
    /// Base URL of the v3 API, without the trailing `/smtp/email`.
    pub api_url: String,
    pub sender_email: String,
    pub sender_name: String,
    /// Upper bound of delivery attempts per invoice email.
    pub max_retries: u32,
    /// Base delay between attempts, multiplied by the attempt number.
    pub retry_delay: Duration,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory holding logos, uploads and oversized invoice PDFs.
    pub upload_dir: String,
    /// Public base URL used to build download links in emails.
    pub app_base_url: String,
}

impl JwtConfig {
    /// Creates a new `JwtConfig` instance from environment variables.
    ///
    /// Reads the JWT configuration from environment variables:
    /// - `JWT_SECRET`: Required. The secret key for JWT signing.
    /// - `JWT_EXPIRATION_HOURS`: Optional. Defaults to 24 hours if not provided.
    ///
    /// # Panics
    ///
    /// This function will panic if:
    /// - `JWT_SECRET` environment variable is not set
    /// - `JWT_EXPIRATION_HOURS` is set but cannot be parsed as a valid number
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        JwtConfig {
            secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a valid number"),
        }
    }
}

impl EmailConfig {
    /// Reads `BREVO_API_KEY` (required), `BREVO_API_URL`, `EMAIL_SENDER`,
    /// `EMAIL_SENDER_NAME`, `EMAIL_MAX_RETRIES` and `EMAIL_RETRY_DELAY_MS`.
    ///
    /// # Panics
    ///
    /// Panics when `BREVO_API_KEY` is not set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        EmailConfig {
            api_key: env::var("BREVO_API_KEY").expect("BREVO_API_KEY must be set"),
            api_url: env::var("BREVO_API_URL")
                .unwrap_or_else(|_| "https://api.brevo.com/v3".to_string()),
            sender_email: env::var("EMAIL_SENDER")
                .unwrap_or_else(|_| "no-reply@yourdomain.com".to_string()),
            sender_name: env::var("EMAIL_SENDER_NAME")
                .unwrap_or_else(|_| "Invoice System".to_string()),
            max_retries: env::var("EMAIL_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
            retry_delay: Duration::from_millis(
                env::var("EMAIL_RETRY_DELAY_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()
                    .unwrap_or(1000),
            ),
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        StorageConfig {
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// Loads all configuration values from environment variables with sensible defaults
    /// for most optional settings.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `DATABASE_URL`: Connection string for the database (`memory://` for the in-memory store)
    /// - `JWT_SECRET`: Secret key for JWT signing (via `JwtConfig::from_env()`)
    /// - `BREVO_API_KEY`: Email provider key (via `EmailConfig::from_env()`)
    ///
    /// Optional (with defaults):
    /// - `ENVIRONMENT`: "development" or "production" (default: "development")
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `SEED_DEFAULT_USER`: Whether to create the default admin account (default: false)
    /// - `BCRYPT_COST`: bcrypt work factor (default: 12)
    /// - `UPLOAD_DIR`, `APP_BASE_URL`: see `StorageConfig`
    ///
    /// # Panics
    ///
    /// This function will panic if required environment variables are missing.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_config: JwtConfig::from_env(),
            email_config: EmailConfig::from_env(),
            storage_config: StorageConfig::from_env(),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            seed_default_user: env::var("SEED_DEFAULT_USER")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                == "true",
            bcrypt_cost: env::var("BCRYPT_COST")
                .unwrap_or_else(|_| "12".to_string())
                .parse()
                .unwrap_or(12),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
