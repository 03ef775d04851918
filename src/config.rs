use std::env;
use std::sync::OnceLock;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://worktrack.db?mode=rwc";
pub const DEFAULT_API_URL: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment name; selects `config/.env.<env>`.
    pub env: String,
    pub database_url: String,
    /// Bind address of the HTTP server.
    pub api_url: String,
    /// Logs every SQL statement when set.
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            env: env::var("ENV").unwrap_or_else(|_| "dev".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            api_url: env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            debug: env::var("DEBUG").map(|v| parse_flag(&v)).unwrap_or(false),
        }
    }
}

/// Loads `config/.env.<ENV>` and then `.env`; variables already set win.
pub fn load_env_files() {
    let env_name = env::var("ENV").unwrap_or_else(|_| "dev".to_string());
    dotenvy::from_filename(format!("config/.env.{env_name}")).ok();
    dotenvy::dotenv().ok();
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}
