use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Runtime configuration, read once at startup.
///
/// Every field can be overridden through a `DBCHECK_`-prefixed environment
/// variable (e.g. `DBCHECK_DATABASE_URL`); `.env` files are honored via
/// `dotenvy` in `main`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Key material for the private session cookie. Must be at least 32 bytes.
    pub session_secret: String,
    pub session_ttl_hours: i64,
    /// Fixed set of report servers seeded at startup; reference data only.
    pub servers: Vec<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:dbcheck.sqlite".to_string(),
            loglevel: "info".to_string(),
            session_secret: "insecure-dev-session-secret-change-me-0123456789".to_string(),
            session_ttl_hours: 8,
            servers: vec![
                "REPORT_36.2".to_string(),
                "REPORT_154".to_string(),
                "REPORT_39.20".to_string(),
                "REPORT_141".to_string(),
                "REPORT_39.18".to_string(),
                "REPORT_130".to_string(),
            ],
            admin_email: None,
            admin_password: None,
            admin_name: "Admin".to_string(),
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DBCHECK_"))
        .extract()
        .expect("invalid DBCHECK_* configuration")
});
