use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Token signing and credential policy.
///
/// Signing key, issuer and audience are process-wide; they are read once at
/// startup and handed to the token service.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_token_lifetime_hours")]
    pub token_lifetime_hours: i64,
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: default_issuer(),
            audience: default_audience(),
            token_lifetime_hours: default_token_lifetime_hours(),
            min_password_length: default_min_password_length(),
        }
    }
}

// The secret never shows up in logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_lifetime_hours", &self.token_lifetime_hours)
            .field("min_password_length", &self.min_password_length)
            .finish()
    }
}

fn default_issuer() -> String { "inventory-service".into() }
fn default_audience() -> String { "inventory-clients".into() }
fn default_token_lifetime_hours() -> i64 { 72 }
fn default_min_password_length() -> usize { 8 }

/// Product catalog settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Width of generated product registration numbers.
    #[serde(default = "default_registration_number_digits")]
    pub registration_number_digits: u32,
    /// Upper bound on redraws when a generated number is already taken.
    #[serde(default = "default_max_registration_attempts")]
    pub max_registration_attempts: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            registration_number_digits: default_registration_number_digits(),
            max_registration_attempts: default_max_registration_attempts(),
        }
    }
}

fn default_registration_number_digits() -> u32 { 7 }
fn default_max_registration_attempts() -> u32 { 1000 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like [`AppConfig::load_and_validate`], but starts from defaults when the
    /// config file is missing so env-only deployments work.
    pub fn load_or_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        // database url may come from DATABASE_URL
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.catalog.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.jwt_secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if self.issuer.trim().is_empty() || self.audience.trim().is_empty() {
            return Err(anyhow!("auth.issuer and auth.audience are required"));
        }
        if self.token_lifetime_hours <= 0 {
            return Err(anyhow!("auth.token_lifetime_hours must be positive"));
        }
        if self.min_password_length == 0 {
            return Err(anyhow!("auth.min_password_length must be >= 1"));
        }
        Ok(())
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<()> {
        // 9 digits is the widest range that fits an i32 column
        if !(1..=9).contains(&self.registration_number_digits) {
            return Err(anyhow!("catalog.registration_number_digits must be in 1..=9"));
        }
        if self.max_registration_attempts == 0 {
            return Err(anyhow!("catalog.max_registration_attempts must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_sections() {
        let cfg = parse("[database]\nurl = \"postgres://u:p@localhost/db\"\n").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.auth.token_lifetime_hours, 72);
        assert_eq!(cfg.auth.issuer, "inventory-service");
        assert_eq!(cfg.catalog.registration_number_digits, 7);
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn catalog_digits_out_of_range_rejected() {
        let cfg = CatalogConfig { registration_number_digits: 10, max_registration_attempts: 5 };
        assert!(cfg.validate().is_err());
        let cfg = CatalogConfig { registration_number_digits: 0, max_registration_attempts: 5 };
        assert!(cfg.validate().is_err());
        assert!(CatalogConfig::default().validate().is_ok());
    }

    #[test]
    fn auth_requires_secret_and_positive_lifetime() {
        let mut auth = AuthConfig::default();
        auth.jwt_secret = "s3cret".into();
        assert!(auth.validate().is_ok());
        auth.token_lifetime_hours = 0;
        assert!(auth.validate().is_err());
        let empty = AuthConfig { jwt_secret: " ".into(), ..AuthConfig::default() };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn database_url_scheme_checked() {
        let db = DatabaseConfig { url: "mysql://localhost/db".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
        let db = DatabaseConfig { url: "postgres://localhost/db".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_ok());
    }

    #[test]
    fn auth_debug_hides_secret() {
        let auth = AuthConfig { jwt_secret: "topsecret".into(), ..AuthConfig::default() };
        let printed = format!("{auth:?}");
        assert!(!printed.contains("topsecret"));
    }
}
