use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
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

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }

/// Token issuance and CORS settings for the auth gate.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

fn default_token_ttl() -> i64 { 3600 }
fn default_allowed_origin() -> String { "http://localhost:5173".into() }

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

/// External payment processor credentials and client bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    #[serde(default)]
    pub key_id: String,
    #[serde(default)]
    pub key_secret: String,
    #[serde(default = "default_payment_base_url")]
    pub base_url: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_max_attempts: u32,
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
    /// "clamp" keeps the legacy behavior (stock floors at zero);
    /// "reject" fails the whole checkout when a line oversells.
    #[serde(default = "default_oversell")]
    pub oversell_policy: String,
}

fn default_payment_base_url() -> String { "https://api.razorpay.com".into() }
fn default_currency() -> String { "INR".into() }
fn default_request_timeout() -> u64 { 10 }
fn default_retry_attempts() -> u32 { 3 }
fn default_retry_backoff() -> u64 { 200 }
fn default_oversell() -> String { "clamp".into() }

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            key_secret: String::new(),
            base_url: default_payment_base_url(),
            currency: default_currency(),
            request_timeout_secs: default_request_timeout(),
            retry_max_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff(),
            oversell_policy: default_oversell(),
        }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` if present, fall back to defaults + env otherwise.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.payment.normalize_from_env();
        self.payment.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if let Ok(h) = std::env::var("SERVER_HOST") {
            if !h.trim().is_empty() {
                self.host = h;
            }
        }
        if let Ok(p) = std::env::var("SERVER_PORT") {
            if let Ok(p) = p.parse::<u16>() {
                self.port = p;
            }
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
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
            return Err(anyhow!("database.url is empty; set it in config.toml or via DATABASE_URL"));
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
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or via JWT_SECRET"));
        }
        if self.token_ttl_secs <= 0 {
            return Err(anyhow!("auth.token_ttl_secs must be positive"));
        }
        if self.allowed_origin.trim().is_empty() {
            return Err(anyhow!("auth.allowed_origin must not be empty"));
        }
        Ok(())
    }
}

impl PaymentConfig {
    pub fn normalize_from_env(&mut self) {
        if self.key_id.trim().is_empty() {
            if let Ok(v) = std::env::var("PAYMENT_KEY_ID") {
                self.key_id = v;
            }
        }
        if self.key_secret.trim().is_empty() {
            if let Ok(v) = std::env::var("PAYMENT_KEY_SECRET") {
                self.key_secret = v;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.key_id.trim().is_empty() || self.key_secret.trim().is_empty() {
            return Err(anyhow!(
                "payment.key_id / payment.key_secret are empty; set them in config.toml or via PAYMENT_KEY_ID / PAYMENT_KEY_SECRET"
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("payment.request_timeout_secs must be positive"));
        }
        if self.retry_max_attempts == 0 {
            return Err(anyhow!("payment.retry_max_attempts must be >= 1"));
        }
        match self.oversell_policy.as_str() {
            "clamp" | "reject" => Ok(()),
            other => Err(anyhow!("payment.oversell_policy must be \"clamp\" or \"reject\", got {other:?}")),
        }
    }
}
