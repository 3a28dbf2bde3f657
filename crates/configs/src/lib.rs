use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
            frontend_dir: default_frontend_dir(),
        }
    }
}

/// Connection settings for the document and object stores.
///
/// A missing `project_id` means the store is not configured; the site then
/// runs on sample content and every write reports that it cannot persist.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            data_dir: default_data_dir(),
            uploads_dir: default_uploads_dir(),
            public_url: default_public_url(),
        }
    }
}

/// Admin credential. `password_hash` is an argon2 PHC string and wins over
/// `password`, a plaintext fallback for local development that is hashed at
/// startup. With neither set, admin login is disabled.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub jwt_secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".into(),
            password_hash: None,
            password: None,
            jwt_secret: "dev-secret-change-me".into(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: default_ai_base_url(), model: default_ai_model() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_page_ttl")]
    pub page_ttl_secs: u64,
    #[serde(default = "default_max_pages")]
    pub max_pages: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { page_ttl_secs: default_page_ttl(), max_pages: default_max_pages() }
    }
}

fn default_frontend_dir() -> String { "frontend".into() }
fn default_data_dir() -> String { "data".into() }
fn default_uploads_dir() -> String { "data/uploads".into() }
fn default_public_url() -> String { "/uploads".into() }
fn default_session_ttl() -> u64 { 8 * 3600 }
fn default_ai_base_url() -> String { "https://api.openai.com/v1".into() }
fn default_ai_model() -> String { "gpt-4o-mini".into() }
fn default_page_ttl() -> u64 { 300 }
fn default_max_pages() -> u64 { 512 }

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
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is missing, then fill blanks from the environment.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.normalize_from_env();
        self.admin.normalize_from_env();
        self.ai.normalize_from_env();
        self.cache.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StoreConfig {
    pub fn normalize_from_env(&mut self) {
        if self.project_id.as_deref().map_or(true, |p| p.trim().is_empty()) {
            self.project_id = env_non_empty("STORE_PROJECT_ID");
        }
        if let Some(dir) = env_non_empty("STORE_DATA_DIR") { self.data_dir = dir; }
        if let Some(dir) = env_non_empty("STORE_UPLOADS_DIR") { self.uploads_dir = dir; }
        if let Some(url) = env_non_empty("STORE_PUBLIC_URL") { self.public_url = url; }
        self.public_url = self.public_url.trim_end_matches('/').to_string();
    }

    /// The project identifier is the single signal of a configured store.
    pub fn is_configured(&self) -> bool {
        self.project_id.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

impl AdminConfig {
    pub fn normalize_from_env(&mut self) {
        if let Some(u) = env_non_empty("ADMIN_USERNAME") { self.username = u; }
        if let Some(h) = env_non_empty("ADMIN_PASSWORD_HASH") { self.password_hash = Some(h); }
        if let Some(p) = env_non_empty("ADMIN_PASSWORD") { self.password = Some(p); }
        if let Some(s) = env_non_empty("JWT_SECRET") { self.jwt_secret = s; }
    }
}

impl AiConfig {
    pub fn normalize_from_env(&mut self) {
        if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            self.api_key = env_non_empty("AI_API_KEY");
        }
        if let Some(url) = env_non_empty("AI_BASE_URL") { self.base_url = url; }
        if let Some(model) = env_non_empty("AI_MODEL") { self.model = model; }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(anyhow!("cache.max_pages must be >= 1"));
        }
        Ok(())
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
