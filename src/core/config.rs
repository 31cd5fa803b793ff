use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub supabase: SupabaseConfig,
    pub admin: AdminConfig,
    pub map: MapConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Supabase project settings shared by the REST and Storage clients
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://<ref>.supabase.co`
    pub url: String,
    /// Anonymous API key, sent both as `apikey` and as bearer token
    pub anon_key: String,
    /// Storage bucket holding ORMAS attachments
    pub bucket: String,
    /// Table holding ORMAS records
    pub record_table: String,
    /// Read view exposing the existence letter as base64
    pub document_view: String,
}

/// Static credentials for the admin panel
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    /// Lifetime of an admin session token
    pub session_ttl_secs: u64,
}

/// Viewport used by the headless map engine
#[derive(Debug, Clone, Copy)]
pub struct MapConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            supabase: SupabaseConfig::from_env()?,
            admin: AdminConfig::from_env()?,
            map: MapConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 25 * 1024 * 1024; // 4 slots x ~6MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("SUPABASE_URL")
            .map_err(|_| "SUPABASE_URL environment variable is required".to_string())?
            .trim_end_matches('/')
            .to_string();

        let anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| "SUPABASE_ANON_KEY environment variable is required".to_string())?;

        let bucket = env::var("SUPABASE_BUCKET").unwrap_or_else(|_| "ormas_surat".to_string());
        let record_table =
            env::var("SUPABASE_RECORD_TABLE").unwrap_or_else(|_| "ormas".to_string());
        let document_view =
            env::var("SUPABASE_DOCUMENT_VIEW").unwrap_or_else(|_| "ormas_surat_v".to_string());

        Ok(Self {
            url,
            anon_key,
            bucket,
            record_table,
            document_view,
        })
    }

    /// PostgREST base, e.g. `https://<ref>.supabase.co/rest/v1`
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    /// Storage API base, e.g. `https://<ref>.supabase.co/storage/v1`
    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.url)
    }
}

impl AdminConfig {
    const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;

    pub fn from_env() -> Result<Self, String> {
        let username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let password = env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "ADMIN_PASSWORD environment variable is required".to_string())?;

        let session_ttl_secs = env::var("ADMIN_SESSION_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SESSION_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "ADMIN_SESSION_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            username,
            password,
            session_ttl_secs,
        })
    }
}

impl MapConfig {
    const DEFAULT_VIEWPORT_WIDTH: f64 = 1024.0;
    const DEFAULT_VIEWPORT_HEIGHT: f64 = 768.0;

    pub fn from_env() -> Result<Self, String> {
        let viewport_width = env::var("MAP_VIEWPORT_WIDTH")
            .unwrap_or_else(|_| Self::DEFAULT_VIEWPORT_WIDTH.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_VIEWPORT_WIDTH must be a valid number".to_string())?;

        let viewport_height = env::var("MAP_VIEWPORT_HEIGHT")
            .unwrap_or_else(|_| Self::DEFAULT_VIEWPORT_HEIGHT.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_VIEWPORT_HEIGHT must be a valid number".to_string())?;

        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return Err("Map viewport dimensions must be positive".to_string());
        }

        Ok(Self {
            viewport_width,
            viewport_height,
        })
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            viewport_width: Self::DEFAULT_VIEWPORT_WIDTH,
            viewport_height: Self::DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Basic auth on the Swagger UI only when both are set
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "SI ORMAS API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for SI ORMAS".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// `username:password` when Swagger basic auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
