//! Configuration management
//!
//! All configuration comes from environment variables. Backend credentials
//! are required and validated at startup: the process refuses to start with
//! missing values instead of substituting checked-in fallbacks.

use std::env;

/// Environment variable names for the required settings.
const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";
const ENV_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
const ENV_SESSION_SECRET: &str = "SESSION_SECRET";

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// CORS allowed origin
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// Remote backend endpoint and credential keys.
///
/// The anon key is used for public read paths; the service-role key is used
/// for admin mutations (it bypasses the backend's row-level security).
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: String,
    /// Storage bucket that holds uploaded images
    pub storage_bucket: String,
}

/// Session token verification settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC key shared with the identity layer that issues tokens
    pub secret: String,
}

/// Upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum file size in bytes (default: 10MB)
    pub max_file_size: u64,
    /// Allowed image MIME types
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

impl UploadConfig {
    /// Check if a MIME type is allowed
    pub fn is_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == mime_type)
    }

    /// Get file extension for a MIME type
    pub fn extension_for(&self, mime_type: &str) -> &'static str {
        match mime_type {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Required: `SUPABASE_URL`, `SUPABASE_ANON_KEY`,
    /// `SUPABASE_SERVICE_ROLE_KEY`, `SESSION_SECRET`. Every missing variable
    /// is reported at once so misconfiguration is fixed in a single pass.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut required = |name: &str| -> String {
            match env::var(name) {
                Ok(v) if !v.trim().is_empty() => v,
                _ => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        };

        let url = required(ENV_SUPABASE_URL);
        let anon_key = required(ENV_ANON_KEY);
        let service_role_key = required(ENV_SERVICE_ROLE_KEY);
        let secret = required(ENV_SESSION_SECRET);

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let port = match env::var("FOLIO_PORT") {
            Ok(v) => v.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "FOLIO_PORT".to_string(),
                message: format!("'{}' is not a valid port number", v),
            })?,
            Err(_) => ServerConfig::default().port,
        };

        let defaults = ServerConfig::default();
        let server = ServerConfig {
            host: env::var("FOLIO_HOST").unwrap_or(defaults.host),
            port,
            cors_origin: env::var("FOLIO_CORS_ORIGIN").unwrap_or(defaults.cors_origin),
        };

        let backend = BackendConfig {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
            service_role_key,
            storage_bucket: env::var("FOLIO_STORAGE_BUCKET").unwrap_or_else(|_| "blog".to_string()),
        };

        Ok(Self {
            server,
            backend,
            session: SessionConfig { secret },
            upload: UploadConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_defaults() {
        let config = UploadConfig::default();
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert!(config.is_type_allowed("image/png"));
        assert!(config.is_type_allowed("image/webp"));
        assert!(!config.is_type_allowed("image/svg+xml"));
        assert!(!config.is_type_allowed("application/pdf"));
    }

    #[test]
    fn test_extension_for_mime() {
        let config = UploadConfig::default();
        assert_eq!(config.extension_for("image/jpeg"), "jpg");
        assert_eq!(config.extension_for("image/gif"), "gif");
        assert_eq!(config.extension_for("text/plain"), "bin");
    }

    #[test]
    fn test_missing_vars_are_collected() {
        // Touching the process environment races with other tests, so this
        // exercises the error type directly.
        let err = ConfigError::MissingVars(vec![
            "SUPABASE_URL".to_string(),
            "SESSION_SECRET".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("SUPABASE_URL"));
        assert!(msg.contains("SESSION_SECRET"));
    }

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.port, 8080);
        assert_eq!(server.host, "0.0.0.0");
    }
}
