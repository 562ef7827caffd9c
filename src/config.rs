use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
///
/// Every section has working defaults; the service starts with no config
/// file and no environment at all, with mail delivery and review storage
/// degraded until their credentials are provided.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub mail: MailSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            mail: MailSettings::default(),
            store: StoreSettings::default(),
            supabase: SupabaseSettings::default(),
            rate_limit: RateLimitSettings::default(),
            session: SessionSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Directory served at `/` (landing page assets)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_static_dir() -> String { "./static".to_string() }

/// SMTP account used to deliver contact-form inquiries
///
/// `address` doubles as sender, recipient and login name. Both `address`
/// and `password` must be set for the mail relay to come up.
#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// Defaults to 465 (implicit TLS) when unset
    pub smtp_port: Option<u16>,
    pub address: Option<String>,
    pub password: Option<String>,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: None,
            address: None,
            password: None,
        }
    }
}

fn default_smtp_host() -> String { "smtp.gmail.com".to_string() }

/// Which review store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    File,
    Supabase,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_backend")]
    pub backend: StoreBackend,
    /// Backing file for the flat-file store
    #[serde(default = "default_store_file_path")]
    pub file_path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            file_path: default_store_file_path(),
        }
    }
}

fn default_store_backend() -> StoreBackend { StoreBackend::File }
fn default_store_file_path() -> String { "data/reviews.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: Option<String>,
    pub key: Option<String>,
    #[serde(default = "default_supabase_table")]
    pub table: String,
}

impl Default for SupabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            table: default_supabase_table(),
        }
    }
}

fn default_supabase_table() -> String { "reviews".to_string() }

/// Per-client quota applied to the form endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_rate_limit_max")]
    pub max_requests: u32,
    #[serde(default = "default_rate_limit_window")]
    pub window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: default_rate_limit_max(),
            window_secs: default_rate_limit_window(),
        }
    }
}

fn default_rate_limit_max() -> u32 { 5 }
fn default_rate_limit_window() -> u64 { 60 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSettings {
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with LANDING__)
    /// 4. The flat credential variables (EMAIL_ADDRESS, SUPABASE_URL, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with LANDING__)
            // e.g., LANDING__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LANDING")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Apply the flat credential variable names used by the deployment
        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LANDING")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the unprefixed credential variables on top of the loaded config
///
/// The deployment sets EMAIL_ADDRESS, EMAIL_PASSWORD, SUPABASE_URL,
/// SUPABASE_KEY and SECRET_KEY directly, without the LANDING_ prefix.
/// Empty values count as unset so a templated .env does not look
/// configured.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

    let email_address = non_empty("EMAIL_ADDRESS");
    let email_password = non_empty("EMAIL_PASSWORD");
    let supabase_url = non_empty("SUPABASE_URL");
    let supabase_key = non_empty("SUPABASE_KEY");
    let secret_key = non_empty("SECRET_KEY");

    // Build a new config with the overrides
    let mut builder = Config::builder().add_source(settings);

    if let Some(address) = email_address {
        builder = builder.set_override("mail.address", address)?;
    }
    if let Some(password) = email_password {
        builder = builder.set_override("mail.password", password)?;
    }
    if let Some(url) = supabase_url {
        builder = builder.set_override("supabase.url", url)?;
    }
    if let Some(key) = supabase_key {
        builder = builder.set_override("supabase.key", key)?;
    }
    if let Some(secret) = secret_key {
        builder = builder.set_override("session.secret_key", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.store.backend, StoreBackend::File);
        assert_eq!(settings.store.file_path, "data/reviews.json");
        assert_eq!(settings.supabase.table, "reviews");
        assert_eq!(settings.mail.smtp_host, "smtp.gmail.com");
        assert!(settings.mail.address.is_none());
        assert_eq!(settings.rate_limit.max_requests, 5);
        assert_eq!(settings.rate_limit.window_secs, 60);
        assert!(settings.session.secret_key.is_none());
    }

    #[test]
    fn test_store_backend_parses_lowercase() {
        let backend: StoreBackend = serde_json::from_str("\"supabase\"").unwrap();
        assert_eq!(backend, StoreBackend::Supabase);
        let backend: StoreBackend = serde_json::from_str("\"file\"").unwrap();
        assert_eq!(backend, StoreBackend::File);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }
}
