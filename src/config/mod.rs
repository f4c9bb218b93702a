//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseBackend, DatabaseConfig, EmailConfig, GoogleOAuthConfig,
    LogFormat, LoggingConfig, MediaBackend, MediaConfig, OAuthProvidersConfig, ServerConfig,
    TierLimits, UploadConfig,
};
