//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Auth behavior configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Email configuration.
    #[serde(default)]
    pub email: EmailConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// JWT configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens. Read once at startup; no rotation.
    pub secret: String,
    /// Token validity window in days.
    #[serde(default = "default_token_expiry_days")]
    pub token_expiry_days: i64,
}

fn default_token_expiry_days() -> i64 {
    7
}

/// How bearer tokens are checked on protected routes.
///
/// `TrustToken` uses the embedded claims as-is (no store round-trip).
/// `VerifyAgainstStore` re-loads the user on every request so deactivation
/// and role changes take effect immediately. The embedded role may go stale
/// under `TrustToken`; that is the documented trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenVerification {
    /// Trust the claims embedded in the token.
    TrustToken,
    /// Re-verify the user against the store on every request.
    #[default]
    VerifyAgainstStore,
}

/// Auth behavior configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Token verification mode for protected routes.
    #[serde(default)]
    pub token_verification: TokenVerification,
}

/// Email (SMTP) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// From address for outbound mail.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// From display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Recipient for weekly KPI alerts.
    #[serde(default = "default_management_email")]
    pub management_email: String,
    /// Recipient for monthly board reports.
    #[serde(default = "default_board_email")]
    pub board_email: String,
    /// Dashboard URL linked from alert emails.
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "reports@hilinafoods.com".to_string()
}

fn default_from_name() -> String {
    "Hilina Foods Reporting".to_string()
}

fn default_management_email() -> String {
    "management@hilinafoods.com".to_string()
}

fn default_board_email() -> String {
    "board@hilinafoods.com".to_string()
}

fn default_dashboard_url() -> String {
    "https://hilina-dashboard.onrender.com".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            management_email: default_management_email(),
            board_email: default_board_email(),
            dashboard_url: default_dashboard_url(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINBOARD").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
        assert_eq!(config.management_email, "management@hilinafoods.com");
        assert_eq!(config.board_email, "board@hilinafoods.com");
    }

    #[test]
    fn test_token_verification_default() {
        assert_eq!(
            TokenVerification::default(),
            TokenVerification::VerifyAgainstStore
        );
    }
}
