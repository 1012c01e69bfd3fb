use crate::error::ConfigError;

/// Ten years, in seconds
pub const MAX_TOKEN_LIFETIME: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Credential and token settings, fixed for the process lifetime
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    /// Keys both the password HMAC and the access token signature
    pub secret_key: String,
    pub access_token_lifetime: i64,  // seconds (e.g., 300 for 5 minutes)
    pub refresh_token_lifetime: i64, // seconds (e.g., 25200 for 7 hours)
    /// Must be true in production
    pub secure_cookie: bool,
}

impl AuthSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired("auth.secret_key".to_string()));
        }
        check_lifetime("auth.access_token_lifetime", self.access_token_lifetime)?;
        check_lifetime("auth.refresh_token_lifetime", self.refresh_token_lifetime)?;
        Ok(())
    }
}

fn check_lifetime(key: &str, seconds: i64) -> Result<(), ConfigError> {
    if !(1..=MAX_TOKEN_LIFETIME).contains(&seconds) {
        return Err(ConfigError::InvalidValue(format!(
            "{} must be between 1 and {} seconds",
            key, MAX_TOKEN_LIFETIME
        )));
    }
    Ok(())
}

/// Load settings from an optional `configuration` file, overridden by
/// `APP__`-prefixed environment variables (e.g. `APP__AUTH__SECRET_KEY`).
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_settings(secret_key: &str) -> AuthSettings {
        AuthSettings {
            secret_key: secret_key.to_string(),
            access_token_lifetime: 300,
            refresh_token_lifetime: 25200,
            secure_cookie: false,
        }
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(matches!(
            auth_settings("").validate(),
            Err(ConfigError::MissingRequired(_))
        ));
        assert!(auth_settings("   ").validate().is_err());
    }

    #[test]
    fn test_non_positive_lifetimes_are_rejected() {
        let mut settings = auth_settings("secret");
        settings.access_token_lifetime = 0;
        assert!(settings.validate().is_err());

        let mut settings = auth_settings("secret");
        settings.refresh_token_lifetime = -1;
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_oversized_lifetimes_are_rejected() {
        let mut settings = auth_settings("secret");
        settings.access_token_lifetime = i64::MAX;
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidValue(_))));

        let mut settings = auth_settings("secret");
        settings.refresh_token_lifetime = MAX_TOKEN_LIFETIME + 1;
        assert!(settings.validate().is_err());

        let mut settings = auth_settings("secret");
        settings.refresh_token_lifetime = MAX_TOKEN_LIFETIME;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_secret_is_accepted() {
        assert!(auth_settings("a70c18675573a15b6e257c15616d134f").validate().is_ok());
    }

    #[test]
    fn test_address_formatting() {
        let application = ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        assert_eq!(application.address(), "127.0.0.1:8080");
    }
}
