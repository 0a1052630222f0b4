//! JWT configuration and its start-up loader.

use chrono::Duration;
use error::ConfigError;
use secrecy::{ExposeSecret, SecretString};

use crate::roles::ROLE_USER;

/// Signing secret setting.
pub const KEY: &str = "Jwt:Key";
/// Issuer setting.
pub const ISSUER: &str = "Jwt:Issuer";
/// Audience setting.
pub const AUDIENCE: &str = "Jwt:Audience";
/// Token lifetime in minutes.
pub const EXPIRY_MINUTES: &str = "Jwt:ExpiryMinutes";
/// Token lifetime in days.
pub const EXPIRY_DAYS: &str = "Jwt:ExpiryDays";
/// Role stamped when the caller does not ask for one.
pub const DEFAULT_ROLE: &str = "Jwt:DefaultRole";

/// HMAC-SHA256 keys shorter than the digest size weaken the signature.
const RECOMMENDED_KEY_LEN: usize = 32;

/// JWT configuration.
///
/// Loaded once at start-up and shared read-only for the rest of the process.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: SecretString,
    /// Token issuer, stamped on issuance and required on validation
    pub issuer: String,
    /// Token audience, stamped on issuance and required on validation
    pub audience: String,
    /// Token validity duration
    pub expiry: Duration,
    /// Role used when none is requested
    pub default_role: String,
}

impl JwtConfig {
    /// Create a new JWT configuration.
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expiry: Duration,
    ) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            issuer: issuer.into(),
            audience: audience.into(),
            expiry,
            default_role: ROLE_USER.to_string(),
        }
    }

    /// Set the role used when a caller does not request one.
    pub fn with_default_role(mut self, role: impl Into<String>) -> Self {
        self.default_role = role.into();
        self
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.expose_secret().is_empty() {
            return Err(ConfigError::invalid(KEY, "must not be empty"));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::invalid(ISSUER, "must not be empty"));
        }
        if self.audience.trim().is_empty() {
            return Err(ConfigError::invalid(AUDIENCE, "must not be empty"));
        }
        if self.expiry < Duration::zero() {
            return Err(ConfigError::invalid(EXPIRY_MINUTES, "must not be negative"));
        }
        if self.default_role.trim().is_empty() {
            return Err(ConfigError::invalid(DEFAULT_ROLE, "must not be empty"));
        }
        Ok(())
    }

    /// Load configuration from a named-setting source.
    ///
    /// `Jwt:Key`, `Jwt:Issuer`, `Jwt:Audience` and exactly one of
    /// `Jwt:ExpiryMinutes` / `Jwt:ExpiryDays` are required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = required(&lookup, KEY)?;
        let issuer = required(&lookup, ISSUER)?;
        let audience = required(&lookup, AUDIENCE)?;
        let expiry = expiry(&lookup)?;

        let mut config = Self::new(secret, issuer.trim(), audience.trim(), expiry);
        if let Some(role) = lookup(DEFAULT_ROLE) {
            config.default_role = role.trim().to_string();
        }
        config.validate()?;

        if config.secret.expose_secret().len() < RECOMMENDED_KEY_LEN {
            tracing::warn!(
                key_len = config.secret.expose_secret().len(),
                recommended = RECOMMENDED_KEY_LEN,
                "JWT signing key is shorter than recommended"
            );
        }

        tracing::info!(
            issuer = %config.issuer,
            audience = %config.audience,
            expiry_secs = config.expiry.num_seconds(),
            default_role = %config.default_role,
            "Loaded JWT configuration"
        );

        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// `Jwt:Key` is read from `Jwt__Key`, falling back to `JWT__KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_setting)
    }
}

fn env_setting(key: &str) -> Option<String> {
    let name = key.replace(':', "__");
    std::env::var(&name)
        .or_else(|_| std::env::var(name.to_uppercase()))
        .ok()
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).ok_or_else(|| ConfigError::Missing(key.to_string()))?;
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(key, "must not be empty"));
    }
    Ok(value)
}

fn expiry<F>(lookup: &F) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match (lookup(EXPIRY_MINUTES), lookup(EXPIRY_DAYS)) {
        (Some(_), Some(_)) => Err(ConfigError::invalid(
            EXPIRY_MINUTES,
            format!("conflicts with {EXPIRY_DAYS}; set only one"),
        )),
        (Some(minutes), None) => {
            let minutes = positive(EXPIRY_MINUTES, &minutes)?;
            Duration::try_minutes(minutes)
                .ok_or_else(|| ConfigError::invalid(EXPIRY_MINUTES, "out of range"))
        }
        (None, Some(days)) => {
            let days = positive(EXPIRY_DAYS, &days)?;
            Duration::try_days(days).ok_or_else(|| ConfigError::invalid(EXPIRY_DAYS, "out of range"))
        }
        (None, None) => Err(ConfigError::Missing(format!(
            "{EXPIRY_MINUTES} or {EXPIRY_DAYS}"
        ))),
    }
}

fn positive(key: &str, raw: &str) -> Result<i64, ConfigError> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("expected a whole number, got '{raw}'")))?;
    if value == 0 {
        return Err(ConfigError::invalid(key, "must be greater than zero"));
    }
    Ok(i64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<JwtConfig, ConfigError> {
        let map = settings(pairs);
        JwtConfig::from_lookup(|key| map.get(key).cloned())
    }

    const BASE: [(&str, &str); 3] = [
        (KEY, "01234567890123456789012345678901"),
        (ISSUER, "app"),
        (AUDIENCE, "app-users"),
    ];

    #[test]
    fn test_load_with_minutes() {
        let mut pairs = BASE.to_vec();
        pairs.push((EXPIRY_MINUTES, "60"));
        let config = load(&pairs).unwrap();

        assert_eq!(config.secret.expose_secret(), "01234567890123456789012345678901");
        assert_eq!(config.issuer, "app");
        assert_eq!(config.audience, "app-users");
        assert_eq!(config.expiry, Duration::minutes(60));
        assert_eq!(config.default_role, ROLE_USER);
    }

    #[test]
    fn test_load_with_days_and_default_role() {
        let mut pairs = BASE.to_vec();
        pairs.push((EXPIRY_DAYS, "7"));
        pairs.push((DEFAULT_ROLE, "Member"));
        let config = load(&pairs).unwrap();

        assert_eq!(config.expiry, Duration::days(7));
        assert_eq!(config.default_role, "Member");
    }

    #[test]
    fn test_missing_settings_are_reported_by_name() {
        for missing in [KEY, ISSUER, AUDIENCE] {
            let mut pairs: Vec<_> = BASE.iter().copied().filter(|(k, _)| *k != missing).collect();
            pairs.push((EXPIRY_MINUTES, "60"));
            assert_eq!(load(&pairs).unwrap_err(), ConfigError::Missing(missing.to_string()));
        }
    }

    #[test]
    fn test_missing_expiry() {
        let err = load(&BASE).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref key) if key.contains(EXPIRY_MINUTES)));
    }

    #[test]
    fn test_rejects_both_expiry_units() {
        let mut pairs = BASE.to_vec();
        pairs.push((EXPIRY_MINUTES, "60"));
        pairs.push((EXPIRY_DAYS, "1"));
        assert!(matches!(load(&pairs), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_rejects_zero_and_garbage_expiry() {
        for raw in ["0", "-5", "ten", ""] {
            let mut pairs = BASE.to_vec();
            pairs.push((EXPIRY_MINUTES, raw));
            assert!(
                matches!(load(&pairs), Err(ConfigError::Invalid { ref key, .. }) if key == EXPIRY_MINUTES),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn test_rejects_blank_values() {
        let pairs = [
            (KEY, "01234567890123456789012345678901"),
            (ISSUER, "   "),
            (AUDIENCE, "app-users"),
            (EXPIRY_MINUTES, "60"),
        ];
        assert_eq!(
            load(&pairs).unwrap_err(),
            ConfigError::invalid(ISSUER, "must not be empty")
        );
    }

    #[test]
    fn test_short_key_is_accepted() {
        let pairs = [
            (KEY, "short"),
            (ISSUER, "app"),
            (AUDIENCE, "app-users"),
            (EXPIRY_MINUTES, "5"),
        ];
        assert!(load(&pairs).is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_expiry() {
        let config = JwtConfig::new("secret", "app", "app-users", Duration::minutes(-1));
        assert!(config.validate().is_err());

        let config = JwtConfig::new("secret", "app", "app-users", Duration::zero());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new("super-secret-value", "app", "app-users", Duration::minutes(1));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("app-users"));
    }
}
