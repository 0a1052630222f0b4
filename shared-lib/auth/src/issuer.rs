//! Token issuance.

use std::fmt;
use std::sync::Arc;

use error::{AuthError, ConfigError};

use crate::claims::{ClaimSet, Claims};
use crate::clock::Clock;
use crate::config::JwtConfig;
use crate::jwt::{encode_token, signing_key, HmacSha256};

/// Signs new session tokens.
///
/// The role is taken from the caller as-is: whoever calls [`generate`](Self::generate)
/// must already have decided that the subject is entitled to it.
#[derive(Clone)]
pub struct TokenIssuer {
    config: Arc<JwtConfig>,
    key: HmacSha256,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(config: Arc<JwtConfig>, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let key = signing_key(&config.secret)?;
        Ok(Self { config, key, clock })
    }

    /// Issue a token for `subject`, with `role` or the configured default role.
    pub fn generate(&self, subject: &str, role: Option<&str>) -> Result<String, AuthError> {
        if subject.trim().is_empty() {
            return Err(AuthError::InvalidSubject);
        }
        let role = match role {
            Some(role) if role.trim().is_empty() => return Err(AuthError::InvalidRole),
            Some(role) => role,
            None => self.config.default_role.as_str(),
        };

        let claims = Claims::new(subject, role, &self.config, self.clock.now())?;
        tracing::debug!(
            subject,
            role,
            jti = %claims.jti,
            exp = claims.exp,
            "Issuing session token"
        );

        encode_token(&ClaimSet::from(claims), &self.key)
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::jwt::decode_token;
    use chrono::{Duration, TimeZone, Utc};

    fn issuer() -> TokenIssuer {
        let config = JwtConfig::new(
            "01234567890123456789012345678901",
            "app",
            "app-users",
            Duration::minutes(60),
        );
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
        TokenIssuer::new(Arc::new(config), Arc::new(clock)).unwrap()
    }

    #[test]
    fn test_generate_stamps_all_claims() {
        let issuer = issuer();
        let token = issuer.generate("alice", Some("Admin")).unwrap();
        let claims = decode_token(&token, &issuer.key).unwrap();

        let issued = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        assert_eq!(claims.subject(), Some("alice"));
        assert_eq!(claims.role(), Some("Admin"));
        assert_eq!(claims.issuer(), Some("app"));
        assert_eq!(claims.audiences(), vec!["app-users"]);
        assert_eq!(claims.issued_at(), Some(issued));
        assert_eq!(claims.not_before(), Some(issued));
        assert_eq!(claims.expires_at(), Some(issued + Duration::minutes(60)));
        assert!(claims.token_id().is_some());
    }

    #[test]
    fn test_generate_uses_default_role() {
        let issuer = issuer();
        let token = issuer.generate("bob", None).unwrap();
        let claims = decode_token(&token, &issuer.key).unwrap();
        assert_eq!(claims.role(), Some("User"));
    }

    #[test]
    fn test_generate_rejects_empty_input() {
        let issuer = issuer();
        assert_eq!(issuer.generate("", None), Err(AuthError::InvalidSubject));
        assert_eq!(issuer.generate("  ", Some("Admin")), Err(AuthError::InvalidSubject));
        assert_eq!(issuer.generate("alice", Some("")), Err(AuthError::InvalidRole));
    }

    #[test]
    fn test_new_fails_fast_on_bad_config() {
        let config = JwtConfig::new("", "app", "app-users", Duration::minutes(60));
        let result = TokenIssuer::new(Arc::new(config), Arc::new(FixedClock::new(Utc::now())));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", issuer());
        assert!(rendered.contains("TokenIssuer"));
        assert!(!rendered.contains("0123456789"));
    }
}
