//! JWT claims and the claim map returned by validation.

use std::collections::btree_map;
use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use error::AuthError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::JwtConfig;

/// Subject (who the token is about)
pub const SUBJECT: &str = "sub";
/// Unique identifier of one issued token
pub const TOKEN_ID: &str = "jti";
/// Role of the subject
pub const ROLE: &str = "role";
/// Issued at (Unix timestamp)
pub const ISSUED_AT: &str = "iat";
/// Not valid before (Unix timestamp)
pub const NOT_BEFORE: &str = "nbf";
/// Expiration time (Unix timestamp)
pub const EXPIRES_AT: &str = "exp";
/// Issuer
pub const ISSUER: &str = "iss";
/// Audience
pub const AUDIENCE: &str = "aud";

/// Claims stamped on a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user name or id)
    pub sub: String,
    /// Token id (random UUID)
    pub jti: String,
    /// Subject's role
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

impl Claims {
    /// Create new claims for a subject, valid from `issued_at` for the configured expiry.
    pub fn new(
        subject: impl Into<String>,
        role: impl Into<String>,
        config: &JwtConfig,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let expires_at = issued_at.checked_add_signed(config.expiry).ok_or_else(|| {
            tracing::error!(expiry = %config.expiry, "token expiry overflows the calendar");
            AuthError::TokenCreationFailed
        })?;
        let iat = issued_at.timestamp();

        Ok(Self {
            sub: subject.into(),
            jti: Uuid::new_v4().to_string(),
            role: role.into(),
            iat,
            nbf: iat,
            exp: expires_at.timestamp(),
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
        })
    }
}

impl From<Claims> for ClaimSet {
    fn from(claims: Claims) -> Self {
        let mut set = ClaimSet::new();
        set.insert(ROLE, claims.role);
        set.insert(SUBJECT, claims.sub);
        set.insert(TOKEN_ID, claims.jti);
        set.insert(ISSUER, claims.iss);
        set.insert(AUDIENCE, claims.aud);
        set.insert(ISSUED_AT, claims.iat);
        set.insert(NOT_BEFORE, claims.nbf);
        set.insert(EXPIRES_AT, claims.exp);
        set
    }
}

/// Flat map of claim name to value, as carried in a token payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(BTreeMap<String, Value>);

impl ClaimSet {
    /// Create an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a claim, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Remove a claim.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Get a claim value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Check if a claim is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of claims.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no claims.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate claims in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Get the subject (`sub`).
    pub fn subject(&self) -> Option<&str> {
        self.str_claim(SUBJECT)
    }

    /// Get the role.
    pub fn role(&self) -> Option<&str> {
        self.str_claim(ROLE)
    }

    /// Get the token id (`jti`).
    pub fn token_id(&self) -> Option<&str> {
        self.str_claim(TOKEN_ID)
    }

    /// Get the issuer (`iss`).
    pub fn issuer(&self) -> Option<&str> {
        self.str_claim(ISSUER)
    }

    /// Audience values. `aud` may be a single string or an array of strings.
    pub fn audiences(&self) -> Vec<&str> {
        match self.get(AUDIENCE) {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Get the issued-at time (`iat`).
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.time_claim(ISSUED_AT)
    }

    /// Get the not-before time (`nbf`).
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.time_claim(NOT_BEFORE)
    }

    /// Get the expiration time (`exp`).
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.time_claim(EXPIRES_AT)
    }

    /// Check if the token carries exactly this role.
    pub fn has_role(&self, role: &str) -> bool {
        self.role() == Some(role)
    }

    /// Borrow the underlying claim map.
    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.0
    }

    /// Consume into the underlying claim map.
    pub fn into_map(self) -> BTreeMap<String, Value> {
        self.0
    }

    /// Read a NumericDate claim as whole seconds since the epoch.
    pub(crate) fn numeric_date(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(numeric_date)
    }

    fn str_claim(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    fn time_claim(&self, name: &str) -> Option<DateTime<Utc>> {
        self.numeric_date(name)
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }
}

/// NumericDate may carry a fractional part; it is truncated toward the past.
pub(crate) fn numeric_date(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
}

impl From<BTreeMap<String, Value>> for ClaimSet {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
