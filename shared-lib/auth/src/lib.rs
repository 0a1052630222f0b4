//! Session token issuance and validation.
//!
//! This crate signs compact HS256 JWTs for a subject and role, and validates
//! presented tokens against the configured key, issuer, audience and expiry.

pub mod claims;
pub mod clock;
pub mod config;
mod issuer;
mod jwt;
pub mod roles;
mod service;
mod verifier;

pub use claims::{ClaimSet, Claims};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::JwtConfig;
pub use error::{AuthError, ConfigError};
pub use issuer::TokenIssuer;
pub use self::jwt::{decode_token, encode_token, signing_key, HmacSha256};
pub use roles::{ensure_role, ROLE_ADMIN, ROLE_MEMBER, ROLE_SUPER_USER, ROLE_USER};
pub use service::{JwtTokenService, TokenService};
pub use verifier::TokenVerifier;
