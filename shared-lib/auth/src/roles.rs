//! Role vocabulary and role checks.

use error::AuthError;

use crate::claims::ClaimSet;

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_SUPER_USER: &str = "SuperUser";
pub const ROLE_MEMBER: &str = "Member";
pub const ROLE_USER: &str = "User";

/// Check that the token's role is one of `allowed`.
///
/// An empty `allowed` list admits any authenticated principal.
pub fn ensure_role(claims: &ClaimSet, allowed: &[&str]) -> Result<(), AuthError> {
    if allowed.is_empty() {
        return Ok(());
    }

    if allowed.iter().any(|role| claims.has_role(role)) {
        Ok(())
    } else {
        tracing::debug!(
            role = claims.role().unwrap_or_default(),
            required = ?allowed,
            "role check failed"
        );
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ROLE;

    fn with_role(role: &str) -> ClaimSet {
        let mut claims = ClaimSet::new();
        claims.insert(ROLE, role);
        claims
    }

    #[test]
    fn test_empty_allow_list_admits_anyone() {
        assert!(ensure_role(&with_role(ROLE_MEMBER), &[]).is_ok());
        assert!(ensure_role(&ClaimSet::new(), &[]).is_ok());
    }

    #[test]
    fn test_matching_role_is_admitted() {
        let claims = with_role(ROLE_ADMIN);
        assert!(ensure_role(&claims, &[ROLE_ADMIN]).is_ok());
        assert!(ensure_role(&claims, &[ROLE_SUPER_USER, ROLE_ADMIN]).is_ok());
    }

    #[test]
    fn test_other_role_is_forbidden() {
        let claims = with_role(ROLE_MEMBER);
        assert_eq!(ensure_role(&claims, &[ROLE_ADMIN]), Err(AuthError::Forbidden));
        assert_eq!(
            ensure_role(&ClaimSet::new(), &[ROLE_ADMIN]),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn test_role_match_is_case_sensitive() {
        assert!(ensure_role(&with_role("admin"), &[ROLE_ADMIN]).is_err());
    }
}
