use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;

use crate::db::user::UserRepository;
use crate::error::AppError;
use crate::models::Role;
use crate::schedule::slot::validate_email;
use crate::AppState;

/// The caller of the current request, as asserted by the upstream identity
/// provider via `x-user-id` / `x-user-name` / `x-user-email` headers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::permission_denied("admin privileges required"))
        }
    }
}

/// Effective role for a request. The allow-list grants ADMIN outright; it is
/// configuration, not state, and wins over whatever is stored. Otherwise the
/// stored role applies, which is how an admin promotes users not on the list.
pub fn resolve_role(email: &str, stored: Role, admin_emails: &[String]) -> Role {
    if admin_emails
        .iter()
        .any(|admin| admin.eq_ignore_ascii_case(email))
    {
        Role::Admin
    } else {
        stored
    }
}

fn required_header(parts: &Parts, name: &str) -> Result<String, AppError> {
    let value = parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or("");
    if value.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(value.to_string())
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let id = required_header(parts, "x-user-id")?;
        let name = required_header(parts, "x-user-name")?;
        let email = required_header(parts, "x-user-email")?;
        validate_email(&email).map_err(|_| AppError::Unauthorized)?;

        let user_repo = UserRepository::new(state.db_pool.clone());
        let user = user_repo.upsert_identity(&id, &name, &email).await?;
        let role = resolve_role(&email, user.role, &state.admin_emails);

        Ok(AuthUser {
            id,
            name,
            email,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_listed_email_is_admin() {
        let admins = vec!["boss@example.com".to_string()];
        assert_eq!(
            resolve_role("boss@example.com", Role::User, &admins),
            Role::Admin
        );
        // Case differences in the header must not demote an admin
        assert_eq!(
            resolve_role("Boss@Example.com", Role::User, &admins),
            Role::Admin
        );
    }

    #[test]
    fn test_stored_override_applies_off_list() {
        let admins = vec!["boss@example.com".to_string()];
        assert_eq!(
            resolve_role("promoted@example.com", Role::Admin, &admins),
            Role::Admin
        );
        assert_eq!(
            resolve_role("someone@example.com", Role::User, &admins),
            Role::User
        );
    }

    #[test]
    fn test_empty_allow_list_falls_back_to_stored() {
        assert_eq!(resolve_role("anyone@example.com", Role::User, &[]), Role::User);
    }
}
