use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::Validate;

use crate::{
    auth::{password, JwtService},
    errors::{AppError, AppResult},
    models::{
        domain::{NewUser, User},
        dto::{
            request::{LoginRequest, RegisterRequest},
            response::{AuthResponse, UserProfileResponse},
        },
    },
    repositories::{PermissionRepository, RoleRepository, UserRepository},
};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern is valid"));

/// Registration, login and profile lookups. Issues the tokens everything else
/// authenticates with.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        permissions: Arc<dyn PermissionRepository>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            roles,
            permissions,
            jwt,
        }
    }

    /// Creates the account and logs it straight in. New users start with no
    /// roles; their first token carries empty grant lists.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;
        if !USERNAME_RE.is_match(&request.username) {
            return Err(AppError::ValidationError(
                "Username may only contain letters, digits and underscores".to_string(),
            ));
        }

        // Pre-check for a friendly 409; the unique indexes stay as backstop
        // against a racing insert
        if self
            .users
            .find_by_username_or_email(&request.username, &request.email)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(
                "Username or email already exists".to_string(),
            ));
        }

        let password_hash = password::hash_password(&request.password).await?;
        let user = self
            .users
            .insert(NewUser {
                username: request.username,
                email: request.email,
                password_hash,
            })
            .await?;
        log::info!("Registered user '{}' with id {}", user.username, user.id);

        self.issue(&user).await
    }

    /// Verifies credentials and issues a token with the user's current
    /// grants baked in. Unknown usernames, inactive accounts and wrong
    /// passwords are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .filter(|user| user.is_active)
            .ok_or(AppError::InvalidCredentials)?;

        if !password::verify_password(&request.password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.issue(&user).await
    }

    /// Fresh-from-store identity view, unlike the claims snapshot in the
    /// caller's token.
    pub async fn profile(&self, user_id: i64) -> AppResult<UserProfileResponse> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", user_id)))?;

        let (roles, permissions) = self.resolve_grants(&user).await?;
        Ok(profile_view(&user, roles, permissions))
    }

    async fn issue(&self, user: &User) -> AppResult<AuthResponse> {
        let (roles, permissions) = self.resolve_grants(user).await?;
        let token = self.jwt.create_token(user, &roles, &permissions)?;

        Ok(AuthResponse {
            token,
            user: profile_view(user, roles, permissions),
        })
    }

    /// Flattens the user's roles into the two claim lists: role names, and
    /// `resource:action` strings deduplicated across roles.
    async fn resolve_grants(&self, user: &User) -> AppResult<(Vec<String>, Vec<String>)> {
        let roles = self.roles.find_by_ids(&user.role_ids).await?;
        let role_names: Vec<String> = roles.iter().map(|role| role.name.clone()).collect();

        let mut permission_ids: Vec<i64> = roles
            .iter()
            .flat_map(|role| role.permission_ids.iter().copied())
            .collect();
        permission_ids.sort_unstable();
        permission_ids.dedup();

        let permissions = self.permissions.find_by_ids(&permission_ids).await?;
        let mut permission_strings: Vec<String> = permissions
            .iter()
            .map(|permission| permission.permission_string())
            .collect();
        permission_strings.sort();
        permission_strings.dedup();

        Ok((role_names, permission_strings))
    }
}

fn profile_view(user: &User, roles: Vec<String>, permissions: Vec<String>) -> UserProfileResponse {
    UserProfileResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        roles,
        permissions,
    }
}
