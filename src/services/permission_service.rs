use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{NewRole, Permission, Role},
        dto::request::{
            CreatePermissionRequest, CreateRoleRequest, UpdatePermissionRequest, UpdateRoleRequest,
        },
    },
    repositories::{PermissionRepository, RoleRepository, UserRepository},
};

/// Administration of permissions, roles and role assignment. Changes here
/// never touch issued tokens; they apply to logins that happen afterwards.
pub struct PermissionService {
    permissions: Arc<dyn PermissionRepository>,
    roles: Arc<dyn RoleRepository>,
    users: Arc<dyn UserRepository>,
}

impl PermissionService {
    pub fn new(
        permissions: Arc<dyn PermissionRepository>,
        roles: Arc<dyn RoleRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            permissions,
            roles,
            users,
        }
    }

    pub async fn create_permission(&self, request: CreatePermissionRequest) -> AppResult<Permission> {
        request.validate()?;
        self.permissions.insert(request.into()).await
    }

    pub async fn get_all_permissions(&self) -> AppResult<Vec<Permission>> {
        self.permissions.find_all().await
    }

    pub async fn get_permission(&self, id: i64) -> AppResult<Permission> {
        self.permissions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Permission with id '{}' not found", id)))
    }

    pub async fn update_permission(
        &self,
        id: i64,
        request: UpdatePermissionRequest,
    ) -> AppResult<Permission> {
        request.validate()?;

        let mut permission = self.get_permission(id).await?;
        if let Some(name) = request.name {
            permission.name = name;
        }
        if let Some(description) = request.description {
            permission.description = Some(description);
        }
        if let Some(resource) = request.resource {
            permission.resource = resource;
        }
        if let Some(action) = request.action {
            permission.action = action;
        }

        self.permissions.update(permission).await
    }

    /// Removes the permission and strips its id from every role. Tokens
    /// already carrying the string keep it until they expire.
    pub async fn delete_permission(&self, id: i64) -> AppResult<()> {
        if !self.permissions.delete(id).await? {
            return Err(AppError::NotFound(format!(
                "Permission with id '{}' not found",
                id
            )));
        }
        self.roles.remove_permission_from_all(id).await?;
        log::info!("Deleted permission {} and detached it from all roles", id);

        Ok(())
    }

    /// Unknown permission ids in the request are dropped rather than
    /// rejected; the role ends up with the subset that exists.
    pub async fn create_role(&self, request: CreateRoleRequest) -> AppResult<Role> {
        request.validate()?;

        let role = NewRole::from(request);
        let permission_ids = self.existing_permission_ids(&role.permission_ids).await?;
        self.roles
            .insert(NewRole {
                permission_ids,
                ..role
            })
            .await
    }

    pub async fn get_all_roles(&self) -> AppResult<Vec<Role>> {
        self.roles.find_all().await
    }

    pub async fn get_role(&self, id: i64) -> AppResult<Role> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role with id '{}' not found", id)))
    }

    pub async fn update_role(&self, id: i64, request: UpdateRoleRequest) -> AppResult<Role> {
        request.validate()?;

        let mut role = self.get_role(id).await?;
        if let Some(name) = request.name {
            role.name = name;
        }
        if let Some(description) = request.description {
            role.description = Some(description);
        }
        if let Some(permission_ids) = request.permission_ids {
            role.permission_ids = self.existing_permission_ids(&permission_ids).await?;
        }

        self.roles.update(role).await
    }

    /// Removes the role and strips its id from every user.
    pub async fn delete_role(&self, id: i64) -> AppResult<()> {
        if !self.roles.delete(id).await? {
            return Err(AppError::NotFound(format!("Role with id '{}' not found", id)));
        }
        self.users.remove_role_from_all(id).await?;
        log::info!("Deleted role {} and unassigned it from all users", id);

        Ok(())
    }

    /// Idempotent: assigning a role the user already holds changes nothing.
    pub async fn assign_role(&self, user_id: i64, role_id: i64) -> AppResult<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", user_id)))?;
        self.get_role(role_id).await?;

        if user.role_ids.contains(&role_id) {
            return Ok(());
        }

        let mut role_ids = user.role_ids;
        role_ids.push(role_id);
        self.users.update_roles(user_id, &role_ids).await?;

        Ok(())
    }

    /// Removing a role the user does not hold succeeds without effect.
    pub async fn remove_role(&self, user_id: i64, role_id: i64) -> AppResult<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", user_id)))?;

        if !user.role_ids.contains(&role_id) {
            return Ok(());
        }

        let role_ids: Vec<i64> = user.role_ids.into_iter().filter(|id| *id != role_id).collect();
        self.users.update_roles(user_id, &role_ids).await?;

        Ok(())
    }

    async fn existing_permission_ids(&self, requested: &[i64]) -> AppResult<Vec<i64>> {
        let found = self.permissions.find_by_ids(requested).await?;
        Ok(found.into_iter().map(|permission| permission.id).collect())
    }
}
