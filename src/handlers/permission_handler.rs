use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_permission, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{
            CreatePermissionRequest, CreateRoleRequest, UpdatePermissionRequest, UpdateRoleRequest,
        },
        response::MessageResponse,
    },
};

#[post("/permissions")]
pub async fn create_permission(
    state: web::Data<AppState>,
    request: web::Json<CreatePermissionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "permission", "create")?;

    let permission = state
        .permission_service
        .create_permission(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(permission))
}

#[get("/permissions")]
pub async fn list_permissions(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "permission", "read")?;

    let permissions = state.permission_service.get_all_permissions().await?;
    Ok(HttpResponse::Ok().json(permissions))
}

#[get("/permissions/{id}")]
pub async fn get_permission(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "permission", "read")?;

    let permission = state.permission_service.get_permission(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(permission))
}

#[put("/permissions/{id}")]
pub async fn update_permission(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    request: web::Json<UpdatePermissionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "permission", "update")?;

    let permission = state
        .permission_service
        .update_permission(id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(permission))
}

#[delete("/permissions/{id}")]
pub async fn delete_permission(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "permission", "delete")?;

    state.permission_service.delete_permission(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/roles")]
pub async fn create_role(
    state: web::Data<AppState>,
    request: web::Json<CreateRoleRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "role", "create")?;

    let role = state.permission_service.create_role(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(role))
}

#[get("/roles")]
pub async fn list_roles(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "role", "read")?;

    let roles = state.permission_service.get_all_roles().await?;
    Ok(HttpResponse::Ok().json(roles))
}

#[get("/roles/{id}")]
pub async fn get_role(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "role", "read")?;

    let role = state.permission_service.get_role(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(role))
}

#[put("/roles/{id}")]
pub async fn update_role(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    request: web::Json<UpdateRoleRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "role", "update")?;

    let role = state
        .permission_service
        .update_role(id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(role))
}

#[delete("/roles/{id}")]
pub async fn delete_role(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "role", "delete")?;

    state.permission_service.delete_role(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/users/{user_id}/roles/{role_id}")]
pub async fn assign_role(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "user", "manage")?;

    let (user_id, role_id) = path.into_inner();
    state.permission_service.assign_role(user_id, role_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Role assigned successfully")))
}

#[delete("/users/{user_id}/roles/{role_id}")]
pub async fn remove_role(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "user", "manage")?;

    let (user_id, role_id) = path.into_inner();
    state.permission_service.remove_role(user_id, role_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Role removed successfully")))
}
