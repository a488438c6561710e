use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_permission, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{CreateQuizRequest, SubmitQuizRequest, UpdateQuizTitleRequest},
        response::MessageResponse,
    },
};

#[get("/quizzes")]
pub async fn list_quizzes(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "quiz", "read")?;

    let quizzes = state.quiz_service.get_all_quizzes().await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "quiz", "read")?;

    let quiz = state.quiz_service.get_quiz(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[post("/quizzes")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "quiz", "create")?;

    let quiz = state.quiz_service.create_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[put("/quizzes/{id}")]
pub async fn update_quiz_title(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    request: web::Json<UpdateQuizTitleRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "quiz", "update")?;

    state
        .quiz_service
        .update_quiz_title(id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Quiz title updated successfully")))
}

#[delete("/quizzes/{id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "quiz", "delete")?;

    let id = id.into_inner();
    if !state.quiz_service.delete_quiz(id).await? {
        return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new("Quiz deleted successfully")))
}

#[post("/quizzes/{id}/submit")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    request: web::Json<SubmitQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_permission(&auth.0, "quiz", "submit")?;

    let result = state
        .quiz_service
        .submit_quiz(id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}
