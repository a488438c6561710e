use std::collections::HashMap;

use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{NewAnswer, NewPermission, NewQuestion, NewQuiz, NewRole};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub questions: Vec<CreateQuestionRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionRequest {
    pub text: String,
    pub answers: Vec<CreateAnswerRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnswerRequest {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuizTitleRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}

/// Submitted answers keyed by question id. Unknown question ids are ignored
/// by the scorer; unanswered questions simply score zero.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: HashMap<i64, i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePermissionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub resource: String,

    #[validate(length(min = 1, max = 100))]
    pub action: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePermissionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub resource: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub description: Option<String>,

    pub permission_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub description: Option<String>,

    pub permission_ids: Option<Vec<i64>>,
}

impl From<CreateQuizRequest> for NewQuiz {
    fn from(request: CreateQuizRequest) -> Self {
        NewQuiz {
            title: request.title,
            questions: request.questions.into_iter().map(NewQuestion::from).collect(),
        }
    }
}

impl From<CreateQuestionRequest> for NewQuestion {
    fn from(request: CreateQuestionRequest) -> Self {
        NewQuestion {
            text: request.text,
            answers: request.answers.into_iter().map(NewAnswer::from).collect(),
        }
    }
}

impl From<CreateAnswerRequest> for NewAnswer {
    fn from(request: CreateAnswerRequest) -> Self {
        NewAnswer {
            text: request.text,
            is_correct: request.is_correct,
        }
    }
}

impl From<CreatePermissionRequest> for NewPermission {
    fn from(request: CreatePermissionRequest) -> Self {
        NewPermission {
            name: request.name,
            description: request.description,
            resource: request.resource,
            action: request.action,
        }
    }
}

impl From<CreateRoleRequest> for NewRole {
    fn from(request: CreateRoleRequest) -> Self {
        NewRole {
            name: request.name,
            description: request.description,
            permission_ids: request.permission_ids.unwrap_or_default(),
        }
    }
}
