pub mod auth_handler;
pub mod health_handler;
pub mod permission_handler;
pub mod quiz_handler;

use actix_web::web;

/// Routes that work without a token.
pub fn configure_public(cfg: &mut web::ServiceConfig) {
    cfg.service(auth_handler::register)
        .service(auth_handler::login)
        .service(health_handler::health)
        .service(health_handler::liveness)
        .service(health_handler::readiness);
}

/// Routes mounted inside the authenticated `/api` scope. Authentication is
/// the scope's middleware; per-route permission checks live in the handlers.
pub fn configure_protected(cfg: &mut web::ServiceConfig) {
    cfg.service(auth_handler::profile)
        .service(quiz_handler::list_quizzes)
        .service(quiz_handler::get_quiz)
        .service(quiz_handler::create_quiz)
        .service(quiz_handler::update_quiz_title)
        .service(quiz_handler::delete_quiz)
        .service(quiz_handler::submit_quiz)
        .service(permission_handler::create_permission)
        .service(permission_handler::list_permissions)
        .service(permission_handler::get_permission)
        .service(permission_handler::update_permission)
        .service(permission_handler::delete_permission)
        .service(permission_handler::create_role)
        .service(permission_handler::list_roles)
        .service(permission_handler::get_role)
        .service(permission_handler::update_role)
        .service(permission_handler::delete_role)
        .service(permission_handler::assign_role)
        .service(permission_handler::remove_role);
}
