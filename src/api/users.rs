use actix_web::{web, HttpResponse, Responder};

use crate::api::metrics::{increment_error_count, increment_request_count};
use crate::database::MongoDB;
use crate::models::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest};
use crate::services::user_service;
use crate::utils::error::UserError;
use crate::utils::validation::{
    validate_change_password, validate_create_user, validate_update_user,
};

/// Translates a domain error to its HTTP shape. This is the only place
/// status codes are assigned; every layer below returns UserError.
fn error_response(err: UserError) -> HttpResponse {
    increment_error_count();

    match err {
        UserError::NotFound(message) => {
            HttpResponse::UnprocessableEntity().json(serde_json::json!({
                "statusCode": 422,
                "error": "UNPROCESSABLE_ENTITY",
                "description": "Unprocessable entity",
                "message": message
            }))
        }
        UserError::EmailAlreadyTaken => HttpResponse::Conflict().json(serde_json::json!({
            "statusCode": 409,
            "error": "EMAIL_ALREADY_TAKEN",
            "description": "Email already taken",
            "message": "Email already taken"
        })),
        UserError::InvalidPassword(message) => HttpResponse::Forbidden().json(serde_json::json!({
            "statusCode": 403,
            "error": "INVALID_PASSWORD_ERROR",
            "description": "Invalid password",
            "message": message
        })),
        UserError::Validation(fields) => HttpResponse::BadRequest().json(serde_json::json!({
            "statusCode": 400,
            "error": "VALIDATION_ERROR",
            "description": "Invalid request body",
            "message": "Request validation failed",
            "fields": fields
        })),
        UserError::Database(message) | UserError::Internal(message) => {
            log::error!("❌ Unhandled error: {}", message);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "statusCode": 500,
                "error": "INTERNAL_SERVER_ERROR",
                "description": "Internal server error",
                "message": message
            }))
        }
    }
}

/// GET /users - List all users (no password fields)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "List of users", body = [crate::models::PublicUser])
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_users(db: web::Data<MongoDB>) -> impl Responder {
    increment_request_count();

    match user_service::get_users(db.get_ref()).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => error_response(e),
    }
}

/// GET /users/{id} - User detail
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User detail", body = crate::models::PublicUser),
        (status = 422, description = "Unknown user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(path: web::Path<String>, db: web::Data<MongoDB>) -> impl Responder {
    increment_request_count();

    let id = path.into_inner();

    match user_service::get_user(db.get_ref(), &id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => error_response(e),
    }
}

/// POST /users - Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = crate::models::CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = crate::models::PublicUser),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Password confirmation does not match"),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn create_user(
    body: web::Json<CreateUserRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    increment_request_count();

    let request = body.into_inner();

    if let Err(e) = validate_create_user(&request) {
        return error_response(e);
    }

    if request.password != request.password_confirm {
        return error_response(UserError::InvalidPassword(
            "Password does not match".to_string(),
        ));
    }

    match user_service::create_user(db.get_ref(), &request.name, &request.email, &request.password).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => error_response(e),
    }
}

/// PUT /users/{id} - Update name and email
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    request_body = crate::models::UpdateUserRequest,
    responses(
        (status = 200, description = "User updated"),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already taken"),
        (status = 422, description = "Unknown user")
    )
)]
pub async fn update_user(
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    increment_request_count();

    let id = path.into_inner();
    let request = body.into_inner();

    if let Err(e) = validate_update_user(&request) {
        return error_response(e);
    }

    match user_service::update_user(db.get_ref(), &id, &request.name, &request.email).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "id": id })),
        Err(e) => error_response(e),
    }
}

/// DELETE /users/{id} - Permanently remove a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 422, description = "Unknown user")
    )
)]
pub async fn delete_user(path: web::Path<String>, db: web::Data<MongoDB>) -> impl Responder {
    increment_request_count();

    let id = path.into_inner();

    match user_service::delete_user(db.get_ref(), &id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "id": id })),
        Err(e) => error_response(e),
    }
}

/// PATCH /users/{id}/change-password - Change a user's password
#[utoipa::path(
    patch,
    path = "/users/{id}/change-password",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    request_body = crate::models::ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Invalid password"),
        (status = 422, description = "Unknown user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_password(
    path: web::Path<String>,
    body: web::Json<ChangePasswordRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    increment_request_count();

    let id = path.into_inner();
    let request = body.into_inner();

    if let Err(e) = validate_change_password(&request) {
        return error_response(e);
    }

    if request.new_password != request.confirm_password {
        return error_response(UserError::InvalidPassword(
            "Password confirmation does not match".to_string(),
        ));
    }

    match user_service::update_password(db.get_ref(), &id, &request.old_password, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Password updated successfully"
        })),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::FieldError;

    fn status_of(response: HttpResponse) -> u16 {
        response.status().as_u16()
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            status_of(error_response(UserError::NotFound("Unknown user".to_string()))),
            422
        );
        assert_eq!(status_of(error_response(UserError::EmailAlreadyTaken)), 409);
        assert_eq!(
            status_of(error_response(UserError::InvalidPassword(
                "Old password is incorrect".to_string()
            ))),
            403
        );
        assert_eq!(
            status_of(error_response(UserError::Validation(vec![FieldError::new(
                "name",
                "Name must be between 1 and 100 characters"
            )]))),
            400
        );
        assert_eq!(
            status_of(error_response(UserError::Database("boom".to_string()))),
            500
        );
    }
}
