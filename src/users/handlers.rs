use actix_web::error::UrlencodedError;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::num::ParseIntError;
use tracing::{error, info, warn};

use crate::db::User;
use crate::error::{AppError, DatabaseError};
use crate::users::validate_user;
use crate::AppState;

/// Largest accepted form body.
pub const MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

/// Fields of `POST /users` and `PUT /users/{id}`. Read from the form body
/// first, then from the query string.
#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    pub name: Option<String>,
    pub age: Option<String>,
}

impl UserForm {
    fn or(self, fallback: UserForm) -> UserForm {
        UserForm {
            name: self.name.or(fallback.name),
            age: self.age.or(fallback.age),
        }
    }
}

/// Resolves `(name, age)` as raw strings. A request without a form body
/// reads as one with no fields; any other body error is returned.
fn form_values(
    body: Result<web::Form<UserForm>, actix_web::Error>,
    query: web::Query<UserForm>,
) -> Result<(String, String), AppError> {
    let body = match body {
        Ok(form) => form.into_inner(),
        Err(err) => match err.as_error::<UrlencodedError>() {
            Some(UrlencodedError::ContentType) => UserForm::default(),
            Some(UrlencodedError::Overflow { size, limit }) => {
                warn!("Form body of {} bytes exceeds {} bytes", size, limit);
                return Err(AppError::PayloadTooLarge(err.to_string()));
            }
            _ => {
                warn!("Unreadable form body: {}", err);
                return Err(AppError::BadRequest(err.to_string()));
            }
        },
    };

    let form = body.or(query.into_inner());
    Ok((form.name.unwrap_or_default(), form.age.unwrap_or_default()))
}

fn malformed(state: &AppState, field: &str, raw: &str, err: ParseIntError) -> AppError {
    let message = format!("invalid {} {:?}: {}", field, raw, err);
    warn!("{}", message);
    if state.config.api.strict_errors {
        AppError::BadRequest(message)
    } else {
        AppError::InternalError(message)
    }
}

fn parse_id(state: &AppState, raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|e| malformed(state, "id", raw, e))
}

fn store_failure(op: &str, err: DatabaseError) -> AppError {
    error!("Failed to {}: {}", op, err);
    AppError::DatabaseError(err)
}

/// `POST /users`
///
/// An unparsable age is stored as 0. Name and age are only checked when
/// `api.validate_on_create` is set.
pub async fn create_user(
    form: Result<web::Form<UserForm>, actix_web::Error>,
    query: web::Query<UserForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (name, age) = form_values(form, query)?;
    let age = age.parse::<i64>().unwrap_or(0);

    if state.config.api.validate_on_create {
        if let Err(e) = validate_user(&name, age) {
            warn!("Rejected new user: {}", e);
            return Err(e.into());
        }
    }

    let user = state
        .db
        .insert_user(&name, age)
        .await
        .map_err(|e| store_failure("insert user", e))?;

    info!(id = user.id, "Created user");
    Ok(HttpResponse::Ok().json(user))
}

/// `GET /users`
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = state
        .db
        .list_users()
        .await
        .map_err(|e| store_failure("list users", e))?;

    Ok(HttpResponse::Ok().json(users))
}

/// `GET /users/{id}`
///
/// A missing row is reported as a store failure (500) unless
/// `api.strict_errors` is set, in which case it is a 404.
pub async fn get_user(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&state, &path)?;

    match state.db.get_user(id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(user)),
        Err(DatabaseError::NoRows(_)) if state.config.api.strict_errors => {
            warn!(id, "User not found");
            Err(AppError::NotFound)
        }
        Err(e) => Err(store_failure("fetch user", e)),
    }
}

/// `PUT /users/{id}`
///
/// The response is built from the submitted values; the row is not read back.
pub async fn update_user(
    path: web::Path<String>,
    form: Result<web::Form<UserForm>, actix_web::Error>,
    query: web::Query<UserForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&state, &path)?;
    let (name, raw_age) = form_values(form, query)?;
    let age = raw_age
        .parse::<i64>()
        .map_err(|e| malformed(&state, "age", &raw_age, e))?;

    if let Err(e) = validate_user(&name, age) {
        warn!(id, "Rejected update: {}", e);
        return Err(e.into());
    }

    let rows = state
        .db
        .update_user(id, &name, age)
        .await
        .map_err(|e| store_failure("update user", e))?;

    if rows == 0 {
        warn!(id, "Update target not found");
        return Err(AppError::NotFound);
    }

    info!(id, "Updated user");
    Ok(HttpResponse::Ok().json(User::new(id, name, age)))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&state, &path)?;

    let rows = state
        .db
        .delete_user(id)
        .await
        .map_err(|e| store_failure("delete user", e))?;

    if rows == 0 {
        warn!(id, "Delete target not found");
        return Err(AppError::NotFound);
    }

    info!(id, "Deleted user");
    Ok(HttpResponse::NoContent().finish())
}

/// Registers the five `/users` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .app_data(web::FormConfig::default().limit(MAX_FORM_BYTES))
            .route(web::get().to(list_users))
            .route(web::post().to(create_user)),
    )
    .service(
        web::resource("/users/{id}")
            .app_data(web::FormConfig::default().limit(MAX_FORM_BYTES))
            .route(web::get().to(get_user))
            .route(web::put().to(update_user))
            .route(web::delete().to(delete_user)),
    );
}
