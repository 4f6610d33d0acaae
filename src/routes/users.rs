use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::auth::{gravatar, password};
use crate::db::models::{NewUser, User};
use crate::db::{is_unique_violation, users};
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, JsonBody};
use crate::state::AppState;
use crate::validation::{validate_login, validate_register, LoginInput, RegisterInput};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/current", get(current))
}

/// Run bcrypt off the async workers.
async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))
}

/// POST /api/users/register
async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> AppResult<Json<User>> {
    let registration = validate_register(&input).map_err(AppError::Validation)?;

    {
        let conn = state.db.get()?;
        if users::find_by_email(&conn, &registration.email)?.is_some() {
            return Err(AppError::validation("email", "Email already exists"));
        }
    }

    let cost = state.config.auth.bcrypt_cost;
    let plaintext = registration.password.clone();
    let password_hash = blocking(move || password::hash_password(&plaintext, cost)).await??;

    let new_user = NewUser {
        avatar: gravatar::avatar_url(&registration.email),
        name: registration.name,
        email: registration.email,
        password_hash,
    };

    let conn = state.db.get()?;
    let user = users::insert(&conn, &new_user).map_err(|e| match e {
        // Lost a race with a concurrent registration
        AppError::Database(ref db) if is_unique_violation(db) => {
            AppError::validation("email", "Email already exists")
        }
        other => other,
    })?;

    tracing::info!(user_id = %user.id, "Registered user");
    Ok(Json(user))
}

/// POST /api/users/login
async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginInput>,
) -> AppResult<Json<Value>> {
    let credentials = validate_login(&input).map_err(AppError::Validation)?;

    let user = {
        let conn = state.db.get()?;
        users::find_by_email(&conn, &credentials.email)?
    }
    .ok_or_else(|| AppError::not_found("email", "User not found"))?;

    let hash = user.password_hash.clone();
    let plaintext = credentials.password;
    let matches = blocking(move || password::verify_password(&plaintext, &hash)).await?;
    if !matches {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AppError::validation("password", "Password incorrect"));
    }

    let token = state.keys.sign(&user)?;
    tracing::debug!(user_id = %user.id, "Issued token");

    Ok(Json(json!({
        "success": true,
        "token": format!("Bearer {}", token),
    })))
}

/// GET /api/users/current
async fn current(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({ "msg": user }))
}
