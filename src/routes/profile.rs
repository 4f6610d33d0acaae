use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::models::Profile;
use crate::db::{profiles, users};
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, JsonBody};
use crate::state::AppState;
use crate::validation::{
    validate_education, validate_experience, validate_profile, EducationInput, ExperienceInput,
    ProfileInput,
};

const NO_PROFILE: &str = "There is no profile for this user";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(current_profile).post(save_profile).delete(delete_account),
        )
        .route("/all", get(all_profiles))
        .route("/handle/{handle}", get(profile_by_handle))
        .route("/user/{user_id}", get(profile_by_user))
        .route("/experience", post(add_experience))
        .route("/experience/{exp_id}", delete(delete_experience))
        .route("/education", post(add_education))
        .route("/education/{edu_id}", delete(delete_education))
}

fn no_profile() -> AppError {
    AppError::not_found("noprofile", NO_PROFILE)
}

fn own_profile(conn: &rusqlite::Connection, user_id: &str) -> AppResult<Profile> {
    profiles::find_by_user(conn, user_id)?.ok_or_else(no_profile)
}

/// GET /api/profile
async fn current_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Profile>> {
    let conn = state.db.get()?;
    Ok(Json(own_profile(&conn, &user.id)?))
}

/// GET /api/profile/all
async fn all_profiles(State(state): State<AppState>) -> AppResult<Json<Vec<Profile>>> {
    let conn = state.db.get()?;
    Ok(Json(profiles::list(&conn)?))
}

/// GET /api/profile/handle/{handle}
async fn profile_by_handle(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<Json<Profile>> {
    let conn = state.db.get()?;
    let profile = profiles::find_by_handle(&conn, &handle)?.ok_or_else(no_profile)?;
    Ok(Json(profile))
}

/// GET /api/profile/user/{user_id}
async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Profile>> {
    let conn = state.db.get()?;
    Ok(Json(own_profile(&conn, &user_id)?))
}

/// POST /api/profile — create or update the caller's profile
async fn save_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(input): JsonBody<ProfileInput>,
) -> AppResult<Json<Profile>> {
    let fields = validate_profile(&input).map_err(AppError::Validation)?;

    let mut conn = state.db.get()?;
    if let Some(owner) = profiles::handle_owner(&conn, &fields.handle)? {
        if owner != user.id {
            return Err(AppError::validation("handle", "That handle already exists"));
        }
    }

    let profile = profiles::upsert(&mut conn, &user.id, &fields)?;
    tracing::debug!(user_id = %user.id, handle = %profile.handle, "Saved profile");
    Ok(Json(profile))
}

/// DELETE /api/profile — removes the profile and the account behind it
async fn delete_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Value>> {
    let conn = state.db.get()?;
    users::delete(&conn, &user.id)?;
    tracing::info!(user_id = %user.id, "Deleted account");
    Ok(Json(json!({ "success": true })))
}

/// POST /api/profile/experience
async fn add_experience(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(input): JsonBody<ExperienceInput>,
) -> AppResult<Json<Profile>> {
    let entry = validate_experience(&input).map_err(AppError::Validation)?;

    let conn = state.db.get()?;
    let profile = own_profile(&conn, &user.id)?;
    profiles::add_experience(&conn, &profile.id, &entry)?;
    Ok(Json(own_profile(&conn, &user.id)?))
}

/// DELETE /api/profile/experience/{exp_id}
async fn delete_experience(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(exp_id): Path<String>,
) -> AppResult<Json<Profile>> {
    let conn = state.db.get()?;
    let profile = own_profile(&conn, &user.id)?;
    if !profiles::remove_experience(&conn, &profile.id, &exp_id)? {
        return Err(AppError::not_found("experience", "Experience not found"));
    }
    Ok(Json(own_profile(&conn, &user.id)?))
}

/// POST /api/profile/education
async fn add_education(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(input): JsonBody<EducationInput>,
) -> AppResult<Json<Profile>> {
    let entry = validate_education(&input).map_err(AppError::Validation)?;

    let conn = state.db.get()?;
    let profile = own_profile(&conn, &user.id)?;
    profiles::add_education(&conn, &profile.id, &entry)?;
    Ok(Json(own_profile(&conn, &user.id)?))
}

/// DELETE /api/profile/education/{edu_id}
async fn delete_education(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(edu_id): Path<String>,
) -> AppResult<Json<Profile>> {
    let conn = state.db.get()?;
    let profile = own_profile(&conn, &user.id)?;
    if !profiles::remove_education(&conn, &profile.id, &edu_id)? {
        return Err(AppError::not_found("education", "Education not found"));
    }
    Ok(Json(own_profile(&conn, &user.id)?))
}
