use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::models::{NewEntry, Post, User};
use crate::db::posts;
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, JsonBody};
use crate::state::AppState;
use crate::validation::{validate_post, PostDraft, PostInput};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{id}", get(get_post).delete(delete_post))
        .route("/post/{id}", delete(delete_post))
        .route("/like/{id}", post(like_post))
        .route("/unlike/{id}", post(unlike_post))
        .route("/comment/{id}", post(add_comment))
        .route("/comment/{id}/{comment_id}", delete(delete_comment))
}

fn no_post() -> AppError {
    AppError::not_found("nopostfound", "No post found with that ID")
}

fn load_post(conn: &rusqlite::Connection, id: &str) -> AppResult<Post> {
    posts::find(conn, id)?.ok_or_else(no_post)
}

fn entry_for(user: &User, draft: PostDraft) -> NewEntry {
    NewEntry {
        user_id: user.id.clone(),
        text: draft.text,
        name: draft.name.unwrap_or_else(|| user.name.clone()),
        avatar: draft.avatar.unwrap_or_else(|| user.avatar.clone()),
    }
}

/// POST /api/posts
async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(input): JsonBody<PostInput>,
) -> AppResult<Json<Post>> {
    let draft = validate_post(&input).map_err(AppError::Validation)?;

    let conn = state.db.get()?;
    let post = posts::insert(&conn, &entry_for(&user, draft))?;
    tracing::debug!(post_id = %post.id, user_id = %user.id, "Created post");
    Ok(Json(post))
}

/// GET /api/posts
async fn list_posts(State(state): State<AppState>) -> AppResult<Json<Vec<Post>>> {
    let conn = state.db.get()?;
    Ok(Json(posts::list(&conn)?))
}

/// GET /api/posts/{id}
async fn get_post(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    let conn = state.db.get()?;
    Ok(Json(load_post(&conn, &id)?))
}

/// DELETE /api/posts/post/{id} (also /api/posts/{id}), author only
async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let conn = state.db.get()?;
    let post = load_post(&conn, &id)?;
    if post.user != user.id {
        return Err(AppError::not_authorized());
    }

    posts::delete(&conn, &post.id)?;
    tracing::debug!(post_id = %post.id, "Deleted post");
    Ok(Json(json!({ "success": true })))
}

/// POST /api/posts/like/{id}
async fn like_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    let conn = state.db.get()?;
    let post = load_post(&conn, &id)?;
    if !posts::add_like(&conn, &post.id, &user.id)? {
        return Err(AppError::validation("error", "Already liked."));
    }
    Ok(Json(load_post(&conn, &id)?))
}

/// POST /api/posts/unlike/{id}
async fn unlike_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    let conn = state.db.get()?;
    let post = load_post(&conn, &id)?;
    if !posts::remove_like(&conn, &post.id, &user.id)? {
        return Err(AppError::validation(
            "error",
            "You have not yet liked this post",
        ));
    }
    Ok(Json(load_post(&conn, &id)?))
}

/// POST /api/posts/comment/{id}
async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<PostInput>,
) -> AppResult<Json<Post>> {
    let draft = validate_post(&input).map_err(AppError::Validation)?;

    let conn = state.db.get()?;
    let post = load_post(&conn, &id)?;
    posts::add_comment(&conn, &post.id, &entry_for(&user, draft))?;
    Ok(Json(load_post(&conn, &id)?))
}

/// DELETE /api/posts/comment/{id}/{comment_id} — comment author or post author
async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> AppResult<Json<Post>> {
    let conn = state.db.get()?;
    let post = load_post(&conn, &id)?;
    let comment = posts::find_comment(&conn, &post.id, &comment_id)?
        .ok_or_else(|| AppError::not_found("comment", "Comment does not exist"))?;

    if comment.user != user.id && post.user != user.id {
        return Err(AppError::not_authorized());
    }

    posts::remove_comment(&conn, &post.id, &comment.id)?;
    Ok(Json(load_post(&conn, &id)?))
}
