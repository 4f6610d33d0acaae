use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{NewUser, User};
use crate::db::{new_id, now_timestamp};
use crate::error::AppResult;

const USER_COLUMNS: &str = "id, name, email, password_hash, avatar, created_at";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        avatar: row.get(4)?,
        date: row.get(5)?,
    })
}

pub fn insert(conn: &Connection, new_user: &NewUser) -> AppResult<User> {
    let user = User {
        id: new_id(),
        name: new_user.name.clone(),
        email: new_user.email.clone(),
        password_hash: new_user.password_hash.clone(),
        avatar: new_user.avatar.clone(),
        date: now_timestamp(),
    };

    conn.execute(
        "INSERT INTO users (id, name, email, password_hash, avatar, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.name,
            user.email,
            user.password_hash,
            user.avatar,
            user.date
        ],
    )?;

    Ok(user)
}

pub fn find_by_email(conn: &Connection, email: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
            params![email],
            map_user,
        )
        .optional()?;
    Ok(user)
}

pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            params![id],
            map_user,
        )
        .optional()?;
    Ok(user)
}

/// Remove a user; profile, posts, likes and comments go with it.
pub fn delete(conn: &Connection, id: &str) -> AppResult<bool> {
    let rows = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}

#[cfg(test)]
pub(crate) fn seed(conn: &Connection, name: &str, email: &str) -> User {
    insert(
        conn,
        &NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            avatar: format!("https://avatars.test/{}", name),
        },
    )
    .unwrap()
}
