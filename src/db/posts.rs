use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{Comment, Like, NewEntry, Post};
use crate::db::{new_id, now_timestamp};
use crate::error::AppResult;

const POST_COLUMNS: &str = "id, user_id, text, name, avatar, created_at";

fn map_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        user: row.get(1)?,
        text: row.get(2)?,
        name: row.get(3)?,
        avatar: row.get(4)?,
        likes: Vec::new(),
        comments: Vec::new(),
        date: row.get(5)?,
    })
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        user: row.get(1)?,
        text: row.get(2)?,
        name: row.get(3)?,
        avatar: row.get(4)?,
        date: row.get(5)?,
    })
}

fn load_likes(conn: &Connection, post_id: &str) -> AppResult<Vec<Like>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id FROM likes WHERE post_id = ?1 ORDER BY rowid DESC",
    )?;
    let likes = stmt
        .query_map(params![post_id], |row| {
            Ok(Like {
                id: row.get(0)?,
                user: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(likes)
}

fn load_comments(conn: &Connection, post_id: &str) -> AppResult<Vec<Comment>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, text, name, avatar, created_at
         FROM comments WHERE post_id = ?1 ORDER BY rowid DESC",
    )?;
    let comments = stmt
        .query_map(params![post_id], map_comment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}

pub fn insert(conn: &Connection, entry: &NewEntry) -> AppResult<Post> {
    let post = Post {
        id: new_id(),
        user: entry.user_id.clone(),
        text: entry.text.clone(),
        name: entry.name.clone(),
        avatar: entry.avatar.clone(),
        likes: Vec::new(),
        comments: Vec::new(),
        date: now_timestamp(),
    };

    conn.execute(
        "INSERT INTO posts (id, user_id, text, name, avatar, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![post.id, post.user, post.text, post.name, post.avatar, post.date],
    )?;

    Ok(post)
}

pub fn find(conn: &Connection, id: &str) -> AppResult<Option<Post>> {
    let post = conn
        .query_row(
            &format!("SELECT {} FROM posts WHERE id = ?1", POST_COLUMNS),
            params![id],
            map_post,
        )
        .optional()?;

    match post {
        Some(mut post) => {
            post.likes = load_likes(conn, &post.id)?;
            post.comments = load_comments(conn, &post.id)?;
            Ok(Some(post))
        }
        None => Ok(None),
    }
}

/// All posts newest first, with likes and comments attached.
pub fn list(conn: &Connection) -> AppResult<Vec<Post>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM posts ORDER BY rowid DESC",
        POST_COLUMNS
    ))?;
    let mut posts = stmt
        .query_map([], map_post)?
        .collect::<Result<Vec<_>, _>>()?;

    // One query per child table, grouped in memory
    let mut likes: HashMap<String, Vec<Like>> = HashMap::new();
    let mut stmt = conn.prepare("SELECT post_id, id, user_id FROM likes ORDER BY rowid DESC")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            Like {
                id: row.get(1)?,
                user: row.get(2)?,
            },
        ))
    })?;
    for row in rows {
        let (post_id, like) = row?;
        likes.entry(post_id).or_default().push(like);
    }

    let mut comments: HashMap<String, Vec<Comment>> = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT post_id, id, user_id, text, name, avatar, created_at
         FROM comments ORDER BY rowid DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            Comment {
                id: row.get(1)?,
                user: row.get(2)?,
                text: row.get(3)?,
                name: row.get(4)?,
                avatar: row.get(5)?,
                date: row.get(6)?,
            },
        ))
    })?;
    for row in rows {
        let (post_id, comment) = row?;
        comments.entry(post_id).or_default().push(comment);
    }

    for post in &mut posts {
        post.likes = likes.remove(&post.id).unwrap_or_default();
        post.comments = comments.remove(&post.id).unwrap_or_default();
    }

    Ok(posts)
}

pub fn delete(conn: &Connection, id: &str) -> AppResult<bool> {
    let rows = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}

/// Record a like. Returns false when the user already likes the post; the
/// unique index makes concurrent duplicates resolve the same way.
pub fn add_like(conn: &Connection, post_id: &str, user_id: &str) -> AppResult<bool> {
    let rows = conn.execute(
        "INSERT INTO likes (id, post_id, user_id) VALUES (?1, ?2, ?3)
         ON CONFLICT (post_id, user_id) DO NOTHING",
        params![new_id(), post_id, user_id],
    )?;
    Ok(rows > 0)
}

/// Returns false when there was no like to remove.
pub fn remove_like(conn: &Connection, post_id: &str, user_id: &str) -> AppResult<bool> {
    let rows = conn.execute(
        "DELETE FROM likes WHERE post_id = ?1 AND user_id = ?2",
        params![post_id, user_id],
    )?;
    Ok(rows > 0)
}

pub fn add_comment(conn: &Connection, post_id: &str, entry: &NewEntry) -> AppResult<Comment> {
    let comment = Comment {
        id: new_id(),
        user: entry.user_id.clone(),
        text: entry.text.clone(),
        name: entry.name.clone(),
        avatar: entry.avatar.clone(),
        date: now_timestamp(),
    };

    conn.execute(
        "INSERT INTO comments (id, post_id, user_id, text, name, avatar, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            comment.id,
            post_id,
            comment.user,
            comment.text,
            comment.name,
            comment.avatar,
            comment.date
        ],
    )?;

    Ok(comment)
}

pub fn find_comment(conn: &Connection, post_id: &str, comment_id: &str) -> AppResult<Option<Comment>> {
    let comment = conn
        .query_row(
            "SELECT id, user_id, text, name, avatar, created_at
             FROM comments WHERE id = ?1 AND post_id = ?2",
            params![comment_id, post_id],
            map_comment,
        )
        .optional()?;
    Ok(comment)
}

pub fn remove_comment(conn: &Connection, post_id: &str, comment_id: &str) -> AppResult<bool> {
    let rows = conn.execute(
        "DELETE FROM comments WHERE id = ?1 AND post_id = ?2",
        params![comment_id, post_id],
    )?;
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, users};

    fn entry(user_id: &str, text: &str) -> NewEntry {
        NewEntry {
            user_id: user_id.to_string(),
            text: text.to_string(),
            name: "ada".into(),
            avatar: "https://avatars.test/ada".into(),
        }
    }

    #[test]
    fn insert_and_find_post() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let user = users::seed(&conn, "ada", "ada@example.com");

        let post = insert(&conn, &entry(&user.id, "hello world, first post")).unwrap();
        let found = find(&conn, &post.id).unwrap().unwrap();
        assert_eq!(found.text, "hello world, first post");
        assert_eq!(found.user, user.id);
        assert!(found.likes.is_empty());
        assert!(find(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn list_is_newest_first_with_children() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let ada = users::seed(&conn, "ada", "ada@example.com");
        let bob = users::seed(&conn, "bob", "bob@example.com");

        let first = insert(&conn, &entry(&ada.id, "the first post here")).unwrap();
        let second = insert(&conn, &entry(&ada.id, "the second post here")).unwrap();
        add_like(&conn, &first.id, &bob.id).unwrap();
        add_comment(&conn, &first.id, &entry(&bob.id, "nice post, really")).unwrap();

        let posts = list(&conn).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, second.id);
        assert!(posts[0].likes.is_empty());
        assert_eq!(posts[1].likes.len(), 1);
        assert_eq!(posts[1].likes[0].user, bob.id);
        assert_eq!(posts[1].comments.len(), 1);
    }

    #[test]
    fn like_at_most_once() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let user = users::seed(&conn, "ada", "ada@example.com");
        let post = insert(&conn, &entry(&user.id, "likeable content")).unwrap();

        assert!(add_like(&conn, &post.id, &user.id).unwrap());
        assert!(!add_like(&conn, &post.id, &user.id).unwrap());
        assert!(remove_like(&conn, &post.id, &user.id).unwrap());
        assert!(!remove_like(&conn, &post.id, &user.id).unwrap());
    }

    #[test]
    fn comments_are_newest_first_and_scoped_to_post() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let user = users::seed(&conn, "ada", "ada@example.com");
        let post = insert(&conn, &entry(&user.id, "a post with comments")).unwrap();
        let other = insert(&conn, &entry(&user.id, "another post entirely")).unwrap();

        let c1 = add_comment(&conn, &post.id, &entry(&user.id, "first comment!")).unwrap();
        add_comment(&conn, &post.id, &entry(&user.id, "second comment!")).unwrap();

        let found = find(&conn, &post.id).unwrap().unwrap();
        assert_eq!(found.comments[0].text, "second comment!");

        assert!(find_comment(&conn, &other.id, &c1.id).unwrap().is_none());
        assert!(!remove_comment(&conn, &other.id, &c1.id).unwrap());
        assert!(remove_comment(&conn, &post.id, &c1.id).unwrap());
        assert_eq!(find(&conn, &post.id).unwrap().unwrap().comments.len(), 1);
    }

    #[test]
    fn deleting_post_removes_children() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let user = users::seed(&conn, "ada", "ada@example.com");
        let post = insert(&conn, &entry(&user.id, "short-lived post")).unwrap();
        add_like(&conn, &post.id, &user.id).unwrap();
        add_comment(&conn, &post.id, &entry(&user.id, "going away too")).unwrap();

        assert!(delete(&conn, &post.id).unwrap());
        assert!(!delete(&conn, &post.id).unwrap());
        let leftovers: i64 = conn
            .query_row(
                "SELECT (SELECT COUNT(*) FROM likes) + (SELECT COUNT(*) FROM comments)",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(leftovers, 0);
    }
}
