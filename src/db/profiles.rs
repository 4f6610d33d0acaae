use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{
    Education, Experience, NewEducation, NewExperience, Profile, ProfileFields, Social,
    UserSummary,
};
use crate::db::{is_unique_violation, new_id, now_timestamp};
use crate::error::{AppError, AppResult};

const PROFILE_SELECT: &str = "SELECT p.id, p.user_id, u.name, u.avatar, p.handle, p.company,
        p.website, p.location, p.status, p.skills, p.bio, p.githubusername,
        p.youtube, p.twitter, p.facebook, p.linkedin, p.instagram, p.created_at
     FROM profiles p
     JOIN users u ON u.id = p.user_id";

fn map_profile(row: &Row<'_>) -> rusqlite::Result<Profile> {
    let skills: String = row.get(9)?;
    let skills = serde_json::from_str(&skills)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;
    Ok(Profile {
        id: row.get(0)?,
        user: UserSummary {
            id: row.get(1)?,
            name: row.get(2)?,
            avatar: row.get(3)?,
        },
        handle: row.get(4)?,
        company: row.get(5)?,
        website: row.get(6)?,
        location: row.get(7)?,
        status: row.get(8)?,
        skills,
        bio: row.get(10)?,
        githubusername: row.get(11)?,
        social: Social {
            youtube: row.get(12)?,
            twitter: row.get(13)?,
            facebook: row.get(14)?,
            linkedin: row.get(15)?,
            instagram: row.get(16)?,
        },
        experience: Vec::new(),
        education: Vec::new(),
        date: row.get(17)?,
    })
}

fn load_experience(conn: &Connection, profile_id: &str) -> AppResult<Vec<Experience>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, company, location, from_date, to_date, current, description
         FROM experience WHERE profile_id = ?1
         ORDER BY rowid DESC",
    )?;
    let entries = stmt
        .query_map(params![profile_id], |row| {
            Ok(Experience {
                id: row.get(0)?,
                title: row.get(1)?,
                company: row.get(2)?,
                location: row.get(3)?,
                from: row.get(4)?,
                to: row.get(5)?,
                current: row.get(6)?,
                description: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

fn load_education(conn: &Connection, profile_id: &str) -> AppResult<Vec<Education>> {
    let mut stmt = conn.prepare(
        "SELECT id, school, degree, field_of_study, from_date, to_date, current, description
         FROM education WHERE profile_id = ?1
         ORDER BY rowid DESC",
    )?;
    let entries = stmt
        .query_map(params![profile_id], |row| {
            Ok(Education {
                id: row.get(0)?,
                school: row.get(1)?,
                degree: row.get(2)?,
                fieldofstudy: row.get(3)?,
                from: row.get(4)?,
                to: row.get(5)?,
                current: row.get(6)?,
                description: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

fn with_children(conn: &Connection, mut profile: Profile) -> AppResult<Profile> {
    profile.experience = load_experience(conn, &profile.id)?;
    profile.education = load_education(conn, &profile.id)?;
    Ok(profile)
}

fn find_one(conn: &Connection, column: &str, value: &str) -> AppResult<Option<Profile>> {
    let sql = format!("{} WHERE {} = ?1", PROFILE_SELECT, column);
    match conn.query_row(&sql, params![value], map_profile).optional()? {
        Some(profile) => Ok(Some(with_children(conn, profile)?)),
        None => Ok(None),
    }
}

pub fn find_by_user(conn: &Connection, user_id: &str) -> AppResult<Option<Profile>> {
    find_one(conn, "p.user_id", user_id)
}

pub fn find_by_handle(conn: &Connection, handle: &str) -> AppResult<Option<Profile>> {
    find_one(conn, "p.handle", handle)
}

/// All profiles, newest first.
pub fn list(conn: &Connection) -> AppResult<Vec<Profile>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY p.rowid DESC", PROFILE_SELECT))?;
    let profiles = stmt
        .query_map([], map_profile)?
        .collect::<Result<Vec<_>, _>>()?;

    profiles
        .into_iter()
        .map(|profile| with_children(conn, profile))
        .collect()
}

/// User id owning `handle`, if any profile uses it.
pub fn handle_owner(conn: &Connection, handle: &str) -> AppResult<Option<String>> {
    let owner = conn
        .query_row(
            "SELECT user_id FROM profiles WHERE handle = ?1",
            params![handle],
            |row| row.get(0),
        )
        .optional()?;
    Ok(owner)
}

/// Create the user's profile, or update it in place. Optional fields left as
/// `None` keep their stored value on update.
pub fn upsert(conn: &mut Connection, user_id: &str, fields: &ProfileFields) -> AppResult<Profile> {
    let skills = serde_json::to_string(&fields.skills)?;
    let tx = conn.transaction()?;

    let existing: Option<String> = tx
        .query_row(
            "SELECT id FROM profiles WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .optional()?;

    let social = &fields.social;
    let result = match existing {
        Some(profile_id) => tx.execute(
            "UPDATE profiles SET
                handle = ?1, status = ?2, skills = ?3,
                company = COALESCE(?4, company),
                website = COALESCE(?5, website),
                location = COALESCE(?6, location),
                bio = COALESCE(?7, bio),
                githubusername = COALESCE(?8, githubusername),
                youtube = COALESCE(?9, youtube),
                twitter = COALESCE(?10, twitter),
                facebook = COALESCE(?11, facebook),
                linkedin = COALESCE(?12, linkedin),
                instagram = COALESCE(?13, instagram)
             WHERE id = ?14",
            params![
                fields.handle,
                fields.status,
                skills,
                fields.company,
                fields.website,
                fields.location,
                fields.bio,
                fields.githubusername,
                social.youtube,
                social.twitter,
                social.facebook,
                social.linkedin,
                social.instagram,
                profile_id
            ],
        ),
        None => tx.execute(
            "INSERT INTO profiles (id, user_id, handle, status, skills, company, website,
                location, bio, githubusername, youtube, twitter, facebook, linkedin,
                instagram, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                new_id(),
                user_id,
                fields.handle,
                fields.status,
                skills,
                fields.company,
                fields.website,
                fields.location,
                fields.bio,
                fields.githubusername,
                social.youtube,
                social.twitter,
                social.facebook,
                social.linkedin,
                social.instagram,
                now_timestamp()
            ],
        ),
    };

    match result {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::validation("handle", "That handle already exists"));
        }
        Err(e) => return Err(e.into()),
    }
    tx.commit()?;

    find_by_user(conn, user_id)?
        .ok_or_else(|| AppError::Internal("profile vanished after upsert".into()))
}

pub fn add_experience(conn: &Connection, profile_id: &str, entry: &NewExperience) -> AppResult<()> {
    conn.execute(
        "INSERT INTO experience (id, profile_id, title, company, location, from_date, to_date,
            current, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            new_id(),
            profile_id,
            entry.title,
            entry.company,
            entry.location,
            entry.from,
            entry.to,
            entry.current,
            entry.description
        ],
    )?;
    Ok(())
}

pub fn remove_experience(conn: &Connection, profile_id: &str, exp_id: &str) -> AppResult<bool> {
    let rows = conn.execute(
        "DELETE FROM experience WHERE id = ?1 AND profile_id = ?2",
        params![exp_id, profile_id],
    )?;
    Ok(rows > 0)
}

pub fn add_education(conn: &Connection, profile_id: &str, entry: &NewEducation) -> AppResult<()> {
    conn.execute(
        "INSERT INTO education (id, profile_id, school, degree, field_of_study, from_date,
            to_date, current, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            new_id(),
            profile_id,
            entry.school,
            entry.degree,
            entry.fieldofstudy,
            entry.from,
            entry.to,
            entry.current,
            entry.description
        ],
    )?;
    Ok(())
}

pub fn remove_education(conn: &Connection, profile_id: &str, edu_id: &str) -> AppResult<bool> {
    let rows = conn.execute(
        "DELETE FROM education WHERE id = ?1 AND profile_id = ?2",
        params![edu_id, profile_id],
    )?;
    Ok(rows > 0)
}
