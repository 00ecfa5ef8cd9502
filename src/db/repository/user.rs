//! Engineer user repository

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{EngineerUser, UserCreate, UserUpdate};

const TABLE: &str = "engineer_user";

/// Outcome of an admin edit
#[derive(Debug)]
pub struct UserUpdateOutcome {
    pub user: EngineerUser,
    /// True when this edit flipped `is_on_call` from false to true (and
    /// cleared the flag from every other row)
    pub went_on_call: bool,
}

/// Repository for engineer accounts.
///
/// Owns the on-call singleton invariant: every mutation that can turn
/// `is_on_call` on clears it from every other row inside the same database
/// transaction, so no committed state ever holds two on-call engineers.
#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &Surreal<Db> {
        self.base.db()
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        let raw = if id.contains(':') {
            id.to_string()
        } else {
            format!("{}:{}", TABLE, id)
        };
        raw.parse::<RecordId>()
            .map_err(|_| RepoError::Validation(format!("Invalid user id: {}", id)))
    }

    pub async fn find_all(&self) -> RepoResult<Vec<EngineerUser>> {
        let mut result = self
            .db()
            .query("SELECT * FROM engineer_user ORDER BY username ASC")
            .await?;
        let users: Vec<EngineerUser> = result.take(0)?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<EngineerUser>> {
        let thing = Self::parse_id(id)?;
        let user: Option<EngineerUser> = self.db().select(thing).await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<EngineerUser>> {
        let mut result = self
            .db()
            .query("SELECT * FROM engineer_user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let user: Option<EngineerUser> = result.take(0)?;
        Ok(user)
    }

    /// The engineer currently on call, if any
    pub async fn find_on_call(&self) -> RepoResult<Option<EngineerUser>> {
        let mut result = self
            .db()
            .query("SELECT * FROM engineer_user WHERE is_on_call = true LIMIT 1")
            .await?;
        let user: Option<EngineerUser> = result.take(0)?;
        Ok(user)
    }

    pub async fn create(&self, data: UserCreate) -> RepoResult<EngineerUser> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username already exists: {}",
                data.username
            )));
        }

        let mut result = self
            .db()
            .query("CREATE engineer_user CONTENT $data")
            .bind(("data", data))
            .await?;
        let created: Vec<EngineerUser> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Admin edit. Fields left as `None` keep their stored value. A
    /// false-to-true transition of `is_on_call` clears the flag from all
    /// other engineers in the same transaction; any other combination
    /// (true-to-true included) leaves other rows alone. The outcome reports
    /// whether the transition fired so callers need no second read.
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<UserUpdateOutcome> {
        let thing = Self::parse_id(id)?;
        let existing: Option<EngineerUser> = self.db().select(thing.clone()).await?;
        let existing = existing
            .ok_or_else(|| RepoError::NotFound(format!("User not found: {}", id)))?;

        let goes_on_call = data.is_on_call == Some(true) && !existing.is_on_call;

        let update_sql = "UPDATE $thing SET \
             first_name = $first_name OR first_name, \
             last_name = $last_name OR last_name, \
             email = $email OR email, \
             is_admin = IF $has_is_admin THEN $is_admin ELSE is_admin END, \
             is_on_call = IF $has_is_on_call THEN $is_on_call ELSE is_on_call END \
             RETURN AFTER;";

        let sql = if goes_on_call {
            format!(
                "BEGIN TRANSACTION; \
                 UPDATE engineer_user SET is_on_call = false \
                 WHERE is_on_call = true AND id != $thing; \
                 {} \
                 COMMIT TRANSACTION;",
                update_sql
            )
        } else {
            update_sql.to_string()
        };

        let mut result = self
            .db()
            .query(sql)
            .bind(("thing", thing))
            .bind(("first_name", data.first_name))
            .bind(("last_name", data.last_name))
            .bind(("email", data.email))
            .bind(("has_is_admin", data.is_admin.is_some()))
            .bind(("is_admin", data.is_admin.unwrap_or(false)))
            .bind(("has_is_on_call", data.is_on_call.is_some()))
            .bind(("is_on_call", data.is_on_call.unwrap_or(false)))
            .await?;

        let idx = if goes_on_call { 1 } else { 0 };
        let updated: Option<EngineerUser> = result.take(idx)?;
        let user =
            updated.ok_or_else(|| RepoError::NotFound(format!("User not found: {}", id)))?;
        Ok(UserUpdateOutcome {
            user,
            went_on_call: goes_on_call,
        })
    }

    /// Hand the on-call flag to one engineer, clearing it from everyone else
    /// atomically. An unknown id fails before anything is touched.
    pub async fn set_on_call(&self, id: &str) -> RepoResult<EngineerUser> {
        let thing = Self::parse_id(id)?;
        let existing: Option<EngineerUser> = self.db().select(thing.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!("User not found: {}", id)));
        }

        let mut result = self
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE engineer_user SET is_on_call = false \
                 WHERE is_on_call = true AND id != $thing; \
                 UPDATE $thing SET is_on_call = true RETURN AFTER; \
                 COMMIT TRANSACTION;",
            )
            .bind(("thing", thing))
            .await?;

        let updated: Option<EngineerUser> = result.take(1)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User not found: {}", id)))
    }
}
