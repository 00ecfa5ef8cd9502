//! Ticket repository

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Ticket, TicketCreate, TicketUpdate};

const TABLE: &str = "ticket";

#[derive(Clone)]
pub struct TicketRepository {
    base: BaseRepository,
}

impl TicketRepository {
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
            .map_err(|_| RepoError::Validation(format!("Invalid ticket id: {}", id)))
    }

    /// Newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Ticket>> {
        let mut result = self
            .db()
            .query("SELECT * FROM ticket ORDER BY created DESC")
            .await?;
        let tickets: Vec<Ticket> = result.take(0)?;
        Ok(tickets)
    }

    pub async fn find_by_reporter(&self, reporter: &RecordId) -> RepoResult<Vec<Ticket>> {
        let mut result = self
            .db()
            .query("SELECT * FROM ticket WHERE reporter = $reporter ORDER BY created DESC")
            .bind(("reporter", reporter.to_string()))
            .await?;
        let tickets: Vec<Ticket> = result.take(0)?;
        Ok(tickets)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Ticket>> {
        let thing = Self::parse_id(id)?;
        let ticket: Option<Ticket> = self.db().select(thing).await?;
        Ok(ticket)
    }

    /// Exact, case-sensitive title lookup. Titles are stored escaped, so the
    /// caller must pass the escaped form.
    pub async fn find_by_title(&self, title: &str) -> RepoResult<Option<Ticket>> {
        let mut result = self
            .db()
            .query("SELECT * FROM ticket WHERE title = $title LIMIT 1")
            .bind(("title", title.to_string()))
            .await?;
        let ticket: Option<Ticket> = result.take(0)?;
        Ok(ticket)
    }

    pub async fn create(&self, data: TicketCreate) -> RepoResult<Ticket> {
        if self.find_by_title(&data.title).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Title already exists: {}",
                data.title
            )));
        }

        let mut result = self
            .db()
            .query("CREATE ticket CONTENT $data")
            .bind(("data", data))
            .await?;
        let created: Vec<Ticket> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create ticket".to_string()))
    }

    /// Only the editable fields change; title, created and reporter are
    /// immutable after creation.
    pub async fn update(&self, id: &str, data: TicketUpdate) -> RepoResult<Ticket> {
        let thing = Self::parse_id(id)?;
        let mut result = self
            .db()
            .query(
                "UPDATE $thing SET \
                 description = $description, \
                 priority = $priority, \
                 status = $status \
                 RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("description", data.description))
            .bind(("priority", data.priority))
            .bind(("status", data.status))
            .await?;
        let updated: Option<Ticket> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Ticket not found: {}", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Ticket> {
        let thing = Self::parse_id(id)?;
        let existing: Option<Ticket> = self.db().select(thing.clone()).await?;
        let existing =
            existing.ok_or_else(|| RepoError::NotFound(format!("Ticket not found: {}", id)))?;

        let _: Option<Ticket> = self.db().delete(thing).await?;
        Ok(existing)
    }
}
