//! Card persistence using SQLite
//!
//! Each card is kept as a JSON document keyed by its id, alongside the
//! columns needed for per-owner queries. The `collections` table records
//! which cards a user has saved from others.

use chrono::{DateTime, Utc};
use meishi_core::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

use crate::models::BusinessCard;
use crate::record::{CardRecord, CollectionEntry};

/// SQLite-based card store
pub struct CardStore {
    conn: Connection,
}

impl CardStore {
    /// Create a new card store with the given database path
    pub fn new(db_path: &str) -> Result<Self> {
        debug!("Opening card database at: {}", db_path);
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_tables()?;
        info!("CardStore initialized successfully");
        Ok(store)
    }

    /// Create an in-memory card store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS cards (
                id TEXT PRIMARY KEY,
                user_id TEXT,
                data TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cards_user_id ON cards(user_id, updated_at)",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS collections (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                card_id TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_collections_user_id ON collections(user_id, saved_at)",
            [],
        )?;

        Ok(())
    }

    /// Create or overwrite a card.
    ///
    /// First saves (no id, or a blank one) get a freshly generated id.
    /// Overwrites keep the `createdAt` already on disk. The returned card
    /// carries the id and the `updated_at` stamp that was written.
    pub fn save_card(&self, card: &BusinessCard) -> Result<BusinessCard> {
        let id = card
            .id()
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut record = card.to_record();
        if let Some(existing) = self.get_record(&id)? {
            if existing.created_at.is_some() {
                record.created_at = existing.created_at;
            }
        }
        let updated_at = record.updated_at.unwrap_or_else(Utc::now);
        let data = serde_json::to_string(&record)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO cards (id, user_id, data, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, record.user_id, data, updated_at.timestamp_micros()],
        )?;

        debug!("Saved card with id: {}", id);
        BusinessCard::from_stored(&id, record)
    }

    /// Load a card by id
    pub fn get_card(&self, id: &str) -> Result<BusinessCard> {
        let data: Option<String> = self
            .conn
            .query_row("SELECT data FROM cards WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;

        match data {
            Some(data) => decode_card(id, &data),
            None => Err(Error::NotFound(format!("card {}", id))),
        }
    }

    fn get_record(&self, id: &str) -> Result<Option<CardRecord>> {
        let data: Option<String> = self
            .conn
            .query_row("SELECT data FROM cards WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;

        data.map(|data| serde_json::from_str(&data).map_err(Error::from))
            .transpose()
    }

    /// All cards owned by `user_id`, most recently updated first
    pub fn get_user_cards(&self, user_id: &str) -> Result<Vec<BusinessCard>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, data FROM cards
             WHERE user_id = ?1
             ORDER BY updated_at DESC, rowid DESC",
        )?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let cards = rows
            .iter()
            .map(|(id, data)| decode_card(id, data))
            .collect::<Result<Vec<_>>>()?;

        debug!("Listed {} cards for user {}", cards.len(), user_id);
        Ok(cards)
    }

    /// Delete a card. Deletion is terminal.
    pub fn delete_card(&self, id: &str) -> Result<()> {
        let rows_affected = self.conn.execute("DELETE FROM cards WHERE id = ?1", params![id])?;
        if rows_affected == 0 {
            return Err(Error::NotFound(format!("card {}", id)));
        }
        debug!("Deleted card with id: {}", id);
        Ok(())
    }

    /// Record that `user_id` saved `card_id`; returns the entry id
    pub fn save_to_collection(&self, user_id: &str, card_id: &str) -> Result<String> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM cards WHERE id = ?1)",
            params![card_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(Error::NotFound(format!("card {}", card_id)));
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO collections (id, user_id, card_id, saved_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, user_id, card_id, Utc::now().timestamp_micros()],
        )?;

        debug!("User {} saved card {} to collection", user_id, card_id);
        Ok(id)
    }

    /// Collection entries of `user_id`, most recently saved first
    pub fn get_collection_entries(&self, user_id: &str) -> Result<Vec<CollectionEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, card_id, saved_at FROM collections
             WHERE user_id = ?1
             ORDER BY saved_at DESC, rowid DESC",
        )?;

        let entries = stmt
            .query_map(params![user_id], |row| {
                let saved_at: i64 = row.get(3)?;
                Ok(CollectionEntry {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    card_id: row.get(2)?,
                    saved_at: DateTime::from_timestamp_micros(saved_at).unwrap_or_default(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Cards saved by `user_id`, most recently saved first.
    ///
    /// Entries pointing at cards that have since been deleted are skipped.
    pub fn get_card_collection(&self, user_id: &str) -> Result<Vec<BusinessCard>> {
        let mut cards = Vec::new();
        for entry in self.get_collection_entries(user_id)? {
            match self.get_card(&entry.card_id) {
                Ok(card) => cards.push(card),
                Err(Error::NotFound(_)) => {
                    warn!("Collection entry {} points at missing card {}", entry.id, entry.card_id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(cards)
    }

    /// Count cards owned by `user_id`
    pub fn count_user_cards(&self, user_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM cards WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn decode_card(id: &str, data: &str) -> Result<BusinessCard> {
    let record: CardRecord = serde_json::from_str(data)?;
    BusinessCard::from_stored(id, record)
}
